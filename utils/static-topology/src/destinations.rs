/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use crate::engine::{BuildContext, StoreCursor};
use crate::model::{QueueSpec, RemoteQueuePointSpec, StreamSetSpec, StreamSpec};
use broker_control::{
    AdapterIdentity, AdapterSlot, ControlAdapter, ControlError, ControlResult, Controllable,
    EngineEvent, EngineEventKind, EngineUuid, QueueControl, QueueResource, RawSource, Reliability,
    RemoteQueuePointControl, RemoteQueuePointResource, StreamControl, StreamId, StreamResource,
    StreamSetControl, StreamSetResource, StreamState,
};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

const COMPONENT: &str = "static_destinations";

pub struct StaticQueue {
    me: Weak<StaticQueue>,
    id: String,
    name: String,
    depth: AtomicU64,
    high_water_mark: u64,
    created_at: DateTime<Utc>,
    corrupt: AtomicBool,
    points: Vec<Arc<StaticRemoteQueuePoint>>,
    context: BuildContext,
    slot: AdapterSlot<QueueControl>,
}

impl StaticQueue {
    pub(crate) fn build(spec: &QueueSpec, context: &BuildContext) -> ControlResult<Arc<Self>> {
        let points = spec
            .remote_queue_points
            .iter()
            .map(|point| StaticRemoteQueuePoint::build(&spec.name, point, context))
            .collect::<ControlResult<Vec<_>>>()?;

        Ok(Arc::new_cyclic(|me| StaticQueue {
            me: me.clone(),
            id: spec.id.clone(),
            name: spec.name.clone(),
            depth: AtomicU64::new(spec.depth),
            high_water_mark: spec.high_water_mark,
            created_at: spec.created_at,
            corrupt: AtomicBool::new(spec.corrupt),
            points,
            context: context.clone(),
            slot: context.slot(),
        }))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Updates the depth, notifying the adapter when the high water mark is crossed.
    pub fn set_depth(&self, depth: u64) {
        let previous = self.depth.swap(depth, Ordering::SeqCst);
        let kind = match (
            previous >= self.high_water_mark,
            depth >= self.high_water_mark,
        ) {
            (false, true) => EngineEventKind::DepthThresholdReached,
            (true, false) => EngineEventKind::DepthThresholdCleared,
            _ => return,
        };

        if let Some(adapter) = self.slot.get() {
            adapter.on_engine_event(&EngineEvent::new(
                kind,
                format!("depth {depth}, high water mark {}", self.high_water_mark),
            ));
        }
    }

    /// Makes the remote point index unreadable, or readable again.
    pub fn set_corrupt(&self, corrupt: bool) {
        self.corrupt.store(corrupt, Ordering::SeqCst);
    }

    pub fn remote_queue_point(
        &self,
        remote_engine: EngineUuid,
    ) -> Option<Arc<StaticRemoteQueuePoint>> {
        self.points
            .iter()
            .find(|point| point.remote_engine == remote_engine)
            .cloned()
    }

    pub fn is_alive(&self) -> bool {
        !self.slot.is_torn_down()
    }

    /// Removes the queue and its remote queue points from the engine.
    pub fn delete(&self) {
        self.points.iter().for_each(|point| point.delete());
        self.slot.teardown();
        debug!(component = COMPONENT, queue = self.name.as_str(), "queue deleted");
    }
}

impl Controllable for StaticQueue {
    type Control = Arc<QueueControl>;

    fn control_adapter(&self) -> Option<Arc<QueueControl>> {
        self.slot.get_or_create(|| {
            let me: Weak<dyn QueueResource> = self.me.clone();
            Some(QueueControl::new(
                AdapterIdentity::new(&self.id, &self.name),
                me,
            ))
        })
    }
}

impl QueueResource for StaticQueue {
    fn depth(&self) -> u64 {
        self.depth.load(Ordering::SeqCst)
    }

    fn high_water_mark(&self) -> u64 {
        self.high_water_mark
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn remote_queue_points(&self) -> ControlResult<RawSource<Arc<dyn RemoteQueuePointResource>>> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(ControlError::OperationFailed {
                operation: "remote_queue_points",
                reason: format!("remote point index of queue '{}' is unreadable", self.name),
            });
        }

        let points = self
            .points
            .iter()
            .map(|point| Arc::clone(point) as Arc<dyn RemoteQueuePointResource>)
            .collect();
        Ok(StoreCursor::open(points, &self.context.ledger))
    }
}

pub struct StaticRemoteQueuePoint {
    me: Weak<StaticRemoteQueuePoint>,
    id: String,
    remote_engine: EngineUuid,
    in_flight: AtomicU64,
    sent: AtomicU64,
    stream_set: Option<Arc<StaticStreamSet>>,
    slot: AdapterSlot<RemoteQueuePointControl>,
}

impl StaticRemoteQueuePoint {
    fn build(
        queue_name: &str,
        spec: &RemoteQueuePointSpec,
        context: &BuildContext,
    ) -> ControlResult<Arc<Self>> {
        let remote_engine = EngineUuid::parse_for("load_topology", &spec.remote_engine)?;
        let id = format!("{queue_name}@{remote_engine}");
        let stream_set = spec
            .stream_set
            .as_ref()
            .map(|stream_set| StaticStreamSet::build(&id, stream_set, context))
            .transpose()?;

        Ok(Arc::new_cyclic(|me| StaticRemoteQueuePoint {
            me: me.clone(),
            id,
            remote_engine,
            in_flight: AtomicU64::new(spec.in_flight),
            sent: AtomicU64::new(spec.sent),
            stream_set,
            slot: context.slot(),
        }))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stream_set(&self) -> Option<Arc<StaticStreamSet>> {
        self.stream_set.clone()
    }

    pub fn record_sent(&self, count: u64) {
        self.sent.fetch_add(count, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        !self.slot.is_torn_down()
    }

    pub fn delete(&self) {
        if let Some(stream_set) = &self.stream_set {
            stream_set.delete();
        }
        self.slot.teardown();
    }
}

impl Controllable for StaticRemoteQueuePoint {
    type Control = Arc<RemoteQueuePointControl>;

    fn control_adapter(&self) -> Option<Arc<RemoteQueuePointControl>> {
        self.slot.get_or_create(|| {
            let me: Weak<dyn RemoteQueuePointResource> = self.me.clone();
            let identity =
                AdapterIdentity::new(&self.id, &self.id).with_remote_engine(self.remote_engine);
            Some(RemoteQueuePointControl::new(identity, me))
        })
    }
}

impl RemoteQueuePointResource for StaticRemoteQueuePoint {
    fn remote_engine(&self) -> EngineUuid {
        self.remote_engine
    }

    fn messages_in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn messages_sent(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }

    fn stream_set(&self) -> Option<Arc<dyn StreamSetResource>> {
        self.stream_set
            .as_ref()
            .map(|stream_set| Arc::clone(stream_set) as Arc<dyn StreamSetResource>)
    }
}

pub struct StaticStreamSet {
    me: Weak<StaticStreamSet>,
    id: String,
    corrupt: AtomicBool,
    streams: Vec<Arc<StaticStream>>,
    context: BuildContext,
    slot: AdapterSlot<StreamSetControl>,
}

impl StaticStreamSet {
    fn build(
        point_id: &str,
        spec: &StreamSetSpec,
        context: &BuildContext,
    ) -> ControlResult<Arc<Self>> {
        let streams = spec
            .streams
            .iter()
            .map(|stream| StaticStream::build(stream, context))
            .collect::<ControlResult<Vec<_>>>()?;

        Ok(Arc::new_cyclic(|me| StaticStreamSet {
            me: me.clone(),
            id: format!("{point_id}/streams"),
            corrupt: AtomicBool::new(spec.corrupt),
            streams,
            context: context.clone(),
            slot: context.slot(),
        }))
    }

    pub fn set_corrupt(&self, corrupt: bool) {
        self.corrupt.store(corrupt, Ordering::SeqCst);
    }

    pub fn stream(&self, stream_id: StreamId) -> Option<Arc<StaticStream>> {
        self.streams
            .iter()
            .find(|stream| stream.stream_id == stream_id)
            .cloned()
    }

    pub fn delete(&self) {
        self.streams.iter().for_each(|stream| stream.delete());
        self.slot.teardown();
    }
}

impl Controllable for StaticStreamSet {
    type Control = Arc<StreamSetControl>;

    fn control_adapter(&self) -> Option<Arc<StreamSetControl>> {
        self.slot.get_or_create(|| {
            let me: Weak<dyn StreamSetResource> = self.me.clone();
            Some(StreamSetControl::new(
                AdapterIdentity::new(&self.id, &self.id),
                me,
            ))
        })
    }
}

impl StreamSetResource for StaticStreamSet {
    fn streams(&self) -> ControlResult<RawSource<Arc<dyn StreamResource>>> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(ControlError::OperationFailed {
                operation: "streams",
                reason: format!("stream set '{}' is corrupt", self.id),
            });
        }

        let streams = self
            .streams
            .iter()
            .map(|stream| Arc::clone(stream) as Arc<dyn StreamResource>)
            .collect();
        Ok(StoreCursor::open(streams, &self.context.ledger))
    }
}

pub struct StaticStream {
    me: Weak<StaticStream>,
    stream_id: StreamId,
    priority: u8,
    reliability: Reliability,
    state: StreamState,
    sent: AtomicU64,
    acknowledged: AtomicU64,
    slot: AdapterSlot<StreamControl>,
}

impl StaticStream {
    fn build(spec: &StreamSpec, context: &BuildContext) -> ControlResult<Arc<Self>> {
        let stream_id = StreamId::parse_for("load_topology", &spec.id)?;

        Ok(Arc::new_cyclic(|me| StaticStream {
            me: me.clone(),
            stream_id,
            priority: spec.priority,
            reliability: spec.reliability,
            state: spec.state,
            sent: AtomicU64::new(spec.sent),
            acknowledged: AtomicU64::new(spec.acknowledged),
            slot: context.slot(),
        }))
    }

    pub fn acknowledge(&self, count: u64) {
        self.acknowledged.fetch_add(count, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        !self.slot.is_torn_down()
    }

    pub fn delete(&self) {
        self.slot.teardown();
    }
}

impl Controllable for StaticStream {
    type Control = Arc<StreamControl>;

    fn control_adapter(&self) -> Option<Arc<StreamControl>> {
        self.slot.get_or_create(|| {
            let me: Weak<dyn StreamResource> = self.me.clone();
            let id = self.stream_id.to_string();
            Some(StreamControl::new(AdapterIdentity::new(&id, &id), me))
        })
    }
}

impl StreamResource for StaticStream {
    fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn reliability(&self) -> Reliability {
        self.reliability
    }

    fn stream_state(&self) -> StreamState {
        self.state
    }

    fn messages_sent(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }

    fn messages_acknowledged(&self) -> u64 {
        self.acknowledged.load(Ordering::SeqCst)
    }
}

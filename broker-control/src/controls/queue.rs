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

use crate::control_plane::adapter::{AdapterIdentity, ControlAdapter, ResourceKind};
use crate::control_plane::lifecycle::AdapterCore;
use crate::control_plane::management::EngineEventListener;
use crate::controls::stream::StreamSetControl;
use crate::controls::{QueueStreamCursor, RemoteQueuePointCursor, StreamCursor};
use crate::error::{ControlError, ControlResult};
use crate::identifiers::EngineUuid;
use crate::iteration::{find_first, ConvertingIterator, NestedIterator};
use crate::resources::{Controllable, QueueResource, RemoteQueuePointResource};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};

/// Adapter over a point-to-point destination.
pub struct QueueControl {
    core: AdapterCore<Weak<dyn QueueResource>>,
}

impl QueueControl {
    pub fn new(identity: AdapterIdentity, resource: Weak<dyn QueueResource>) -> Self {
        Self {
            core: AdapterCore::new(ResourceKind::Queue, identity, resource),
        }
    }

    pub fn set_listener(&self, listener: Option<Arc<dyn EngineEventListener>>) {
        self.core.set_listener(listener);
    }

    pub fn depth(&self) -> ControlResult<u64> {
        Ok(self.core.upgrade("depth")?.depth())
    }

    pub fn high_water_mark(&self) -> ControlResult<u64> {
        Ok(self.core.upgrade("high_water_mark")?.high_water_mark())
    }

    pub fn created_at(&self) -> ControlResult<DateTime<Utc>> {
        Ok(self.core.upgrade("created_at")?.created_at())
    }

    /// Fails with `OperationFailed` when the queue's remote point index is corrupt.
    pub fn remote_queue_points(&self) -> ControlResult<RemoteQueuePointCursor> {
        let queue = self.core.upgrade("remote_queue_points")?;
        Ok(ConvertingIterator::new(queue.remote_queue_points()?))
    }

    /// Finds the point this queue keeps for `remote_engine`, given as a hex engine uuid.
    pub fn find_remote_queue_point(
        &self,
        remote_engine: &str,
    ) -> ControlResult<Arc<RemoteQueuePointControl>> {
        const OPERATION: &str = "find_remote_queue_point";
        let wanted = EngineUuid::parse_for(OPERATION, remote_engine)?;

        find_first(
            self.remote_queue_points()?,
            OPERATION,
            ResourceKind::RemoteQueuePoint,
            remote_engine,
            |point| point.remote_engine() == Some(wanted),
        )
    }

    /// Streams of every remote queue point that is backed by a stream set.
    ///
    /// Points without a stream set, or whose stream set is corrupt, are skipped.
    pub fn streams(&self) -> ControlResult<QueueStreamCursor> {
        let acquire: fn(&Arc<RemoteQueuePointControl>) -> ControlResult<StreamCursor> =
            |point| point.stream_set()?.streams();
        Ok(NestedIterator::new(self.remote_queue_points()?, acquire))
    }
}

impl ControlAdapter for QueueControl {
    delegate_to_core!();
    publish_to_registry!();
    forward_engine_events!();
}

/// Adapter over the state a queue keeps for one remote engine.
pub struct RemoteQueuePointControl {
    core: AdapterCore<Weak<dyn RemoteQueuePointResource>>,
}

impl RemoteQueuePointControl {
    /// `identity` should carry the remote engine uuid.
    pub fn new(identity: AdapterIdentity, resource: Weak<dyn RemoteQueuePointResource>) -> Self {
        Self {
            core: AdapterCore::new(ResourceKind::RemoteQueuePoint, identity, resource),
        }
    }

    pub fn set_listener(&self, listener: Option<Arc<dyn EngineEventListener>>) {
        self.core.set_listener(listener);
    }

    pub fn messages_in_flight(&self) -> ControlResult<u64> {
        Ok(self.core.upgrade("messages_in_flight")?.messages_in_flight())
    }

    pub fn messages_sent(&self) -> ControlResult<u64> {
        Ok(self.core.upgrade("messages_sent")?.messages_sent())
    }

    /// Stream set carrying this point's guaranteed-delivery traffic.
    ///
    /// Fails with `OperationFailed` when the point has no stream set at all.
    pub fn stream_set(&self) -> ControlResult<Arc<StreamSetControl>> {
        const OPERATION: &str = "stream_set";
        let point = self.core.upgrade(OPERATION)?;
        let stream_set = point.stream_set().ok_or_else(|| {
            ControlError::operation_failed(
                OPERATION,
                format!(
                    "remote queue point '{}' is not backed by a stream set",
                    self.core.captured_identity().id
                ),
            )
        })?;

        stream_set.control_adapter().ok_or_else(|| {
            ControlError::not_found(
                OPERATION,
                ResourceKind::StreamSet.as_str(),
                &self.core.captured_identity().id,
            )
        })
    }
}

impl ControlAdapter for RemoteQueuePointControl {
    delegate_to_core!();
    publish_to_registry!();
    forward_engine_events!();
}

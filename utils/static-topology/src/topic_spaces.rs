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

use crate::engine::BuildContext;
use crate::model::{RemoteTopicSpaceSpec, TopicSpaceSpec};
use broker_control::{
    AdapterIdentity, AdapterSlot, ControlError, ControlResult, Controllable, EngineUuid, Pairing,
    PairingSide, RawSource, RemotePeerControl, RemotePeerResource, RemoteTopicSpaceControl,
    RemoteTopicSpaceResource, TopicSpaceControl, TopicSpaceResource,
};
use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

const COMPONENT: &str = "static_topic_spaces";

pub struct StaticTopicSpace {
    me: Weak<StaticTopicSpace>,
    id: String,
    name: String,
    subscriptions: AtomicU64,
    corrupt: AtomicBool,
    remotes: Vec<Arc<StaticRemoteTopicSpace>>,
    slot: AdapterSlot<TopicSpaceControl>,
}

impl StaticTopicSpace {
    pub(crate) fn build(
        spec: &TopicSpaceSpec,
        context: &BuildContext,
    ) -> ControlResult<Arc<Self>> {
        let remotes = spec
            .remote_topic_spaces
            .iter()
            .map(|remote| StaticRemoteTopicSpace::build(&spec.name, remote, context))
            .collect::<ControlResult<Vec<_>>>()?;

        Ok(Arc::new_cyclic(|me| StaticTopicSpace {
            me: me.clone(),
            id: spec.id.clone(),
            name: spec.name.clone(),
            subscriptions: AtomicU64::new(spec.subscriptions),
            corrupt: AtomicBool::new(spec.corrupt),
            remotes,
            slot: context.slot(),
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_corrupt(&self, corrupt: bool) {
        self.corrupt.store(corrupt, Ordering::SeqCst);
    }

    pub fn remote_topic_space(
        &self,
        remote_engine: EngineUuid,
    ) -> Option<Arc<StaticRemoteTopicSpace>> {
        self.remotes
            .iter()
            .find(|remote| remote.remote_engine == remote_engine)
            .cloned()
    }

    pub fn delete(&self) {
        self.remotes.iter().for_each(|remote| remote.delete());
        self.slot.teardown();
        debug!(
            component = COMPONENT,
            topic_space = self.name.as_str(),
            "topic space deleted"
        );
    }
}

impl Controllable for StaticTopicSpace {
    type Control = Arc<TopicSpaceControl>;

    fn control_adapter(&self) -> Option<Arc<TopicSpaceControl>> {
        self.slot.get_or_create(|| {
            let me: Weak<dyn TopicSpaceResource> = self.me.clone();
            Some(TopicSpaceControl::new(
                AdapterIdentity::new(&self.id, &self.name),
                me,
            ))
        })
    }
}

impl TopicSpaceResource for StaticTopicSpace {
    fn subscription_count(&self) -> u64 {
        self.subscriptions.load(Ordering::SeqCst)
    }

    fn remote_topic_spaces(&self) -> ControlResult<RawSource<Arc<dyn RemoteTopicSpaceResource>>> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(ControlError::OperationFailed {
                operation: "remote_topic_spaces",
                reason: format!("neighbour table of topic space '{}' is unreadable", self.name),
            });
        }

        let remotes: Vec<Arc<dyn RemoteTopicSpaceResource>> = self
            .remotes
            .iter()
            .map(|remote| Arc::clone(remote) as Arc<dyn RemoteTopicSpaceResource>)
            .collect();
        Ok(RawSource::plain(remotes))
    }
}

/// Publish and consume sides a topic space keeps for one peer engine.
pub struct StaticRemoteTopicSpace {
    me: Weak<StaticRemoteTopicSpace>,
    id: String,
    remote_engine: EngineUuid,
    pairing: Pairing<Arc<dyn RemotePeerResource>>,
    publish: ArcSwapOption<StaticRemotePeer>,
    consume: ArcSwapOption<StaticRemotePeer>,
    context: BuildContext,
    slot: AdapterSlot<RemoteTopicSpaceControl>,
}

impl StaticRemoteTopicSpace {
    fn build(
        topic_space_name: &str,
        spec: &RemoteTopicSpaceSpec,
        context: &BuildContext,
    ) -> ControlResult<Arc<Self>> {
        let remote_engine = EngineUuid::parse_for("load_topology", &spec.remote_engine)?;
        let remote = Arc::new_cyclic(|me| StaticRemoteTopicSpace {
            me: me.clone(),
            id: format!("{topic_space_name}@{remote_engine}"),
            remote_engine,
            pairing: Pairing::new(context.preference),
            publish: ArcSwapOption::empty(),
            consume: ArcSwapOption::empty(),
            context: context.clone(),
            slot: context.slot(),
        });

        if let Some(publish) = &spec.publish {
            remote.attach(PairingSide::Primary, publish.messages);
        }
        if let Some(consume) = &spec.consume {
            remote.attach(PairingSide::Secondary, consume.messages);
        }
        Ok(remote)
    }

    /// Attaches a fresh side, deleting any side already attached there.
    pub fn attach(&self, side: PairingSide, messages: u64) -> Arc<StaticRemotePeer> {
        let peer =
            StaticRemotePeer::build(&self.id, self.remote_engine, side, messages, &self.context);
        self.pairing
            .set(side, Arc::clone(&peer) as Arc<dyn RemotePeerResource>);
        if let Some(previous) = self.peers(side).swap(Some(Arc::clone(&peer))) {
            previous.delete();
        }
        peer
    }

    /// Detaches and deletes `side`. Returns whether it was attached.
    pub fn detach(&self, side: PairingSide) -> bool {
        let detached = self.pairing.clear(side);
        if let Some(previous) = self.peers(side).swap(None) {
            previous.delete();
        }
        detached
    }

    pub fn peer(&self, side: PairingSide) -> Option<Arc<StaticRemotePeer>> {
        self.peers(side).load_full()
    }

    pub fn delete(&self) {
        self.detach(PairingSide::Primary);
        self.detach(PairingSide::Secondary);
        self.slot.teardown();
    }

    fn peers(&self, side: PairingSide) -> &ArcSwapOption<StaticRemotePeer> {
        match side {
            PairingSide::Primary => &self.publish,
            PairingSide::Secondary => &self.consume,
        }
    }
}

impl Controllable for StaticRemoteTopicSpace {
    type Control = Arc<RemoteTopicSpaceControl>;

    fn control_adapter(&self) -> Option<Arc<RemoteTopicSpaceControl>> {
        self.slot.get_or_create(|| {
            let me: Weak<dyn RemoteTopicSpaceResource> = self.me.clone();
            let identity =
                AdapterIdentity::new(&self.id, &self.id).with_remote_engine(self.remote_engine);
            Some(RemoteTopicSpaceControl::new(identity, me))
        })
    }
}

impl RemoteTopicSpaceResource for StaticRemoteTopicSpace {
    fn remote_engine(&self) -> EngineUuid {
        self.remote_engine
    }

    fn pairing(&self) -> &Pairing<Arc<dyn RemotePeerResource>> {
        &self.pairing
    }
}

/// One direction of a remote topic space relationship.
pub struct StaticRemotePeer {
    me: Weak<StaticRemotePeer>,
    id: String,
    side: PairingSide,
    remote_engine: EngineUuid,
    messages: AtomicU64,
    slot: AdapterSlot<RemotePeerControl>,
}

impl StaticRemotePeer {
    fn build(
        relationship_id: &str,
        remote_engine: EngineUuid,
        side: PairingSide,
        messages: u64,
        context: &BuildContext,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| StaticRemotePeer {
            me: me.clone(),
            id: format!("{relationship_id}/{}", side.as_str()),
            side,
            remote_engine,
            messages: AtomicU64::new(messages),
            slot: context.slot(),
        })
    }

    pub fn record_messages(&self, count: u64) {
        self.messages.fetch_add(count, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        !self.slot.is_torn_down()
    }

    fn delete(&self) {
        self.slot.teardown();
    }
}

impl Controllable for StaticRemotePeer {
    type Control = Arc<RemotePeerControl>;

    fn control_adapter(&self) -> Option<Arc<RemotePeerControl>> {
        self.slot.get_or_create(|| {
            let me: Weak<dyn RemotePeerResource> = self.me.clone();
            let identity = AdapterIdentity::new(&self.id, self.side.as_str())
                .with_remote_engine(self.remote_engine);
            Some(RemotePeerControl::new(identity, me))
        })
    }
}

impl RemotePeerResource for StaticRemotePeer {
    fn side(&self) -> PairingSide {
        self.side
    }

    fn remote_engine(&self) -> EngineUuid {
        self.remote_engine
    }

    fn message_count(&self) -> u64 {
        self.messages.load(Ordering::SeqCst)
    }
}

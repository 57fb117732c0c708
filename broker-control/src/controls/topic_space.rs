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
use crate::controls::RemoteTopicSpaceCursor;
use crate::error::ControlResult;
use crate::identifiers::EngineUuid;
use crate::iteration::{find_first, ConvertingIterator};
use crate::pairing::PairingSide;
use crate::resources::{
    Controllable, RemotePeerResource, RemoteTopicSpaceResource, TopicSpaceResource,
};
use std::sync::{Arc, Weak};

/// Adapter over a publish/subscribe destination.
pub struct TopicSpaceControl {
    core: AdapterCore<Weak<dyn TopicSpaceResource>>,
}

impl TopicSpaceControl {
    pub fn new(identity: AdapterIdentity, resource: Weak<dyn TopicSpaceResource>) -> Self {
        Self {
            core: AdapterCore::new(ResourceKind::TopicSpace, identity, resource),
        }
    }

    pub fn subscription_count(&self) -> ControlResult<u64> {
        Ok(self.core.upgrade("subscription_count")?.subscription_count())
    }

    pub fn remote_topic_spaces(&self) -> ControlResult<RemoteTopicSpaceCursor> {
        let topic_space = self.core.upgrade("remote_topic_spaces")?;
        Ok(ConvertingIterator::new(topic_space.remote_topic_spaces()?))
    }

    pub fn find_remote_topic_space(
        &self,
        remote_engine: &str,
    ) -> ControlResult<Arc<RemoteTopicSpaceControl>> {
        const OPERATION: &str = "find_remote_topic_space";
        let wanted = EngineUuid::parse_for(OPERATION, remote_engine)?;

        find_first(
            self.remote_topic_spaces()?,
            OPERATION,
            ResourceKind::RemoteTopicSpace,
            remote_engine,
            |remote| remote.remote_engine() == Some(wanted),
        )
    }
}

impl ControlAdapter for TopicSpaceControl {
    delegate_to_core!();
    publish_to_registry!();
}

/// Facade over the publish and consume sides a topic space keeps for one peer.
///
/// The sides attach and detach independently; [`RemoteTopicSpaceControl::peer`]
/// resolves whichever side currently supplies the identity.
pub struct RemoteTopicSpaceControl {
    core: AdapterCore<Weak<dyn RemoteTopicSpaceResource>>,
}

impl RemoteTopicSpaceControl {
    pub fn new(identity: AdapterIdentity, resource: Weak<dyn RemoteTopicSpaceResource>) -> Self {
        Self {
            core: AdapterCore::new(ResourceKind::RemoteTopicSpace, identity, resource),
        }
    }

    pub fn set_listener(&self, listener: Option<Arc<dyn EngineEventListener>>) {
        self.core.set_listener(listener);
    }

    /// Adapter of the side that supplies this relationship's identity.
    ///
    /// Fails with `OperationFailed` when neither side is attached.
    pub fn peer(&self) -> ControlResult<Arc<RemotePeerControl>> {
        let remote = self.core.upgrade("peer")?;
        let peer = remote.pairing().control_adapter()?;
        Ok(peer)
    }

    /// Identity of the side returned by [`RemoteTopicSpaceControl::peer`].
    pub fn exposed_identity(&self) -> ControlResult<AdapterIdentity> {
        Ok(self.peer()?.identity()?.clone())
    }

    pub fn publish_side(&self) -> ControlResult<Option<Arc<RemotePeerControl>>> {
        self.side("publish_side", PairingSide::Primary)
    }

    pub fn consume_side(&self) -> ControlResult<Option<Arc<RemotePeerControl>>> {
        self.side("consume_side", PairingSide::Secondary)
    }

    /// Messages sent to the peer, zero while no publish side is attached.
    pub fn messages_published(&self) -> ControlResult<u64> {
        self.side_count("messages_published", PairingSide::Primary)
    }

    /// Messages received from the peer, zero while no consume side is attached.
    pub fn messages_consumed(&self) -> ControlResult<u64> {
        self.side_count("messages_consumed", PairingSide::Secondary)
    }

    fn side(
        &self,
        operation: &'static str,
        side: PairingSide,
    ) -> ControlResult<Option<Arc<RemotePeerControl>>> {
        let remote = self.core.upgrade(operation)?;
        let handle = remote.pairing().get(side);
        Ok(handle.and_then(|peer| peer.control_adapter()))
    }

    fn side_count(&self, operation: &'static str, side: PairingSide) -> ControlResult<u64> {
        let remote = self.core.upgrade(operation)?;
        let handle = remote.pairing().get(side);
        Ok(handle.map_or(0, |peer| peer.message_count()))
    }
}

impl ControlAdapter for RemoteTopicSpaceControl {
    delegate_to_core!();
    publish_to_registry!();
    forward_engine_events!();
}

/// Adapter over one direction of a remote topic space relationship.
pub struct RemotePeerControl {
    core: AdapterCore<Weak<dyn RemotePeerResource>>,
}

impl RemotePeerControl {
    pub fn new(identity: AdapterIdentity, resource: Weak<dyn RemotePeerResource>) -> Self {
        Self {
            core: AdapterCore::new(ResourceKind::RemotePeer, identity, resource),
        }
    }

    pub fn side(&self) -> ControlResult<PairingSide> {
        Ok(self.core.upgrade("side")?.side())
    }

    pub fn message_count(&self) -> ControlResult<u64> {
        Ok(self.core.upgrade("message_count")?.message_count())
    }
}

impl ControlAdapter for RemotePeerControl {
    delegate_to_core!();
}

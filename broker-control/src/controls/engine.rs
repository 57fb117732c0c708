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
use crate::controls::queue::QueueControl;
use crate::controls::{
    ConnectionCursor, EngineRemoteQueuePointCursor, QueueCursor, RemoteQueuePointCursor,
    TopicSpaceCursor,
};
use crate::error::ControlResult;
use crate::identifiers::EngineUuid;
use crate::iteration::{find_first, ConvertingIterator, NestedIterator};
use crate::resources::MessagingEngineResource;
use std::sync::{Arc, Weak};

/// Root adapter of one messaging engine.
pub struct EngineControl {
    core: AdapterCore<Weak<dyn MessagingEngineResource>>,
}

impl EngineControl {
    pub fn new(identity: AdapterIdentity, resource: Weak<dyn MessagingEngineResource>) -> Self {
        Self {
            core: AdapterCore::new(ResourceKind::Engine, identity, resource),
        }
    }

    pub fn uuid(&self) -> ControlResult<EngineUuid> {
        Ok(self.core.upgrade("uuid")?.uuid())
    }

    pub fn destinations(&self) -> ControlResult<QueueCursor> {
        let engine = self.core.upgrade("destinations")?;
        Ok(ConvertingIterator::new(engine.destinations()))
    }

    pub fn topic_spaces(&self) -> ControlResult<TopicSpaceCursor> {
        let engine = self.core.upgrade("topic_spaces")?;
        Ok(ConvertingIterator::new(engine.topic_spaces()))
    }

    pub fn connections(&self) -> ControlResult<ConnectionCursor> {
        let engine = self.core.upgrade("connections")?;
        Ok(ConvertingIterator::new(engine.connections()))
    }

    /// Remote queue points of every destination, destination by destination.
    ///
    /// Destinations whose remote point index cannot be read are skipped.
    pub fn remote_queue_points(&self) -> ControlResult<EngineRemoteQueuePointCursor> {
        self.core.assert_valid("remote_queue_points")?;
        let acquire: fn(&Arc<QueueControl>) -> ControlResult<RemoteQueuePointCursor> =
            |queue| queue.remote_queue_points();
        Ok(NestedIterator::new(self.destinations()?, acquire))
    }

    pub fn find_destination_by_name(&self, name: &str) -> ControlResult<Arc<QueueControl>> {
        find_first(
            self.destinations()?,
            "find_destination_by_name",
            ResourceKind::Queue,
            name,
            |queue| queue.name().is_ok_and(|candidate| candidate == name),
        )
    }
}

impl ControlAdapter for EngineControl {
    delegate_to_core!();
    publish_to_registry!();
}

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

//! Uniform control adapter surface shared by every resource facade.

use crate::control_plane::management::{EngineEvent, ManagementRegistry};
use crate::error::ControlResult;
use crate::identifiers::EngineUuid;
use std::fmt::{Display, Formatter};

/// Resource family an adapter fronts. Used for diagnostics and registry keys.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ResourceKind {
    Engine,
    Queue,
    RemoteQueuePoint,
    StreamSet,
    Stream,
    TopicSpace,
    RemoteTopicSpace,
    RemotePeer,
    Connection,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Engine => "messaging_engine",
            ResourceKind::Queue => "queue",
            ResourceKind::RemoteQueuePoint => "remote_queue_point",
            ResourceKind::StreamSet => "stream_set",
            ResourceKind::Stream => "stream",
            ResourceKind::TopicSpace => "topic_space",
            ResourceKind::RemoteTopicSpace => "remote_topic_space",
            ResourceKind::RemotePeer => "remote_peer",
            ResourceKind::Connection => "connection",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity captured when an adapter is created. Never changes afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdapterIdentity {
    pub id: String,
    pub name: String,
    pub remote_engine: Option<EngineUuid>,
}

impl AdapterIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            remote_engine: None,
        }
    }

    pub fn with_remote_engine(mut self, remote_engine: EngineUuid) -> Self {
        self.remote_engine = Some(remote_engine);
        self
    }
}

/// Adapter lifecycle: `New` until first exposed, `Valid` while the resource lives,
/// `Dereferenced` once the owning resource tore down. `Dereferenced` is terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdapterState {
    New,
    Valid,
    Dereferenced,
}

/// Validity-checked, identity-bearing view over one engine resource.
///
/// Accessors that reach the resource call [`ControlAdapter::assert_valid`] first, so
/// after dereference they fail with `NotFound`. Identity accessors follow the same
/// rule.
pub trait ControlAdapter: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// Identity captured at creation. Fails with `NotFound` once dereferenced.
    fn identity(&self) -> ControlResult<&AdapterIdentity>;

    fn state(&self) -> AdapterState;

    /// Marks a `New` adapter `Valid` when its resource first exposes it.
    fn activate(&self) -> bool;

    /// Fails with `NotFound` once dereferenced or detached from the resource.
    fn assert_valid(&self) -> ControlResult<()>;

    /// Detaches the adapter from its resource. Repeated calls are no-ops.
    fn dereference(&self);

    fn id(&self) -> ControlResult<&str> {
        Ok(&self.identity()?.id)
    }

    fn name(&self) -> ControlResult<&str> {
        Ok(&self.identity()?.name)
    }

    /// Remote engine this adapter represents, `None` when local or dereferenced.
    fn remote_engine(&self) -> Option<EngineUuid> {
        self.identity()
            .ok()
            .and_then(|identity| identity.remote_engine)
    }

    fn register_as_management_object(
        &self,
        _registry: &dyn ManagementRegistry,
    ) -> ControlResult<()> {
        Ok(())
    }

    fn deregister_management_object(&self, _registry: &dyn ManagementRegistry) {}

    fn on_engine_event(&self, _event: &EngineEvent) {}
}

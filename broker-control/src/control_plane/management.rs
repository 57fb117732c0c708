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

//! Collaborator seams: the external management registry and engine event listeners.

use crate::control_plane::adapter::{ControlAdapter, ResourceKind};
use crate::error::{ControlError, ControlResult};
use crate::observability::events;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::{debug, warn};

const COMPONENT: &str = "management";

/// Asynchronous lifecycle notification raised by the engine against one resource.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineEvent {
    pub kind: EngineEventKind,
    pub message: String,
}

impl EngineEvent {
    pub fn new(kind: EngineEventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EngineEventKind {
    DepthThresholdReached,
    DepthThresholdCleared,
    LinkStarted,
    LinkStopped,
    StreamCorrupt,
    ResourceDeleted,
}

/// Failure reported by an external listener. Never propagated into the engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListenerError(pub String);

impl Display for ListenerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "engine event listener failed: {}", self.0)
    }
}

impl Error for ListenerError {}

/// External consumer of engine events, registered on individual adapters.
pub trait EngineEventListener: Send + Sync {
    fn on_event(
        &self,
        kind: ResourceKind,
        adapter_id: &str,
        event: &EngineEvent,
    ) -> Result<(), ListenerError>;
}

/// External management registry (for example a JMX-style object server).
pub trait ManagementRegistry: Send + Sync {
    fn register(&self, kind: ResourceKind, id: &str, name: &str) -> Result<(), String>;

    fn deregister(&self, kind: ResourceKind, id: &str);
}

/// Publishes `adapter` under its kind and id. The adapter must still be valid.
pub fn register_adapter(
    registry: &dyn ManagementRegistry,
    adapter: &dyn ControlAdapter,
) -> ControlResult<()> {
    let id = adapter.id()?;
    let name = adapter.name()?;

    match registry.register(adapter.kind(), id, name) {
        Ok(()) => {
            debug!(
                event = events::MANAGEMENT_REGISTER_OK,
                component = COMPONENT,
                kind = adapter.kind().as_str(),
                adapter_id = id,
                "registered management object"
            );
            Ok(())
        }
        Err(err) => {
            warn!(
                event = events::MANAGEMENT_REGISTER_FAILED,
                component = COMPONENT,
                kind = adapter.kind().as_str(),
                adapter_id = id,
                err = %err,
                "management registry rejected adapter"
            );
            Err(ControlError::operation_failed(
                "register_as_management_object",
                format!("{} '{id}': {err}", adapter.kind()),
            ))
        }
    }
}

/// Removes the object registered under `kind` and `id`.
///
/// Takes the identity captured at creation, since deregistration also runs for
/// adapters whose resource is already gone.
pub fn deregister_adapter(registry: &dyn ManagementRegistry, kind: ResourceKind, id: &str) {
    registry.deregister(kind, id);
    debug!(
        event = events::MANAGEMENT_DEREGISTER,
        component = COMPONENT,
        kind = kind.as_str(),
        adapter_id = id,
        "deregistered management object"
    );
}

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

//! Validity state and resource back-handle embedded in every adapter.

use crate::control_plane::adapter::{AdapterIdentity, AdapterState, ResourceKind};
use crate::control_plane::management::{EngineEvent, EngineEventListener};
use crate::error::{ControlError, ControlResult};
use crate::observability::{events, fields};
use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};

const COMPONENT: &str = "adapter_core";

const STATE_NEW: u8 = 0;
const STATE_VALID: u8 = 1;
const STATE_DEREFERENCED: u8 = 2;

/// Lifecycle core shared by the concrete adapters.
///
/// `H` is the engine handle the adapter reads through, typically `Arc<dyn SomeResource>`.
/// The handle is cleared on dereference; accessors that already loaded it may finish
/// with the values they captured.
pub struct AdapterCore<H> {
    kind: ResourceKind,
    identity: AdapterIdentity,
    state: AtomicU8,
    resource: ArcSwapOption<H>,
    listener: ArcSwapOption<Arc<dyn EngineEventListener>>,
}

impl<H: Clone> AdapterCore<H> {
    pub fn new(kind: ResourceKind, identity: AdapterIdentity, resource: H) -> Self {
        debug!(
            event = events::ADAPTER_CREATED,
            component = COMPONENT,
            kind = kind.as_str(),
            adapter_id = identity.id.as_str(),
            remote_engine = %fields::format_remote_engine(identity.remote_engine.as_ref()),
            "control adapter created"
        );

        Self {
            kind,
            identity,
            state: AtomicU8::new(STATE_NEW),
            resource: ArcSwapOption::from_pointee(resource),
            listener: ArcSwapOption::empty(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Identity for `operation`, failing with `NotFound` once dereferenced.
    pub fn identity(&self, operation: &'static str) -> ControlResult<&AdapterIdentity> {
        self.assert_valid(operation)?;
        Ok(&self.identity)
    }

    /// Identity regardless of state, for logs and deregistration.
    pub(crate) fn captured_identity(&self) -> &AdapterIdentity {
        &self.identity
    }

    pub fn state(&self) -> AdapterState {
        match self.state.load(Ordering::Acquire) {
            STATE_NEW => AdapterState::New,
            STATE_VALID => AdapterState::Valid,
            _ => AdapterState::Dereferenced,
        }
    }

    /// Moves `New` to `Valid`. Returns `false` when already valid or dereferenced.
    pub fn activate(&self) -> bool {
        let activated = self
            .state
            .compare_exchange(
                STATE_NEW,
                STATE_VALID,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();

        if activated {
            trace!(
                event = events::ADAPTER_ACTIVATED,
                component = COMPONENT,
                kind = self.kind.as_str(),
                adapter_id = self.identity.id.as_str(),
                "control adapter exposed"
            );
        }
        activated
    }

    /// Fails with `NotFound` for `operation` when dereferenced or detached.
    pub fn assert_valid(&self, operation: &'static str) -> ControlResult<()> {
        if self.state.load(Ordering::Acquire) == STATE_DEREFERENCED
            || self.resource.load().is_none()
        {
            debug!(
                event = events::ADAPTER_ASSERT_VALID_FAILED,
                component = COMPONENT,
                kind = self.kind.as_str(),
                adapter_id = self.identity.id.as_str(),
                operation,
                "accessor called on a dereferenced adapter"
            );
            return Err(self.not_found(operation));
        }
        Ok(())
    }

    /// Returns the resource handle after asserting validity for `operation`.
    pub fn resource(&self, operation: &'static str) -> ControlResult<H> {
        self.assert_valid(operation)?;
        self.resource
            .load_full()
            .map(|handle| (*handle).clone())
            .ok_or_else(|| self.not_found(operation))
    }

    /// Clears the back-handle and marks the adapter dereferenced.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn dereference(&self) -> bool {
        let previous = self.state.swap(STATE_DEREFERENCED, Ordering::AcqRel);
        if previous == STATE_DEREFERENCED {
            trace!(
                event = events::ADAPTER_DEREFERENCE_REPEATED,
                component = COMPONENT,
                kind = self.kind.as_str(),
                adapter_id = self.identity.id.as_str(),
                "control adapter already dereferenced"
            );
            return false;
        }

        self.resource.store(None);
        self.listener.store(None);
        debug!(
            event = events::ADAPTER_DEREFERENCED,
            component = COMPONENT,
            kind = self.kind.as_str(),
            adapter_id = self.identity.id.as_str(),
            "control adapter dereferenced"
        );
        true
    }

    /// Installs or removes the external listener that receives engine events.
    pub fn set_listener(&self, listener: Option<Arc<dyn EngineEventListener>>) {
        self.listener.store(listener.map(Arc::new));
    }

    /// Forwards `event` to the registered listener; listener failures are logged only.
    pub fn forward_event(&self, event: &EngineEvent) {
        let listener = self.listener.load_full();
        let Some(listener) = listener else {
            trace!(
                event = events::ENGINE_EVENT_DROPPED,
                component = COMPONENT,
                kind = self.kind.as_str(),
                adapter_id = self.identity.id.as_str(),
                "no listener registered for engine event"
            );
            return;
        };

        match listener.on_event(self.kind, &self.identity.id, event) {
            Ok(()) => debug!(
                event = events::ENGINE_EVENT_FORWARDED,
                component = COMPONENT,
                kind = self.kind.as_str(),
                adapter_id = self.identity.id.as_str(),
                "engine event forwarded"
            ),
            Err(err) => warn!(
                event = events::ENGINE_EVENT_LISTENER_FAILED,
                component = COMPONENT,
                kind = self.kind.as_str(),
                adapter_id = self.identity.id.as_str(),
                err = %err,
                "engine event listener failed"
            ),
        }
    }

    fn not_found(&self, operation: &'static str) -> ControlError {
        ControlError::not_found(operation, self.kind.as_str(), &self.identity.id)
    }
}

impl<R: ?Sized> AdapterCore<Weak<R>> {
    /// Resolves a weak back-handle. A resource already dropped by the engine counts
    /// as dereferenced for `operation`.
    pub fn upgrade(&self, operation: &'static str) -> ControlResult<Arc<R>> {
        self.resource(operation)?
            .upgrade()
            .ok_or_else(|| self.not_found(operation))
    }
}

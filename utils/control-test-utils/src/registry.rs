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

use broker_control::{
    EngineEvent, EngineEventListener, ListenerError, ManagementRegistry, ResourceKind,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Registry that remembers every registration and deregistration in order.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    log: Mutex<Vec<String>>,
    live: Mutex<Vec<(ResourceKind, String)>>,
}

impl RecordingRegistry {
    /// `+kind/id` and `-kind/id` entries in call order.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Objects currently registered.
    pub fn registered(&self) -> Vec<(ResourceKind, String)> {
        self.live.lock().map(|live| live.clone()).unwrap_or_default()
    }

    pub fn is_registered(&self, kind: ResourceKind, id: &str) -> bool {
        self.registered()
            .iter()
            .any(|(registered_kind, registered_id)| *registered_kind == kind && registered_id == id)
    }
}

impl ManagementRegistry for RecordingRegistry {
    fn register(&self, kind: ResourceKind, id: &str, _name: &str) -> Result<(), String> {
        if let Ok(mut log) = self.log.lock() {
            log.push(format!("+{kind}/{id}"));
        }
        if let Ok(mut live) = self.live.lock() {
            live.push((kind, id.to_string()));
        }
        Ok(())
    }

    fn deregister(&self, kind: ResourceKind, id: &str) {
        if let Ok(mut log) = self.log.lock() {
            log.push(format!("-{kind}/{id}"));
        }
        if let Ok(mut live) = self.live.lock() {
            live.retain(|(registered_kind, registered_id)| {
                !(*registered_kind == kind && registered_id == id)
            });
        }
    }
}

/// Registry that refuses every registration.
#[derive(Debug, Default)]
pub struct RejectingRegistry {
    attempts: AtomicUsize,
}

impl RejectingRegistry {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ManagementRegistry for RejectingRegistry {
    fn register(&self, kind: ResourceKind, id: &str, _name: &str) -> Result<(), String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(format!("object server refused {kind} '{id}'"))
    }

    fn deregister(&self, _kind: ResourceKind, _id: &str) {}
}

/// Listener that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<(ResourceKind, String, EngineEvent)>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<(ResourceKind, String, EngineEvent)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EngineEventListener for RecordingListener {
    fn on_event(
        &self,
        kind: ResourceKind,
        adapter_id: &str,
        event: &EngineEvent,
    ) -> Result<(), ListenerError> {
        if let Ok(mut events) = self.events.lock() {
            events.push((kind, adapter_id.to_string(), event.clone()));
        }
        Ok(())
    }
}

/// Listener that fails every delivery.
#[derive(Debug, Default)]
pub struct FailingListener {
    calls: AtomicUsize,
}

impl FailingListener {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EngineEventListener for FailingListener {
    fn on_event(
        &self,
        _kind: ResourceKind,
        _adapter_id: &str,
        _event: &EngineEvent,
    ) -> Result<(), ListenerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ListenerError("listener offline".to_string()))
    }
}

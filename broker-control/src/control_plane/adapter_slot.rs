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

//! Lazily-populated adapter holder embedded by engine resources.

use crate::control_plane::adapter::ControlAdapter;
use crate::control_plane::management::ManagementRegistry;
use crate::observability::{events, fields};
use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

const COMPONENT: &str = "adapter_slot";

/// Owner-side home of one resource's adapter.
///
/// The adapter is built on the first [`AdapterSlot::get_or_create`] call and handed out
/// until [`AdapterSlot::teardown`], after which the slot stays empty for good. A slot
/// built [`with_registry`](AdapterSlot::with_registry) publishes the adapter when it is
/// first exposed and withdraws it on teardown.
pub struct AdapterSlot<A> {
    adapter: ArcSwapOption<A>,
    torn_down: AtomicBool,
    registry: Option<Arc<dyn ManagementRegistry>>,
}

impl<A: ControlAdapter> AdapterSlot<A> {
    pub fn new() -> Self {
        Self {
            adapter: ArcSwapOption::empty(),
            torn_down: AtomicBool::new(false),
            registry: None,
        }
    }

    pub fn with_registry(registry: Arc<dyn ManagementRegistry>) -> Self {
        Self {
            registry: Some(registry),
            ..Self::new()
        }
    }

    /// Returns the adapter, creating it with `create` on first use.
    ///
    /// Returns `None` once the slot was torn down or when `create` declines.
    pub fn get_or_create<F>(&self, create: F) -> Option<Arc<A>>
    where
        F: FnOnce() -> Option<A>,
    {
        let current = self.adapter.load();
        if let Some(adapter) = current.as_ref() {
            return Some(Arc::clone(adapter));
        }
        if self.torn_down.load(Ordering::Acquire) {
            return None;
        }

        let created = Arc::new(create()?);
        let previous = self
            .adapter
            .compare_and_swap(&current, Some(Arc::clone(&created)));

        let adapter = match previous.as_ref() {
            Some(winner) => {
                trace!(
                    event = events::ADAPTER_SLOT_CREATE_RACE_LOST,
                    component = COMPONENT,
                    kind = created.kind().as_str(),
                    "another caller installed the adapter first"
                );
                Arc::clone(winner)
            }
            None => created,
        };

        // Teardown may have run between the flag check and the install.
        if self.torn_down.load(Ordering::Acquire) {
            if let Some(stale) = self.adapter.swap(None) {
                stale.dereference();
            }
            return None;
        }

        if adapter.activate() {
            if let Some(registry) = self.registry.as_deref() {
                // Registration failures are logged by the adapter; it stays usable.
                let _ = adapter.register_as_management_object(registry);
            }
        }
        Some(adapter)
    }

    /// Returns the adapter only if it already exists.
    pub fn get(&self) -> Option<Arc<A>> {
        self.adapter.load_full()
    }

    /// Dereferences and drops the adapter; the slot never hands one out again.
    pub fn teardown(&self) {
        self.torn_down.store(true, Ordering::Release);

        let Some(adapter) = self.adapter.swap(None) else {
            return;
        };
        if let Some(registry) = self.registry.as_deref() {
            adapter.deregister_management_object(registry);
        }
        debug!(
            event = events::ADAPTER_SLOT_TEARDOWN,
            component = COMPONENT,
            kind = adapter.kind().as_str(),
            adapter_id = adapter.id().unwrap_or(fields::NONE),
            "resource teardown dereferencing adapter"
        );
        adapter.dereference();
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }
}

impl<A: ControlAdapter> Default for AdapterSlot<A> {
    fn default() -> Self {
        Self::new()
    }
}

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

use crate::sources::{counted_source, SourceCounters};
use broker_control::{ControlError, ControlResult, Controllable, ConvertingIterator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Resource whose control adapter is its label, until it is removed.
#[derive(Debug)]
pub struct FakeResource {
    label: String,
    live: AtomicBool,
}

impl FakeResource {
    pub fn live(label: &str) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            live: AtomicBool::new(true),
        })
    }

    /// Resource that was already removed when the cursor reached it.
    pub fn removed(label: &str) -> Arc<Self> {
        let resource = Self::live(label);
        resource.remove();
        resource
    }

    pub fn remove(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

impl Controllable for FakeResource {
    type Control = String;

    fn control_adapter(&self) -> Option<String> {
        self.live
            .load(Ordering::SeqCst)
            .then(|| self.label.clone())
    }
}

/// Container whose child list can be empty or unreadable.
///
/// Each successful [`FakeContainer::open`] hands out a finishable cursor and records
/// its counters so tests can check what happened to every inner cursor.
#[derive(Debug)]
pub struct FakeContainer {
    name: String,
    children: Option<Vec<Arc<FakeResource>>>,
    cursor_counters: std::sync::Mutex<Vec<Arc<SourceCounters>>>,
}

impl FakeContainer {
    pub fn with_children(name: &str, children: Vec<Arc<FakeResource>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            children: Some(children),
            cursor_counters: Default::default(),
        })
    }

    pub fn labelled(name: &str, labels: &[&str]) -> Arc<Self> {
        Self::with_children(name, labels.iter().map(|label| FakeResource::live(label)).collect())
    }

    pub fn empty(name: &str) -> Arc<Self> {
        Self::with_children(name, Vec::new())
    }

    /// Container whose child list fails to load.
    pub fn corrupt(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            children: None,
            cursor_counters: Default::default(),
        })
    }

    pub fn open(&self) -> ControlResult<ConvertingIterator<Arc<FakeResource>>> {
        let Some(children) = &self.children else {
            trace!(container = self.name.as_str(), "fake container refused to open");
            return Err(ControlError::OperationFailed {
                operation: "open",
                reason: format!("child list of '{}' is corrupt", self.name),
            });
        };

        let (source, counters) = counted_source(children.clone());
        if let Ok(mut cursor_counters) = self.cursor_counters.lock() {
            cursor_counters.push(counters);
        }
        Ok(ConvertingIterator::new(source))
    }

    /// Counters of every cursor opened so far, oldest first.
    pub fn cursor_counters(&self) -> Vec<Arc<SourceCounters>> {
        self.cursor_counters
            .lock()
            .map(|cursor_counters| cursor_counters.clone())
            .unwrap_or_default()
    }
}

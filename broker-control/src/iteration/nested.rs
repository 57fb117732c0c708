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

//! Flattening of container hierarchies into one cursor.

use crate::error::ControlResult;
use crate::iteration::{end_of_sequence, ControlIterator};
use crate::observability::{events, fields};
use tracing::{debug, trace};

const COMPONENT: &str = "nested_iterator";

/// Cursor over the children of every container produced by an outer cursor.
///
/// `acquire` opens the inner cursor for one container. Containers whose inner cursor
/// cannot be opened are skipped, as are containers with no children, so an exposed
/// inner cursor always holds at least one element. Order is outer order, then each
/// inner cursor's own order.
///
/// Inner cursors are finished when the traversal moves past them, and
/// [`ControlIterator::finished`] finishes the held inner cursor before the outer one.
pub struct NestedIterator<O, I, F> {
    outer: O,
    inner: Option<I>,
    acquire: F,
    skipped_containers: usize,
}

impl<O, I, F> NestedIterator<O, I, F>
where
    O: ControlIterator,
    I: ControlIterator,
    F: FnMut(&O::Item) -> ControlResult<I>,
{
    pub fn new(outer: O, acquire: F) -> Self {
        Self {
            outer,
            inner: None,
            acquire,
            skipped_containers: 0,
        }
    }

    /// Containers skipped so far, either empty or unreadable.
    pub fn skipped_containers(&self) -> usize {
        self.skipped_containers
    }

    fn advance_container(&mut self) {
        if let Some(mut exhausted) = self.inner.take() {
            exhausted.finished();
        }

        while self.outer.has_next() {
            let Ok(container) = self.outer.try_next() else {
                break;
            };

            match (self.acquire)(&container) {
                Ok(mut inner) => {
                    if inner.has_next() {
                        self.inner = Some(inner);
                        return;
                    }
                    inner.finished();
                    self.skipped_containers += 1;
                    trace!(
                        event = events::CURSOR_CONTAINER_SKIPPED,
                        component = COMPONENT,
                        reason = fields::REASON_EMPTY_CONTAINER,
                        skipped = self.skipped_containers,
                        "container has no children"
                    );
                }
                Err(err) => {
                    self.skipped_containers += 1;
                    debug!(
                        event = events::CURSOR_CONTAINER_SKIPPED,
                        component = COMPONENT,
                        reason = fields::REASON_ACQUIRE_FAILED,
                        skipped = self.skipped_containers,
                        err = %err,
                        "skipping container whose children could not be read"
                    );
                }
            }
        }
    }

    fn positioned(&mut self) -> bool {
        self.inner.as_mut().is_some_and(|inner| inner.has_next())
    }
}

impl<O, I, F> ControlIterator for NestedIterator<O, I, F>
where
    O: ControlIterator,
    I: ControlIterator,
    F: FnMut(&O::Item) -> ControlResult<I>,
{
    type Item = I::Item;

    fn has_next(&mut self) -> bool {
        if self.positioned() {
            return true;
        }
        self.advance_container();
        self.positioned()
    }

    fn try_next(&mut self) -> ControlResult<I::Item> {
        if !self.has_next() {
            return Err(end_of_sequence());
        }
        match self.inner.as_mut() {
            Some(inner) => inner.try_next(),
            None => Err(end_of_sequence()),
        }
    }

    fn finished(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.finished();
        }
        self.outer.finished();
    }
}

impl<O, I, F> Iterator for NestedIterator<O, I, F>
where
    O: ControlIterator,
    I: ControlIterator,
    F: FnMut(&O::Item) -> ControlResult<I>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.try_next().ok()
    }
}

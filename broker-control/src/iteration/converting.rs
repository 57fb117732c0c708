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

//! Resource-to-adapter conversion with transparent skipping.

use crate::error::ControlResult;
use crate::iteration::raw_source::RawSource;
use crate::iteration::{end_of_sequence, ControlIterator, Lookahead};
use crate::observability::{events, fields};
use crate::resources::Controllable;
use tracing::trace;

const COMPONENT: &str = "converting_iterator";

/// Cursor that yields the control adapter of each resource in its source.
///
/// Resources whose adapter is unavailable (typically removed while the cursor was
/// open) are skipped; they never end the sequence early. At most one converted
/// adapter is buffered between `has_next` and `try_next`.
pub struct ConvertingIterator<R: Controllable> {
    source: RawSource<R>,
    lookahead: Lookahead<R::Control>,
    skipped: usize,
}

impl<R: Controllable> ConvertingIterator<R> {
    pub fn new(source: RawSource<R>) -> Self {
        Self {
            source,
            lookahead: Lookahead::Empty,
            skipped: 0,
        }
    }

    /// Resources skipped so far because they produced no adapter.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn pull(&mut self) -> Option<R::Control> {
        for resource in self.source.by_ref() {
            if let Some(adapter) = resource.control_adapter() {
                return Some(adapter);
            }
            self.skipped += 1;
            trace!(
                event = events::CURSOR_ELEMENT_SKIPPED,
                component = COMPONENT,
                reason = fields::REASON_NO_ADAPTER,
                skipped = self.skipped,
                "resource produced no control adapter"
            );
        }
        None
    }
}

impl<R: Controllable> ControlIterator for ConvertingIterator<R> {
    type Item = R::Control;

    fn has_next(&mut self) -> bool {
        if self.lookahead.is_buffered() {
            return true;
        }
        let converted = self.pull();
        self.lookahead.fill(converted)
    }

    fn try_next(&mut self) -> ControlResult<R::Control> {
        match self.lookahead.take() {
            Some(adapter) => Ok(adapter),
            None => self.pull().ok_or_else(end_of_sequence),
        }
    }

    fn finished(&mut self) {
        self.lookahead = Lookahead::Empty;
        self.source.finish();
    }
}

impl<R: Controllable> Iterator for ConvertingIterator<R> {
    type Item = R::Control;

    fn next(&mut self) -> Option<R::Control> {
        self.try_next().ok()
    }
}

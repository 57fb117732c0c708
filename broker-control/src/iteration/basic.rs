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

use crate::error::ControlResult;
use crate::iteration::raw_source::RawSource;
use crate::iteration::{end_of_sequence, ControlIterator, Lookahead};

/// Pass-through cursor over elements that need no conversion.
pub struct BasicIterator<T> {
    source: RawSource<T>,
    lookahead: Lookahead<T>,
}

impl<T> BasicIterator<T> {
    pub fn new(source: RawSource<T>) -> Self {
        Self {
            source,
            lookahead: Lookahead::Empty,
        }
    }
}

impl<T> ControlIterator for BasicIterator<T> {
    type Item = T;

    fn has_next(&mut self) -> bool {
        if self.lookahead.is_buffered() {
            return true;
        }
        let pulled = self.source.next();
        self.lookahead.fill(pulled)
    }

    fn try_next(&mut self) -> ControlResult<T> {
        match self.lookahead.take() {
            Some(element) => Ok(element),
            None => self.source.next().ok_or_else(end_of_sequence),
        }
    }

    fn finished(&mut self) {
        self.lookahead = Lookahead::Empty;
        self.source.finish();
    }
}

impl<T> Iterator for BasicIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.try_next().ok()
    }
}

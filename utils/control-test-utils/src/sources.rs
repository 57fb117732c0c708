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

use broker_control::{Finish, RawSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Observes how a cursor drives its raw source.
#[derive(Debug, Default)]
pub struct SourceCounters {
    pulls: AtomicUsize,
    finishes: AtomicUsize,
}

impl SourceCounters {
    /// Calls to `next()` on the source, including the one that found it drained.
    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    pub fn finishes(&self) -> usize {
        self.finishes.load(Ordering::SeqCst)
    }
}

struct CountingSource<T> {
    items: std::vec::IntoIter<T>,
    counters: Arc<SourceCounters>,
}

impl<T> Iterator for CountingSource<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.counters.pulls.fetch_add(1, Ordering::SeqCst);
        self.items.next()
    }
}

impl<T> Finish for CountingSource<T> {
    fn finished(&mut self) {
        self.counters.finishes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Source with a release hook that reports pulls and finishes to the counters.
pub fn counted_source<T: Send + 'static>(items: Vec<T>) -> (RawSource<T>, Arc<SourceCounters>) {
    let counters = Arc::new(SourceCounters::default());
    let source = RawSource::finishable(CountingSource {
        items: items.into_iter(),
        counters: Arc::clone(&counters),
    });
    (source, counters)
}

/// Source without a release hook; the counters only ever see pulls.
pub fn counted_plain_source<T: Send + 'static>(
    items: Vec<T>,
) -> (RawSource<T>, Arc<SourceCounters>) {
    let counters = Arc::new(SourceCounters::default());
    let counting = CountingSource {
        items: items.into_iter(),
        counters: Arc::clone(&counters),
    };
    (RawSource::plain(counting), counters)
}

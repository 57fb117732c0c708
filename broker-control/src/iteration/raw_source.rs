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

//! Engine-supplied child iterators, with or without a release hook.

use crate::observability::events;
use tracing::trace;

const COMPONENT: &str = "raw_source";

/// Release hook for engine iterators that pin resources while open.
pub trait Finish {
    fn finished(&mut self);
}

trait FinishableIterator: Iterator + Finish + Send {}

impl<I: Iterator + Finish + Send> FinishableIterator for I {}

enum Source<T> {
    Plain(Box<dyn Iterator<Item = T> + Send>),
    Finishable(Box<dyn FinishableIterator<Item = T>>),
}

/// Raw child iterator handed out by an engine container.
///
/// Whether the iterator has a release hook is fixed at construction:
/// [`RawSource::plain`] has none, [`RawSource::finishable`] forwards
/// [`RawSource::finish`] to the wrapped [`Finish`] impl exactly once. A finished source
/// yields nothing further.
///
/// The source also finishes itself on its first `None` and when dropped. The wrapped
/// iterator is never pulled past its end.
pub struct RawSource<T> {
    source: Source<T>,
    finished: bool,
}

impl<T> RawSource<T> {
    pub fn plain<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self {
            source: Source::Plain(Box::new(iter.into_iter())),
            finished: false,
        }
    }

    pub fn finishable<I>(iter: I) -> Self
    where
        I: Iterator<Item = T> + Finish + Send + 'static,
    {
        Self {
            source: Source::Finishable(Box::new(iter)),
            finished: false,
        }
    }

    pub fn has_finish_hook(&self) -> bool {
        matches!(self.source, Source::Finishable(_))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Forwards to the release hook if one was declared. Later calls are no-ops.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        if let Source::Finishable(iter) = &mut self.source {
            iter.finished();
            trace!(
                event = events::CURSOR_FINISHED,
                component = COMPONENT,
                "raw source released"
            );
        }
    }
}

impl<T> Iterator for RawSource<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.finished {
            return None;
        }
        let pulled = match &mut self.source {
            Source::Plain(iter) => iter.next(),
            Source::Finishable(iter) => iter.next(),
        };
        if pulled.is_none() {
            self.finish();
        }
        pulled
    }
}

impl<T> Drop for RawSource<T> {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::{Finish, RawSource};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Pinned {
        remaining: std::vec::IntoIter<u32>,
        pulls: Arc<AtomicUsize>,
        releases: Arc<AtomicUsize>,
    }

    impl Iterator for Pinned {
        type Item = u32;

        fn next(&mut self) -> Option<u32> {
            self.pulls.fetch_add(1, Ordering::SeqCst);
            self.remaining.next()
        }
    }

    fn pinned(values: Vec<u32>) -> (RawSource<u32>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let pulls = Arc::new(AtomicUsize::new(0));
        let releases = Arc::new(AtomicUsize::new(0));
        let source = RawSource::finishable(Pinned {
            remaining: values.into_iter(),
            pulls: pulls.clone(),
            releases: releases.clone(),
        });
        (source, pulls, releases)
    }

    impl Finish for Pinned {
        fn finished(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn plain_source_has_no_hook_and_stops_after_finish() {
        let mut source = RawSource::plain(vec![1, 2, 3]);

        assert!(!source.has_finish_hook());
        assert_eq!(source.next(), Some(1));
        source.finish();
        assert!(source.is_finished());
        assert_eq!(source.next(), None);
    }

    #[test]
    fn finishable_source_releases_exactly_once() {
        let (mut source, _, releases) = pinned(vec![10, 20]);

        assert!(source.has_finish_hook());
        assert_eq!(source.next(), Some(10));
        source.finish();
        source.finish();

        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert_eq!(source.next(), None);
    }

    #[test]
    fn exhausted_source_is_not_pulled_again() {
        let (mut source, pulls, releases) = pinned(vec![7]);

        assert_eq!(source.next(), Some(7));
        assert_eq!(source.next(), None);
        assert!(source.is_finished());
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        for _ in 0..5 {
            assert_eq!(source.next(), None);
        }
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_an_open_source_releases_it() {
        let (mut source, _, releases) = pinned(vec![1, 2, 3]);
        assert_eq!(source.next(), Some(1));
        drop(source);
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        let (mut source, _, releases) = pinned(vec![1]);
        source.finish();
        drop(source);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }
}

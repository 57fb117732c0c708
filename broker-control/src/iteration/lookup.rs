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

//! Linear lookups over control cursors.

use crate::control_plane::adapter::{ControlAdapter, ResourceKind};
use crate::error::{ControlError, ControlResult};
use crate::iteration::ControlIterator;
use crate::observability::events;
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "lookup";

/// Scans `cursor` for the first element accepted by `matches`.
///
/// The cursor is finished whether or not a match was found. A miss fails with
/// `NotFound` for `operation`, naming `kind` and `identifier`.
pub fn find_first<C, P>(
    mut cursor: C,
    operation: &'static str,
    kind: ResourceKind,
    identifier: &str,
    mut matches: P,
) -> ControlResult<C::Item>
where
    C: ControlIterator,
    P: FnMut(&C::Item) -> bool,
{
    while cursor.has_next() {
        let candidate = cursor.try_next()?;
        if matches(&candidate) {
            cursor.finished();
            return Ok(candidate);
        }
    }
    cursor.finished();

    debug!(
        event = events::LOOKUP_MISS,
        component = COMPONENT,
        operation,
        kind = kind.as_str(),
        identifier,
        "lookup exhausted its sequence"
    );
    Err(ControlError::not_found(operation, kind.as_str(), identifier))
}

/// Finds the adapter whose id is `id`. Adapters dereferenced mid-scan never match.
pub fn find_by_id<C, A>(
    cursor: C,
    operation: &'static str,
    kind: ResourceKind,
    id: &str,
) -> ControlResult<Arc<A>>
where
    C: ControlIterator<Item = Arc<A>>,
    A: ControlAdapter + ?Sized,
{
    find_first(cursor, operation, kind, id, |adapter| {
        adapter.id().is_ok_and(|candidate| candidate == id)
    })
}

#[cfg(test)]
mod tests {
    use super::{find_by_id, find_first};
    use crate::control_plane::adapter::{
        AdapterIdentity, AdapterState, ControlAdapter, ResourceKind,
    };
    use crate::control_plane::lifecycle::AdapterCore;
    use crate::error::{ControlError, ControlResult};
    use crate::iteration::{BasicIterator, RawSource};
    use std::sync::Arc;

    struct NamedControl {
        core: AdapterCore<()>,
    }

    impl ControlAdapter for NamedControl {
        fn kind(&self) -> ResourceKind {
            self.core.kind()
        }

        fn identity(&self) -> ControlResult<&AdapterIdentity> {
            self.core.identity("identity")
        }

        fn state(&self) -> AdapterState {
            self.core.state()
        }

        fn activate(&self) -> bool {
            self.core.activate()
        }

        fn assert_valid(&self) -> ControlResult<()> {
            self.core.assert_valid("assert_valid")
        }

        fn dereference(&self) {
            self.core.dereference();
        }
    }

    fn control(id: &str) -> Arc<NamedControl> {
        Arc::new(NamedControl {
            core: AdapterCore::new(ResourceKind::Stream, AdapterIdentity::new(id, id), ()),
        })
    }

    #[test]
    fn find_first_returns_the_first_match() {
        let cursor = BasicIterator::new(RawSource::plain(vec![3, 8, 10, 12]));

        let found = find_first(cursor, "find_even", ResourceKind::Stream, "even", |n| n % 2 == 0);
        assert_eq!(found, Ok(8));
    }

    #[test]
    fn miss_names_operation_kind_and_identifier() {
        let cursor = BasicIterator::new(RawSource::plain(vec![control("s-1")]));

        let error = find_by_id(cursor, "find_stream", ResourceKind::Stream, "s-9")
            .err()
            .expect("s-9 is absent");
        assert_eq!(
            error,
            ControlError::NotFound {
                operation: "find_stream",
                kind: "stream",
                id: "s-9".to_string(),
            }
        );
    }

    #[test]
    fn dereferenced_adapters_are_not_matched() {
        let stale = control("s-1");
        stale.dereference();
        let cursor = BasicIterator::new(RawSource::plain(vec![stale, control("s-2")]));

        let error = find_by_id(cursor, "find_stream", ResourceKind::Stream, "s-1")
            .err()
            .expect("dead adapter is invisible");
        assert!(error.is_not_found());
    }

    #[test]
    fn find_by_id_returns_live_adapter() {
        let cursor = BasicIterator::new(RawSource::plain(vec![control("s-1"), control("s-2")]));

        let found = find_by_id(cursor, "find_stream", ResourceKind::Stream, "s-2")
            .expect("s-2 is present");
        assert_eq!(found.id(), Ok("s-2"));
    }
}

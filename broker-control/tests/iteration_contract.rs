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
    BasicIterator, ControlError, ControlIterator, ConvertingIterator, NestedIterator,
};
use control_test_utils::{counted_plain_source, counted_source, FakeContainer, FakeResource};
use std::sync::Arc;

fn nested_over(
    containers: Vec<Arc<FakeContainer>>,
) -> impl ControlIterator<Item = String> + Iterator<Item = String> {
    let (outer, _) = counted_plain_source(containers);
    NestedIterator::new(BasicIterator::new(outer), |container: &Arc<FakeContainer>| {
        container.open()
    })
}

#[test]
fn converting_cursor_yields_only_live_resources_in_source_order() {
    control_test_utils::init_logging();

    let (source, _) = counted_source(vec![
        FakeResource::live("r1"),
        FakeResource::removed("r2"),
        FakeResource::live("r3"),
        FakeResource::removed("r4"),
    ]);

    let labels: Vec<String> = ConvertingIterator::new(source).collect();
    assert_eq!(labels, vec!["r1".to_string(), "r3".to_string()]);
}

#[test]
fn has_next_is_idempotent_between_next_calls() {
    control_test_utils::init_logging();

    let (source, counters) =
        counted_source(vec![FakeResource::removed("r0"), FakeResource::live("r1")]);
    let mut cursor = ConvertingIterator::new(source);

    for _ in 0..4 {
        assert!(cursor.has_next());
    }
    assert_eq!(counters.pulls(), 2);
    assert_eq!(cursor.try_next(), Ok("r1".to_string()));

    for _ in 0..3 {
        assert!(!cursor.has_next());
    }
    assert_eq!(
        cursor.try_next(),
        Err(ControlError::EndOfSequence { operation: "next" })
    );
}

#[test]
fn drained_cursor_never_pulls_its_source_again() {
    control_test_utils::init_logging();

    let (source, counters) = counted_source(Vec::<Arc<FakeResource>>::new());
    let mut cursor = ConvertingIterator::new(source);

    for _ in 0..6 {
        assert!(!cursor.has_next());
    }
    assert!(cursor.try_next().is_err());
    assert_eq!(counters.pulls(), 1);
    assert_eq!(counters.finishes(), 1);

    cursor.finished();
    assert_eq!(counters.finishes(), 1);
}

#[test]
fn dropped_cursors_release_their_sources() {
    control_test_utils::init_logging();

    let (source, converting_counters) =
        counted_source(vec![FakeResource::live("r1"), FakeResource::live("r2")]);
    let mut converting = ConvertingIterator::new(source);
    assert_eq!(converting.try_next(), Ok("r1".to_string()));
    drop(converting);
    assert_eq!(converting_counters.finishes(), 1);

    let container = FakeContainer::labelled("c1", &["a", "b"]);
    let mut nested = nested_over(vec![container.clone()]);
    assert_eq!(nested.try_next(), Ok("a".to_string()));
    assert_eq!(container.cursor_counters()[0].finishes(), 0);
    drop(nested);
    assert_eq!(container.cursor_counters()[0].finishes(), 1);
}

#[test]
fn resource_removed_while_cursor_is_open_is_skipped() {
    control_test_utils::init_logging();

    let doomed = FakeResource::live("r2");
    let (source, _) = counted_source(vec![
        FakeResource::live("r1"),
        Arc::clone(&doomed),
        FakeResource::live("r3"),
    ]);
    let mut cursor = ConvertingIterator::new(source);

    assert_eq!(cursor.try_next(), Ok("r1".to_string()));
    doomed.remove();
    assert_eq!(cursor.try_next(), Ok("r3".to_string()));
    assert_eq!(cursor.skipped(), 1);
}

#[test]
fn remove_fails_on_every_cursor_shape() {
    control_test_utils::init_logging();

    let (source, _) = counted_source(vec![FakeResource::live("r1")]);
    let mut converting = ConvertingIterator::new(source);
    let mut nested = nested_over(vec![FakeContainer::labelled("c1", &["r1"])]);
    let (plain, _) = counted_plain_source(vec![1]);
    let mut basic = BasicIterator::new(plain);

    assert!(matches!(converting.remove(), Err(ControlError::InvalidOperation { .. })));
    assert!(matches!(nested.remove(), Err(ControlError::InvalidOperation { .. })));
    assert!(matches!(basic.remove(), Err(ControlError::InvalidOperation { .. })));

    // Failed removes leave the cursors usable.
    assert_eq!(converting.try_next(), Ok("r1".to_string()));
    assert_eq!(nested.try_next(), Ok("r1".to_string()));
    assert_eq!(basic.try_next(), Ok(1));
}

#[test]
fn finished_reaches_hooked_sources_once_and_tolerates_plain_ones() {
    control_test_utils::init_logging();

    let (hooked, hooked_counters) = counted_source(vec![FakeResource::live("r1")]);
    let mut hooked = ConvertingIterator::new(hooked);
    hooked.finished();
    hooked.finished();
    assert_eq!(hooked_counters.finishes(), 1);

    let (plain, plain_counters) = counted_plain_source(vec![FakeResource::live("r1")]);
    let mut plain = ConvertingIterator::new(plain);
    plain.finished();
    assert_eq!(plain_counters.finishes(), 0);
    assert!(!plain.has_next());
}

#[test]
fn nested_cursor_skips_empty_and_corrupt_containers() {
    control_test_utils::init_logging();

    let flattened: Vec<String> = nested_over(vec![
        FakeContainer::labelled("c1", &["a", "b"]),
        FakeContainer::empty("c2"),
        FakeContainer::corrupt("c3"),
        FakeContainer::labelled("c4", &["c"]),
    ])
    .collect();

    assert_eq!(flattened, vec!["a", "b", "c"]);
}

#[test]
fn nested_cursor_with_only_unusable_containers_is_empty() {
    control_test_utils::init_logging();

    let mut cursor = nested_over(vec![
        FakeContainer::corrupt("c1"),
        FakeContainer::empty("c2"),
        FakeContainer::corrupt("c3"),
    ]);

    assert!(!cursor.has_next());
    assert!(matches!(
        cursor.try_next(),
        Err(ControlError::EndOfSequence { .. })
    ));
}

#[test]
fn nested_cursor_finishes_every_inner_cursor_it_opens() {
    control_test_utils::init_logging();

    let first = FakeContainer::labelled("c1", &["a"]);
    let empty = FakeContainer::empty("c2");
    let last = FakeContainer::labelled("c3", &["b", "c"]);
    let mut cursor = nested_over(vec![first.clone(), empty.clone(), last.clone()]);

    assert_eq!(cursor.try_next(), Ok("a".to_string()));
    assert_eq!(cursor.try_next(), Ok("b".to_string()));
    assert_eq!(first.cursor_counters()[0].finishes(), 1);
    assert_eq!(empty.cursor_counters()[0].finishes(), 1);
    assert_eq!(last.cursor_counters()[0].finishes(), 0);

    cursor.finished();
    cursor.finished();
    assert_eq!(last.cursor_counters()[0].finishes(), 1);
    assert!(!cursor.has_next());
}

#[test]
fn nested_cursor_preserves_inner_order_with_removed_children() {
    control_test_utils::init_logging();

    let container = FakeContainer::with_children(
        "c1",
        vec![
            FakeResource::live("x"),
            FakeResource::removed("y"),
            FakeResource::live("z"),
        ],
    );

    let flattened: Vec<String> =
        nested_over(vec![container, FakeContainer::labelled("c2", &["w"])]).collect();
    assert_eq!(flattened, vec!["x", "z", "w"]);
}

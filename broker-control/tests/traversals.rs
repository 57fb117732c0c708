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

mod support;

use broker_control::{ControlAdapter, ControlError, ControlIterator, Reliability, StreamState};
use support::{engine, load_topology};

#[test]
fn engine_remote_queue_points_flatten_in_destination_order() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let mut points = engine(&topology)
        .remote_queue_points()
        .expect("engine is live");

    let ids: Vec<String> = points
        .by_ref()
        .map(|point| point.id().expect("point is live").to_string())
        .collect();
    points.finished();

    // billing has an unreadable index and audit has no points.
    assert_eq!(
        ids,
        vec![
            "orders@00000000000000B2",
            "orders@00000000000000C3",
            "orders@00000000000000D4",
            "shipments@00000000000000B2",
        ]
    );
    assert_eq!(points.skipped_containers(), 2);
    assert_eq!(topology.engine().cursor_ledger().open(), 0);
}

#[test]
fn queue_streams_skip_points_without_a_readable_stream_set() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let orders = engine(&topology)
        .find_destination_by_name("orders")
        .expect("orders exists");
    let mut streams = orders.streams().expect("orders is live");

    let ids: Vec<String> = streams
        .by_ref()
        .map(|stream| stream.stream_id().expect("stream is live").to_string())
        .collect();
    streams.finished();

    assert_eq!(
        ids,
        vec!["0000000000000000000000B1", "0000000000000000000000B2"]
    );
    assert_eq!(topology.engine().cursor_ledger().open(), 0);
}

#[test]
fn abandoned_nested_cursor_releases_everything_it_opened() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let ledger_before;
    {
        let orders = engine(&topology)
            .find_destination_by_name("orders")
            .expect("orders exists");
        ledger_before = topology.engine().cursor_ledger().open();

        let mut streams = orders.streams().expect("orders is live");
        assert!(streams.has_next());
        assert!(topology.engine().cursor_ledger().open() > ledger_before);
        streams.finished();
        streams.finished();
    }

    assert_eq!(topology.engine().cursor_ledger().open(), ledger_before);
    assert_eq!(ledger_before, 0);
}

#[test]
fn dropped_cursor_closes_every_store_cursor() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let ledger = topology.engine().cursor_ledger();
    {
        let mut points = engine(&topology)
            .remote_queue_points()
            .expect("engine is live");
        assert!(points.try_next().is_ok());
        assert!(ledger.open() > 0);
    }

    assert!(ledger.opened_total() > 0);
    assert_eq!(ledger.open(), 0);
}

#[test]
fn draining_a_cursor_closes_store_cursors_without_finished() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let ledger = topology.engine().cursor_ledger();
    let mut points = engine(&topology)
        .remote_queue_points()
        .expect("engine is live");

    assert_eq!(points.by_ref().count(), 4);
    assert!(!points.has_next());
    assert_eq!(ledger.open(), 0);
}

#[test]
fn stream_accessors_read_through_to_the_engine() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let stream_set = engine(&topology)
        .find_destination_by_name("orders")
        .and_then(|orders| orders.find_remote_queue_point("00000000000000B2"))
        .and_then(|point| point.stream_set())
        .expect("orders@B2 has a stream set");
    let stream = stream_set
        .find_stream("0000000000000000000000b2")
        .expect("lookups ignore hex case");

    assert_eq!(stream.priority(), Ok(9));
    assert_eq!(stream.reliability(), Ok(Reliability::ExpressNonPersistent));
    assert_eq!(stream.stream_state(), Ok(StreamState::Flushing));
    assert_eq!(stream.messages_sent(), Ok(20));
    assert_eq!(stream.messages_acknowledged(), Ok(20));
}

#[test]
fn point_without_stream_set_fails_the_operation() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let point = engine(&topology)
        .find_destination_by_name("orders")
        .and_then(|orders| orders.find_remote_queue_point("00000000000000C3"))
        .expect("orders@C3 exists");

    assert_eq!(point.messages_sent(), Ok(4));
    assert!(matches!(
        point.stream_set().err(),
        Some(ControlError::OperationFailed {
            operation: "stream_set",
            ..
        })
    ));
}

#[test]
fn corrupt_containers_fail_direct_listing() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let engine = engine(&topology);

    let stream_set = engine
        .find_destination_by_name("orders")
        .and_then(|orders| orders.find_remote_queue_point("00000000000000D4"))
        .and_then(|point| point.stream_set())
        .expect("orders@D4 has a stream set");
    assert!(matches!(
        stream_set.streams().err(),
        Some(ControlError::OperationFailed { .. })
    ));

    let billing = engine
        .find_destination_by_name("billing")
        .expect("billing exists");
    assert!(matches!(
        billing.remote_queue_points().err(),
        Some(ControlError::OperationFailed { .. })
    ));

    let mut topic_spaces = engine.topic_spaces().expect("engine is live");
    let alerts = topic_spaces
        .by_ref()
        .find(|topic_space| topic_space.name() == Ok("alerts"))
        .expect("alerts exists");
    topic_spaces.finished();
    assert!(matches!(
        alerts.remote_topic_spaces().err(),
        Some(ControlError::OperationFailed { .. })
    ));
}

#[test]
fn lookups_distinguish_malformed_identifiers_from_misses() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let orders = engine(&topology)
        .find_destination_by_name("orders")
        .expect("orders exists");

    for malformed in ["", "B2", "00000000000000G2", "+0000000000000B2"] {
        assert!(matches!(
            orders.find_remote_queue_point(malformed).err(),
            Some(ControlError::InvalidIdentifier {
                operation: "find_remote_queue_point",
                ..
            })
        ));
    }
    assert!(orders
        .find_remote_queue_point("00000000000000FF")
        .err()
        .expect("no point for FF")
        .is_not_found());

    let stream_set = orders
        .find_remote_queue_point("00000000000000B2")
        .and_then(|point| point.stream_set())
        .expect("orders@B2 has a stream set");
    assert!(matches!(
        stream_set.find_stream("B1").err(),
        Some(ControlError::InvalidIdentifier { .. })
    ));
    assert!(stream_set
        .find_stream("0000000000000000000000C1")
        .err()
        .expect("C1 belongs to shipments")
        .is_not_found());

    assert!(engine(&topology)
        .find_destination_by_name("returns")
        .err()
        .expect("no such destination")
        .is_not_found());
    assert_eq!(topology.engine().cursor_ledger().open(), 0);
}

#[test]
fn connections_expose_client_statistics() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let mut connections = engine(&topology).connections().expect("engine is live");

    let clients: Vec<(String, u64)> = connections
        .by_ref()
        .map(|connection| {
            (
                connection.client_id().expect("connection is live"),
                connection.messages_sent().expect("connection is live"),
            )
        })
        .collect();
    connections.finished();

    assert_eq!(
        clients,
        vec![
            ("order-service".to_string(), 30),
            ("billing-batch".to_string(), 2)
        ]
    );
}

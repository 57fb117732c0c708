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

use broker_control::{
    AdapterState, ControlAdapter, ControlConfig, ControlIterator, EngineEventKind,
    ManagementRegistry, ResourceKind,
};
use control_test_utils::{FailingListener, RecordingListener, RecordingRegistry, RejectingRegistry};
use std::sync::Arc;
use support::{engine, load_topology, load_topology_with};

#[test]
fn deleted_queue_reports_not_found_for_identity_too() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let engine = engine(&topology);
    let orders = engine
        .find_destination_by_name("orders")
        .expect("orders should be exposed");
    assert_eq!(orders.state(), AdapterState::Valid);
    assert_eq!(orders.depth(), Ok(42));

    topology
        .engine()
        .queue("orders")
        .expect("fixture has orders")
        .delete();

    assert_eq!(orders.state(), AdapterState::Dereferenced);
    assert!(orders.depth().expect_err("queue is gone").is_not_found());
    assert!(orders.id().expect_err("queue is gone").is_not_found());
    assert!(orders.name().expect_err("queue is gone").is_not_found());
    assert!(orders.remote_engine().is_none());
    let error = orders.identity().expect_err("queue is gone");
    assert_eq!(error.to_string(), "identity: queue 'Q-0001' not found");
    assert!(engine
        .find_destination_by_name("orders")
        .err()
        .expect("deleted queue is no longer listed")
        .is_not_found());
}

#[test]
fn queue_deleted_mid_traversal_is_skipped() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let engine = engine(&topology);
    let mut destinations = engine.destinations().expect("engine is live");

    let first = destinations.try_next().expect("orders comes first");
    assert_eq!(first.name(), Ok("orders"));

    topology
        .engine()
        .queue("billing")
        .expect("fixture has billing")
        .delete();

    let rest: Vec<String> = destinations
        .by_ref()
        .map(|queue| queue.name().expect("queue is live").to_string())
        .collect();
    assert_eq!(rest, vec!["audit".to_string(), "shipments".to_string()]);
    assert_eq!(destinations.skipped(), 1);
    destinations.finished();
}

#[test]
fn adapters_are_created_once_per_resource() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let engine = engine(&topology);

    let first = engine.find_destination_by_name("audit").expect("audit exists");
    let again = engine.find_destination_by_name("audit").expect("audit exists");
    assert!(Arc::ptr_eq(&first, &again));
    assert!(Arc::ptr_eq(
        &engine,
        &topology.engine_control().expect("engine is live")
    ));
}

#[test]
fn engine_teardown_dereferences_every_exposed_adapter() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let engine = engine(&topology);
    let orders = engine.find_destination_by_name("orders").expect("orders exists");
    let point = orders
        .find_remote_queue_point("00000000000000B2")
        .expect("orders has a point for B2");
    let stream = point
        .stream_set()
        .and_then(|stream_set| stream_set.find_stream("0000000000000000000000B1"))
        .expect("stream B1 exists");

    topology.teardown();

    let adapters: [&dyn ControlAdapter; 4] = [&*engine, &*orders, &*point, &*stream];
    for adapter in adapters {
        assert_eq!(adapter.state(), AdapterState::Dereferenced);
        assert!(adapter.assert_valid().is_err());
    }
    assert!(engine.uuid().expect_err("engine is gone").is_not_found());
    assert!(stream.priority().is_err());
    assert!(topology.engine_control().is_none());
    assert!(!topology.engine().is_alive());
}

#[test]
fn registry_sees_adapters_only_when_enabled() {
    control_test_utils::init_logging();

    let registry = Arc::new(RecordingRegistry::default());
    let topology = load_topology_with(
        &ControlConfig::default(),
        Some(registry.clone() as Arc<dyn ManagementRegistry>),
    );
    engine(&topology)
        .find_destination_by_name("orders")
        .expect("orders exists");
    topology.teardown();

    assert!(registry.log().is_empty());
}

#[test]
fn exposed_adapters_are_registered_until_teardown() {
    control_test_utils::init_logging();

    let registry = Arc::new(RecordingRegistry::default());
    let config = ControlConfig {
        register_management_objects: true,
        ..ControlConfig::default()
    };
    let topology = load_topology_with(
        &config,
        Some(registry.clone() as Arc<dyn ManagementRegistry>),
    );

    let engine = engine(&topology);
    assert!(registry.is_registered(ResourceKind::Engine, "00000000000000A1"));

    engine.find_destination_by_name("orders").expect("orders exists");
    assert!(registry.is_registered(ResourceKind::Queue, "Q-0001"));
    // Lookups stop at the match, so later queues were never exposed.
    assert!(!registry.is_registered(ResourceKind::Queue, "Q-0002"));

    topology.teardown();
    assert!(registry.registered().is_empty());
    assert!(registry.log().contains(&"-queue/Q-0001".to_string()));
    assert!(registry
        .log()
        .contains(&"-messaging_engine/00000000000000A1".to_string()));
}

#[test]
fn rejected_registration_leaves_adapter_usable() {
    control_test_utils::init_logging();

    let registry = Arc::new(RejectingRegistry::default());
    let config = ControlConfig {
        register_management_objects: true,
        ..ControlConfig::default()
    };
    let topology = load_topology_with(
        &config,
        Some(registry.clone() as Arc<dyn ManagementRegistry>),
    );

    let orders = engine(&topology)
        .find_destination_by_name("orders")
        .expect("orders exists");
    assert_eq!(orders.depth(), Ok(42));
    assert!(registry.attempts() >= 2);
}

#[test]
fn depth_crossings_reach_the_queue_listener() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let orders = engine(&topology)
        .find_destination_by_name("orders")
        .expect("orders exists");
    let listener = Arc::new(RecordingListener::default());
    orders.set_listener(Some(listener.clone()));

    let queue = topology.engine().queue("orders").expect("fixture has orders");
    queue.set_depth(6000);
    queue.set_depth(7000);
    queue.set_depth(10);

    let events = listener.events();
    let kinds: Vec<EngineEventKind> = events.iter().map(|(_, _, event)| event.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EngineEventKind::DepthThresholdReached,
            EngineEventKind::DepthThresholdCleared
        ]
    );
    assert!(events
        .iter()
        .all(|(kind, id, _)| *kind == ResourceKind::Queue && id == "Q-0001"));
    assert_eq!(orders.depth(), Ok(10));
}

#[test]
fn failing_listener_does_not_disturb_the_engine() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let orders = engine(&topology)
        .find_destination_by_name("orders")
        .expect("orders exists");
    let listener = Arc::new(FailingListener::default());
    orders.set_listener(Some(listener.clone()));

    let queue = topology.engine().queue("orders").expect("fixture has orders");
    queue.set_depth(9000);
    assert_eq!(listener.calls(), 1);
    assert_eq!(orders.depth(), Ok(9000));

    queue.delete();
    queue.set_depth(1);
    assert_eq!(listener.calls(), 1);
}

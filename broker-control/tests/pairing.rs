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
    AdapterState, ControlAdapter, ControlConfig, ControlError, ControlIterator, EngineUuid,
    PairingPreference, PairingSide, RemoteTopicSpaceControl,
};
use static_topology::{StaticRemoteTopicSpace, StaticTopology};
use std::sync::Arc;
use support::{engine, load_topology, load_topology_with};

const B2: &str = "00000000000000B2";
const C3: &str = "00000000000000C3";

fn prices_remote(
    topology: &StaticTopology,
    remote_engine: &str,
) -> (Arc<RemoteTopicSpaceControl>, Arc<StaticRemoteTopicSpace>) {
    let mut topic_spaces = engine(topology).topic_spaces().expect("engine is live");
    let prices = topic_spaces
        .by_ref()
        .find(|topic_space| topic_space.name() == Ok("prices"))
        .expect("prices exists");
    topic_spaces.finished();

    let control = prices
        .find_remote_topic_space(remote_engine)
        .expect("prices has the remote topic space");
    let uuid: EngineUuid = remote_engine.parse().expect("valid engine uuid");
    let resource = topology
        .engine()
        .topic_space("prices")
        .and_then(|topic_space| topic_space.remote_topic_space(uuid))
        .expect("fixture has the remote topic space");
    (control, resource)
}

fn exposed_id(remote: &RemoteTopicSpaceControl) -> String {
    remote.exposed_identity().expect("a side is attached").id
}

#[test]
fn first_attached_side_supplies_the_identity() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let (both, _) = prices_remote(&topology, B2);
    let (consume_only, _) = prices_remote(&topology, C3);

    assert_eq!(exposed_id(&both), "prices@00000000000000B2/primary");
    assert_eq!(exposed_id(&consume_only), "prices@00000000000000C3/secondary");
    assert_eq!(both.messages_published(), Ok(310));
    assert_eq!(both.messages_consumed(), Ok(44));
    assert_eq!(consume_only.messages_published(), Ok(0));
    assert!(consume_only
        .publish_side()
        .expect("relationship is live")
        .is_none());
}

#[test]
fn detaching_the_exposed_side_falls_back_to_the_other() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let (remote, resource) = prices_remote(&topology, B2);
    let publish = remote
        .peer()
        .expect("publish side is exposed");
    assert_eq!(publish.side(), Ok(PairingSide::Primary));

    assert!(resource.detach(PairingSide::Primary));
    assert!(!resource.detach(PairingSide::Primary));

    assert_eq!(publish.state(), AdapterState::Dereferenced);
    assert_eq!(exposed_id(&remote), "prices@00000000000000B2/secondary");
    assert_eq!(remote.messages_published(), Ok(0));
    assert_eq!(remote.messages_consumed(), Ok(44));

    // The surviving side keeps the identity when publishing resumes.
    resource.attach(PairingSide::Primary, 0);
    assert_eq!(exposed_id(&remote), "prices@00000000000000B2/secondary");
    assert!(remote
        .publish_side()
        .expect("relationship is live")
        .is_some());
}

#[test]
fn relationship_with_no_sides_fails_the_operation() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let (remote, resource) = prices_remote(&topology, C3);

    resource.detach(PairingSide::Secondary);

    assert!(matches!(
        remote.peer().err(),
        Some(ControlError::OperationFailed { .. })
    ));
    assert_eq!(remote.messages_consumed(), Ok(0));
    assert_eq!(remote.state(), AdapterState::Valid);
}

#[test]
fn configured_preference_overrides_attachment_order() {
    control_test_utils::init_logging();

    let config = ControlConfig {
        pairing_preference: PairingPreference::Primary,
        ..ControlConfig::default()
    };
    let topology = load_topology_with(&config, None);
    let (remote, resource) = prices_remote(&topology, C3);
    assert_eq!(exposed_id(&remote), "prices@00000000000000C3/secondary");

    resource.attach(PairingSide::Primary, 3);
    assert_eq!(exposed_id(&remote), "prices@00000000000000C3/primary");
    assert_eq!(remote.messages_published(), Ok(3));

    let config = ControlConfig {
        pairing_preference: PairingPreference::Secondary,
        ..ControlConfig::default()
    };
    let topology = load_topology_with(&config, None);
    let (remote, _) = prices_remote(&topology, B2);
    assert_eq!(exposed_id(&remote), "prices@00000000000000B2/secondary");
}

#[test]
fn peer_identity_carries_the_remote_engine() {
    control_test_utils::init_logging();

    let topology = load_topology();
    let (remote, _) = prices_remote(&topology, B2);
    let peer = remote.peer().expect("a side is attached");

    let expected: EngineUuid = B2.parse().expect("valid engine uuid");
    assert_eq!(peer.remote_engine(), Some(expected));
    assert_eq!(remote.remote_engine(), Some(expected));
    assert_eq!(peer.message_count(), Ok(310));
}

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

use broker_control::{Reliability, StreamState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root of a topology file.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TopologyFile {
    pub engine: EngineSpec,
    #[serde(default)]
    pub destinations: Vec<QueueSpec>,
    #[serde(default)]
    pub topic_spaces: Vec<TopicSpaceSpec>,
    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct EngineSpec {
    pub uuid: String,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct QueueSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub depth: u64,
    #[serde(default)]
    pub high_water_mark: u64,
    pub created_at: DateTime<Utc>,
    /// Marks the remote point index unreadable.
    #[serde(default)]
    pub corrupt: bool,
    #[serde(default)]
    pub remote_queue_points: Vec<RemoteQueuePointSpec>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RemoteQueuePointSpec {
    pub remote_engine: String,
    #[serde(default)]
    pub in_flight: u64,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub stream_set: Option<StreamSetSpec>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct StreamSetSpec {
    #[serde(default)]
    pub corrupt: bool,
    #[serde(default)]
    pub streams: Vec<StreamSpec>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct StreamSpec {
    pub id: String,
    pub priority: u8,
    pub reliability: Reliability,
    #[serde(default = "default_stream_state")]
    pub state: StreamState,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub acknowledged: u64,
}

fn default_stream_state() -> StreamState {
    StreamState::Active
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TopicSpaceSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subscriptions: u64,
    /// Marks the neighbour table unreadable.
    #[serde(default)]
    pub corrupt: bool,
    #[serde(default)]
    pub remote_topic_spaces: Vec<RemoteTopicSpaceSpec>,
}

/// Sides listed here are attached in file order: `publish` first, then `consume`.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RemoteTopicSpaceSpec {
    pub remote_engine: String,
    #[serde(default)]
    pub publish: Option<PeerSideSpec>,
    #[serde(default)]
    pub consume: Option<PeerSideSpec>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PeerSideSpec {
    #[serde(default)]
    pub messages: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConnectionSpec {
    pub id: String,
    pub client_id: String,
    pub connected_at: DateTime<Utc>,
    #[serde(default)]
    pub messages_received: u64,
    #[serde(default)]
    pub messages_sent: u64,
}

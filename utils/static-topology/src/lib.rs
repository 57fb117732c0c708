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

//! In-memory messaging engine loaded from a JSON5 topology file.
//!
//! Every resource implements the `broker-control` resource contracts, embeds an
//! `AdapterSlot`, and can be mutated or deleted at runtime so callers can observe how
//! the control facade behaves while the engine changes underneath it.

mod connections;
mod destinations;
mod engine;
mod error;
mod model;
mod topic_spaces;

pub use connections::StaticConnection;
pub use destinations::{StaticQueue, StaticRemoteQueuePoint, StaticStream, StaticStreamSet};
pub use engine::{CursorLedger, StaticEngine};
pub use error::TopologyError;
pub use model::{
    ConnectionSpec, EngineSpec, PeerSideSpec, QueueSpec, RemoteQueuePointSpec,
    RemoteTopicSpaceSpec, StreamSetSpec, StreamSpec, TopicSpaceSpec, TopologyFile,
};
pub use topic_spaces::{StaticRemotePeer, StaticRemoteTopicSpace, StaticTopicSpace};

use broker_control::{ControlConfig, Controllable, EngineControl, EngineUuid, ManagementRegistry};
use engine::BuildContext;
use std::collections::HashSet;
use std::fs::{self, canonicalize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "static_topology";

pub struct StaticTopology {
    engine: Arc<StaticEngine>,
}

impl StaticTopology {
    /// Reads and builds the topology at `path`.
    ///
    /// `registry` only receives adapters when `config.register_management_objects` is set.
    pub fn load(
        path: impl AsRef<Path>,
        config: &ControlConfig,
        registry: Option<Arc<dyn ManagementRegistry>>,
    ) -> Result<Self, TopologyError> {
        let path = path.as_ref();
        let label = path.display().to_string();

        let canonical = canonicalize(path).map_err(|err| TopologyError::Read {
            path: label.clone(),
            reason: err.to_string(),
        })?;
        debug!(component = COMPONENT, path = ?canonical, "loading static topology");

        let contents = fs::read_to_string(&canonical).map_err(|err| TopologyError::Read {
            path: label.clone(),
            reason: err.to_string(),
        })?;
        Self::parse(&label, &contents, config, registry)
    }

    /// Builds a topology from JSON5 text.
    pub fn from_json5(
        contents: &str,
        config: &ControlConfig,
        registry: Option<Arc<dyn ManagementRegistry>>,
    ) -> Result<Self, TopologyError> {
        Self::parse("<inline>", contents, config, registry)
    }

    pub fn from_file(
        file: &TopologyFile,
        config: &ControlConfig,
        registry: Option<Arc<dyn ManagementRegistry>>,
    ) -> Result<Self, TopologyError> {
        check_unique("destination", file.destinations.iter().map(|queue| &queue.name))?;
        check_unique(
            "topic space",
            file.topic_spaces.iter().map(|topic_space| &topic_space.name),
        )?;

        let context = BuildContext {
            preference: config.pairing_preference,
            registry: registry.filter(|_| config.register_management_objects),
            ledger: Arc::default(),
        };

        let uuid = EngineUuid::parse_for("load_topology", &file.engine.uuid)?;
        let queues = file
            .destinations
            .iter()
            .map(|queue| StaticQueue::build(queue, &context))
            .collect::<Result<Vec<_>, _>>()?;
        let topic_spaces = file
            .topic_spaces
            .iter()
            .map(|topic_space| StaticTopicSpace::build(topic_space, &context))
            .collect::<Result<Vec<_>, _>>()?;
        let connections = file
            .connections
            .iter()
            .map(|connection| StaticConnection::build(connection, &context))
            .collect();

        let engine = StaticEngine::new(
            uuid,
            file.engine.name.clone(),
            queues,
            topic_spaces,
            connections,
            &context,
        );
        debug!(
            component = COMPONENT,
            engine = engine.name(),
            destinations = file.destinations.len(),
            topic_spaces = file.topic_spaces.len(),
            connections = file.connections.len(),
            "static topology built"
        );
        Ok(Self { engine })
    }

    pub fn engine(&self) -> &Arc<StaticEngine> {
        &self.engine
    }

    /// Root adapter, `None` once the engine was torn down.
    pub fn engine_control(&self) -> Option<Arc<EngineControl>> {
        self.engine.control_adapter()
    }

    pub fn teardown(&self) {
        self.engine.teardown();
    }

    fn parse(
        label: &str,
        contents: &str,
        config: &ControlConfig,
        registry: Option<Arc<dyn ManagementRegistry>>,
    ) -> Result<Self, TopologyError> {
        let file: TopologyFile = json5::from_str(contents).map_err(|err| TopologyError::Parse {
            path: label.to_string(),
            reason: err.to_string(),
        })?;
        Self::from_file(&file, config, registry)
    }
}

fn check_unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a String>,
) -> Result<(), TopologyError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(TopologyError::Duplicate {
                kind,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{StaticTopology, TopologyError};
    use broker_control::{ControlConfig, ControlError};

    const MINIMAL: &str = r#"{ engine: { uuid: "00000000000000A1", name: "ME1" } }"#;

    #[test]
    fn fixture_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/static-configs/topology.json5");
        let topology =
            StaticTopology::load(path, &ControlConfig::default(), None).expect("fixture loads");

        assert_eq!(topology.engine().name(), "ME1");
        assert!(topology.engine().queue("orders").is_some());
        assert!(topology.engine_control().is_some());
    }

    #[test]
    fn minimal_topology_has_an_engine_only() {
        let topology = StaticTopology::from_json5(MINIMAL, &ControlConfig::default(), None)
            .expect("minimal topology");

        assert!(topology.engine().queue("orders").is_none());
        topology.teardown();
        assert!(topology.engine_control().is_none());
    }

    #[test]
    fn missing_file_reports_the_path() {
        let error = StaticTopology::load("does/not/exist.json5", &ControlConfig::default(), None)
            .err()
            .expect("missing file");

        assert!(matches!(error, TopologyError::Read { .. }));
        assert!(error.to_string().contains("does/not/exist.json5"));
    }

    #[test]
    fn unknown_fields_are_parse_errors() {
        let error = StaticTopology::from_json5(
            r#"{ engine: { uuid: "00000000000000A1", name: "ME1", colour: "red" } }"#,
            &ControlConfig::default(),
            None,
        )
        .err()
        .expect("unknown field");

        assert!(matches!(error, TopologyError::Parse { .. }));
    }

    #[test]
    fn malformed_engine_uuid_is_an_identifier_error() {
        let error = StaticTopology::from_json5(
            r#"{ engine: { uuid: "ME1", name: "ME1" } }"#,
            &ControlConfig::default(),
            None,
        )
        .err()
        .expect("bad uuid");

        assert!(matches!(
            error,
            TopologyError::Identifier(ControlError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn duplicate_destination_names_are_rejected() {
        let error = StaticTopology::from_json5(
            r#"{
                engine: { uuid: "00000000000000A1", name: "ME1" },
                destinations: [
                    { id: "Q1", name: "orders", created_at: "2026-01-05T09:30:00Z" },
                    { id: "Q2", name: "orders", created_at: "2026-01-05T09:30:00Z" },
                ],
            }"#,
            &ControlConfig::default(),
            None,
        )
        .err()
        .expect("duplicate");

        assert_eq!(
            error.to_string(),
            "duplicate destination 'orders' in topology"
        );
    }
}

#![allow(dead_code)]

use broker_control::{ControlConfig, EngineControl, ManagementRegistry};
use static_topology::StaticTopology;
use std::sync::Arc;

pub(crate) const TOPOLOGY: &str = "../utils/static-topology/static-configs/topology.json5";

pub(crate) fn load_topology() -> StaticTopology {
    load_topology_with(&ControlConfig::default(), None)
}

pub(crate) fn load_topology_with(
    config: &ControlConfig,
    registry: Option<Arc<dyn ManagementRegistry>>,
) -> StaticTopology {
    StaticTopology::load(TOPOLOGY, config, registry).expect("fixture topology should load")
}

pub(crate) fn engine(topology: &StaticTopology) -> Arc<EngineControl> {
    topology
        .engine_control()
        .expect("live engine should expose its adapter")
}

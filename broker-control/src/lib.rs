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

//! # broker-control
//!
//! `broker-control` is the runtime control facade of a message broker. It exposes the
//! engine's live topology (destinations, remote queue points, streams, topic spaces,
//! connections) to management tooling as validity-checked control adapters and lazy,
//! read-only cursors, without handing out the engine's own objects.
//!
//! The engine plugs in through the traits in the resource layer; every resource
//! produces its adapter on demand and every container produces a raw child iterator.
//!
//! ## Walking a topology
//!
//! ```
//! use broker_control::{ControlAdapter, ControlConfig, ControlIterator};
//! use static_topology::StaticTopology;
//!
//! let topology = StaticTopology::load(
//!     "../utils/static-topology/static-configs/topology.json5",
//!     &ControlConfig::default(),
//!     None,
//! )
//! .unwrap();
//! let engine = topology.engine_control().unwrap();
//!
//! let orders = engine.find_destination_by_name("orders").unwrap();
//! assert!(orders.depth().unwrap() > 0);
//!
//! // One flat sequence across every destination; corrupt indexes are skipped.
//! let mut points = engine.remote_queue_points().unwrap();
//! while points.has_next() {
//!     let point = points.try_next().unwrap();
//!     assert!(point.remote_engine().is_some());
//! }
//! points.finished();
//! ```
//!
//! ## Failure contract
//!
//! Lookups and accessors fail with [`ControlError`]: `NotFound` for vanished resources
//! and lookup misses, `InvalidIdentifier` for malformed ids, `InvalidOperation` for
//! `remove()`, `OperationFailed` for structural inconsistencies.
//!
//! ```
//! use broker_control::{ControlConfig, ControlError};
//! use static_topology::StaticTopology;
//!
//! let topology = StaticTopology::load(
//!     "../utils/static-topology/static-configs/topology.json5",
//!     &ControlConfig::default(),
//!     None,
//! )
//! .unwrap();
//! let orders = topology
//!     .engine_control()
//!     .unwrap()
//!     .find_destination_by_name("orders")
//!     .unwrap();
//!
//! assert!(matches!(
//!     orders.find_remote_queue_point("not-hex"),
//!     Err(ControlError::InvalidIdentifier { .. })
//! ));
//! assert!(matches!(
//!     orders.find_remote_queue_point("00000000000000FF"),
//!     Err(ControlError::NotFound { .. })
//! ));
//!
//! topology.teardown();
//! assert!(orders.depth().unwrap_err().is_not_found());
//! ```
//!
//! ## Internal architecture map
//!
//! - Control plane: adapter identity, lifecycle state machine, lazy adapter slots and the
//!   management registry / engine event seams
//! - Iteration: raw sources, converting and nested cursors, linear lookups
//! - Pairing: publish/consume side aggregation behind one identity
//! - Resources: engine-facing contracts
//! - Controls: concrete adapters and the cursor shapes they return
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber. Binaries and
//! tests are responsible for one-time `tracing_subscriber` initialization.

mod config;
pub use config::{ControlConfig, PairingPreference};

mod control_plane;
pub use control_plane::adapter::{AdapterIdentity, AdapterState, ControlAdapter, ResourceKind};
pub use control_plane::adapter_slot::AdapterSlot;
pub use control_plane::lifecycle::AdapterCore;
pub use control_plane::management::{
    deregister_adapter, register_adapter, EngineEvent, EngineEventKind, EngineEventListener,
    ListenerError, ManagementRegistry,
};

mod controls;
pub use controls::{
    ConnectionControl, ConnectionCursor, EngineControl, EngineRemoteQueuePointCursor,
    QueueControl, QueueCursor, QueueStreamCursor, RemotePeerControl, RemoteQueuePointControl,
    RemoteQueuePointCursor, RemoteTopicSpaceControl, RemoteTopicSpaceCursor, StreamControl,
    StreamCursor, StreamSetControl, TopicSpaceControl, TopicSpaceCursor,
};

mod error;
pub use error::{ControlError, ControlResult};

mod identifiers;
pub use identifiers::{EngineUuid, StreamId};

mod iteration;
pub use iteration::{
    find_by_id, find_first, BasicIterator, ControlIterator, ConvertingIterator, Finish,
    NestedIterator, RawSource,
};

#[doc(hidden)]
pub mod observability;

mod pairing;
pub use pairing::{Pairing, PairingSide};

mod resources;
pub use resources::{
    ConnectionResource, Controllable, MessagingEngineResource, QueueResource, Reliability,
    RemotePeerResource, RemoteQueuePointResource, RemoteTopicSpaceResource, StreamResource,
    StreamSetResource, StreamState, TopicSpaceResource,
};

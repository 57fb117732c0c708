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

//! Fakes and instrumentation shared by the `broker-control` integration tests.

mod fakes;
mod registry;
mod sources;

pub use fakes::{FakeContainer, FakeResource};
pub use registry::{FailingListener, RecordingListener, RecordingRegistry, RejectingRegistry};
pub use sources::{counted_plain_source, counted_source, SourceCounters};

use tracing_subscriber::EnvFilter;

/// Installs a test-friendly subscriber once; later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

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

//! Canonical structured field keys and value-format helpers.

use crate::identifiers::EngineUuid;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const KIND: &str = "kind";
pub const ADAPTER_ID: &str = "adapter_id";
pub const ADAPTER_NAME: &str = "adapter_name";
pub const REMOTE_ENGINE: &str = "remote_engine";
pub const OPERATION: &str = "operation";
pub const SIDE: &str = "side";
pub const SKIPPED: &str = "skipped";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const NONE: &str = "none";
pub const REASON_NO_ADAPTER: &str = "no_adapter";
pub const REASON_ACQUIRE_FAILED: &str = "acquire_failed";
pub const REASON_EMPTY_CONTAINER: &str = "empty_container";

pub fn format_remote_engine(remote_engine: Option<&EngineUuid>) -> String {
    remote_engine
        .map(EngineUuid::to_string)
        .unwrap_or_else(|| NONE.to_string())
}

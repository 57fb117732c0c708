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

use crate::control_plane::adapter::{AdapterIdentity, ControlAdapter, ResourceKind};
use crate::control_plane::lifecycle::AdapterCore;
use crate::error::ControlResult;
use crate::resources::ConnectionResource;
use chrono::{DateTime, Utc};
use std::sync::Weak;

/// Adapter over one client connection.
pub struct ConnectionControl {
    core: AdapterCore<Weak<dyn ConnectionResource>>,
}

impl ConnectionControl {
    pub fn new(identity: AdapterIdentity, resource: Weak<dyn ConnectionResource>) -> Self {
        Self {
            core: AdapterCore::new(ResourceKind::Connection, identity, resource),
        }
    }

    pub fn client_id(&self) -> ControlResult<String> {
        Ok(self.core.upgrade("client_id")?.client_id())
    }

    pub fn connected_at(&self) -> ControlResult<DateTime<Utc>> {
        Ok(self.core.upgrade("connected_at")?.connected_at())
    }

    pub fn messages_received(&self) -> ControlResult<u64> {
        Ok(self.core.upgrade("messages_received")?.messages_received())
    }

    pub fn messages_sent(&self) -> ControlResult<u64> {
        Ok(self.core.upgrade("messages_sent")?.messages_sent())
    }
}

impl ControlAdapter for ConnectionControl {
    delegate_to_core!();
}

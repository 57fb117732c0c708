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

use serde::{Deserialize, Serialize};

/// Facade-wide settings, usually loaded from the `control` section of a config file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ControlConfig {
    /// Which side of a pairing supplies the identity when both sides are attached.
    #[serde(default)]
    pub pairing_preference: PairingPreference,
    /// Publish adapters to the management registry when they are first exposed.
    #[serde(default)]
    pub register_management_objects: bool,
}

/// Tie-break applied by [`Pairing`](crate::Pairing) when both sides are present.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PairingPreference {
    /// The side attached first keeps supplying the identity until it is cleared.
    #[default]
    FirstAssigned,
    /// The primary (publish) side always wins.
    Primary,
    /// The secondary (consume) side always wins.
    Secondary,
}

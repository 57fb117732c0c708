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

use broker_control::ControlError;
use static_topology::TopologyError;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub enum InspectError {
    Config { path: String, reason: String },
    Topology(TopologyError),
    Control(ControlError),
    Render(String),
}

impl Display for InspectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InspectError::Config { path, reason } => {
                write!(f, "unable to load config file '{path}': {reason}")
            }
            InspectError::Topology(err) => write!(f, "{err}"),
            InspectError::Control(err) => write!(f, "control facade failed: {err}"),
            InspectError::Render(reason) => write!(f, "unable to render report: {reason}"),
        }
    }
}

// `main` returns this error, so Debug is what the user sees on failure.
impl Debug for InspectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Error for InspectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InspectError::Topology(err) => Some(err),
            InspectError::Control(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TopologyError> for InspectError {
    fn from(err: TopologyError) -> Self {
        InspectError::Topology(err)
    }
}

impl From<ControlError> for InspectError {
    fn from(err: ControlError) -> Self {
        InspectError::Control(err)
    }
}

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
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum TopologyError {
    Read { path: String, reason: String },
    Parse { path: String, reason: String },
    Identifier(ControlError),
    Duplicate { kind: &'static str, name: String },
}

impl Display for TopologyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::Read { path, reason } => {
                write!(f, "unable to read topology file '{path}': {reason}")
            }
            TopologyError::Parse { path, reason } => {
                write!(f, "unable to parse topology file '{path}': {reason}")
            }
            TopologyError::Identifier(err) => write!(f, "invalid identifier in topology: {err}"),
            TopologyError::Duplicate { kind, name } => {
                write!(f, "duplicate {kind} '{name}' in topology")
            }
        }
    }
}

impl Error for TopologyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TopologyError::Identifier(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ControlError> for TopologyError {
    fn from(err: ControlError) -> Self {
        TopologyError::Identifier(err)
    }
}

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

//! Opaque engine identifiers accepted by lookup operations.

use crate::error::ControlError;
use hex::FromHexError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// 8-byte messaging engine identifier, rendered as 16 upper-case hex digits.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EngineUuid(u64);

impl EngineUuid {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Parses `identifier`, attributing a failure to `operation`.
    pub fn parse_for(operation: &'static str, identifier: &str) -> Result<Self, ControlError> {
        parse_hex::<8>(identifier)
            .map(|bytes| Self(u64::from_be_bytes(bytes)))
            .map_err(|_| ControlError::InvalidIdentifier {
                operation,
                identifier: identifier.to_string(),
                expected: "engine uuid",
            })
    }
}

impl FromStr for EngineUuid {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_for("parse_engine_uuid", s)
    }
}

impl Display for EngineUuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// 12-byte guaranteed-delivery stream identifier, rendered as 24 upper-case hex digits.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StreamId([u8; 12]);

impl StreamId {
    pub const fn new(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    pub fn parse_for(operation: &'static str, identifier: &str) -> Result<Self, ControlError> {
        parse_hex::<12>(identifier)
            .map(Self)
            .map_err(|_| ControlError::InvalidIdentifier {
                operation,
                identifier: identifier.to_string(),
                expected: "stream id",
            })
    }
}

impl FromStr for StreamId {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_for("parse_stream_id", s)
    }
}

impl Display for StreamId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// Decodes exactly `BYTES * 2` hex digits of either case. Signs and other
/// non-digit characters are rejected by the decoder.
fn parse_hex<const BYTES: usize>(identifier: &str) -> Result<[u8; BYTES], FromHexError> {
    if identifier.len() != BYTES * 2 {
        return Err(FromHexError::InvalidStringLength);
    }

    let mut bytes = [0u8; BYTES];
    hex::decode_to_slice(identifier, &mut bytes)?;
    Ok(bytes)
}

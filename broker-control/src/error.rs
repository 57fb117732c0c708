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

//! Typed failure conditions surfaced to management tooling.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ControlResult<T> = Result<T, ControlError>;

/// Failures raised by control adapters, cursors and lookups.
///
/// Every variant carries the failing operation name so the rendered message can be
/// shown to an administrator unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControlError {
    /// The backing resource vanished, or a lookup exhausted its sequence.
    NotFound {
        operation: &'static str,
        kind: &'static str,
        id: String,
    },
    /// A mutation was attempted on a read-only surface.
    InvalidOperation { operation: &'static str },
    /// A caller-supplied identifier is malformed for the target lookup.
    InvalidIdentifier {
        operation: &'static str,
        identifier: String,
        expected: &'static str,
    },
    /// A structural or parent/child inconsistency was detected.
    OperationFailed {
        operation: &'static str,
        reason: String,
    },
    /// `next()` was called on a drained cursor.
    EndOfSequence { operation: &'static str },
}

impl ControlError {
    pub(crate) fn not_found(operation: &'static str, kind: &'static str, id: &str) -> Self {
        ControlError::NotFound {
            operation,
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn operation_failed(operation: &'static str, reason: impl Into<String>) -> Self {
        ControlError::OperationFailed {
            operation,
            reason: reason.into(),
        }
    }

    /// Name of the operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            ControlError::NotFound { operation, .. }
            | ControlError::InvalidOperation { operation }
            | ControlError::InvalidIdentifier { operation, .. }
            | ControlError::OperationFailed { operation, .. }
            | ControlError::EndOfSequence { operation } => operation,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ControlError::NotFound { .. })
    }
}

impl Display for ControlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlError::NotFound {
                operation,
                kind,
                id,
            } => write!(f, "{operation}: {kind} '{id}' not found"),
            ControlError::InvalidOperation { operation } => {
                write!(f, "{operation}: operation not supported on a read-only view")
            }
            ControlError::InvalidIdentifier {
                operation,
                identifier,
                expected,
            } => write!(
                f,
                "{operation}: identifier '{identifier}' is not a valid {expected}"
            ),
            ControlError::OperationFailed { operation, reason } => {
                write!(f, "{operation}: operation failed: {reason}")
            }
            ControlError::EndOfSequence { operation } => {
                write!(f, "{operation}: no more elements")
            }
        }
    }
}

impl Error for ControlError {}

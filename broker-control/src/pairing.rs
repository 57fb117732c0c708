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

//! Two independently attached views of one remote peer behind a single identity.

use crate::config::PairingPreference;
use crate::error::{ControlError, ControlResult};
use crate::observability::events;
use crate::resources::Controllable;
use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "pairing";

const ANCHOR_NONE: u8 = 0;
const ANCHOR_PRIMARY: u8 = 1;
const ANCHOR_SECONDARY: u8 = 2;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PairingSide {
    /// Publish side.
    Primary,
    /// Consume side.
    Secondary,
}

impl PairingSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingSide::Primary => "primary",
            PairingSide::Secondary => "secondary",
        }
    }

    fn anchor(&self) -> u8 {
        match self {
            PairingSide::Primary => ANCHOR_PRIMARY,
            PairingSide::Secondary => ANCHOR_SECONDARY,
        }
    }

    fn other(&self) -> PairingSide {
        match self {
            PairingSide::Primary => PairingSide::Secondary,
            PairingSide::Secondary => PairingSide::Primary,
        }
    }
}

/// Up to two handles for the same logical peer.
///
/// Either side may be attached or cleared at any time without touching the other.
/// While exactly one side is attached it supplies the identity; with both attached
/// the [`PairingPreference`] decides. Under `FirstAssigned` the side attached first
/// keeps the identity until it is cleared, so attaching the second side never
/// changes what callers already observed.
pub struct Pairing<H> {
    preference: PairingPreference,
    primary: ArcSwapOption<H>,
    secondary: ArcSwapOption<H>,
    anchor: AtomicU8,
}

impl<H: Clone> Pairing<H> {
    pub fn new(preference: PairingPreference) -> Self {
        Self {
            preference,
            primary: ArcSwapOption::empty(),
            secondary: ArcSwapOption::empty(),
            anchor: AtomicU8::new(ANCHOR_NONE),
        }
    }

    pub fn preference(&self) -> PairingPreference {
        self.preference
    }

    pub fn set(&self, side: PairingSide, handle: H) {
        self.slot(side).store(Some(Arc::new(handle)));
        let _ = self.anchor.compare_exchange(
            ANCHOR_NONE,
            side.anchor(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        debug!(
            event = events::PAIRING_SIDE_SET,
            component = COMPONENT,
            side = side.as_str(),
            "pairing side attached"
        );
    }

    /// Detaches `side`. Returns whether a handle was attached.
    pub fn clear(&self, side: PairingSide) -> bool {
        let previous = self.slot(side).swap(None);
        let next_anchor = if self.slot(side.other()).load().is_some() {
            side.other().anchor()
        } else {
            ANCHOR_NONE
        };
        let _ = self.anchor.compare_exchange(
            side.anchor(),
            next_anchor,
            Ordering::AcqRel,
            Ordering::Acquire,
        );

        if previous.is_some() {
            debug!(
                event = events::PAIRING_SIDE_CLEARED,
                component = COMPONENT,
                side = side.as_str(),
                "pairing side detached"
            );
        }
        previous.is_some()
    }

    pub fn get(&self, side: PairingSide) -> Option<H> {
        self.slot(side).load_full().map(|handle| (*handle).clone())
    }

    pub fn primary(&self) -> Option<H> {
        self.get(PairingSide::Primary)
    }

    pub fn secondary(&self) -> Option<H> {
        self.get(PairingSide::Secondary)
    }

    pub fn is_empty(&self) -> bool {
        self.primary.load().is_none() && self.secondary.load().is_none()
    }

    /// Side whose handle currently supplies the identity.
    pub fn selected_side(&self) -> Option<PairingSide> {
        let has_primary = self.primary.load().is_some();
        let has_secondary = self.secondary.load().is_some();

        match (has_primary, has_secondary) {
            (false, false) => None,
            (true, false) => Some(PairingSide::Primary),
            (false, true) => Some(PairingSide::Secondary),
            (true, true) => Some(match self.preference {
                PairingPreference::Primary => PairingSide::Primary,
                PairingPreference::Secondary => PairingSide::Secondary,
                PairingPreference::FirstAssigned => {
                    if self.anchor.load(Ordering::Acquire) == ANCHOR_SECONDARY {
                        PairingSide::Secondary
                    } else {
                        PairingSide::Primary
                    }
                }
            }),
        }
    }

    /// Handle of the selected side. Fails when neither side is attached.
    pub fn selected(&self, operation: &'static str) -> ControlResult<(PairingSide, H)> {
        self.selected_side()
            .and_then(|side| self.get(side).map(|handle| (side, handle)))
            .ok_or_else(|| self.inconsistent(operation))
    }

    fn slot(&self, side: PairingSide) -> &ArcSwapOption<H> {
        match side {
            PairingSide::Primary => &self.primary,
            PairingSide::Secondary => &self.secondary,
        }
    }

    fn inconsistent(&self, operation: &'static str) -> ControlError {
        warn!(
            event = events::PAIRING_INCONSISTENT,
            component = COMPONENT,
            operation,
            "pairing exposed with neither side attached"
        );
        ControlError::operation_failed(operation, "pairing has neither side attached")
    }
}

impl<H: Clone + Controllable> Pairing<H> {
    /// Adapter of the selected side, falling back to the other side when the
    /// selected resource no longer yields one.
    pub fn control_adapter(&self) -> ControlResult<H::Control> {
        let (side, handle) = self.selected("control_adapter")?;
        if let Some(adapter) = handle.control_adapter() {
            return Ok(adapter);
        }
        self.get(side.other())
            .and_then(|other| other.control_adapter())
            .ok_or_else(|| self.inconsistent("control_adapter"))
    }
}

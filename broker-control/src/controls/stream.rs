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
use crate::control_plane::management::EngineEventListener;
use crate::controls::StreamCursor;
use crate::error::ControlResult;
use crate::identifiers::StreamId;
use crate::iteration::{find_first, ConvertingIterator};
use crate::resources::{Reliability, StreamResource, StreamSetResource, StreamState};
use std::sync::{Arc, Weak};

/// Adapter over the set of guaranteed-delivery streams behind one remote queue point.
pub struct StreamSetControl {
    core: AdapterCore<Weak<dyn StreamSetResource>>,
}

impl StreamSetControl {
    pub fn new(identity: AdapterIdentity, resource: Weak<dyn StreamSetResource>) -> Self {
        Self {
            core: AdapterCore::new(ResourceKind::StreamSet, identity, resource),
        }
    }

    pub fn streams(&self) -> ControlResult<StreamCursor> {
        let stream_set = self.core.upgrade("streams")?;
        Ok(ConvertingIterator::new(stream_set.streams()?))
    }

    /// Finds a stream by its 24 hex digit id.
    pub fn find_stream(&self, stream_id: &str) -> ControlResult<Arc<StreamControl>> {
        const OPERATION: &str = "find_stream";
        let wanted = StreamId::parse_for(OPERATION, stream_id)?;

        find_first(
            self.streams()?,
            OPERATION,
            ResourceKind::Stream,
            stream_id,
            |stream| stream.stream_id().is_ok_and(|candidate| candidate == wanted),
        )
    }
}

impl ControlAdapter for StreamSetControl {
    delegate_to_core!();
}

pub struct StreamControl {
    core: AdapterCore<Weak<dyn StreamResource>>,
}

impl StreamControl {
    pub fn new(identity: AdapterIdentity, resource: Weak<dyn StreamResource>) -> Self {
        Self {
            core: AdapterCore::new(ResourceKind::Stream, identity, resource),
        }
    }

    pub fn set_listener(&self, listener: Option<Arc<dyn EngineEventListener>>) {
        self.core.set_listener(listener);
    }

    pub fn stream_id(&self) -> ControlResult<StreamId> {
        Ok(self.core.upgrade("stream_id")?.stream_id())
    }

    pub fn priority(&self) -> ControlResult<u8> {
        Ok(self.core.upgrade("priority")?.priority())
    }

    pub fn reliability(&self) -> ControlResult<Reliability> {
        Ok(self.core.upgrade("reliability")?.reliability())
    }

    pub fn stream_state(&self) -> ControlResult<StreamState> {
        Ok(self.core.upgrade("stream_state")?.stream_state())
    }

    pub fn messages_sent(&self) -> ControlResult<u64> {
        Ok(self.core.upgrade("messages_sent")?.messages_sent())
    }

    pub fn messages_acknowledged(&self) -> ControlResult<u64> {
        Ok(self.core.upgrade("messages_acknowledged")?.messages_acknowledged())
    }
}

impl ControlAdapter for StreamControl {
    delegate_to_core!();
    forward_engine_events!();
}

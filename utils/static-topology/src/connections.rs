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

use crate::engine::BuildContext;
use crate::model::ConnectionSpec;
use broker_control::{
    AdapterIdentity, AdapterSlot, ConnectionControl, ConnectionResource, Controllable,
};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

pub struct StaticConnection {
    me: Weak<StaticConnection>,
    id: String,
    client_id: String,
    connected_at: DateTime<Utc>,
    received: AtomicU64,
    sent: AtomicU64,
    slot: AdapterSlot<ConnectionControl>,
}

impl StaticConnection {
    pub(crate) fn build(spec: &ConnectionSpec, context: &BuildContext) -> Arc<Self> {
        Arc::new_cyclic(|me| StaticConnection {
            me: me.clone(),
            id: spec.id.clone(),
            client_id: spec.client_id.clone(),
            connected_at: spec.connected_at,
            received: AtomicU64::new(spec.messages_received),
            sent: AtomicU64::new(spec.messages_sent),
            slot: context.slot(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn record_received(&self, count: u64) {
        self.received.fetch_add(count, Ordering::SeqCst);
    }

    /// Disconnects the client; its adapter reads as dereferenced afterwards.
    pub fn delete(&self) {
        self.slot.teardown();
    }
}

impl Controllable for StaticConnection {
    type Control = Arc<ConnectionControl>;

    fn control_adapter(&self) -> Option<Arc<ConnectionControl>> {
        self.slot.get_or_create(|| {
            let me: Weak<dyn ConnectionResource> = self.me.clone();
            Some(ConnectionControl::new(
                AdapterIdentity::new(&self.id, &self.client_id),
                me,
            ))
        })
    }
}

impl ConnectionResource for StaticConnection {
    fn client_id(&self) -> String {
        self.client_id.clone()
    }

    fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    fn messages_received(&self) -> u64 {
        self.received.load(Ordering::SeqCst)
    }

    fn messages_sent(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }
}

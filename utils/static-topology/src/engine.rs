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

use crate::connections::StaticConnection;
use crate::destinations::StaticQueue;
use crate::topic_spaces::StaticTopicSpace;
use broker_control::{
    AdapterIdentity, AdapterSlot, ConnectionResource, ControlAdapter, Controllable, EngineControl,
    EngineUuid, Finish, ManagementRegistry, MessagingEngineResource, PairingPreference,
    QueueResource, RawSource, TopicSpaceResource,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

const COMPONENT: &str = "static_engine";

/// Counts store-backed child iterators that were opened but not yet finished.
#[derive(Debug, Default)]
pub struct CursorLedger {
    open: AtomicUsize,
    opened: AtomicUsize,
}

impl CursorLedger {
    pub fn open(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub fn opened_total(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

/// Child iterator that pins a ledger entry until finished.
pub(crate) struct StoreCursor<T> {
    items: std::vec::IntoIter<T>,
    ledger: Arc<CursorLedger>,
}

impl<T: Send + 'static> StoreCursor<T> {
    pub(crate) fn open(items: Vec<T>, ledger: &Arc<CursorLedger>) -> RawSource<T> {
        ledger.open.fetch_add(1, Ordering::SeqCst);
        ledger.opened.fetch_add(1, Ordering::SeqCst);
        RawSource::finishable(StoreCursor {
            items: items.into_iter(),
            ledger: Arc::clone(ledger),
        })
    }
}

impl<T> Iterator for StoreCursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.items.next()
    }
}

impl<T> Finish for StoreCursor<T> {
    fn finished(&mut self) {
        self.ledger.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Settings every static resource is built with.
#[derive(Clone)]
pub(crate) struct BuildContext {
    pub(crate) preference: PairingPreference,
    pub(crate) registry: Option<Arc<dyn ManagementRegistry>>,
    pub(crate) ledger: Arc<CursorLedger>,
}

impl BuildContext {
    pub(crate) fn slot<A: ControlAdapter>(&self) -> AdapterSlot<A> {
        match &self.registry {
            Some(registry) => AdapterSlot::with_registry(Arc::clone(registry)),
            None => AdapterSlot::new(),
        }
    }
}

/// In-memory messaging engine built from a topology file.
pub struct StaticEngine {
    me: Weak<StaticEngine>,
    uuid: EngineUuid,
    name: String,
    queues: Vec<Arc<StaticQueue>>,
    topic_spaces: Vec<Arc<StaticTopicSpace>>,
    connections: Vec<Arc<StaticConnection>>,
    ledger: Arc<CursorLedger>,
    slot: AdapterSlot<EngineControl>,
}

impl StaticEngine {
    pub(crate) fn new(
        uuid: EngineUuid,
        name: String,
        queues: Vec<Arc<StaticQueue>>,
        topic_spaces: Vec<Arc<StaticTopicSpace>>,
        connections: Vec<Arc<StaticConnection>>,
        context: &BuildContext,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| StaticEngine {
            me: me.clone(),
            uuid,
            name,
            queues,
            topic_spaces,
            connections,
            ledger: Arc::clone(&context.ledger),
            slot: context.slot(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn queue(&self, name: &str) -> Option<Arc<StaticQueue>> {
        self.queues.iter().find(|queue| queue.name() == name).cloned()
    }

    pub fn topic_space(&self, name: &str) -> Option<Arc<StaticTopicSpace>> {
        self.topic_spaces
            .iter()
            .find(|topic_space| topic_space.name() == name)
            .cloned()
    }

    pub fn connection(&self, id: &str) -> Option<Arc<StaticConnection>> {
        self.connections
            .iter()
            .find(|connection| connection.id() == id)
            .cloned()
    }

    pub fn cursor_ledger(&self) -> &CursorLedger {
        &self.ledger
    }

    pub fn is_alive(&self) -> bool {
        !self.slot.is_torn_down()
    }

    /// Deletes every resource, children first, then the engine itself.
    pub fn teardown(&self) {
        self.queues.iter().for_each(|queue| queue.delete());
        self.topic_spaces
            .iter()
            .for_each(|topic_space| topic_space.delete());
        self.connections
            .iter()
            .for_each(|connection| connection.delete());
        self.slot.teardown();
        debug!(
            component = COMPONENT,
            engine = self.name.as_str(),
            "static engine torn down"
        );
    }
}

impl Controllable for StaticEngine {
    type Control = Arc<EngineControl>;

    fn control_adapter(&self) -> Option<Arc<EngineControl>> {
        self.slot.get_or_create(|| {
            let me: Weak<dyn MessagingEngineResource> = self.me.clone();
            let identity = AdapterIdentity::new(self.uuid.to_string(), &self.name);
            Some(EngineControl::new(identity, me))
        })
    }
}

impl MessagingEngineResource for StaticEngine {
    fn uuid(&self) -> EngineUuid {
        self.uuid
    }

    fn destinations(&self) -> RawSource<Arc<dyn QueueResource>> {
        let queues: Vec<Arc<dyn QueueResource>> = self
            .queues
            .iter()
            .map(|queue| Arc::clone(queue) as Arc<dyn QueueResource>)
            .collect();
        RawSource::plain(queues)
    }

    fn topic_spaces(&self) -> RawSource<Arc<dyn TopicSpaceResource>> {
        let topic_spaces: Vec<Arc<dyn TopicSpaceResource>> = self
            .topic_spaces
            .iter()
            .map(|topic_space| Arc::clone(topic_space) as Arc<dyn TopicSpaceResource>)
            .collect();
        RawSource::plain(topic_spaces)
    }

    fn connections(&self) -> RawSource<Arc<dyn ConnectionResource>> {
        let connections: Vec<Arc<dyn ConnectionResource>> = self
            .connections
            .iter()
            .map(|connection| Arc::clone(connection) as Arc<dyn ConnectionResource>)
            .collect();
        RawSource::plain(connections)
    }
}

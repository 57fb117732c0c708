//! Engine-facing contracts.
//!
//! The engine owns every resource; this crate only ever sees them through the traits
//! below. Each resource can hand out its control adapter ([`Controllable`]) and each
//! container hands out raw child iterators. Child iterators over structures that may
//! be damaged on disk return `Err` instead of a source; callers treat that as a
//! recoverable skip rather than a failed traversal.
//!
//! Implementors usually embed an [`AdapterSlot`](crate::AdapterSlot) and build the
//! adapter with a weak handle to themselves:
//!
//! ```
//! use broker_control::{
//!     AdapterIdentity, AdapterSlot, ConnectionControl, ConnectionResource, Controllable,
//! };
//! use chrono::{DateTime, TimeZone, Utc};
//! use std::sync::{Arc, Weak};
//!
//! struct Client {
//!     me: Weak<Client>,
//!     slot: AdapterSlot<ConnectionControl>,
//! }
//!
//! impl Controllable for Client {
//!     type Control = Arc<ConnectionControl>;
//!
//!     fn control_adapter(&self) -> Option<Arc<ConnectionControl>> {
//!         self.slot.get_or_create(|| {
//!             let me: Weak<dyn ConnectionResource> = self.me.clone();
//!             Some(ConnectionControl::new(AdapterIdentity::new("c-1", "app-1"), me))
//!         })
//!     }
//! }
//!
//! impl ConnectionResource for Client {
//!     fn client_id(&self) -> String { "app-1".to_string() }
//!     fn connected_at(&self) -> DateTime<Utc> { Utc.timestamp_opt(0, 0).unwrap() }
//!     fn messages_received(&self) -> u64 { 3 }
//!     fn messages_sent(&self) -> u64 { 5 }
//! }
//!
//! let client = Arc::new_cyclic(|me| Client { me: me.clone(), slot: AdapterSlot::new() });
//! let control = client.control_adapter().unwrap();
//! assert_eq!(control.client_id().unwrap(), "app-1");
//! assert!(Arc::ptr_eq(&control, &client.control_adapter().unwrap()));
//! ```

use crate::controls::{
    ConnectionControl, EngineControl, QueueControl, RemotePeerControl, RemoteQueuePointControl,
    RemoteTopicSpaceControl, StreamControl, StreamSetControl, TopicSpaceControl,
};
use crate::error::ControlResult;
use crate::identifiers::{EngineUuid, StreamId};
use crate::iteration::RawSource;
use crate::pairing::{Pairing, PairingSide};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Capability of producing a control adapter, or none once the resource is gone.
pub trait Controllable {
    type Control;

    fn control_adapter(&self) -> Option<Self::Control>;
}

impl<T: Controllable + ?Sized> Controllable for Arc<T> {
    type Control = T::Control;

    fn control_adapter(&self) -> Option<T::Control> {
        (**self).control_adapter()
    }
}

pub trait MessagingEngineResource: Controllable<Control = Arc<EngineControl>> + Send + Sync {
    fn uuid(&self) -> EngineUuid;

    fn destinations(&self) -> RawSource<Arc<dyn QueueResource>>;

    fn topic_spaces(&self) -> RawSource<Arc<dyn TopicSpaceResource>>;

    fn connections(&self) -> RawSource<Arc<dyn ConnectionResource>>;
}

pub trait QueueResource: Controllable<Control = Arc<QueueControl>> + Send + Sync {
    fn depth(&self) -> u64;

    fn high_water_mark(&self) -> u64;

    fn created_at(&self) -> DateTime<Utc>;

    /// Fails when the queue's remote point index is unreadable.
    fn remote_queue_points(&self) -> ControlResult<RawSource<Arc<dyn RemoteQueuePointResource>>>;
}

pub trait RemoteQueuePointResource:
    Controllable<Control = Arc<RemoteQueuePointControl>> + Send + Sync
{
    fn remote_engine(&self) -> EngineUuid;

    fn messages_in_flight(&self) -> u64;

    fn messages_sent(&self) -> u64;

    /// `None` when the point is not backed by guaranteed-delivery streams.
    fn stream_set(&self) -> Option<Arc<dyn StreamSetResource>>;
}

pub trait StreamSetResource: Controllable<Control = Arc<StreamSetControl>> + Send + Sync {
    /// Fails when the stream set's persisted state is corrupt.
    fn streams(&self) -> ControlResult<RawSource<Arc<dyn StreamResource>>>;
}

pub trait StreamResource: Controllable<Control = Arc<StreamControl>> + Send + Sync {
    fn stream_id(&self) -> StreamId;

    fn priority(&self) -> u8;

    fn reliability(&self) -> Reliability;

    fn stream_state(&self) -> StreamState;

    fn messages_sent(&self) -> u64;

    fn messages_acknowledged(&self) -> u64;
}

pub trait TopicSpaceResource: Controllable<Control = Arc<TopicSpaceControl>> + Send + Sync {
    fn subscription_count(&self) -> u64;

    /// Fails when the topic space's neighbour table is unreadable.
    fn remote_topic_spaces(
        &self,
    ) -> ControlResult<RawSource<Arc<dyn RemoteTopicSpaceResource>>>;
}

/// Relationship between a local topic space and the same topic space on one peer.
pub trait RemoteTopicSpaceResource:
    Controllable<Control = Arc<RemoteTopicSpaceControl>> + Send + Sync
{
    fn remote_engine(&self) -> EngineUuid;

    fn pairing(&self) -> &Pairing<Arc<dyn RemotePeerResource>>;
}

/// One direction of a remote topic space relationship.
pub trait RemotePeerResource: Controllable<Control = Arc<RemotePeerControl>> + Send + Sync {
    fn side(&self) -> PairingSide;

    fn remote_engine(&self) -> EngineUuid;

    fn message_count(&self) -> u64;
}

pub trait ConnectionResource: Controllable<Control = Arc<ConnectionControl>> + Send + Sync {
    fn client_id(&self) -> String;

    fn connected_at(&self) -> DateTime<Utc>;

    fn messages_received(&self) -> u64;

    fn messages_sent(&self) -> u64;
}

/// Delivery quality of service of a stream.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    BestEffortNonPersistent,
    ExpressNonPersistent,
    ReliableNonPersistent,
    ReliablePersistent,
    AssuredPersistent,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    Active,
    Flushing,
    Closed,
}

//! Concrete control adapters, one per engine resource family.
//!
//! Every adapter wraps an [`AdapterCore`](crate::AdapterCore) holding a weak handle to
//! its resource, so a resource dropped by the engine reads as dereferenced. Container
//! adapters hand out composed cursors; the aliases below name the shapes they return.

use crate::error::ControlResult;
use crate::iteration::{ConvertingIterator, NestedIterator};
use crate::resources::{
    ConnectionResource, QueueResource, RemoteQueuePointResource, RemoteTopicSpaceResource,
    StreamResource, TopicSpaceResource,
};
use std::sync::Arc;

/// Lifecycle methods every adapter forwards to its `core` field.
macro_rules! delegate_to_core {
    () => {
        fn kind(&self) -> $crate::control_plane::adapter::ResourceKind {
            self.core.kind()
        }

        fn identity(
            &self,
        ) -> $crate::error::ControlResult<&$crate::control_plane::adapter::AdapterIdentity> {
            self.core.identity("identity")
        }

        fn state(&self) -> $crate::control_plane::adapter::AdapterState {
            self.core.state()
        }

        fn activate(&self) -> bool {
            self.core.activate()
        }

        fn assert_valid(&self) -> $crate::error::ControlResult<()> {
            self.core.assert_valid("assert_valid")
        }

        fn dereference(&self) {
            self.core.dereference();
        }
    };
}

/// Registration hooks for adapters published to the management registry.
macro_rules! publish_to_registry {
    () => {
        fn register_as_management_object(
            &self,
            registry: &dyn $crate::control_plane::management::ManagementRegistry,
        ) -> $crate::error::ControlResult<()> {
            $crate::control_plane::management::register_adapter(registry, self)
        }

        fn deregister_management_object(
            &self,
            registry: &dyn $crate::control_plane::management::ManagementRegistry,
        ) {
            $crate::control_plane::management::deregister_adapter(
                registry,
                self.core.kind(),
                &self.core.captured_identity().id,
            );
        }
    };
}

/// Engine event forwarding for adapters that accept a listener.
macro_rules! forward_engine_events {
    () => {
        fn on_engine_event(&self, event: &$crate::control_plane::management::EngineEvent) {
            self.core.forward_event(event);
        }
    };
}

mod connection;
mod engine;
mod queue;
mod stream;
mod topic_space;

pub use connection::ConnectionControl;
pub use engine::EngineControl;
pub use queue::{QueueControl, RemoteQueuePointControl};
pub use stream::{StreamControl, StreamSetControl};
pub use topic_space::{RemotePeerControl, RemoteTopicSpaceControl, TopicSpaceControl};

pub type QueueCursor = ConvertingIterator<Arc<dyn QueueResource>>;
pub type RemoteQueuePointCursor = ConvertingIterator<Arc<dyn RemoteQueuePointResource>>;
pub type StreamCursor = ConvertingIterator<Arc<dyn StreamResource>>;
pub type TopicSpaceCursor = ConvertingIterator<Arc<dyn TopicSpaceResource>>;
pub type RemoteTopicSpaceCursor = ConvertingIterator<Arc<dyn RemoteTopicSpaceResource>>;
pub type ConnectionCursor = ConvertingIterator<Arc<dyn ConnectionResource>>;

/// Remote queue points of every destination on an engine.
pub type EngineRemoteQueuePointCursor = NestedIterator<
    QueueCursor,
    RemoteQueuePointCursor,
    fn(&Arc<QueueControl>) -> ControlResult<RemoteQueuePointCursor>,
>;

/// Streams of every remote queue point of one queue.
pub type QueueStreamCursor = NestedIterator<
    RemoteQueuePointCursor,
    StreamCursor,
    fn(&Arc<RemoteQueuePointControl>) -> ControlResult<StreamCursor>,
>;

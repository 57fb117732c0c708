//! Control-adapter lifecycle layer.
//!
//! Owns adapter identity, the `New -> Valid -> Dereferenced` state machine, the
//! explicit back-handle to the engine resource, and the collaborator seams used to
//! publish adapters and forward engine events. Adapters are created lazily by the
//! resource that owns them and are only ever dereferenced by that resource's teardown.
//!
//! ```
//! use broker_control::{
//!     AdapterCore, AdapterIdentity, AdapterSlot, AdapterState, ControlAdapter, ControlResult,
//!     ResourceKind,
//! };
//!
//! struct LinkControl {
//!     core: AdapterCore<&'static str>,
//! }
//!
//! impl ControlAdapter for LinkControl {
//!     fn kind(&self) -> ResourceKind { self.core.kind() }
//!     fn identity(&self) -> ControlResult<&AdapterIdentity> { self.core.identity("identity") }
//!     fn state(&self) -> AdapterState { self.core.state() }
//!     fn activate(&self) -> bool { self.core.activate() }
//!     fn assert_valid(&self) -> ControlResult<()> { self.core.assert_valid("assert_valid") }
//!     fn dereference(&self) { self.core.dereference(); }
//! }
//!
//! let slot = AdapterSlot::new();
//! let adapter = slot
//!     .get_or_create(|| {
//!         Some(LinkControl {
//!             core: AdapterCore::new(
//!                 ResourceKind::RemotePeer,
//!                 AdapterIdentity::new("link-1", "to-east"),
//!                 "link",
//!             ),
//!         })
//!     })
//!     .unwrap();
//! assert_eq!(adapter.name().unwrap(), "to-east");
//!
//! // Teardown belongs to the resource; afterwards accessors fail with NotFound.
//! slot.teardown();
//! assert!(adapter.name().is_err());
//! adapter.dereference();
//! ```

pub(crate) mod adapter;
pub(crate) mod adapter_slot;
pub(crate) mod lifecycle;
pub(crate) mod management;

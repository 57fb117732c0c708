//! Shared observability vocabulary.
//!
//! Library code emits `tracing` events using these names and field keys and never
//! installs a global subscriber. Binaries and tests own subscriber initialization.

pub mod events;
pub mod fields;

//! Canonical structured event names used across `broker-control`.

// Adapter lifecycle events.
pub const ADAPTER_CREATED: &str = "adapter_created";
pub const ADAPTER_ACTIVATED: &str = "adapter_activated";
pub const ADAPTER_DEREFERENCED: &str = "adapter_dereferenced";
pub const ADAPTER_DEREFERENCE_REPEATED: &str = "adapter_dereference_repeated";
pub const ADAPTER_ASSERT_VALID_FAILED: &str = "adapter_assert_valid_failed";
pub const ADAPTER_SLOT_CREATE_RACE_LOST: &str = "adapter_slot_create_race_lost";
pub const ADAPTER_SLOT_TEARDOWN: &str = "adapter_slot_teardown";

// Management registry and engine event forwarding.
pub const MANAGEMENT_REGISTER_OK: &str = "management_register_ok";
pub const MANAGEMENT_REGISTER_FAILED: &str = "management_register_failed";
pub const MANAGEMENT_DEREGISTER: &str = "management_deregister";
pub const ENGINE_EVENT_FORWARDED: &str = "engine_event_forwarded";
pub const ENGINE_EVENT_LISTENER_FAILED: &str = "engine_event_listener_failed";
pub const ENGINE_EVENT_DROPPED: &str = "engine_event_dropped";

// Cursor composition events.
pub const CURSOR_ELEMENT_SKIPPED: &str = "cursor_element_skipped";
pub const CURSOR_CONTAINER_SKIPPED: &str = "cursor_container_skipped";
pub const CURSOR_FINISHED: &str = "cursor_finished";
pub const LOOKUP_MISS: &str = "lookup_miss";

// Pairing events.
pub const PAIRING_SIDE_SET: &str = "pairing_side_set";
pub const PAIRING_SIDE_CLEARED: &str = "pairing_side_cleared";
pub const PAIRING_INCONSISTENT: &str = "pairing_inconsistent";

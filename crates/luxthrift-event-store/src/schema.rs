//! Table, column and constraint names shared by the PostgreSQL repositories.
//!
//! The DDL itself lives in the workspace `migrations/` directory.

/// Columns selected for an `ActivityRow`, in struct order.
pub const ACTIVITY_COLUMNS: &str =
    "sequence, event_id, user_id, guest_id, action, product_id, category, brand, metadata, occurred_at";

/// Columns selected for a `ProductRow`.
pub const PRODUCT_COLUMNS: &str = "id, name, brand, category, price, image";

/// Columns selected for a `UserRow`.
pub const USER_COLUMNS: &str = "id, name, email";

/// CHECK constraint restricting `action` to the tracked kinds.
pub const ACTION_CHECK_CONSTRAINT: &str = "activity_events_action_check";

/// CHECK constraint requiring exactly one of `user_id` / `guest_id`.
pub const SINGLE_ACTOR_CHECK_CONSTRAINT: &str = "activity_events_single_actor_check";

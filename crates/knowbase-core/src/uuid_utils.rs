//! UUID v7 utilities for time-ordered identifiers.
//!
//! Every entity id is a UUIDv7, so ids created later sort after earlier ones.
//! Listings use the id as a tie-breaker for rows sharing a `created_at`.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

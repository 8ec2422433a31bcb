//! HTTP handlers, one module per resource.

pub mod articles;
pub mod categories;
pub mod health;
pub mod tags;

use uuid::Uuid;

use crate::ApiError;

/// Parse an `{id}` path segment. Anything that is not a UUID cannot name a
/// row, so it answers 404 like a missing one.
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{} not found: {}", resource, raw)))
}

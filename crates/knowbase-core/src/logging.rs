//! Structured logging field names shared by every knowbase crate.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed on an infrastructure fault |
//! | WARN  | Recoverable issue, fallback applied (bad config value, rejected delete) |
//! | INFO  | Lifecycle events (startup, migrations), mutations |
//! | DEBUG | Queries and their result sizes |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID from the `x-request-id` header (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "service", "database"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "articles", "categories", "tags", "search", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list", "create", "update", "delete"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Article UUID being operated on.
pub const ARTICLE_ID: &str = "article_id";

/// Category UUID being operated on.
pub const CATEGORY_ID: &str = "category_id";

/// Tag UUID being operated on.
pub const TAG_ID: &str = "tag_id";

/// Article slug being looked up or generated.
pub const SLUG: &str = "slug";

/// Search query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of tag associations written for an article.
pub const TAG_COUNT: &str = "tag_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_distinct_snake_case() {
        let fields = [
            REQUEST_ID,
            SUBSYSTEM,
            COMPONENT,
            OPERATION,
            ARTICLE_ID,
            CATEGORY_ID,
            TAG_ID,
            SLUG,
            QUERY,
            DURATION_MS,
            RESULT_COUNT,
            TAG_COUNT,
            POOL_SIZE,
            POOL_IDLE,
            ERROR_MSG,
        ];
        let unique: HashSet<&str> = fields.iter().copied().collect();
        assert_eq!(unique.len(), fields.len());
        for field in fields {
            assert!(field
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}

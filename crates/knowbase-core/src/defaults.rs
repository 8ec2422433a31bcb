//! Centralized default constants for knowbase.
//!
//! Column bounds here must agree with the migration in `migrations/`.

// =============================================================================
// COLUMN BOUNDS
// =============================================================================

/// Maximum article title length (characters).
pub const ARTICLE_TITLE_MAX_LEN: usize = 500;

/// Maximum article slug length, suffix included.
pub const ARTICLE_SLUG_MAX_LEN: usize = 500;

/// Maximum length of the optional article creator identifier.
pub const ARTICLE_CREATED_BY_MAX_LEN: usize = 100;

/// Maximum category name and slug length.
pub const CATEGORY_NAME_MAX_LEN: usize = 200;

/// Maximum tag name and slug length.
pub const TAG_NAME_MAX_LEN: usize = 100;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page number for article listing (1-based).
pub const PAGE: i64 = 1;

/// Default page size for article listing.
pub const PAGE_SIZE: i64 = 20;

/// Largest page size the HTTP layer accepts.
pub const PAGE_SIZE_MAX: i64 = 100;

/// Default result count for full-text search.
pub const SEARCH_LIMIT: i64 = 20;

// =============================================================================
// SERVER
// =============================================================================

/// Default database URL when `DATABASE_URL` is unset.
pub const DATABASE_URL: &str = "postgres://localhost/knowbase";

/// Default bind host.
pub const HOST: &str = "0.0.0.0";

/// Default bind port.
pub const PORT: u16 = 5000;

/// Default CORS origin (the Next.js dev server).
pub const ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Request body limit in bytes.
pub const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

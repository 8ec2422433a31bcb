//! Error types for knowbase.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using knowbase's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for knowbase operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Article not found: {0}")]
    ArticleNotFound(Uuid),

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Tag not found: {0}")]
    TagNotFound(Uuid),

    /// A referenced category or tag does not exist
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A unique column (slug) already holds the value
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Category still has child categories and cannot be deleted
    #[error("Category {0} has child categories")]
    CategoryHasChildren(Uuid),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

//! # knowbase-core
//!
//! Core types, traits, and abstractions for the knowbase knowledge base.
//!
//! This crate provides the article/category/tag data model, the repository
//! traits the database layer implements, the shared error type, and the slug
//! algorithm.

pub mod defaults;
pub mod error;
pub mod logging;
#[cfg(any(test, feature = "mock"))]
pub mod memory;
pub mod models;
pub mod slug;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use slug::{base_slug, generate_slug};
pub use traits::*;
pub use uuid_utils::new_v7;

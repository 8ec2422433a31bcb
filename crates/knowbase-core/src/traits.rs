//! Core traits for knowbase abstractions.
//!
//! These traits define the data-access interfaces. `knowbase-db` implements
//! them on PostgreSQL; the `mock` feature provides in-memory versions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// ARTICLE REPOSITORY
// =============================================================================

/// Repository for articles and their tag associations.
///
/// Every read returns the flattened view: the row, its category name and its
/// full tag list.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// List articles newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ArticleView>>;

    /// Fetch an article by id.
    async fn fetch(&self, id: Uuid) -> Result<Option<ArticleView>>;

    /// Fetch an article by slug.
    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<ArticleView>>;

    /// Insert the article row and one association per distinct tag id,
    /// atomically.
    async fn insert(&self, article: NewArticle, tag_ids: &[Uuid]) -> Result<()>;

    /// Overwrite the article and replace its tag set, atomically.
    ///
    /// Returns `false` when no article has this id.
    async fn update(&self, id: Uuid, changes: ArticleChanges, tag_ids: &[Uuid]) -> Result<bool>;

    /// Delete an article; associations cascade.
    ///
    /// Returns `false` when no article has this id.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// CATEGORY REPOSITORY
// =============================================================================

/// Repository for the category tree.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List all categories ordered by name.
    async fn list(&self) -> Result<Vec<Category>>;

    /// Get a category by id.
    async fn get(&self, id: Uuid) -> Result<Option<Category>>;

    /// Create a category.
    async fn create(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Category>;

    /// Delete a category, detaching its articles.
    ///
    /// Fails with `Error::CategoryHasChildren` when child categories exist.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// TAG REPOSITORY
// =============================================================================

/// Repository for tags.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List all tags ordered by name.
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Get a tag by id.
    async fn get(&self, id: Uuid) -> Result<Option<Tag>>;

    /// Create a tag.
    async fn create(&self, name: &str, slug: &str) -> Result<Tag>;

    /// Delete a tag; its article associations cascade.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// SEARCH
// =============================================================================

/// Full-text search over articles.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Articles matching `query`, best match first.
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<ArticleView>>;
}

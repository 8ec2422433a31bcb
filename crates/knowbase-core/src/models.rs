//! Domain models and request/response types.
//!
//! Wire types serialize in camelCase, which is what the frontends expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// ARTICLES
// =============================================================================

/// A persisted article row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

/// Flattened article: row fields plus category name and tag list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub tags: Vec<Tag>,
}

impl ArticleView {
    /// Combine a row with its eagerly loaded relations.
    pub fn from_parts(article: Article, category_name: Option<String>, tags: Vec<Tag>) -> Self {
        Self {
            id: article.id,
            title: article.title,
            slug: article.slug,
            content: article.content,
            category_id: article.category_id,
            category_name,
            created_at: article.created_at,
            updated_at: article.updated_at,
            created_by: article.created_by,
            tags,
        }
    }
}

/// Body of `POST /api/articles`.
///
/// Missing strings deserialize as empty so validation can name the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

/// Body of `PUT /api/articles/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

/// A fully prepared article row for insertion.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category_id: Option<Uuid>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Column values overwritten by an article update.
#[derive(Debug, Clone)]
pub struct ArticleChanges {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// CATEGORIES
// =============================================================================

/// A category node. `parent_id` links categories into a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

/// Body of `POST /api/categories`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
    /// Derived from `name` when omitted.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

// =============================================================================
// TAGS
// =============================================================================

/// A tag. Also the element type of `ArticleView::tags`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Body of `POST /api/tags`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    #[serde(default)]
    pub name: String,
    /// Derived from `name` when omitted.
    #[serde(default)]
    pub slug: Option<String>,
}

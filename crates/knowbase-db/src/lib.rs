//! # knowbase-db
//!
//! PostgreSQL database layer for the knowbase knowledge base.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for articles, categories and tags
//! - Full-text search over the generated `article.search_vector` column
//!
//! ## Example
//!
//! ```rust,ignore
//! use knowbase_db::{Database, PoolConfig, TagRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect_with_config("postgres://localhost/knowbase", PoolConfig::new())
//!         .await?;
//!     let tag = db.tags.create("Rust", "rust").await?;
//!     println!("Created tag: {}", tag.id);
//!     Ok(())
//! }
//! ```
pub mod articles;
pub mod categories;
pub mod pool;
pub mod search;
pub mod tags;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use knowbase_core::*;

pub use articles::PgArticleRepository;
pub use categories::PgCategoryRepository;
pub use pool::{create_pool_with_config, log_pool_metrics, PoolConfig};
pub use search::PgArticleSearch;
pub use tags::PgTagRepository;

/// Translate a failed write into a domain error.
///
/// Foreign-key violations become [`Error::InvalidReference`] and unique
/// violations become [`Error::Conflict`]; everything else stays a database
/// error.
pub(crate) fn map_write_error(err: sqlx::Error) -> Error {
    let Some(db_err) = err.as_database_error() else {
        return Error::Database(err);
    };
    let constraint = db_err.constraint().unwrap_or_default().to_string();

    if db_err.is_foreign_key_violation() {
        return Error::InvalidReference(describe_reference(&constraint));
    }
    if db_err.is_unique_violation() {
        return Error::Conflict(describe_unique(&constraint));
    }
    Error::Database(err)
}

fn describe_reference(constraint: &str) -> String {
    match constraint {
        "article_category_id_fkey" => "category does not exist".to_string(),
        "article_tag_tag_id_fkey" => "tag does not exist".to_string(),
        "article_tag_article_id_fkey" => "article does not exist".to_string(),
        "category_parent_id_fkey" => "parent category does not exist".to_string(),
        other => format!("referenced row does not exist ({})", other),
    }
}

fn describe_unique(constraint: &str) -> String {
    match constraint {
        "idx_article_slug" => "article slug already exists".to_string(),
        "idx_category_slug" => "category slug already exists".to_string(),
        "idx_tag_slug" => "tag slug already exists".to_string(),
        other => format!("duplicate value ({})", other),
    }
}

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Articles and their tag associations.
    pub articles: PgArticleRepository,
    /// Category tree.
    pub categories: PgCategoryRepository,
    /// Tags.
    pub tags: PgTagRepository,
    /// Full-text search provider.
    pub search: PgArticleSearch,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            articles: PgArticleRepository::new(pool.clone()),
            categories: PgCategoryRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            search: PgArticleSearch::new(pool.clone()),
            pool,
        }
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }
}

//! Full-text search implementation.
//!
//! Queries the generated `article.search_vector` column (English
//! configuration over title and content) through its GIN index.
//! `websearch_to_tsquery()` accepts quoted phrases, `or` and `-term`.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use knowbase_core::{ArticleView, Error, Result, SearchProvider};

use crate::articles::{attach_tags, select_sql};

/// Full-text search provider using PostgreSQL tsvector.
#[derive(Clone)]
pub struct PgArticleSearch {
    pool: Pool<Postgres>,
}

impl PgArticleSearch {
    /// Create a new PgArticleSearch with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchProvider for PgArticleSearch {
    /// Rank matches with `ts_rank`; ties go to the most recently updated.
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<ArticleView>> {
        let sql = select_sql(
            "WHERE a.search_vector @@ websearch_to_tsquery('english', $1)
             ORDER BY ts_rank(a.search_vector, websearch_to_tsquery('english', $1)) DESC,
                      a.updated_at DESC, a.id DESC
             LIMIT $2",
        );

        let rows = sqlx::query(&sql)
            .bind(query)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "search",
            op = "fts",
            query = %query,
            limit,
            result_count = rows.len(),
            "Full-text search completed"
        );
        attach_tags(&self.pool, rows).await
    }
}

//! Tag repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;

use knowbase_core::{new_v7, Error, Result, Tag, TagRepository};

use crate::map_write_error;

/// PostgreSQL implementation of TagRepository.
#[derive(Clone)]
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list(&self) -> Result<Vec<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tag ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tag WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn create(&self, name: &str, slug: &str) -> Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tag (id, name, slug) VALUES ($1, $2, $3) RETURNING id, name, slug",
        )
        .bind(new_v7())
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        info!(
            subsystem = "database",
            component = "tags",
            op = "create",
            tag_id = %tag.id,
            slug = %tag.slug,
            "Created tag"
        );
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        // article_tag rows cascade
        let result = sqlx::query("DELETE FROM tag WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

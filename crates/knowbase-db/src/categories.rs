//! Category repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};
use uuid::Uuid;

use knowbase_core::{new_v7, Category, CategoryRepository, Error, Result};

use crate::map_write_error;

/// PostgreSQL implementation of CategoryRepository.
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, parent_id FROM category ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "categories",
            op = "list",
            result_count = categories.len(),
            "Listed categories"
        );
        Ok(categories)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, parent_id FROM category WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn create(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Category> {
        if let Some(pid) = parent_id {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM category WHERE id = $1)")
                    .bind(pid)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(Error::Database)?;
            if !exists {
                return Err(Error::InvalidReference(format!(
                    "parent category {} does not exist",
                    pid
                )));
            }
        }

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO category (id, name, slug, description, parent_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, slug, description, parent_id",
        )
        .bind(new_v7())
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        info!(
            subsystem = "database",
            component = "categories",
            op = "create",
            category_id = %category.id,
            slug = %category.slug,
            "Created category"
        );
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let has_children: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM category WHERE parent_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(Error::Database)?;
        if has_children {
            return Err(Error::CategoryHasChildren(id));
        }

        // article.category_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match map_write_error(e) {
                // a child inserted concurrently trips the RESTRICT constraint
                Error::InvalidReference(_) => Error::CategoryHasChildren(id),
                other => other,
            })?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

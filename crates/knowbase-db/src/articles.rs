//! Article repository implementation.
//!
//! Reads load every relation in two round trips: one query for the article
//! rows joined to their category, then one batched query for the tags of all
//! returned articles.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::debug;
use uuid::Uuid;

use knowbase_core::{
    Article, ArticleChanges, ArticleRepository, ArticleView, Error, NewArticle, Result, Tag,
};

use crate::map_write_error;

/// Columns selected for every article read. Expects `article a LEFT JOIN category c`.
pub(crate) const ARTICLE_COLUMNS: &str = "a.id, a.title, a.slug, a.content, a.category_id, \
     a.created_at, a.updated_at, a.created_by, c.name AS category_name";

/// PostgreSQL implementation of ArticleRepository.
#[derive(Clone)]
pub struct PgArticleRepository {
    pool: Pool<Postgres>,
}

impl PgArticleRepository {
    /// Create a new PgArticleRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Article select with the category join, followed by `clause`.
pub(crate) fn select_sql(clause: &str) -> String {
    format!(
        "SELECT {} FROM article a LEFT JOIN category c ON c.id = a.category_id {}",
        ARTICLE_COLUMNS, clause
    )
}

/// Map a row selected with [`ARTICLE_COLUMNS`].
fn article_from_row(row: &PgRow) -> (Article, Option<String>) {
    let article = Article {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        category_id: row.get("category_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        created_by: row.get("created_by"),
    };
    (article, row.get("category_name"))
}

/// Turn article rows into views, loading all their tags in one query.
///
/// Preserves the order of `rows`. Tags within an article are ordered by name.
pub(crate) async fn attach_tags(pool: &Pool<Postgres>, rows: Vec<PgRow>) -> Result<Vec<ArticleView>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let parts: Vec<(Article, Option<String>)> = rows.iter().map(article_from_row).collect();
    let ids: Vec<Uuid> = parts.iter().map(|(a, _)| a.id).collect();

    let tag_rows = sqlx::query(
        r#"
        SELECT at.article_id, t.id, t.name, t.slug
        FROM article_tag at
        JOIN tag t ON t.id = at.tag_id
        WHERE at.article_id = ANY($1)
        ORDER BY t.name, t.id
        "#,
    )
    .bind(&ids[..])
    .fetch_all(pool)
    .await
    .map_err(Error::Database)?;

    let mut by_article: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in tag_rows {
        by_article
            .entry(row.get("article_id"))
            .or_default()
            .push(Tag {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
            });
    }

    Ok(parts
        .into_iter()
        .map(|(article, category_name)| {
            let tags = by_article.remove(&article.id).unwrap_or_default();
            ArticleView::from_parts(article, category_name, tags)
        })
        .collect())
}

/// Reject unknown category or tag ids with a message naming the first one.
async fn check_references(
    tx: &mut Transaction<'_, Postgres>,
    category_id: Option<Uuid>,
    tag_ids: &[Uuid],
) -> Result<()> {
    if let Some(id) = category_id {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM category WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut **tx)
            .await
            .map_err(Error::Database)?;
        if !exists {
            return Err(Error::InvalidReference(format!(
                "category {} does not exist",
                id
            )));
        }
    }

    if !tag_ids.is_empty() {
        let missing: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT ids.id
            FROM unnest($1::uuid[]) WITH ORDINALITY AS ids(id, ord)
            WHERE NOT EXISTS (SELECT 1 FROM tag WHERE tag.id = ids.id)
            ORDER BY ids.ord
            LIMIT 1
            "#,
        )
        .bind(tag_ids)
        .fetch_optional(&mut **tx)
        .await
        .map_err(Error::Database)?;
        if let Some(id) = missing {
            return Err(Error::InvalidReference(format!("tag {} does not exist", id)));
        }
    }
    Ok(())
}

/// Associate `tag_ids` with the article. Duplicates collapse to one row.
async fn insert_tags(
    tx: &mut Transaction<'_, Postgres>,
    article_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO article_tag (article_id, tag_id)
         SELECT $1, unnest($2::uuid[])
         ON CONFLICT DO NOTHING",
    )
    .bind(article_id)
    .bind(tag_ids)
    .execute(&mut **tx)
    .await
    .map_err(map_write_error)?;
    Ok(())
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ArticleView>> {
        let sql = select_sql("ORDER BY a.created_at DESC, a.id DESC LIMIT $1 OFFSET $2");
        let rows = sqlx::query(&sql)
            .bind(limit.max(0))
            .bind(offset.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "articles",
            op = "list",
            limit,
            offset,
            result_count = rows.len(),
            "Listed articles"
        );
        attach_tags(&self.pool, rows).await
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<ArticleView>> {
        let row = sqlx::query(&select_sql("WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        match row {
            Some(row) => Ok(attach_tags(&self.pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<ArticleView>> {
        let row = sqlx::query(&select_sql("WHERE a.slug = $1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        match row {
            Some(row) => Ok(attach_tags(&self.pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn insert(&self, article: NewArticle, tag_ids: &[Uuid]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        check_references(&mut tx, article.category_id, tag_ids).await?;

        sqlx::query(
            "INSERT INTO article (id, title, slug, content, category_id, created_at, updated_at, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $6, $7)",
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.content)
        .bind(article.category_id)
        .bind(article.created_at)
        .bind(&article.created_by)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        insert_tags(&mut tx, article.id, tag_ids).await?;
        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "articles",
            op = "insert",
            article_id = %article.id,
            slug = %article.slug,
            tag_count = tag_ids.len(),
            "Inserted article"
        );
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: ArticleChanges, tag_ids: &[Uuid]) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM article WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Error::Database)?;
        if locked.is_none() {
            return Ok(false);
        }
        check_references(&mut tx, changes.category_id, tag_ids).await?;

        sqlx::query(
            "UPDATE article
             SET title = $2, slug = $3, content = $4, category_id = $5, updated_at = $6
             WHERE id = $1",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.slug)
        .bind(&changes.content)
        .bind(changes.category_id)
        .bind(changes.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        sqlx::query("DELETE FROM article_tag WHERE article_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        insert_tags(&mut tx, id, tag_ids).await?;

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "articles",
            op = "update",
            article_id = %id,
            tag_count = tag_ids.len(),
            "Updated article"
        );
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM article WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

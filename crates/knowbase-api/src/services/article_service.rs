//! Article aggregate operations.
//!
//! The service owns everything the repository should not decide: id and
//! slug generation, timestamps, tag id de-duplication and re-reading the
//! stored aggregate after a write.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use knowbase_core::{
    generate_slug, new_v7, ArticleChanges, ArticleRepository, ArticleView, CreateArticleRequest,
    Error, NewArticle, Result, UpdateArticleRequest,
};

/// Query and mutation boundary for articles.
#[derive(Clone)]
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
}

/// Distinct ids in first-seen order.
fn distinct(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    /// Page `page` (1-based) of `page_size` articles, newest first.
    pub async fn list(&self, page: i64, page_size: i64) -> Result<Vec<ArticleView>> {
        let offset = page.saturating_sub(1).max(0).saturating_mul(page_size);
        self.repo.list(page_size, offset).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<ArticleView>> {
        self.repo.fetch(id).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<ArticleView>> {
        self.repo.fetch_by_slug(slug).await
    }

    /// Create an article and return it as stored.
    ///
    /// # Errors
    ///
    /// `Error::InvalidReference` when the category or any tag does not exist.
    pub async fn create(&self, req: CreateArticleRequest) -> Result<ArticleView> {
        let start = Instant::now();
        let id = new_v7();
        let tag_ids = distinct(&req.tag_ids);
        let article = NewArticle {
            id,
            slug: generate_slug(&req.title),
            title: req.title,
            content: req.content,
            category_id: req.category_id,
            created_by: req.created_by,
            created_at: Utc::now(),
        };
        let slug = article.slug.clone();

        self.repo.insert(article, &tag_ids).await?;

        info!(
            subsystem = "service",
            component = "articles",
            op = "create",
            article_id = %id,
            slug = %slug,
            tag_count = tag_ids.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Article created"
        );
        self.reread(id).await
    }

    /// Overwrite an article and replace its tags.
    ///
    /// Returns `Ok(None)` when no article has this id.
    pub async fn update(&self, id: Uuid, req: UpdateArticleRequest) -> Result<Option<ArticleView>> {
        let start = Instant::now();
        let tag_ids = distinct(&req.tag_ids);
        let changes = ArticleChanges {
            slug: generate_slug(&req.title),
            title: req.title,
            content: req.content,
            category_id: req.category_id,
            updated_at: Utc::now(),
        };

        if !self.repo.update(id, changes, &tag_ids).await? {
            debug!(
                subsystem = "service",
                component = "articles",
                op = "update",
                article_id = %id,
                "Article not found"
            );
            return Ok(None);
        }

        info!(
            subsystem = "service",
            component = "articles",
            op = "update",
            article_id = %id,
            tag_count = tag_ids.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Article updated"
        );
        self.reread(id).await.map(Some)
    }

    /// Delete an article. Returns `false` when it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            info!(
                subsystem = "service",
                component = "articles",
                op = "delete",
                article_id = %id,
                "Article deleted"
            );
        }
        Ok(deleted)
    }

    async fn reread(&self, id: Uuid) -> Result<ArticleView> {
        self.repo
            .fetch(id)
            .await?
            .ok_or_else(|| Error::Internal(format!("article {} missing after write", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knowbase_core::memory::MemoryStore;
    use knowbase_core::{CategoryRepository, TagRepository};

    fn service(store: &MemoryStore) -> ArticleService {
        ArticleService::new(Arc::new(store.clone()))
    }

    fn create_req(title: &str, tag_ids: Vec<Uuid>) -> CreateArticleRequest {
        CreateArticleRequest {
            title: title.to_string(),
            content: "Body".to_string(),
            tag_ids,
            ..Default::default()
        }
    }

    #[test]
    fn test_distinct_keeps_first_seen_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        assert_eq!(distinct(&[b, a, b, c, a]), vec![b, a, c]);
        assert!(distinct(&[]).is_empty());
    }

    #[test]
    fn test_distinct_large_duplicate_heavy_list() {
        let pool: Vec<Uuid> = (0..50).map(|_| Uuid::new_v4()).collect();
        let mut ids: Vec<Uuid> = (0..50_000).map(|i| pool[i % pool.len()]).collect();
        ids.extend((0..50_000).map(|_| Uuid::new_v4()));

        let start = Instant::now();
        let unique = distinct(&ids);
        assert!(start.elapsed() < std::time::Duration::from_secs(2));

        assert_eq!(unique.len(), 50 + 50_000);
        assert_eq!(&unique[..50], &pool[..]);
        assert_eq!(unique[50], ids[50_000]);
    }

    #[tokio::test]
    async fn test_create_returns_distinct_tags_and_slug() {
        let store = MemoryStore::new();
        let rust = TagRepository::create(&store, "Rust", "rust").await.unwrap();
        let web = TagRepository::create(&store, "Web", "web").await.unwrap();
        let svc = service(&store);

        let view = svc
            .create(create_req("Hello, World!", vec![rust.id, web.id, rust.id]))
            .await
            .unwrap();

        assert_eq!(view.tags.len(), 2);
        assert!(view.slug.starts_with("hello-world-"));
        let suffix = view.slug.trim_start_matches("hello-world-");
        assert!(!suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(view.created_at, view.updated_at);
        assert_eq!(store.association_count().await, 2);

        let fetched = svc.get_by_id(view.id).await.unwrap().unwrap();
        assert_eq!(fetched, view);
        let by_slug = svc.get_by_slug(&view.slug).await.unwrap().unwrap();
        assert_eq!(by_slug.id, view.id);
    }

    #[tokio::test]
    async fn test_same_title_gets_distinct_slugs() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let a = svc.create(create_req("Same", vec![])).await.unwrap();
        let b = svc.create(create_req("Same", vec![])).await.unwrap();
        assert_ne!(a.slug, b.slug);
    }

    #[tokio::test]
    async fn test_create_with_unknown_tag_writes_nothing() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let err = svc
            .create(create_req("Orphan", vec![Uuid::new_v4()]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReference(_)));
        assert_eq!(store.article_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_with_category_sets_name() {
        let store = MemoryStore::new();
        let category = CategoryRepository::create(&store, "Guides", "guides", None, None)
            .await
            .unwrap();
        let svc = service(&store);
        let mut req = create_req("Filed", vec![]);
        req.category_id = Some(category.id);

        let view = svc.create(req).await.unwrap();
        assert_eq!(view.category_id, Some(category.id));
        assert_eq!(view.category_name.as_deref(), Some("Guides"));
    }

    #[tokio::test]
    async fn test_update_replaces_tags_and_slug() {
        let store = MemoryStore::new();
        let rust = TagRepository::create(&store, "Rust", "rust").await.unwrap();
        let svc = service(&store);
        let created = svc.create(create_req("Before", vec![rust.id])).await.unwrap();

        let updated = svc
            .update(
                created.id,
                UpdateArticleRequest {
                    title: "After".to_string(),
                    content: "New body".to_string(),
                    category_id: None,
                    tag_ids: vec![],
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert!(updated.tags.is_empty());
        assert!(updated.slug.starts_with("after-"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.association_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let result = svc
            .update(
                Uuid::new_v4(),
                UpdateArticleRequest {
                    title: "x".to_string(),
                    content: "y".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let created = svc.create(create_req("Doomed", vec![])).await.unwrap();

        assert!(svc.delete(created.id).await.unwrap());
        assert!(!svc.delete(created.id).await.unwrap());
        assert!(svc.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let mut ids = Vec::new();
        for i in 0..25 {
            ids.push(svc.create(create_req(&format!("Article {}", i), vec![])).await.unwrap().id);
        }

        let page2 = svc.list(2, 10).await.unwrap();
        let expected: Vec<Uuid> = ids.iter().rev().skip(10).take(10).copied().collect();
        let got: Vec<Uuid> = page2.iter().map(|a| a.id).collect();
        assert_eq!(got, expected);

        assert_eq!(svc.list(3, 10).await.unwrap().len(), 5);
        assert!(svc.list(4, 10).await.unwrap().is_empty());
    }
}

//! In-memory repositories for deterministic testing.
//!
//! [`MemoryStore`] implements every repository trait over plain maps and
//! enforces the same referential rules as the PostgreSQL schema: unknown
//! category/tag ids are rejected, slugs are unique, categories with children
//! cannot be deleted, deleting a category detaches its articles, and deleting
//! an article or tag drops its associations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use knowbase_core::memory::MemoryStore;
//! use knowbase_core::TagRepository;
//!
//! let store = MemoryStore::new();
//! let tag = TagRepository::create(&store, "Rust", "rust").await?;
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::*;
use crate::uuid_utils::new_v7;

#[derive(Debug, Default)]
struct State {
    articles: BTreeMap<Uuid, Article>,
    categories: BTreeMap<Uuid, Category>,
    tags: BTreeMap<Uuid, Tag>,
    /// (article_id, tag_id)
    article_tags: BTreeSet<(Uuid, Uuid)>,
}

impl State {
    fn view(&self, article: &Article) -> ArticleView {
        let category_name = article
            .category_id
            .and_then(|id| self.categories.get(&id))
            .map(|c| c.name.clone());

        let mut tags: Vec<Tag> = self
            .article_tags
            .range((article.id, Uuid::nil())..=(article.id, Uuid::max()))
            .filter_map(|(_, tag_id)| self.tags.get(tag_id).cloned())
            .collect();
        tags.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));

        ArticleView::from_parts(article.clone(), category_name, tags)
    }

    fn check_references(&self, category_id: Option<Uuid>, tag_ids: &[Uuid]) -> Result<()> {
        if let Some(id) = category_id {
            if !self.categories.contains_key(&id) {
                return Err(Error::InvalidReference(format!(
                    "category {} does not exist",
                    id
                )));
            }
        }
        if let Some(missing) = tag_ids.iter().find(|id| !self.tags.contains_key(id)) {
            return Err(Error::InvalidReference(format!(
                "tag {} does not exist",
                missing
            )));
        }
        Ok(())
    }

    fn replace_tags(&mut self, article_id: Uuid, tag_ids: &[Uuid]) {
        self.article_tags.retain(|(a, _)| *a != article_id);
        for tag_id in tag_ids {
            self.article_tags.insert((article_id, *tag_id));
        }
    }
}

/// Shared in-memory store. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of article rows.
    pub async fn article_count(&self) -> usize {
        self.state.read().await.articles.len()
    }

    /// Number of article-tag association rows.
    pub async fn association_count(&self) -> usize {
        self.state.read().await.article_tags.len()
    }
}

#[async_trait]
impl ArticleRepository for MemoryStore {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ArticleView>> {
        let state = self.state.read().await;
        let mut articles: Vec<&Article> = state.articles.values().collect();
        articles.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(articles
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|a| state.view(a))
            .collect())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<ArticleView>> {
        let state = self.state.read().await;
        Ok(state.articles.get(&id).map(|a| state.view(a)))
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<ArticleView>> {
        let state = self.state.read().await;
        Ok(state
            .articles
            .values()
            .find(|a| a.slug == slug)
            .map(|a| state.view(a)))
    }

    async fn insert(&self, article: NewArticle, tag_ids: &[Uuid]) -> Result<()> {
        let mut state = self.state.write().await;
        state.check_references(article.category_id, tag_ids)?;
        if state.articles.values().any(|a| a.slug == article.slug) {
            return Err(Error::Conflict(format!(
                "article slug '{}' already exists",
                article.slug
            )));
        }

        let row = Article {
            id: article.id,
            title: article.title,
            slug: article.slug,
            content: article.content,
            category_id: article.category_id,
            created_at: article.created_at,
            updated_at: article.created_at,
            created_by: article.created_by,
        };
        state.articles.insert(row.id, row);
        state.replace_tags(article.id, tag_ids);
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: ArticleChanges, tag_ids: &[Uuid]) -> Result<bool> {
        let mut state = self.state.write().await;
        if !state.articles.contains_key(&id) {
            return Ok(false);
        }
        state.check_references(changes.category_id, tag_ids)?;
        if state
            .articles
            .values()
            .any(|a| a.id != id && a.slug == changes.slug)
        {
            return Err(Error::Conflict(format!(
                "article slug '{}' already exists",
                changes.slug
            )));
        }

        if let Some(row) = state.articles.get_mut(&id) {
            row.title = changes.title;
            row.slug = changes.slug;
            row.content = changes.content;
            row.category_id = changes.category_id;
            row.updated_at = changes.updated_at;
        }
        state.replace_tags(id, tag_ids);
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.articles.remove(&id).is_none() {
            return Ok(false);
        }
        state.article_tags.retain(|(a, _)| *a != id);
        Ok(true)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(categories)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn create(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Category> {
        let mut state = self.state.write().await;
        if let Some(pid) = parent_id {
            if !state.categories.contains_key(&pid) {
                return Err(Error::InvalidReference(format!(
                    "parent category {} does not exist",
                    pid
                )));
            }
        }
        if state.categories.values().any(|c| c.slug == slug) {
            return Err(Error::Conflict(format!(
                "category slug '{}' already exists",
                slug
            )));
        }

        let category = Category {
            id: new_v7(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: description.map(String::from),
            parent_id,
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&id) {
            return Ok(false);
        }
        if state.categories.values().any(|c| c.parent_id == Some(id)) {
            return Err(Error::CategoryHasChildren(id));
        }

        for article in state.articles.values_mut() {
            if article.category_id == Some(id) {
                article.category_id = None;
            }
        }
        state.categories.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Tag>> {
        let state = self.state.read().await;
        let mut tags: Vec<Tag> = state.tags.values().cloned().collect();
        tags.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(tags)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Tag>> {
        Ok(self.state.read().await.tags.get(&id).cloned())
    }

    async fn create(&self, name: &str, slug: &str) -> Result<Tag> {
        let mut state = self.state.write().await;
        if state.tags.values().any(|t| t.slug == slug) {
            return Err(Error::Conflict(format!("tag slug '{}' already exists", slug)));
        }

        let tag = Tag {
            id: new_v7(),
            name: name.to_string(),
            slug: slug.to_string(),
        };
        state.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.tags.remove(&id).is_none() {
            return Ok(false);
        }
        state.article_tags.retain(|(_, t)| *t != id);
        Ok(true)
    }
}

#[async_trait]
impl SearchProvider for MemoryStore {
    /// Case-insensitive match of every whitespace-separated term against
    /// title or content, most recently updated first.
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<ArticleView>> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let state = self.state.read().await;
        let mut hits: Vec<&Article> = state
            .articles
            .values()
            .filter(|a| {
                let haystack = format!("{} {}", a.title, a.content).to_lowercase();
                terms.iter().all(|t| haystack.contains(t.as_str()))
            })
            .collect();
        hits.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));

        Ok(hits
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|a| state.view(a))
            .collect())
    }
}

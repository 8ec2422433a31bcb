//! Repository behavior against a real PostgreSQL server.
//!
//! Run with `cargo test -p knowbase-db -- --ignored` once the test database
//! on port 15432 is up (or `DATABASE_URL` points elsewhere).

use chrono::{Duration, Utc};
use knowbase_db::test_fixtures::{seed_search_corpus, TestDataBuilder, TestDatabase};
use knowbase_db::{
    generate_slug, new_v7, ArticleChanges, ArticleRepository, CategoryRepository, Error,
    NewArticle, SearchProvider, TagRepository,
};
use uuid::Uuid;

/// Test schema on the database named by `DATABASE_URL`, read from `.env` when present.
async fn test_db() -> TestDatabase {
    dotenvy::dotenv().ok();
    TestDatabase::new().await
}

fn new_article(title: &str, category_id: Option<Uuid>) -> NewArticle {
    NewArticle {
        id: new_v7(),
        title: title.to_string(),
        slug: generate_slug(title),
        content: format!("Content for {}", title),
        category_id,
        created_by: Some("tester".to_string()),
        created_at: Utc::now(),
    }
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_insert_and_fetch_eager_loads_relations() {
    let test_db = test_db().await;
    let db = &test_db.db;

    let category = CategoryRepository::create(&db.categories, "Guides", "guides", None, None)
        .await
        .unwrap();
    let rust = TagRepository::create(&db.tags, "Rust", "rust").await.unwrap();
    let async_tag = TagRepository::create(&db.tags, "Async", "async").await.unwrap();

    let article = new_article("Tokio basics", Some(category.id));
    let id = article.id;
    let slug = article.slug.clone();
    ArticleRepository::insert(&db.articles, article, &[rust.id, async_tag.id, rust.id])
        .await
        .unwrap();

    let view = db.articles.fetch(id).await.unwrap().expect("article exists");
    assert_eq!(view.category_name.as_deref(), Some("Guides"));
    assert_eq!(view.created_at, view.updated_at);
    let names: Vec<&str> = view.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Async", "Rust"]);

    let by_slug = db.articles.fetch_by_slug(&slug).await.unwrap().unwrap();
    assert_eq!(by_slug.id, id);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_list_is_newest_first_and_paged() {
    let test_db = test_db().await;
    let db = &test_db.db;

    let base = Utc::now();
    for i in 0..5 {
        let mut article = new_article(&format!("Article {}", i), None);
        article.created_at = base + Duration::seconds(i);
        ArticleRepository::insert(&db.articles, article, &[]).await.unwrap();
    }

    let first = ArticleRepository::list(&db.articles, 2, 0).await.unwrap();
    let titles: Vec<&str> = first.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Article 4", "Article 3"]);

    let last = ArticleRepository::list(&db.articles, 2, 4).await.unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].title, "Article 0");

    let past_end = ArticleRepository::list(&db.articles, 2, 10).await.unwrap();
    assert!(past_end.is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_unknown_tag_rejected_without_partial_write() {
    let test_db = test_db().await;
    let db = &test_db.db;

    let article = new_article("Orphan", None);
    let id = article.id;
    let missing = Uuid::new_v4();
    let err = ArticleRepository::insert(&db.articles, article, &[missing])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReference(msg) if msg.contains(&missing.to_string())));
    assert!(db.articles.fetch(id).await.unwrap().is_none());

    let err = ArticleRepository::insert(&db.articles, new_article("Lost", Some(Uuid::new_v4())), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReference(_)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_duplicate_article_slug_conflicts() {
    let test_db = test_db().await;
    let db = &test_db.db;

    let first = new_article("Same", None);
    let mut second = new_article("Same", None);
    second.slug = first.slug.clone();

    ArticleRepository::insert(&db.articles, first, &[]).await.unwrap();
    let err = ArticleRepository::insert(&db.articles, second, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_update_replaces_tags_and_keeps_created_at() {
    let test_db = test_db().await;
    let db = &test_db.db;
    let data = TestDataBuilder::new(db)
        .with_tag("Old")
        .await
        .with_article("Before", "Original body")
        .await
        .build();
    let id = data.articles[0];
    let before = db.articles.fetch(id).await.unwrap().unwrap();

    let new_tag = TagRepository::create(&db.tags, "New", "new").await.unwrap();
    let changes = ArticleChanges {
        title: "After".to_string(),
        slug: generate_slug("After"),
        content: "Rewritten".to_string(),
        category_id: None,
        updated_at: before.updated_at + Duration::seconds(5),
    };
    let updated = ArticleRepository::update(&db.articles, id, changes, &[new_tag.id])
        .await
        .unwrap();
    assert!(updated);

    let after = db.articles.fetch(id).await.unwrap().unwrap();
    assert_eq!(after.title, "After");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.tags.len(), 1);
    assert_eq!(after.tags[0].id, new_tag.id);

    let missing = ArticleRepository::update(
        &db.articles,
        Uuid::new_v4(),
        ArticleChanges {
            title: "x".into(),
            slug: generate_slug("x"),
            content: "y".into(),
            category_id: None,
            updated_at: Utc::now(),
        },
        &[],
    )
    .await
    .unwrap();
    assert!(!missing);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_delete_cascades_associations() {
    let test_db = test_db().await;
    let db = &test_db.db;
    let data = TestDataBuilder::new(db)
        .with_tag("Doomed")
        .await
        .with_article("Short lived", "Gone soon")
        .await
        .build();

    assert!(ArticleRepository::delete(&db.articles, data.articles[0]).await.unwrap());
    assert!(!ArticleRepository::delete(&db.articles, data.articles[0]).await.unwrap());

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM article_tag")
        .fetch_one(&test_db.pool)
        .await
        .unwrap();
    assert_eq!(links, 0);
    assert!(TagRepository::get(&db.tags, data.tags[0]).await.unwrap().is_some());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_tag_delete_detaches_from_articles() {
    let test_db = test_db().await;
    let db = &test_db.db;
    let data = TestDataBuilder::new(db)
        .with_tag("Temporary")
        .await
        .with_article("Tagged", "Body")
        .await
        .build();

    assert!(TagRepository::delete(&db.tags, data.tags[0]).await.unwrap());
    let view = db.articles.fetch(data.articles[0]).await.unwrap().unwrap();
    assert!(view.tags.is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_category_delete_rules() {
    let test_db = test_db().await;
    let db = &test_db.db;

    let parent = CategoryRepository::create(&db.categories, "Parent", "parent", None, None)
        .await
        .unwrap();
    let child = CategoryRepository::create(
        &db.categories,
        "Child",
        "child",
        Some("Nested"),
        Some(parent.id),
    )
    .await
    .unwrap();
    assert_eq!(child.parent_id, Some(parent.id));

    let err = CategoryRepository::delete(&db.categories, parent.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CategoryHasChildren(id) if id == parent.id));

    let article = new_article("Filed", Some(child.id));
    let article_id = article.id;
    ArticleRepository::insert(&db.articles, article, &[]).await.unwrap();

    assert!(CategoryRepository::delete(&db.categories, child.id).await.unwrap());
    let view = db.articles.fetch(article_id).await.unwrap().unwrap();
    assert!(view.category_id.is_none());
    assert!(view.category_name.is_none());

    assert!(CategoryRepository::delete(&db.categories, parent.id).await.unwrap());
    assert!(!CategoryRepository::delete(&db.categories, parent.id).await.unwrap());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_category_unknown_parent_and_duplicate_slug() {
    let test_db = test_db().await;
    let db = &test_db.db;

    let err = CategoryRepository::create(&db.categories, "Lost", "lost", None, Some(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReference(_)));

    CategoryRepository::create(&db.categories, "Docs", "docs", None, None)
        .await
        .unwrap();
    let err = CategoryRepository::create(&db.categories, "Docs again", "docs", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    TagRepository::create(&db.tags, "Rust", "rust").await.unwrap();
    let err = TagRepository::create(&db.tags, "RUST", "rust").await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_search_matches_title_and_content() {
    let test_db = test_db().await;
    let db = &test_db.db;
    seed_search_corpus(db).await;

    let hits = db.search.search("postgresql", 10).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.category_name.as_deref() == Some("Databases")));

    let hits = db.search.search("tomatoes", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Gardening");

    let hits = db.search.search("postgresql", 1).await.unwrap();
    assert_eq!(hits.len(), 1);

    let hits = db.search.search("kubernetes", 10).await.unwrap();
    assert!(hits.is_empty());

    test_db.cleanup().await;
}

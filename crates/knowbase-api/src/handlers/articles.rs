//! Article HTTP handlers.
//!
//! Routes under `/api/articles`. Bodies and responses are camelCase JSON;
//! every read returns the flattened article with its category name and tags.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use knowbase_core::{ArticleView, CreateArticleRequest, Error, UpdateArticleRequest};

use super::parse_id;
use crate::validation::{
    validate_create_article, validate_paging, validate_search, validate_update_article,
};
use crate::{ApiError, AppState};

/// Query parameters for listing articles.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListArticlesQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Articles per page, 1 to 100 (default 20)
    pub page_size: Option<i64>,
}

/// Query parameters for full-text search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchArticlesQuery {
    /// Search text; supports quoted phrases, `or` and `-term`
    pub q: Option<String>,
    /// Maximum results, 1 to 100 (default 20)
    pub limit: Option<i64>,
}

/// List articles newest first.
///
/// # Returns
/// - 200 OK with the requested page (empty past the end)
/// - 400 Bad Request if paging parameters are out of range
#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "Articles",
    params(ListArticlesQuery),
    responses(
        (status = 200, description = "Page of articles", body = [ArticleView]),
        (status = 400, description = "Invalid paging", body = ErrorResponse)
    )
)]
pub async fn list_articles(
    State(state): State<AppState>,
    query: Result<Query<ListArticlesQuery>, QueryRejection>,
) -> Result<Json<Vec<ArticleView>>, ApiError> {
    let Query(query) = query?;
    let (page, page_size) = validate_paging(query.page, query.page_size)?;
    let articles = state.articles.list(page, page_size).await?;
    Ok(Json(articles))
}

/// Get an article by id.
///
/// # Returns
/// - 200 OK with the article
/// - 404 Not Found if no article has this id
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    tag = "Articles",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 200, description = "The article", body = ArticleView),
        (status = 404, description = "Article not found", body = ErrorResponse)
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleView>, ApiError> {
    let id = parse_id(&id, "Article")?;
    state
        .articles
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::ArticleNotFound(id).into())
}

/// Get an article by slug.
#[utoipa::path(
    get,
    path = "/api/articles/slug/{slug}",
    tag = "Articles",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "The article", body = ArticleView),
        (status = 404, description = "Article not found", body = ErrorResponse)
    )
)]
pub async fn get_article_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleView>, ApiError> {
    state
        .articles
        .get_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Article not found: {}", slug)))
}

/// Create an article.
///
/// # Returns
/// - 201 Created with the article and a `Location` header
/// - 400 Bad Request on validation failure or an unknown category/tag id
#[utoipa::path(
    post,
    path = "/api/articles",
    tag = "Articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ArticleView),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    validate_create_article(&req)?;

    let article = state.articles.create(req).await?;
    let location = format!("/api/articles/{}", article.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(article),
    ))
}

/// Replace an article's fields and tag set.
///
/// # Returns
/// - 200 OK with the updated article
/// - 400 Bad Request on validation failure or an unknown category/tag id
/// - 404 Not Found if no article has this id
#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    tag = "Articles",
    params(("id" = Uuid, Path, description = "Article id")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = ArticleView),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Article not found", body = ErrorResponse)
    )
)]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateArticleRequest>, JsonRejection>,
) -> Result<Json<ArticleView>, ApiError> {
    let id = parse_id(&id, "Article")?;
    let Json(req) = payload?;
    validate_update_article(&req)?;

    state
        .articles
        .update(id, req)
        .await?
        .map(Json)
        .ok_or_else(|| Error::ArticleNotFound(id).into())
}

/// Delete an article.
///
/// # Returns
/// - 204 No Content
/// - 404 Not Found if no article has this id
#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    tag = "Articles",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 404, description = "Article not found", body = ErrorResponse)
    )
)]
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "Article")?;
    if state.articles.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::ArticleNotFound(id).into())
    }
}

/// Full-text search over titles and content, best match first.
#[utoipa::path(
    get,
    path = "/api/articles/search",
    tag = "Articles",
    params(SearchArticlesQuery),
    responses(
        (status = 200, description = "Matching articles", body = [ArticleView]),
        (status = 400, description = "Missing query or bad limit", body = ErrorResponse)
    )
)]
pub async fn search_articles(
    State(state): State<AppState>,
    query: Result<Query<SearchArticlesQuery>, QueryRejection>,
) -> Result<Json<Vec<ArticleView>>, ApiError> {
    let Query(query) = query?;
    let (q, limit) = validate_search(query.q.as_deref(), query.limit)?;
    let results = state.search.search(&q, limit).await?;

    tracing::debug!(
        subsystem = "api",
        component = "search",
        op = "search",
        query = %q,
        result_count = results.len(),
        "Article search"
    );
    Ok(Json(results))
}

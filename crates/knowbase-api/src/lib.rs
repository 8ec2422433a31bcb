//! # knowbase-api
//!
//! HTTP API for the knowbase knowledge base.
//!
//! The router is built over repository trait objects, so the same handlers
//! serve PostgreSQL in production ([`AppState::from_database`]) and the
//! in-memory store in tests ([`AppState::from_store`]).

pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod services;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use knowbase_core::{ArticleRepository, CategoryRepository, SearchProvider, TagRepository};
use knowbase_db::Database;

pub use config::{parse_allowed_origins, ServerConfig};
pub use error::ApiError;
pub use services::ArticleService;

use handlers::{articles, categories, health, tags};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub articles: ArticleService,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub search: Arc<dyn SearchProvider>,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn from_database(db: Database) -> Self {
        Self {
            articles: ArticleService::new(Arc::new(db.articles)),
            categories: Arc::new(db.categories),
            tags: Arc::new(db.tags),
            search: Arc::new(db.search),
        }
    }

    /// State backed by one store implementing every repository trait.
    pub fn from_store<S>(store: S) -> Self
    where
        S: ArticleRepository + CategoryRepository + TagRepository + SearchProvider + Clone + 'static,
    {
        Self {
            articles: ArticleService::new(Arc::new(store.clone())),
            categories: Arc::new(store.clone()),
            tags: Arc::new(store.clone()),
            search: Arc::new(store),
        }
    }
}

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Routes and state, without middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/openapi.json", get(health::openapi_json))
        .route(
            "/api/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route("/api/articles/search", get(articles::search_articles))
        .route(
            "/api/articles/slug/:slug",
            get(articles::get_article_by_slug),
        )
        .route(
            "/api/articles/:id",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/:id",
            get(categories::get_category).delete(categories::delete_category),
        )
        .route("/api/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/api/tags/:id",
            get(tags::get_tag).delete(tags::delete_tag),
        )
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// CORS policy: explicit origin list with credentials, no wildcards.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_allowed_origins(
            &config.allowed_origins,
        )))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([header::LOCATION, HeaderName::from_static("x-request-id")])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Full application: routes plus body limit, request ids, tracing and CORS.
///
/// The body limit wraps everything else: `Cors` needs a `Default` response
/// body, which the limit layer's body type does not provide.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    router(state).layer(
        ServiceBuilder::new()
            .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(cors_layer(config)),
    )
}

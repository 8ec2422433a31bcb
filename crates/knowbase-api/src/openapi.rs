//! OpenAPI document, served at `/openapi.json`.

use utoipa::OpenApi;

use knowbase_core::{
    ArticleView, Category, CreateArticleRequest, CreateCategoryRequest, CreateTagRequest, Tag,
    UpdateArticleRequest,
};

use crate::error::ErrorResponse;
use crate::handlers::{articles, categories, health, tags};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "knowbase API",
        description = "Developer knowledge base: articles organised by categories and tags"
    ),
    paths(
        health::health_check,
        articles::list_articles,
        articles::get_article,
        articles::get_article_by_slug,
        articles::create_article,
        articles::update_article,
        articles::delete_article,
        articles::search_articles,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::delete_category,
        tags::list_tags,
        tags::get_tag,
        tags::create_tag,
        tags::delete_tag,
    ),
    components(schemas(
        ArticleView,
        Category,
        Tag,
        CreateArticleRequest,
        UpdateArticleRequest,
        CreateCategoryRequest,
        CreateTagRequest,
        ErrorResponse,
    )),
    tags(
        (name = "Articles", description = "Article CRUD and full-text search"),
        (name = "Categories", description = "Category tree"),
        (name = "Tags", description = "Tag management"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

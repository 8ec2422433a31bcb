//! Category HTTP handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};

use knowbase_core::{Category, CreateCategoryRequest, Error};

use super::parse_id;
use crate::validation::validate_category;
use crate::{ApiError, AppState};

/// List all categories ordered by name.
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    responses((status = 200, description = "All categories", body = [Category]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.categories.list().await?))
}

/// Get a category by id.
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "The category", body = Category),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_id(&id, "Category")?;
    state
        .categories
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::CategoryNotFound(id).into())
}

/// Create a category. The slug is derived from the name when omitted.
///
/// # Returns
/// - 201 Created with the category and a `Location` header
/// - 400 Bad Request on validation failure or an unknown parent
/// - 409 Conflict if the slug is taken
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Slug already exists", body = ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let slug = validate_category(&req)?;

    let category = state
        .categories
        .create(
            req.name.trim(),
            &slug,
            req.description.as_deref(),
            req.parent_id,
        )
        .await?;

    info!(
        subsystem = "api",
        component = "categories",
        op = "create",
        category_id = %category.id,
        slug = %category.slug,
        "Category created"
    );
    let location = format!("/api/categories/{}", category.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(category),
    ))
}

/// Delete a category. Its articles keep existing without a category.
///
/// # Returns
/// - 204 No Content
/// - 404 Not Found if no category has this id
/// - 409 Conflict if the category has child categories
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category has children", body = ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "Category")?;
    match state.categories.delete(id).await {
        Ok(true) => {
            info!(
                subsystem = "api",
                component = "categories",
                op = "delete",
                category_id = %id,
                "Category deleted"
            );
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(Error::CategoryNotFound(id).into()),
        Err(err @ Error::CategoryHasChildren(_)) => {
            warn!(
                subsystem = "api",
                component = "categories",
                op = "delete",
                category_id = %id,
                "Rejected delete of category with children"
            );
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

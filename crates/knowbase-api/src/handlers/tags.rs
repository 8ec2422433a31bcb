//! Tag HTTP handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use knowbase_core::{CreateTagRequest, Error, Tag};

use super::parse_id;
use crate::validation::validate_tag;
use crate::{ApiError, AppState};

/// List all tags ordered by name.
#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "Tags",
    responses((status = 200, description = "All tags", body = [Tag]))
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.tags.list().await?))
}

/// Get a tag by id.
#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    tag = "Tags",
    params(("id" = Uuid, Path, description = "Tag id")),
    responses(
        (status = 200, description = "The tag", body = Tag),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tag>, ApiError> {
    let id = parse_id(&id, "Tag")?;
    state
        .tags
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::TagNotFound(id).into())
}

/// Create a tag. The slug is derived from the name when omitted.
#[utoipa::path(
    post,
    path = "/api/tags",
    tag = "Tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Slug already exists", body = ErrorResponse)
    )
)]
pub async fn create_tag(
    State(state): State<AppState>,
    payload: Result<Json<CreateTagRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let slug = validate_tag(&req)?;

    let tag = state.tags.create(req.name.trim(), &slug).await?;
    let location = format!("/api/tags/{}", tag.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(tag)))
}

/// Delete a tag and detach it from every article.
#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    tag = "Tags",
    params(("id" = Uuid, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "Tag")?;
    if state.tags.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::TagNotFound(id).into())
    }
}

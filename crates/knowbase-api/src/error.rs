//! HTTP error mapping.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::ValidationErrors;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Per-field messages, present on validation failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Infrastructure failure; details are logged, not returned.
    #[error(transparent)]
    Internal(knowbase_core::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("{0}")]
    Conflict(String),
}

impl From<knowbase_core::Error> for ApiError {
    fn from(err: knowbase_core::Error) -> Self {
        use knowbase_core::Error;

        match err {
            Error::ArticleNotFound(_) | Error::CategoryNotFound(_) | Error::TagNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            Error::InvalidReference(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::CategoryHasChildren(_) => ApiError::Conflict(err.to_string()),
            other => ApiError::Internal(other),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Internal(err) => {
                tracing::error!(
                    subsystem = "api",
                    error = %err,
                    "Request failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal server error".to_string(),
                        errors: None,
                    },
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, message(msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, message(msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, message(msg)),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Validation failed".to_string(),
                    errors: Some(errors.fields().clone()),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn message(error: String) -> ErrorResponse {
    ErrorResponse {
        error,
        errors: None,
    }
}

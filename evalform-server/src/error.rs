//! HTTP error mapping
//!
//! Client-caused conditions carry their detail to the caller; everything
//! else is logged in full and answered with an opaque 500.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use evalform_common::schema;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be read as a JSON object (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Common(#[from] evalform_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use evalform_common::Error;

        let err = match self {
            ApiError::BadRequest(msg) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid request body", "message": msg })),
                )
                    .into_response();
            }
            ApiError::Common(err) => err,
        };

        if !err.is_client_facing() {
            error!("Request failed: {}", err);
        }

        match err {
            Error::Validation { missing } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Missing required fields",
                    "missing": missing,
                    "required": schema::required_fields(),
                })),
            )
                .into_response(),
            Error::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Evaluation not found" })),
            )
                .into_response(),
            Error::NoData => (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                "No data available",
            )
                .into_response(),
            Error::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Database error" })),
            )
                .into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

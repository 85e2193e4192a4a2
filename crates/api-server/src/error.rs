//! Handler errors and their HTTP rendering
//!
//! Upstream failures are logged by the handler and reach the caller only as
//! a fixed message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use calendar::ValidationIssue;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Create-event body failed validation
    InvalidEvent(Vec<ValidationIssue>),
    /// A required parameter is missing
    BadRequest(&'static str),
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidEvent(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid event data", "details": details })),
            )
                .into_response(),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
        }
    }
}

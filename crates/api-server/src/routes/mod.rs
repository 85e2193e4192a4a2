use axum::{http::StatusCode, response::IntoResponse, Json};

pub mod auth;
pub mod calendar;

pub use self::auth::{AuthUrlResponse, CallbackParams};
pub use self::calendar::{CreatedEventResponse, EventListResponse, ListEventsParams};

/// Simple health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({
        "status": "ok",
        "service": "greta-calendar-bridge",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

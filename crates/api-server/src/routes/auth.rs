//! Google OAuth endpoints
//!
//! `GET /api/auth/google` hands out the consent URL; the callback exchanges
//! the code and sends the outcome back to the start page as query parameters.

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use common::config::Config;
use oauth::constants::{ERROR_CALLBACK_FAILED, ERROR_NO_CODE, PARAM_AUTH_ERROR};
use oauth::{AuthOutcome, OAuthFlow};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Query parameters Google appends to the callback
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

pub async fn google_auth_url(
    State(state): State<AppState>,
) -> Result<Json<AuthUrlResponse>, ApiError> {
    let flow = OAuthFlow::from_config(&state.config.google).map_err(|e| {
        error!("Google OAuth URL generation error: {:#}", e);
        ApiError::Internal("Failed to generate Google OAuth URL")
    })?;

    Ok(Json(AuthUrlResponse {
        auth_url: flow.authorization_url(),
    }))
}

pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let start_page = state.config.site.start_page();
    let outcome = resolve_callback(&state.config, params).await;

    let target = outcome.redirect_url(&start_page).unwrap_or_else(|e| {
        error!("Google OAuth callback error: {:#}", e);
        format!("{}?{}={}", start_page, PARAM_AUTH_ERROR, ERROR_CALLBACK_FAILED)
    });

    Redirect::temporary(&target)
}

/// A provider error wins over a missing code
async fn resolve_callback(config: &Config, params: CallbackParams) -> AuthOutcome {
    if let Some(provider_error) = params.error.filter(|e| !e.is_empty()) {
        warn!("Google OAuth returned error: {}", provider_error);
        return AuthOutcome::Failure(provider_error);
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        warn!("Google OAuth callback without authorization code");
        return AuthOutcome::failure(ERROR_NO_CODE);
    };

    let exchange = async {
        let flow = OAuthFlow::from_config(&config.google)?;
        flow.exchange_code(&code).await
    };

    match exchange.await {
        Ok(tokens) => {
            info!("Google OAuth callback completed");
            AuthOutcome::Success(tokens)
        }
        Err(e) => {
            error!("Google OAuth callback error: {:#}", e);
            AuthOutcome::failure(ERROR_CALLBACK_FAILED)
        }
    }
}

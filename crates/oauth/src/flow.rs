//! OAuth 2.0 authorization code flow for a web server client
//!
//! 1. Build the consent URL (offline access, forced consent prompt)
//! 2. Google redirects the user back to the callback with `code` or `error`
//! 3. Exchange the authorization code for tokens
//!
//! The flow keeps no state between those steps; each request constructs a
//! fresh `OAuthFlow` from configuration.

use anyhow::{anyhow, Result};
use chrono::Utc;
use common::config::GoogleConfig;
use tracing::info;

use crate::constants::*;
use crate::tokens::TokenPair;

/// Manages the OAuth 2.0 authorization flow
#[derive(Debug, Clone)]
pub struct OAuthFlow {
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
}

impl OAuthFlow {
    /// Creates a flow from the configured client registration.
    ///
    /// Fails when the client id or redirect URI is missing. A missing client
    /// secret is left for Google to reject during the exchange.
    pub fn from_config(config: &GoogleConfig) -> Result<Self> {
        let client_id = config
            .client_id
            .clone()
            .ok_or_else(|| anyhow!("GOOGLE_CLIENT_ID is not configured"))?;
        let redirect_uri = config
            .redirect_uri
            .clone()
            .ok_or_else(|| anyhow!("GOOGLE_REDIRECT_URI is not configured"))?;

        Ok(Self {
            client_id,
            client_secret: config.client_secret.clone(),
            redirect_uri,
            auth_url: config
                .auth_url
                .clone()
                .unwrap_or_else(|| GOOGLE_AUTH_URL.to_string()),
            token_url: config
                .token_url
                .clone()
                .unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
        })
    }

    /// Returns the consent URL to send the user to
    pub fn authorization_url(&self) -> String {
        let scopes = CALENDAR_SCOPES.join(" ");
        format!(
            "{}?access_type=offline&scope={}&prompt=consent&response_type=code&client_id={}&redirect_uri={}",
            self.auth_url,
            urlencoding::encode(&scopes),
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
        )
    }

    /// Exchanges the authorization code for access and refresh tokens
    pub async fn exchange_code(&self, code: &str) -> Result<TokenPair> {
        info!("Exchanging authorization code for tokens");

        let mut form = vec![
            ("client_id", self.client_id.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        let client = reqwest::Client::new();
        let response = client.post(&self.token_url).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Token exchange failed: HTTP {} - {}", status, error_text));
        }

        let token_response: TokenResponse = response.json().await?;

        let expiry_date = token_response
            .expires_in
            .map(|secs| Utc::now().timestamp_millis() + secs * 1000);

        info!(
            "Token exchange succeeded (refresh token issued: {})",
            token_response.refresh_token.is_some()
        );

        Ok(TokenPair {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            expiry_date,
        })
    }
}

/// Token endpoint response
#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

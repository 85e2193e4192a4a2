//! HTTP client for the bridge server's endpoints

use anyhow::{anyhow, Result};
use api_server::routes::{AuthUrlResponse, CreatedEventResponse, EventListResponse};
use calendar::{CalendarEventSummary, EventRequest};
use serde::de::DeserializeOwned;
use tracing::debug;

pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
}

impl BridgeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn auth_url(&self) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/api/auth/google", self.base_url))
            .send()
            .await?;
        let body: AuthUrlResponse = Self::parse(response).await?;
        Ok(body.auth_url)
    }

    pub async fn create_event(&self, request: &EventRequest) -> Result<CreatedEventResponse> {
        debug!("Creating event {:?}", request.title);
        let response = self
            .http
            .post(format!("{}/api/calendar/events", self.base_url))
            .json(request)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn list_events(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<Vec<CalendarEventSummary>> {
        let mut query = vec![("accessToken", access_token)];
        if let Some(refresh_token) = refresh_token {
            query.push(("refreshToken", refresh_token));
        }

        let response = self
            .http
            .get(format!("{}/api/calendar/events", self.base_url))
            .query(&query)
            .send()
            .await?;
        let body: EventListResponse = Self::parse(response).await?;
        Ok(body.events)
    }

    /// Decodes a success body or surfaces the server's `error` message
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = body["error"].as_str().unwrap_or("request failed");
        match body.get("details").and_then(|d| d.as_array()) {
            Some(details) if !details.is_empty() => {
                let issues: Vec<String> = details
                    .iter()
                    .map(|d| {
                        format!(
                            "{}: {}",
                            d["path"][0].as_str().unwrap_or("body"),
                            d["message"].as_str().unwrap_or("invalid")
                        )
                    })
                    .collect();
                Err(anyhow!("{} (HTTP {}): {}", message, status, issues.join("; ")))
            }
            _ => Err(anyhow!("{} (HTTP {})", message, status)),
        }
    }
}

//! Calendar event gateway
//!
//! Both operations run on the caller's access token; the server holds no
//! credentials of its own.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use calendar::client::PRIMARY_CALENDAR;
use calendar::{CalendarError, CalendarEventSummary, EventRequest, GoogleCalendarClient, ListQuery, NewEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEventResponse {
    pub success: bool,
    pub event_id: String,
    pub event_link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventListResponse {
    pub events: Vec<CalendarEventSummary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsParams {
    pub access_token: Option<String>,
    /// Accepted for compatibility; tokens are never refreshed here
    pub refresh_token: Option<String>,
}

/// `POST /api/calendar/events`
pub async fn create_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CreatedEventResponse>, ApiError> {
    let request = EventRequest::parse_body(&body).map_err(|issues| {
        debug!("Rejected event request with {} issue(s)", issues.len());
        ApiError::InvalidEvent(issues)
    })?;

    let event = NewEvent::sustainability(&request, &state.config.calendar.time_zone);
    let client = GoogleCalendarClient::new(
        request.access_token.as_str(),
        state.config.google.calendar_api_base.as_deref(),
    );

    let inserted = client
        .insert_event(PRIMARY_CALENDAR, &event)
        .await
        .map_err(|e| {
            log_upstream_failure("Calendar event creation error", &e);
            ApiError::Internal("Failed to create calendar event")
        })?;

    info!("Created calendar event {}", inserted.id);

    Ok(Json(CreatedEventResponse {
        success: true,
        event_id: inserted.id,
        event_link: inserted.html_link,
    }))
}

/// `GET /api/calendar/events?accessToken=&refreshToken=`
pub async fn list_events(
    State(state): State<AppState>,
    params: Result<Query<ListEventsParams>, QueryRejection>,
) -> Result<Json<EventListResponse>, ApiError> {
    // An unreadable query string leaves no usable token
    let Query(params) = params.unwrap_or_else(|rejection| {
        debug!("Unreadable list query: {}", rejection);
        Query(ListEventsParams::default())
    });

    let access_token = params
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::BadRequest("Access token is required"))?;

    debug!(
        has_refresh_token = params.refresh_token.is_some(),
        "Listing tracked calendar events"
    );

    let client = GoogleCalendarClient::new(
        access_token,
        state.config.google.calendar_api_base.as_deref(),
    );

    let events = client
        .list_events(PRIMARY_CALENDAR, &ListQuery::tracked_events(chrono::Utc::now()))
        .await
        .map_err(|e| {
            log_upstream_failure("Calendar events fetch error", &e);
            ApiError::Internal("Failed to fetch calendar events")
        })?;

    Ok(Json(EventListResponse { events }))
}

fn log_upstream_failure(context: &str, err: &CalendarError) {
    if err.is_auth_failure() {
        warn!("{}: caller token rejected: {}", context, err);
    } else {
        error!("{}: {}", context, err);
    }
}

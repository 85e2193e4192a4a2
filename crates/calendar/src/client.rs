//! Google Calendar API client.
//!
//! One client per request, authenticated with the caller's own access
//! token. No retries, no token refresh: a failure is reported once and the
//! request that issued it fails.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use tracing::{debug, warn};

use crate::error::{CalendarError, CalendarResult};
use crate::models::{CalendarEventSummary, EventList, GoogleEvent, InsertedEvent, NewEvent};

/// Base URL for Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar every operation targets
pub const PRIMARY_CALENDAR: &str = "primary";

/// Full-text query matching the events this platform created
pub const TRACKED_EVENTS_QUERY: &str = r#"F³ OR "Front Forum Focus" OR "Sustainability Impact""#;

/// Days before and after now covered by a listing
pub const LIST_WINDOW_DAYS: i64 = 30;

/// Upper bound on events returned by a listing
pub const LIST_MAX_RESULTS: usize = 50;

/// Parameters of an `events.list` call
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub max_results: usize,
    /// Expand recurring events into single occurrences
    pub single_events: bool,
    pub q: Option<String>,
}

impl ListQuery {
    /// Tracked events within [now - 30 days, now + 30 days]
    pub fn tracked_events(now: DateTime<Utc>) -> Self {
        Self {
            time_min: now - Duration::days(LIST_WINDOW_DAYS),
            time_max: now + Duration::days(LIST_WINDOW_DAYS),
            max_results: LIST_MAX_RESULTS,
            single_events: true,
            q: Some(TRACKED_EVENTS_QUERY.to_string()),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("timeMin", self.time_min.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("timeMax", self.time_max.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("maxResults", self.max_results.to_string()),
            ("singleEvents", self.single_events.to_string()),
        ];
        // orderBy=startTime is only accepted together with singleEvents
        if self.single_events {
            params.push(("orderBy", "startTime".to_string()));
        }
        if let Some(q) = &self.q {
            params.push(("q", q.clone()));
        }
        params
    }
}

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Creates a client for the caller's token; `base_url` overrides the API root
    pub fn new(access_token: impl Into<String>, base_url: Option<&str>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            access_token: access_token.into(),
            base_url: base_url
                .unwrap_or(CALENDAR_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    /// Inserts an event and returns its id and web link
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> CalendarResult<InsertedEvent> {
        let response = self
            .http_client
            .post(self.events_url(calendar_id))
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await?;

        let created: GoogleEvent = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| CalendarError::invalid_response(e.to_string()))?;

        let inserted = InsertedEvent::try_from(created)?;
        debug!("inserted event {} into calendar {}", inserted.id, calendar_id);
        Ok(inserted)
    }

    /// Lists events, mapped to summaries and capped at `max_results`
    pub async fn list_events(
        &self,
        calendar_id: &str,
        query: &ListQuery,
    ) -> CalendarResult<Vec<CalendarEventSummary>> {
        let response = self
            .http_client
            .get(self.events_url(calendar_id))
            .bearer_auth(&self.access_token)
            .query(&query.params())
            .send()
            .await?;

        let list: EventList = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| CalendarError::invalid_response(e.to_string()))?;

        let mut events: Vec<CalendarEventSummary> = list
            .items
            .into_iter()
            .filter_map(|item| match CalendarEventSummary::try_from(item) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!("skipping calendar item: {}", e);
                    None
                }
            })
            .collect();
        events.truncate(query.max_results);

        debug!("fetched {} events from calendar {}", events.len(), calendar_id);
        Ok(events)
    }

    async fn check_status(response: reqwest::Response) -> CalendarResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CalendarError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

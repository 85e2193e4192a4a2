//! Calendar v3 wire types and the boundary types handed to callers
//!
//! Google's event resource is large and loosely populated. It is decoded
//! into the wire structs below and mapped straight into
//! [`CalendarEventSummary`], so nothing downstream touches raw JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CalendarError, CalendarResult};
use crate::request::EventRequest;

/// Color id Google renders as green
pub const SUSTAINABILITY_COLOR_ID: &str = "10";

/// Banner line appended to every created event's description
pub const TRACKING_BANNER: &str = "🌍 Sustainability Impact Tracking";

/// Footer naming the platform; also what the list query searches for
pub const CREATED_VIA_FOOTER: &str = "Created via F³ (Front Forum Focus)";

// =============================================================================
// Outgoing
// =============================================================================

/// Body of an `events.insert` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Vec<String>>,
    pub color_id: String,
    pub extended_properties: ExtendedProperties,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtendedProperties {
    pub private: BTreeMap<String, String>,
}

impl NewEvent {
    /// Builds the annotated, green, tagged event for a validated request
    pub fn sustainability(request: &EventRequest, time_zone: &str) -> Self {
        let mut description = format!(
            "{}\n\n{}",
            request.description.as_deref().unwrap_or_default(),
            TRACKING_BANNER
        );
        if let Some(category) = &request.sdg_category {
            description.push_str(&format!("\n📊 SDG Category: {}", category));
        }
        description.push_str("\n\n");
        description.push_str(CREATED_VIA_FOOTER);

        let mut private = BTreeMap::new();
        private.insert("f3-platform".to_string(), "true".to_string());
        private.insert("event-type".to_string(), "sustainability-tracking".to_string());
        private.insert(
            "sdg-category".to_string(),
            request.sdg_category.clone().unwrap_or_default(),
        );

        Self {
            summary: request.title.clone(),
            description,
            start: EventTime {
                date_time: request.start_date_time.to_rfc3339(),
                time_zone: time_zone.to_string(),
            },
            end: EventTime {
                date_time: request.end_date_time.to_rfc3339(),
                time_zone: time_zone.to_string(),
            },
            recurrence: request.recurrence.clone(),
            color_id: SUSTAINABILITY_COLOR_ID.to_string(),
            extended_properties: ExtendedProperties { private },
        }
    }
}

// =============================================================================
// Incoming
// =============================================================================

/// The parts of Google's event resource we read
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<GoogleEventTime>,
    #[serde(default)]
    pub end: Option<GoogleEventTime>,
    #[serde(default)]
    pub html_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventTime {
    /// Timed events
    #[serde(default)]
    pub date_time: Option<String>,
    /// All-day events
    #[serde(default)]
    pub date: Option<String>,
}

impl GoogleEventTime {
    fn into_value(self) -> Option<String> {
        self.date_time.or(self.date)
    }
}

#[derive(Debug, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
}

/// What the gateway reports back after a successful insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedEvent {
    pub id: String,
    pub html_link: String,
}

impl TryFrom<GoogleEvent> for InsertedEvent {
    type Error = CalendarError;

    fn try_from(event: GoogleEvent) -> CalendarResult<Self> {
        let id = event
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CalendarError::invalid_response("inserted event has no id"))?;
        let html_link = event
            .html_link
            .filter(|link| !link.is_empty())
            .ok_or_else(|| CalendarError::invalid_response("inserted event has no htmlLink"))?;
        Ok(Self { id, html_link })
    }
}

/// Reduced event shape returned by the list operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `dateTime` for timed events, `date` for all-day ones
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}

impl TryFrom<GoogleEvent> for CalendarEventSummary {
    type Error = CalendarError;

    fn try_from(event: GoogleEvent) -> CalendarResult<Self> {
        let id = event
            .id
            .ok_or_else(|| CalendarError::invalid_response("event has no id"))?;
        let start = event
            .start
            .and_then(GoogleEventTime::into_value)
            .ok_or_else(|| CalendarError::invalid_response(format!("event {} has no start", id)))?;

        Ok(Self {
            id,
            title: event.summary,
            description: event.description,
            start,
            end: event.end.and_then(GoogleEventTime::into_value),
            html_link: event.html_link,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(description: Option<&str>, sdg: Option<&str>) -> EventRequest {
        EventRequest::validate(&json!({
            "title": "Carbon Footprint Review",
            "description": description,
            "startDateTime": "2025-03-03T10:00:00Z",
            "endDateTime": "2025-03-03T10:30:00Z",
            "sdgCategory": sdg,
            "accessToken": "token"
        }))
        .unwrap()
    }

    #[test]
    fn test_description_banner() {
        let event = NewEvent::sustainability(
            &request(Some("Tally the week"), Some("Climate Action (SDG 13)")),
            "America/Los_Angeles",
        );
        assert_eq!(
            event.description,
            "Tally the week\n\n🌍 Sustainability Impact Tracking\n📊 SDG Category: Climate Action (SDG 13)\n\nCreated via F³ (Front Forum Focus)"
        );

        let bare = NewEvent::sustainability(&request(None, None), "UTC");
        assert_eq!(
            bare.description,
            "\n\n🌍 Sustainability Impact Tracking\n\nCreated via F³ (Front Forum Focus)"
        );
    }

    #[test]
    fn test_new_event_wire_shape() {
        let event = NewEvent::sustainability(&request(None, Some("Impact Tracking")), "America/Los_Angeles");
        let wire = serde_json::to_value(&event).unwrap();

        assert_eq!(wire["summary"], "Carbon Footprint Review");
        assert_eq!(wire["colorId"], "10");
        assert_eq!(wire["start"]["timeZone"], "America/Los_Angeles");
        assert_eq!(wire["start"]["dateTime"], "2025-03-03T10:00:00+00:00");
        assert_eq!(wire["extendedProperties"]["private"]["f3-platform"], "true");
        assert_eq!(wire["extendedProperties"]["private"]["sdg-category"], "Impact Tracking");
        assert!(wire.get("recurrence").is_none());
    }

    #[test]
    fn test_summary_prefers_date_time() {
        let event: GoogleEvent = serde_json::from_value(json!({
            "id": "abc",
            "summary": "Daily Impact Check-in",
            "start": { "dateTime": "2025-03-03T18:00:00-08:00", "date": "2025-03-03" },
            "end": { "date": "2025-03-04" },
            "htmlLink": "https://calendar.google.com/event?eid=abc",
            "status": "confirmed"
        }))
        .unwrap();

        let summary = CalendarEventSummary::try_from(event).unwrap();
        assert_eq!(summary.start, "2025-03-03T18:00:00-08:00");
        assert_eq!(summary.end.as_deref(), Some("2025-03-04"));
        assert!(summary.description.is_none());
    }

    #[test]
    fn test_summary_without_start_is_rejected() {
        let event: GoogleEvent = serde_json::from_value(json!({ "id": "abc", "start": {} })).unwrap();
        assert!(CalendarEventSummary::try_from(event).is_err());
    }

    #[test]
    fn test_inserted_event_requires_id_and_link() {
        let missing_link = GoogleEvent {
            id: Some("abc".into()),
            ..GoogleEvent::default()
        };
        assert!(InsertedEvent::try_from(missing_link).is_err());
    }
}

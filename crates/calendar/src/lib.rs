//! Google Calendar gateway for sustainability tracking events
//!
//! Validates incoming event requests, annotates them with the tracking
//! banner, and talks to the Calendar v3 REST API on behalf of a caller who
//! supplies their own access token.

pub mod client;
pub mod error;
pub mod models;
pub mod request;
pub mod templates;

pub use client::{GoogleCalendarClient, ListQuery};
pub use error::{CalendarError, CalendarResult};
pub use models::{CalendarEventSummary, InsertedEvent, NewEvent};
pub use request::{EventRequest, ValidationIssue};
pub use templates::{EventTemplate, Reminder};

//! OAuth constants for Google Calendar access

/// Scopes needed to read and write events on the user's calendars
pub const CALENDAR_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/calendar.events",
];

/// Google OAuth authorization endpoint
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth token exchange endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Local storage key holding the JSON-encoded token pair
pub const TOKEN_CACHE_KEY: &str = "google_calendar_tokens";

// =============================================================================
// Callback redirect parameters
// =============================================================================

pub const PARAM_AUTH_SUCCESS: &str = "auth_success";
pub const PARAM_AUTH_ERROR: &str = "auth_error";
pub const PARAM_TOKENS: &str = "tokens";

/// The provider redirected back without an authorization code
pub const ERROR_NO_CODE: &str = "no_code";

/// Exchanging the code for tokens failed
pub const ERROR_CALLBACK_FAILED: &str = "callback_failed";

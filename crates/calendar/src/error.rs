//! Error types for calendar gateway operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
    /// Connection failure, timeout, DNS resolution
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Google answered with a non-success status
    #[error("calendar API returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The response did not have the shape we map from
    #[error("invalid calendar API response: {0}")]
    InvalidResponse(String),
}

impl CalendarError {
    pub fn invalid_response(message: impl Into<String>) -> Self {
        CalendarError::InvalidResponse(message.into())
    }

    /// True when Google rejected the caller's credentials
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, CalendarError::Upstream { status: 401 | 403, .. })
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;

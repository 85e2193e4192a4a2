//! Create-event request and its field-level validation

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A validated request to create one calendar event.
///
/// Lives for a single request; the caller's tokens are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date_time: DateTime<FixedOffset>,
    pub end_date_time: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdg_category: Option<String>,
    /// RFC 5545 recurrence lines, e.g. `RRULE:FREQ=WEEKLY;BYDAY=MO`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Vec<String>>,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidJson,
    InvalidType,
    TooSmall,
    InvalidString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// One failed check, pointing at the offending field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl ValidationIssue {
    fn at(field: &str, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            path: vec![PathSegment::Key(field.to_string())],
            message: message.into(),
        }
    }

    /// The top-level field this issue is about, if any
    pub fn field(&self) -> Option<&str> {
        match self.path.first() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }
}

impl EventRequest {
    /// Parses and validates a raw request body
    pub fn parse_body(body: &[u8]) -> Result<Self, Vec<ValidationIssue>> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            vec![ValidationIssue {
                code: IssueCode::InvalidJson,
                path: Vec::new(),
                message: format!("Malformed JSON body: {}", e),
            }]
        })?;
        Self::validate(&value)
    }

    /// Checks every field and reports all failures at once
    pub fn validate(value: &Value) -> Result<Self, Vec<ValidationIssue>> {
        let Some(obj) = value.as_object() else {
            return Err(vec![ValidationIssue {
                code: IssueCode::InvalidType,
                path: Vec::new(),
                message: format!("Expected object, received {}", type_name(value)),
            }]);
        };

        let mut issues = Vec::new();

        let title = required_string(obj, "title", "Event title is required", &mut issues);
        let description = optional_string(obj, "description", &mut issues);
        let start_date_time = date_time(obj, "startDateTime", &mut issues);
        let end_date_time = date_time(obj, "endDateTime", &mut issues);
        let sdg_category = optional_string(obj, "sdgCategory", &mut issues);
        let recurrence = string_list(obj, "recurrence", &mut issues);
        let access_token =
            required_string(obj, "accessToken", "Access token is required", &mut issues);
        let refresh_token = optional_string(obj, "refreshToken", &mut issues);

        match (title, start_date_time, end_date_time, access_token) {
            (Some(title), Some(start_date_time), Some(end_date_time), Some(access_token))
                if issues.is_empty() =>
            {
                Ok(EventRequest {
                    title,
                    description,
                    start_date_time,
                    end_date_time,
                    sdg_category,
                    recurrence,
                    access_token,
                    refresh_token,
                })
            }
            _ => Err(issues),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn required_string(
    obj: &Map<String, Value>,
    field: &str,
    empty_message: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<String> {
    match present(obj, field) {
        None => {
            issues.push(ValidationIssue::at(field, IssueCode::InvalidType, "Required"));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            issues.push(ValidationIssue::at(field, IssueCode::TooSmall, empty_message));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            issues.push(ValidationIssue::at(
                field,
                IssueCode::InvalidType,
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<String> {
    match present(obj, field)? {
        Value::String(s) => Some(s.clone()),
        other => {
            issues.push(ValidationIssue::at(
                field,
                IssueCode::InvalidType,
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn date_time(
    obj: &Map<String, Value>,
    field: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<DateTime<FixedOffset>> {
    let raw = required_string(obj, field, "Invalid datetime", issues)?;
    match parse_iso_date_time(&raw) {
        Some(dt) => Some(dt),
        None => {
            issues.push(ValidationIssue::at(field, IssueCode::InvalidString, "Invalid datetime"));
            None
        }
    }
}

/// Strict ISO 8601 date-time: `YYYY-MM-DDTHH:MM:SS[.fff]` followed by `Z`
/// or `±hh:mm`. RFC 3339 parsing alone also admits a space separator and
/// lowercase `t`/`z`, which ISO 8601 does not.
fn parse_iso_date_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    if raw.as_bytes().get(10) != Some(&b'T') || raw.contains(['t', 'z']) {
        return None;
    }
    DateTime::parse_from_rfc3339(raw).ok()
}

fn string_list(
    obj: &Map<String, Value>,
    field: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Vec<String>> {
    let items = match present(obj, field)? {
        Value::Array(items) => items,
        other => {
            issues.push(ValidationIssue::at(
                field,
                IssueCode::InvalidType,
                format!("Expected array, received {}", type_name(other)),
            ));
            return None;
        }
    };

    let mut lines = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => lines.push(s.clone()),
            other => issues.push(ValidationIssue {
                code: IssueCode::InvalidType,
                path: vec![PathSegment::Key(field.to_string()), PathSegment::Index(index)],
                message: format!("Expected string, received {}", type_name(other)),
            }),
        }
    }
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "title": "Weekly Sustainability Impact Review",
            "description": "Review the week",
            "startDateTime": "2025-03-03T10:00:00.000Z",
            "endDateTime": "2025-03-03T10:30:00.000Z",
            "sdgCategory": "Impact Tracking",
            "recurrence": ["RRULE:FREQ=WEEKLY;BYDAY=MO"],
            "accessToken": "ya29.token"
        })
    }

    fn fields(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().filter_map(ValidationIssue::field).collect()
    }

    #[test]
    fn test_valid_request() {
        let request = EventRequest::validate(&valid_body()).unwrap();
        assert_eq!(request.title, "Weekly Sustainability Impact Review");
        assert_eq!(request.recurrence.as_deref(), Some(&["RRULE:FREQ=WEEKLY;BYDAY=MO".to_string()][..]));
        assert!(request.refresh_token.is_none());
        assert_eq!(request.start_date_time.timestamp(), 1_740_996_000);
    }

    #[test]
    fn test_missing_title() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("title");

        let issues = EventRequest::validate(&body).unwrap_err();
        assert_eq!(fields(&issues), vec!["title"]);
        assert_eq!(issues[0].message, "Required");
    }

    #[test]
    fn test_empty_title_and_token() {
        let mut body = valid_body();
        body["title"] = json!("");
        body["accessToken"] = json!("");

        let issues = EventRequest::validate(&body).unwrap_err();
        assert_eq!(fields(&issues), vec!["title", "accessToken"]);
        assert_eq!(issues[0].code, IssueCode::TooSmall);
        assert_eq!(issues[0].message, "Event title is required");
        assert_eq!(issues[1].message, "Access token is required");
    }

    #[test]
    fn test_non_iso_start() {
        let mut body = valid_body();
        body["startDateTime"] = json!("next monday at ten");

        let issues = EventRequest::validate(&body).unwrap_err();
        assert_eq!(fields(&issues), vec!["startDateTime"]);
        assert_eq!(issues[0].code, IssueCode::InvalidString);
    }

    #[test]
    fn test_loose_rfc3339_forms_are_rejected() {
        for loose in ["2025-03-03 10:00:00Z", "2025-03-03t10:00:00z", "2025-03-03T10:00:00z"] {
            let mut body = valid_body();
            body["startDateTime"] = json!(loose);

            let issues = EventRequest::validate(&body).unwrap_err();
            assert_eq!(fields(&issues), vec!["startDateTime"], "{}", loose);
            assert_eq!(issues[0].message, "Invalid datetime");
        }
    }

    #[test]
    fn test_offset_date_times_are_accepted() {
        let mut body = valid_body();
        body["startDateTime"] = json!("2025-03-03T10:00:00+02:00");
        body["endDateTime"] = json!("2025-03-03T10:30:00-07:00");
        assert!(EventRequest::validate(&body).is_ok());
    }

    #[test]
    fn test_bad_recurrence_entry() {
        let mut body = valid_body();
        body["recurrence"] = json!(["RRULE:FREQ=DAILY", 7]);

        let issues = EventRequest::validate(&body).unwrap_err();
        assert_eq!(
            issues[0].path,
            vec![PathSegment::Key("recurrence".into()), PathSegment::Index(1)]
        );
    }

    #[test]
    fn test_malformed_body() {
        let issues = EventRequest::parse_body(b"{\"title\":").unwrap_err();
        assert_eq!(issues[0].code, IssueCode::InvalidJson);
        assert!(issues[0].path.is_empty());

        let issues = EventRequest::parse_body(b"[1, 2]").unwrap_err();
        assert_eq!(issues[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_issue_serialization() {
        let issue = ValidationIssue {
            code: IssueCode::InvalidType,
            path: vec![PathSegment::Key("recurrence".into()), PathSegment::Index(0)],
            message: "Expected string, received number".into(),
        };
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            json!({
                "code": "invalid_type",
                "path": ["recurrence", 0],
                "message": "Expected string, received number"
            })
        );
    }
}

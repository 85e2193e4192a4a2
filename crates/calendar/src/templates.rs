//! Ready-made sustainability activities and recurring reminders

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone};

use crate::request::EventRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTemplate {
    /// Short name used on the command line
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub duration_minutes: i64,
    pub sdg_category: &'static str,
}

pub const TEMPLATES: &[EventTemplate] = &[
    EventTemplate {
        key: "carbon-footprint-review",
        title: "Carbon Footprint Review",
        description: "Review and calculate your weekly carbon footprint from transportation, energy use, and consumption.",
        duration_minutes: 30,
        sdg_category: "Climate Action (SDG 13)",
    },
    EventTemplate {
        key: "sustainable-shopping-planning",
        title: "Sustainable Shopping Planning",
        description: "Plan sustainable and ethical purchases, research eco-friendly alternatives.",
        duration_minutes: 45,
        sdg_category: "Responsible Consumption (SDG 12)",
    },
    EventTemplate {
        key: "community-impact-project",
        title: "Community Impact Project",
        description: "Work on local community sustainability initiatives and volunteer activities.",
        duration_minutes: 120,
        sdg_category: "Sustainable Communities (SDG 11)",
    },
    EventTemplate {
        key: "energy-efficiency-audit",
        title: "Home Energy Efficiency Audit",
        description: "Assess and improve home energy efficiency, track utility usage.",
        duration_minutes: 60,
        sdg_category: "Clean Energy (SDG 7)",
    },
    EventTemplate {
        key: "sustainability-education",
        title: "Sustainability Learning Session",
        description: "Research and learn about sustainability topics, read articles, watch documentaries.",
        duration_minutes: 30,
        sdg_category: "Quality Education (SDG 4)",
    },
];

pub fn find_template(key: &str) -> Option<&'static EventTemplate> {
    TEMPLATES.iter().find(|t| t.key == key)
}

impl EventTemplate {
    /// A one-off event starting at `start` and lasting the template's duration
    pub fn to_request(
        &self,
        start: DateTime<FixedOffset>,
        access_token: String,
        refresh_token: Option<String>,
    ) -> EventRequest {
        EventRequest {
            title: self.title.to_string(),
            description: Some(self.description.to_string()),
            start_date_time: start,
            end_date_time: start + Duration::minutes(self.duration_minutes),
            sdg_category: Some(self.sdg_category.to_string()),
            recurrence: None,
            access_token,
            refresh_token,
        }
    }
}

/// Recurring impact reminders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reminder {
    /// Monday review of the week's activities
    Weekly,
    /// Evening check-in every day
    Daily,
}

impl Reminder {
    pub fn template(&self) -> EventTemplate {
        match self {
            Reminder::Weekly => EventTemplate {
                key: "weekly",
                title: "Weekly Sustainability Impact Review",
                description: "Time to review and log your weekly sustainability activities and impact metrics.",
                duration_minutes: 30,
                sdg_category: "Impact Tracking",
            },
            Reminder::Daily => EventTemplate {
                key: "daily",
                title: "Daily Impact Check-in",
                description: "Quick daily reflection on sustainability actions and progress toward your impact goals.",
                duration_minutes: 15,
                sdg_category: "Daily Tracking",
            },
        }
    }

    pub fn rrule(&self) -> &'static str {
        match self {
            Reminder::Weekly => "RRULE:FREQ=WEEKLY;BYDAY=MO",
            Reminder::Daily => "RRULE:FREQ=DAILY",
        }
    }

    /// Local hour of day the reminder is pinned to
    pub fn hour(&self) -> u32 {
        match self {
            Reminder::Weekly => 10,
            Reminder::Daily => 18,
        }
    }

    /// First occurrence after `now`: the next 10:00 (weekly review) or
    /// 18:00 (daily check-in) in `now`'s offset.
    pub fn first_start(&self, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let time = NaiveTime::from_hms_opt(self.hour(), 0, 0).unwrap_or_default();
        let candidate = now
            .offset()
            .from_local_datetime(&now.date_naive().and_time(time))
            .single()
            .unwrap_or(now);
        if candidate > now {
            candidate
        } else {
            candidate + Duration::days(1)
        }
    }

    pub fn to_request(
        &self,
        now: DateTime<FixedOffset>,
        access_token: String,
        refresh_token: Option<String>,
    ) -> EventRequest {
        let mut request =
            self.template()
                .to_request(self.first_start(now), access_token, refresh_token);
        request.recurrence = Some(vec![self.rrule().to_string()]);
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_template_end_is_start_plus_duration() {
        let start = at("2025-03-03T09:00:00+02:00");
        for template in TEMPLATES {
            let request = template.to_request(start, "token".into(), None);
            assert_eq!(
                request.end_date_time - request.start_date_time,
                Duration::minutes(template.duration_minutes)
            );
            assert_eq!(request.sdg_category.as_deref(), Some(template.sdg_category));
        }
    }

    #[test]
    fn test_find_template() {
        assert_eq!(
            find_template("community-impact-project").map(|t| t.duration_minutes),
            Some(120)
        );
        assert!(find_template("unknown").is_none());
    }

    #[test]
    fn test_weekly_reminder() {
        let now = at("2025-03-03T12:00:00Z");
        let request = Reminder::Weekly.to_request(now, "token".into(), Some("refresh".into()));

        assert_eq!(request.start_date_time, at("2025-03-04T10:00:00Z"));
        assert_eq!(request.end_date_time, at("2025-03-04T10:30:00Z"));
        assert_eq!(request.recurrence, Some(vec!["RRULE:FREQ=WEEKLY;BYDAY=MO".to_string()]));
    }

    #[test]
    fn test_weekly_reminder_is_pinned_to_ten() {
        assert_eq!(
            Reminder::Weekly.first_start(at("2025-03-03T07:42:13+02:00")),
            at("2025-03-03T10:00:00+02:00")
        );
        assert_eq!(
            Reminder::Weekly.first_start(at("2025-03-03T10:00:00+02:00")),
            at("2025-03-04T10:00:00+02:00")
        );
    }

    #[test]
    fn test_daily_reminder_rolls_over() {
        assert_eq!(
            Reminder::Daily.first_start(at("2025-03-03T09:00:00-08:00")),
            at("2025-03-03T18:00:00-08:00")
        );
        assert_eq!(
            Reminder::Daily.first_start(at("2025-03-03T18:00:00-08:00")),
            at("2025-03-04T18:00:00-08:00")
        );
    }
}

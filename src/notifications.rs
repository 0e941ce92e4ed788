//! Due-Date Notifications
//!
//! The notice list is a pure function of the events and the current time;
//! it is recomputed wholesale on every check.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::models::CalendarEvent;

/// How far ahead an event counts as upcoming
pub const UPCOMING_WINDOW_HOURS: i64 = 48;

/// Poll period of the background check
pub const POLL_INTERVAL_MS: u32 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Upcoming,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: String,
    pub kind: NoticeKind,
    pub text: String,
}

pub fn check_notifications(events: &[CalendarEvent], now: DateTime<Utc>) -> Vec<Notice> {
    let soon = now + Duration::hours(UPCOMING_WINDOW_HOURS);
    events
        .iter()
        .filter(|ev| !ev.props.completed)
        .filter_map(|ev| {
            let raw = ev.start.as_deref()?;
            let start = parse_start(raw)?;
            let (kind, text) = if start > now && start <= soon {
                (NoticeKind::Upcoming, format!("Upcoming: {} on {}", ev.title, raw))
            } else if start < now {
                (NoticeKind::Overdue, format!("Overdue: {} (was {})", ev.title, raw))
            } else {
                return None;
            };
            Some(Notice { id: ev.id.clone(), kind, text })
        })
        .collect()
}

/// RFC 3339 as given; naive date-times in local time; bare dates at UTC midnight
pub fn parse_start(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

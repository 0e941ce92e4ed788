//! Calendar Layout
//!
//! Grid computation and drag-reschedule math for the calendar view.
//! Events are all-day: an end date is exclusive.

use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

use crate::api::{ApiError, HttpBackend, MilestoneApi};
use crate::models::{CalendarEvent, MilestonePatch};

/// Days shown by the month grid (six full weeks)
pub const MONTH_GRID_DAYS: usize = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarMode {
    #[default]
    Month,
    Week,
    List,
}

impl CalendarMode {
    pub const ALL: [CalendarMode; 3] = [CalendarMode::Month, CalendarMode::Week, CalendarMode::List];

    pub fn label(self) -> &'static str {
        match self {
            CalendarMode::Month => "Month",
            CalendarMode::Week => "Week",
            CalendarMode::List => "List",
        }
    }
}

/// Optimistic date change shown while the update is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub id: String,
    pub start: String,
    pub end: String,
}

impl PendingMove {
    /// Only the dates are sent
    pub fn to_patch(&self) -> MilestonePatch {
        MilestonePatch::dates(self.start.clone(), self.end.clone())
    }
}

/// Drag moves drawn over the loaded events, at most one per milestone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingMoves(HashMap<String, PendingEntry>);

#[derive(Debug, Clone, PartialEq)]
struct PendingEntry {
    mv: PendingMove,
    /// Reload generation that will carry the saved dates
    settles_with: Option<u32>,
}

impl PendingMoves {
    /// Show `mv`, replacing an earlier move of the same milestone
    pub fn begin(&mut self, mv: PendingMove) {
        self.0.insert(mv.id.clone(), PendingEntry { mv, settles_with: None });
    }

    /// Drop a move whose update failed, unless a newer move replaced it
    pub fn abandon(&mut self, mv: &PendingMove) {
        if self.0.get(&mv.id).is_some_and(|entry| entry.mv == *mv) {
            self.0.remove(&mv.id);
        }
    }

    /// The update for `mv` succeeded; keep it until reload `generation` lands
    pub fn saved(&mut self, mv: &PendingMove, generation: u32) {
        if let Some(entry) = self.0.get_mut(&mv.id).filter(|entry| entry.mv == *mv) {
            entry.settles_with = Some(generation);
        }
    }

    /// A reload of `generation` finished: drop the moves it now reflects
    pub fn settle(&mut self, generation: u32) {
        self.0
            .retain(|_, entry| entry.settles_with.map_or(true, |needed| needed > generation));
    }

    pub fn get(&self, id: &str) -> Option<&PendingMove> {
        self.0.get(id).map(|entry| &entry.mv)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Send the dates of a dropped event.
///
/// On error the caller abandons the move so the event snaps back; on
/// success it stays drawn until the following reload.
pub async fn save_move<B: HttpBackend>(api: &MilestoneApi<B>, mv: &PendingMove) -> Result<(), ApiError> {
    api.update(&mv.id, &mv.to_patch()).await?;
    Ok(())
}

/// Sunday on or before `day`
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

pub fn month_grid(anchor: NaiveDate) -> Vec<NaiveDate> {
    let first = anchor.with_day(1).unwrap_or(anchor);
    week_start(first).iter_days().take(MONTH_GRID_DAYS).collect()
}

pub fn week_days(anchor: NaiveDate) -> Vec<NaiveDate> {
    week_start(anchor).iter_days().take(7).collect()
}

/// Move the visible range one page forward or back
pub fn shift(anchor: NaiveDate, mode: CalendarMode, forward: bool) -> NaiveDate {
    match mode {
        CalendarMode::Month => {
            let first = anchor.with_day(1).unwrap_or(anchor);
            let moved = if forward {
                first.checked_add_months(Months::new(1))
            } else {
                first.checked_sub_months(Months::new(1))
            };
            moved.unwrap_or(first)
        }
        CalendarMode::Week | CalendarMode::List => {
            if forward {
                anchor + Duration::days(7)
            } else {
                anchor - Duration::days(7)
            }
        }
    }
}

pub fn title(anchor: NaiveDate, mode: CalendarMode) -> String {
    match mode {
        CalendarMode::Month => anchor.format("%B %Y").to_string(),
        CalendarMode::Week | CalendarMode::List => {
            let from = week_start(anchor);
            let to = from + Duration::days(6);
            format!("{} – {}", from.format("%b %-d"), to.format("%b %-d, %Y"))
        }
    }
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Calendar day of a stored date or date-time string
pub fn event_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn covers(event: &CalendarEvent, day: NaiveDate) -> bool {
    let Some(start) = event.start.as_deref().and_then(event_date) else {
        return false;
    };
    match event.end.as_deref().and_then(event_date) {
        Some(end) if end > start => start <= day && day < end,
        _ => day == start,
    }
}

/// Events visible on `day`, input order kept
pub fn events_on(events: &[CalendarEvent], day: NaiveDate) -> Vec<CalendarEvent> {
    events.iter().filter(|ev| covers(ev, day)).cloned().collect()
}

/// Events overlapping `[from, from + days)` sorted by start date
pub fn events_in_range(events: &[CalendarEvent], from: NaiveDate, days: usize) -> Vec<CalendarEvent> {
    let mut found: Vec<CalendarEvent> = events
        .iter()
        .filter(|ev| from.iter_days().take(days).any(|day| covers(ev, day)))
        .cloned()
        .collect();
    found.sort_by_key(|ev| ev.start.as_deref().and_then(event_date));
    found
}

/// Dates after dropping `event` on `target`; the duration is kept and a
/// missing end collapses onto the new start
pub fn reschedule(event: &CalendarEvent, target: NaiveDate) -> Option<PendingMove> {
    let raw_start = event.start.as_deref()?;
    let start = event_date(raw_start)?;
    let delta = target.signed_duration_since(start);

    let new_start = replace_date(raw_start, target);
    let new_end = event
        .end
        .as_deref()
        .and_then(|raw_end| event_date(raw_end).map(|end| replace_date(raw_end, end + delta)))
        .unwrap_or_else(|| new_start.clone());

    Some(PendingMove {
        id: event.id.clone(),
        start: new_start,
        end: new_end,
    })
}

/// Swap the date part, keeping any time suffix
fn replace_date(raw: &str, day: NaiveDate) -> String {
    let raw = raw.trim();
    let suffix = raw.get(10..).unwrap_or("");
    format!("{}{}", day.format("%Y-%m-%d"), suffix)
}

/// Events as rendered, with in-flight moves applied on top
pub fn with_pending(events: &[CalendarEvent], pending: &PendingMoves) -> Vec<CalendarEvent> {
    if pending.is_empty() {
        return events.to_vec();
    }
    events
        .iter()
        .map(|ev| match pending.get(&ev.id) {
            Some(mv) => CalendarEvent {
                start: Some(mv.start.clone()),
                end: Some(mv.end.clone()),
                ..ev.clone()
            },
            None => ev.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{json_response, FakeBackend};
    use crate::api::{RequestBody, Transport, TransportError, DEFAULT_TIMEOUT};
    use crate::models::{EventColor, EventProps};
    use futures::executor::block_on;
    use reqwest::Method;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: &str, start: &str, end: Option<&str>) -> CalendarEvent {
        CalendarEvent {
            id: id.into(),
            title: id.into(),
            start: Some(start.into()),
            end: end.map(str::to_string),
            color: EventColor::MEDIUM,
            props: EventProps::default(),
        }
    }

    #[test]
    fn test_month_grid_starts_on_sunday() {
        // June 1st 2024 is a Saturday
        let grid = month_grid(date(2024, 6, 15));
        assert_eq!(grid.len(), MONTH_GRID_DAYS);
        assert_eq!(grid[0], date(2024, 5, 26));
        assert_eq!(grid[6], date(2024, 6, 1));
        assert_eq!(grid[41], date(2024, 7, 6));
    }

    #[test]
    fn test_week_days() {
        let days = week_days(date(2024, 6, 5));
        assert_eq!(days.first(), Some(&date(2024, 6, 2)));
        assert_eq!(days.last(), Some(&date(2024, 6, 8)));
    }

    #[test]
    fn test_shift_month_clamps_to_first() {
        assert_eq!(shift(date(2024, 1, 31), CalendarMode::Month, true), date(2024, 2, 1));
        assert_eq!(shift(date(2024, 1, 31), CalendarMode::Month, false), date(2023, 12, 1));
        assert_eq!(shift(date(2024, 1, 31), CalendarMode::Week, true), date(2024, 2, 7));
    }

    #[test]
    fn test_end_is_exclusive() {
        let ev = event("a", "2024-06-01", Some("2024-06-03"));
        assert!(covers(&ev, date(2024, 6, 1)));
        assert!(covers(&ev, date(2024, 6, 2)));
        assert!(!covers(&ev, date(2024, 6, 3)));

        let single = event("b", "2024-06-01T09:30:00", Some("2024-06-01"));
        assert!(covers(&single, date(2024, 6, 1)));
        assert!(!covers(&single, date(2024, 6, 2)));
    }

    #[test]
    fn test_reschedule_keeps_duration() {
        let ev = event("a", "2024-06-01", Some("2024-06-04"));
        let mv = reschedule(&ev, date(2024, 6, 10)).unwrap();
        assert_eq!(mv.start, "2024-06-10");
        assert_eq!(mv.end, "2024-06-13");
    }

    #[test]
    fn test_reschedule_without_end_uses_start() {
        let ev = event("a", "2024-06-01T10:00", None);
        let mv = reschedule(&ev, date(2024, 5, 30)).unwrap();
        assert_eq!(mv.start, "2024-05-30T10:00");
        assert_eq!(mv.end, "2024-05-30T10:00");
        assert_eq!(
            serde_json::to_value(mv.to_patch()).unwrap(),
            serde_json::json!({ "start_date": "2024-05-30T10:00", "end_date": "2024-05-30T10:00" })
        );
    }

    #[test]
    fn test_pending_move_overlays_without_touching_source() {
        let events = vec![event("a", "2024-06-01", None), event("b", "2024-06-02", None)];
        let mut pending = PendingMoves::default();
        pending.begin(reschedule(&events[0], date(2024, 6, 9)).unwrap());
        let shown = with_pending(&events, &pending);
        assert_eq!(shown[0].start.as_deref(), Some("2024-06-09"));
        assert_eq!(shown[1], events[1]);
        assert_eq!(events[0].start.as_deref(), Some("2024-06-01"));
        assert_eq!(with_pending(&events, &PendingMoves::default()), events);
    }

    #[test]
    fn test_moves_of_different_events_are_kept_apart() {
        let events = vec![event("a", "2024-06-01", None), event("b", "2024-06-02", None)];
        let first = reschedule(&events[0], date(2024, 6, 9)).unwrap();
        let second = reschedule(&events[1], date(2024, 6, 12)).unwrap();
        let mut pending = PendingMoves::default();
        pending.begin(first.clone());
        pending.begin(second.clone());

        // a reload that started before either update finished settles nothing
        pending.settle(7);
        assert_eq!(pending.get("a"), Some(&first));

        pending.abandon(&second);
        let shown = with_pending(&events, &pending);
        assert_eq!(shown[0].start.as_deref(), Some("2024-06-09"));
        assert_eq!(shown[1].start.as_deref(), Some("2024-06-02"));
    }

    #[test]
    fn test_saved_move_clears_only_with_its_reload() {
        let ev = event("a", "2024-06-01", None);
        let mv = reschedule(&ev, date(2024, 6, 9)).unwrap();
        let mut pending = PendingMoves::default();
        pending.begin(mv.clone());
        pending.saved(&mv, 4);

        pending.settle(3);
        assert_eq!(pending.get("a"), Some(&mv));
        pending.settle(4);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_stale_result_does_not_touch_newer_move() {
        let ev = event("a", "2024-06-01", None);
        let older = reschedule(&ev, date(2024, 6, 9)).unwrap();
        let newer = reschedule(&ev, date(2024, 6, 20)).unwrap();
        let mut pending = PendingMoves::default();
        pending.begin(older.clone());
        pending.begin(newer.clone());

        pending.abandon(&older);
        pending.saved(&older, 2);
        pending.settle(2);
        assert_eq!(pending.get("a"), Some(&newer));
    }

    fn api(responses: Vec<Result<crate::api::RawResponse, crate::api::TransportError>>) -> MilestoneApi<FakeBackend> {
        MilestoneApi::new(Transport::new(
            FakeBackend::new(responses),
            "http://localhost:3000",
            "http://127.0.0.1:5000",
            DEFAULT_TIMEOUT,
        ))
    }

    #[test]
    fn test_failed_save_reverts_the_event() {
        let events = vec![event("m1", "2024-06-01", Some("2024-06-03"))];
        let mv = reschedule(&events[0], date(2024, 6, 10)).unwrap();
        let mut pending = PendingMoves::default();
        pending.begin(mv.clone());

        let api = api(vec![Err(TransportError::Network("connection reset".into()))]);
        let result = block_on(save_move(&api, &mv));
        assert!(matches!(result, Err(ApiError::Network(_))));

        let calls = api.transport().backend().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].request.method, Method::PUT);
        assert_eq!(calls[0].url, "http://localhost:3000/api/milestones/m1");
        assert_eq!(
            calls[0].request.body,
            RequestBody::Json(json!({ "start_date": "2024-06-10", "end_date": "2024-06-12" }))
        );

        pending.abandon(&mv);
        assert_eq!(with_pending(&events, &pending), events);
    }

    #[test]
    fn test_successful_save_keeps_overlay_until_reload() {
        let events = vec![event("m1", "2024-06-01", None)];
        let mv = reschedule(&events[0], date(2024, 6, 10)).unwrap();
        let mut pending = PendingMoves::default();
        pending.begin(mv.clone());

        let api = api(vec![Ok(json_response(200, json!({ "message": "Milestone updated" })))]);
        block_on(save_move(&api, &mv)).unwrap();
        pending.saved(&mv, 1);
        assert_eq!(with_pending(&events, &pending)[0].start.as_deref(), Some("2024-06-10"));

        pending.settle(1);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_events_in_range_sorted() {
        let events = vec![
            event("late", "2024-06-07", None),
            event("early", "2024-06-03", None),
            event("outside", "2024-06-20", None),
            event("spanning", "2024-05-30", Some("2024-06-04")),
        ];
        let ids: Vec<_> = events_in_range(&events, date(2024, 6, 2), 7).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["spanning", "early", "late"]);
    }
}

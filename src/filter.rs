//! Sidebar Filtering
//!
//! Search, completion filter and sort order for the milestone list.

use crate::calendar::event_date;
use crate::models::CalendarEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Completed, StatusFilter::Pending];

    pub fn value(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Completed => "completed",
            StatusFilter::Pending => "pending",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Completed => "Completed",
            StatusFilter::Pending => "Pending",
        }
    }

    pub fn from_value(value: &str) -> Self {
        Self::ALL.into_iter().find(|f| f.value() == value).unwrap_or_default()
    }

    fn accepts(self, event: &CalendarEvent) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => event.props.completed,
            StatusFilter::Pending => !event.props.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Date,
    Priority,
}

impl SortBy {
    pub const ALL: [SortBy; 2] = [SortBy::Date, SortBy::Priority];

    pub fn value(self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::Priority => "priority",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortBy::Date => "Sort: Date",
            SortBy::Priority => "Sort: Priority",
        }
    }

    pub fn from_value(value: &str) -> Self {
        Self::ALL.into_iter().find(|s| s.value() == value).unwrap_or_default()
    }
}

/// Rows shown in the sidebar. Sorting is stable, so ties keep server order;
/// events without a start date sort first by date.
pub fn visible_events(events: &[CalendarEvent], filter: StatusFilter, search: &str, sort: SortBy) -> Vec<CalendarEvent> {
    let needle = search.trim().to_lowercase();
    let mut rows: Vec<CalendarEvent> = events
        .iter()
        .filter(|ev| filter.accepts(ev))
        .filter(|ev| needle.is_empty() || ev.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    match sort {
        SortBy::Date => rows.sort_by_key(|ev| ev.start.as_deref().and_then(event_date)),
        SortBy::Priority => rows.sort_by_key(|ev| ev.props.priority.rank()),
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventColor, EventProps, Priority};

    fn event(id: &str, start: &str, priority: Priority, completed: bool) -> CalendarEvent {
        CalendarEvent {
            id: id.into(),
            title: format!("{id} milestone"),
            start: Some(start.into()),
            end: None,
            color: EventColor::MEDIUM,
            props: EventProps { priority, completed, ..Default::default() },
        }
    }

    fn ids(rows: Vec<CalendarEvent>) -> Vec<String> {
        rows.into_iter().map(|e| e.id).collect()
    }

    fn sample() -> Vec<CalendarEvent> {
        vec![
            event("beta", "2024-06-03", Priority::Low, false),
            event("alpha", "2024-06-01", Priority::Medium, true),
            event("gamma", "2024-06-02", Priority::High, false),
        ]
    }

    #[test]
    fn test_sort_by_date() {
        let rows = visible_events(&sample(), StatusFilter::All, "", SortBy::Date);
        assert_eq!(ids(rows), ["alpha", "gamma", "beta"]);
    }

    #[test]
    fn test_sort_by_priority_puts_high_first() {
        let rows = visible_events(&sample(), StatusFilter::All, "", SortBy::Priority);
        assert_eq!(ids(rows), ["gamma", "alpha", "beta"]);
    }

    #[test]
    fn test_filter_and_search() {
        let rows = visible_events(&sample(), StatusFilter::Pending, "", SortBy::Date);
        assert_eq!(ids(rows), ["gamma", "beta"]);
        let rows = visible_events(&sample(), StatusFilter::Completed, "", SortBy::Date);
        assert_eq!(ids(rows), ["alpha"]);
        let rows = visible_events(&sample(), StatusFilter::All, "  GAM ", SortBy::Date);
        assert_eq!(ids(rows), ["gamma"]);
    }

    #[test]
    fn test_select_values_round_trip() {
        assert_eq!(StatusFilter::from_value("pending"), StatusFilter::Pending);
        assert_eq!(StatusFilter::from_value("bogus"), StatusFilter::All);
        assert_eq!(SortBy::from_value("priority"), SortBy::Priority);
    }
}

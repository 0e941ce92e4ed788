//! View-Model Adapter
//!
//! Converts server milestone records into calendar display records.
//! Pure and order-preserving: the display set is always rebuilt in full.

use crate::models::{CalendarEvent, EventColor, EventProps, Milestone, Priority};

/// Adapt every record, keeping input order
pub fn to_calendar_events(items: &[Milestone]) -> Vec<CalendarEvent> {
    items.iter().map(to_calendar_event).collect()
}

pub fn to_calendar_event(item: &Milestone) -> CalendarEvent {
    let is_milestone = item.is_milestone.unwrap_or(false);
    let priority = item.priority.clone().unwrap_or_default();

    CalendarEvent {
        id: item.id.clone(),
        title: item.title.clone(),
        start: first_present(&item.start_date, &item.start),
        end: first_present(&item.end_date, &item.end),
        color: event_color(is_milestone, &priority),
        props: EventProps {
            is_milestone,
            description: item.description.clone().unwrap_or_default(),
            priority,
            completed: item.completed.unwrap_or(false),
            progress: clamp_progress(item.progress.unwrap_or(0.0)),
            notes: item.notes.clone().unwrap_or_default(),
            attachments: item.attachments.clone().unwrap_or_default(),
            reminder_time: item.reminder_time.clone().filter(|s| !s.is_empty()),
            subtasks: item.subtasks.clone().unwrap_or_default(),
        },
    }
}

/// Plain tasks are always orange; milestones are coloured by priority
pub fn event_color(is_milestone: bool, priority: &Priority) -> EventColor {
    if !is_milestone {
        return EventColor::TASK;
    }
    match priority {
        Priority::High => EventColor::HIGH,
        Priority::Low => EventColor::LOW,
        _ => EventColor::MEDIUM,
    }
}

fn first_present(preferred: &Option<String>, fallback: &Option<String>) -> Option<String> {
    preferred
        .as_ref()
        .filter(|s| !s.is_empty())
        .or_else(|| fallback.as_ref().filter(|s| !s.is_empty()))
        .cloned()
}

fn clamp_progress(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

//! Calendar View Component
//!
//! Month, week and list views over the project's milestones.
//! Chips can be dragged onto another day to reschedule them.

use chrono::{Datelike, Local, NaiveDate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{
    bind_global_mouseup, create_dnd_signals, make_on_mousedown, make_on_mouseleave, make_on_target_mouseenter,
    DndSignals,
};

use crate::browser;
use crate::calendar::{self, CalendarMode};
use crate::context::{use_app_context, AppContext};
use crate::editor::EditDraft;
use crate::models::CalendarEvent;
use crate::store::{use_app_store, AppStateStoreFields};

const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

type CalendarDnd = DndSignals<String, NaiveDate>;

#[component]
pub fn CalendarView() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (mode, set_mode) = signal(CalendarMode::Month);
    let (anchor, set_anchor) = signal(Local::now().date_naive());

    // Events as drawn, including moves that are still being saved
    let shown = Memo::new(move |_| {
        ctx.pending_moves
            .with(|pending| store.events().with(|events| calendar::with_pending(events, pending)))
    });

    let dnd: CalendarDnd = create_dnd_signals();
    bind_global_mouseup(dnd, move |id: String, day: NaiveDate| {
        let Some(event) = shown.with_untracked(|events| events.iter().find(|e| e.id == id).cloned()) else {
            return;
        };
        let Some(mv) = calendar::reschedule(&event, day) else {
            tracing::warn!(%id, "dropped event has no start date");
            return;
        };
        if event.start.as_deref() == Some(mv.start.as_str()) {
            return;
        }

        tracing::debug!(%id, start = %mv.start, end = %mv.end, "rescheduling");
        ctx.begin_move(mv.clone());
        spawn_local(async move {
            match calendar::save_move(&ctx.api(), &mv).await {
                Ok(()) => ctx.move_saved(&mv),
                Err(e) => {
                    tracing::error!(id = %mv.id, error = %e, "reschedule failed");
                    ctx.abandon_move(&mv);
                    browser::alert("Failed to update event date");
                }
            }
        });
    });

    view! {
        <section class="calendar">
            <div class="calendar-toolbar">
                <div class="nav">
                    <button type="button" on:click=move |_| set_anchor.update(|a| *a = calendar::shift(*a, mode.get_untracked(), false))>"‹"</button>
                    <button type="button" on:click=move |_| set_anchor.set(Local::now().date_naive())>"Today"</button>
                    <button type="button" on:click=move |_| set_anchor.update(|a| *a = calendar::shift(*a, mode.get_untracked(), true))>"›"</button>
                </div>
                <h2 class="calendar-title">{move || calendar::title(anchor.get(), mode.get())}</h2>
                <div class="mode-switch">
                    {CalendarMode::ALL.into_iter().map(|m| view! {
                        <button
                            type="button"
                            class=move || if mode.get() == m { "active" } else { "" }
                            on:click=move |_| set_mode.set(m)
                        >
                            {m.label()}
                        </button>
                    }).collect_view()}
                </div>
            </div>

            {move || {
                let day = anchor.get();
                match mode.get() {
                    CalendarMode::Month => {
                        let events = shown.get();
                        let cells = calendar::month_grid(day)
                            .into_iter()
                            .map(|d| view! {
                                <DayCell
                                    day=d
                                    outside=d.month() != day.month()
                                    events=calendar::events_on(&events, d)
                                    dnd=dnd
                                    ctx=ctx
                                />
                            })
                            .collect_view();
                        view! {
                            <div class="calendar-grid month">
                                <WeekdayHeaders />
                                {cells}
                            </div>
                        }
                        .into_any()
                    }
                    CalendarMode::Week => {
                        let events = shown.get();
                        let cells = calendar::week_days(day)
                            .into_iter()
                            .map(|d| view! {
                                <DayCell
                                    day=d
                                    outside=false
                                    events=calendar::events_on(&events, d)
                                    dnd=dnd
                                    ctx=ctx
                                />
                            })
                            .collect_view();
                        view! {
                            <div class="calendar-grid week">
                                <WeekdayHeaders />
                                {cells}
                            </div>
                        }
                        .into_any()
                    }
                    CalendarMode::List => {
                        let events = calendar::events_in_range(&shown.get(), calendar::week_start(day), 7);
                        view! { <EventList events=events ctx=ctx /> }.into_any()
                    }
                }
            }}
        </section>
    }
}

#[component]
fn WeekdayHeaders() -> impl IntoView {
    WEEKDAY_HEADERS
        .into_iter()
        .map(|name| view! { <div class="weekday-header">{name}</div> })
        .collect_view()
}

/// One grid day; also a drop target
#[component]
fn DayCell(
    day: NaiveDate,
    outside: bool,
    events: Vec<CalendarEvent>,
    dnd: CalendarDnd,
    ctx: AppContext,
) -> impl IntoView {
    let today = Local::now().date_naive();
    let mut class = String::from("day");
    if outside {
        class.push_str(" outside");
    }
    if calendar::is_weekend(day) {
        class.push_str(" weekend");
    }
    if day == today {
        class.push_str(" today");
    }

    let cell_class = move || {
        if dnd.drop_target_read.get() == Some(day) {
            format!("{class} drop-target")
        } else {
            class.clone()
        }
    };

    view! {
        <div
            class=cell_class
            on:mouseenter=make_on_target_mouseenter(dnd, day)
            on:mouseleave=make_on_mouseleave(dnd)
        >
            <div class="day-number">{day.day()}</div>
            {events
                .into_iter()
                .map(|event| view! { <EventChip event=event dnd=dnd ctx=ctx /> })
                .collect_view()}
        </div>
    }
}

#[component]
fn EventChip(event: CalendarEvent, dnd: CalendarDnd, ctx: AppContext) -> impl IntoView {
    let id = event.id.clone();
    let style = format!(
        "background: {}; border-color: {}",
        event.color.background, event.color.border
    );
    let label = if event.props.is_milestone {
        format!("◆ {}", event.title)
    } else {
        event.title.clone()
    };
    let completed = event.props.completed;

    let dragged_id = id.clone();
    let is_dragging = move || dnd.dragging_read.with(|d| d.as_deref() == Some(dragged_id.as_str()));

    let open = move |_| {
        if dnd.drag_just_ended_read.get_untracked() {
            return;
        }
        ctx.open_editor(EditDraft::from_event(&event));
    };

    view! {
        <div
            class="event-chip"
            class:completed=completed
            class:dragging=is_dragging
            style=style
            on:mousedown=make_on_mousedown(dnd, id)
            on:click=open
        >
            {label}
        </div>
    }
}

/// Week agenda
#[component]
fn EventList(events: Vec<CalendarEvent>, ctx: AppContext) -> impl IntoView {
    if events.is_empty() {
        return view! { <div class="muted">"No events this week"</div> }.into_any();
    }

    view! {
        <ul class="event-list">
            {events
                .into_iter()
                .map(|event| {
                    let when = event.start.clone().unwrap_or_default();
                    let swatch = format!("background: {}", event.color.background);
                    let title = event.title.clone();
                    let open = move |_| ctx.open_editor(EditDraft::from_event(&event));
                    view! {
                        <li class="event-list-item" on:click=open>
                            <span class="color" style=swatch />
                            <span class="when">{when}</span>
                            <span class="title">{title}</span>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

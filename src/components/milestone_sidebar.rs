//! Milestone Sidebar Component
//!
//! Searchable, filterable list of milestones with quick actions.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::browser;
use crate::components::{ConfirmButton, NewMilestoneForm};
use crate::context::use_app_context;
use crate::editor::EditDraft;
use crate::filter::{visible_events, SortBy, StatusFilter};
use crate::models::{CalendarEvent, MilestonePatch};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn MilestoneSidebar() -> impl IntoView {
    let store = use_app_store();

    let (search, set_search) = signal(String::new());
    let (filter, set_filter) = signal(StatusFilter::All);
    let (sort_by, set_sort_by) = signal(SortBy::Date);

    let rows = move || visible_events(&store.events().get(), filter.get(), &search.get(), sort_by.get());

    view! {
        <aside class="timeline-sidebar">
            <h2>"Milestones"</h2>
            <div class="sidebar-search">
                <input
                    placeholder="Search"
                    prop:value=move || search.get()
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
            </div>
            <div class="sidebar-selects">
                <select on:change=move |ev| set_filter.set(StatusFilter::from_value(&event_target_value(&ev)))>
                    {StatusFilter::ALL.into_iter().map(|f| view! {
                        <option value=f.value() selected=move || filter.get() == f>{f.label()}</option>
                    }).collect_view()}
                </select>
                <select on:change=move |ev| set_sort_by.set(SortBy::from_value(&event_target_value(&ev)))>
                    {SortBy::ALL.into_iter().map(|s| view! {
                        <option value=s.value() selected=move || sort_by.get() == s>{s.label()}</option>
                    }).collect_view()}
                </select>
            </div>

            <NewMilestoneForm />

            <div class="milestone-list">
                {move || {
                    if store.loading().get() {
                        view! { <div class="muted">"Loading..."</div> }.into_any()
                    } else if store.events().with(Vec::is_empty) {
                        view! { <div class="muted">"No milestones yet"</div> }.into_any()
                    } else {
                        rows()
                            .into_iter()
                            .map(|event| view! { <MilestoneRow event=event /> })
                            .collect_view()
                            .into_any()
                    }
                }}
            </div>
        </aside>
    }
}

/// One sidebar entry
#[component]
fn MilestoneRow(event: CalendarEvent) -> impl IntoView {
    let ctx = use_app_context();

    let id = event.id.clone();
    let completed = event.props.completed;
    let progress = event.props.progress;
    let dates = match (&event.start, &event.end) {
        (Some(start), Some(end)) if end != start => format!("{start} → {end}"),
        (Some(start), _) => start.clone(),
        (None, _) => String::new(),
    };

    let edit = {
        let event = event.clone();
        move |_| ctx.open_editor(EditDraft::from_event(&event))
    };

    let toggle_complete = {
        let id = id.clone();
        move |_| {
            let id = id.clone();
            spawn_local(async move {
                match ctx.api().update(&id, &MilestonePatch::completed(!completed)).await {
                    Ok(_) => ctx.reload(),
                    Err(e) => {
                        tracing::error!(%id, error = %e, "toggle complete failed");
                        browser::alert("Failed to update");
                    }
                }
            });
        }
    };

    let delete = Callback::new(move |_| {
        let id = id.clone();
        spawn_local(async move {
            match ctx.api().delete(&id).await {
                Ok(_) => ctx.reload(),
                Err(e) => {
                    tracing::error!(%id, error = %e, "delete failed");
                    browser::alert("Failed to delete");
                }
            }
        });
    });

    view! {
        <div class=if completed { "milestone-item completed" } else { "milestone-item" }>
            <div class="color" style=format!("background: {}", event.color.background) />
            <div class="meta">
                <div class="title">
                    {event.title.clone()}
                    <small class="priority-tag">"[" {event.props.priority.as_str().to_string()} "]"</small>
                </div>
                <div class="dates">{dates}</div>
                <div class="progress">
                    <div class="progress-track">
                        <div class="progress-fill" style=format!("width: {progress}%") />
                    </div>
                    <div class="progress-label">{format!("{progress}% complete")}</div>
                </div>
            </div>
            <div class="row-actions">
                <button type="button" class="btn-ghost" on:click=edit>"Edit"</button>
                <button type="button" class="btn-ghost" on:click=toggle_complete>
                    {if completed { "✅ Done" } else { "🕐 Pending" }}
                </button>
                <ConfirmButton
                    label="Delete"
                    prompt="Delete this milestone?"
                    button_class="btn-ghost"
                    on_confirm=delete
                />
            </div>
        </div>
    }
}

//! New Milestone Form Component
//!
//! Sidebar form for creating milestones or plain tasks.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::browser;
use crate::context::use_app_context;
use crate::models::NewMilestone;

/// Form for creating new milestones
#[component]
pub fn NewMilestoneForm() -> impl IntoView {
    let ctx = use_app_context();

    let (title, set_title) = signal(String::new());
    let (start_date, set_start_date) = signal(String::new());
    let (end_date, set_end_date) = signal(String::new());
    let (is_milestone, set_is_milestone) = signal(true);
    let (adding, set_adding) = signal(false);

    let create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let end = end_date.get();
        let new = NewMilestone {
            title: title.get(),
            start_date: start_date.get(),
            end_date: Some(end).filter(|e| !e.is_empty()),
            project_id: ctx.project_id(),
            is_milestone: is_milestone.get(),
        };
        if new.validate().is_err() {
            return;
        }

        set_adding.set(true);
        spawn_local(async move {
            match ctx.api().create(&new).await {
                Ok(_) => {
                    tracing::info!(title = %new.title, "milestone created");
                    set_title.set(String::new());
                    set_start_date.set(String::new());
                    set_end_date.set(String::new());
                    ctx.reload();
                }
                Err(e) => {
                    tracing::error!(error = %e, "create milestone failed");
                    browser::alert(&e.to_string());
                }
            }
            set_adding.set(false);
        });
    };

    view! {
        <form class="milestone-form" on:submit=create>
            <input
                class="input-text"
                type="text"
                placeholder="Title"
                required
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <div class="date-row">
                <input
                    type="date"
                    required
                    prop:value=move || start_date.get()
                    on:input=move |ev| set_start_date.set(event_target_value(&ev))
                />
                <input
                    type="date"
                    prop:value=move || end_date.get()
                    on:input=move |ev| set_end_date.set(event_target_value(&ev))
                />
            </div>
            <div class="form-row">
                <label class="checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || is_milestone.get()
                        on:change=move |ev| set_is_milestone.set(event_target_checked(&ev))
                    />
                    "Milestone"
                </label>
                <button class="btn-primary" type="submit" disabled=move || adding.get()>
                    {move || if adding.get() { "Adding…" } else { "Add" }}
                </button>
            </div>
        </form>
    }
}

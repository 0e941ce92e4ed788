//! Milestone Calendar App
//!
//! Main application component: sidebar, calendar, editor dialog and
//! notification panel around one global store.

use chrono::Utc;
use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::adapter::to_calendar_events;
use crate::components::{CalendarView, MilestoneEditor, MilestoneSidebar, NotificationList, ResetDemoButton};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::notifications::{check_notifications, POLL_INTERVAL_MS};
use crate::store::{AppState, AppStateStoreFields};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let store = Store::new(AppState::new());
    provide_context(store);

    let ctx = AppContext::new(config);
    provide_context(ctx);

    // Load milestones on mount and on every reload
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        let project_id = ctx.project_id();
        let api = ctx.api();
        tracing::debug!(%project_id, trigger, "loading milestones");
        store.loading().set(true);
        spawn_local(async move {
            match api.list(&project_id).await {
                Ok(items) => {
                    tracing::debug!(count = items.len(), "milestones loaded");
                    store.events().set(to_calendar_events(&items));
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to fetch milestones");
                    store.events().set(Vec::new());
                }
            }
            ctx.settle_moves(trigger);
            store.loading().set(false);
        });
    });

    // Notices follow every change of the event list...
    Effect::new(move |_| {
        let notices = store.events().with(|events| check_notifications(events, Utc::now()));
        store.notices().set(notices);
    });

    // ...and the clock
    Interval::new(POLL_INTERVAL_MS, move || {
        let notices = store.events().with_untracked(|events| check_notifications(events, Utc::now()));
        store.notices().set(notices);
    })
    .forget();

    view! {
        <div class="app-root">
            <header class="app-header">
                <div class="brand">"Milestones"</div>
                <div class="project">{move || format!("Project {}", ctx.project_id())}</div>
                <ResetDemoButton />
            </header>

            <div class="timeline-root">
                <MilestoneSidebar />
                <main class="timeline-main">
                    <CalendarView />
                </main>
            </div>

            <MilestoneEditor />
            <NotificationList />
        </div>
    }
}

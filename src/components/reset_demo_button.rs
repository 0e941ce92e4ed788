//! Reset Demo Button Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::browser;
use crate::components::ConfirmButton;
use crate::context::use_app_context;

/// Wipes and reseeds the demo milestones of the current project
#[component]
pub fn ResetDemoButton() -> impl IntoView {
    let ctx = use_app_context();

    let reset = Callback::new(move |_| {
        let project_id = ctx.project_id();
        spawn_local(async move {
            match ctx.api().reset_demo(&project_id).await {
                Ok(_) => {
                    tracing::info!(%project_id, "demo reset");
                    browser::alert("Demo reset completed");
                    browser::reload_page();
                }
                Err(e) => {
                    tracing::error!(error = %e, "reset failed");
                    browser::alert(&format!("Reset failed: {e}"));
                }
            }
        });
    });

    view! {
        <div class="reset-demo">
            <ConfirmButton
                label="Reset Demo"
                prompt="Remove and reseed demo milestones?"
                button_class="btn-reset"
                on_confirm=reset
            />
        </div>
    }
}

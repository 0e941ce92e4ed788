//! Milestone Calendar Frontend Entry Point

mod adapter;
mod api;
mod app;
mod browser;
mod calendar;
mod components;
mod config;
mod context;
mod editor;
mod filter;
mod logging;
mod markdown;
mod models;
mod notifications;
mod seed;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let (config, problem) = config::load();
    logging::init(&config);
    if let Some(problem) = problem {
        tracing::warn!(%problem, "runtime config ignored");
    }
    tracing::info!(project_id = %config.project_id, api_base = %config.api_base, "starting");

    seed::auto_seed(&config);
    mount_to_body(move || view! { <App config=config.clone() /> });
}

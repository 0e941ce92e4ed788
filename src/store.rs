//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.
//! Both collections are only ever replaced wholesale.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::CalendarEvent;
use crate::notifications::Notice;

#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Display records of the current project
    pub events: Vec<CalendarEvent>,
    /// Upcoming/overdue notices from the last check
    pub notices: Vec<Notice>,
    /// True while a reload is in flight
    pub loading: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

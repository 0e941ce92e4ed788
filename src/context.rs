//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::{self, FetchBackend, MilestoneApi};
use crate::calendar::{PendingMove, PendingMoves};
use crate::config::AppConfig;
use crate::editor::EditDraft;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload milestones from backend - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload milestones from backend - write
    set_reload_trigger: WriteSignal<u32>,
    /// Milestone open in the editor - read
    pub editing: ReadSignal<Option<EditDraft>>,
    /// Milestone open in the editor - write
    pub set_editing: WriteSignal<Option<EditDraft>>,
    /// Drag moves not yet reflected by a reload - read
    pub pending_moves: ReadSignal<PendingMoves>,
    /// Drag moves not yet reflected by a reload - write
    set_pending_moves: WriteSignal<PendingMoves>,
    config: StoredValue<AppConfig>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let (reload_trigger, set_reload_trigger) = signal(0u32);
        let (editing, set_editing) = signal(None::<EditDraft>);
        let (pending_moves, set_pending_moves) = signal(PendingMoves::default());
        Self {
            reload_trigger,
            set_reload_trigger,
            editing,
            set_editing,
            pending_moves,
            set_pending_moves,
            config: StoredValue::new(config),
        }
    }

    /// Trigger a full reload of milestones
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn begin_move(&self, mv: PendingMove) {
        self.set_pending_moves.update(|moves| moves.begin(mv));
    }

    pub fn abandon_move(&self, mv: &PendingMove) {
        self.set_pending_moves.update(|moves| moves.abandon(mv));
    }

    /// Reload, keeping `mv` drawn until that reload has landed
    pub fn move_saved(&self, mv: &PendingMove) {
        self.reload();
        let generation = self.reload_trigger.get_untracked();
        self.set_pending_moves.update(|moves| moves.saved(mv, generation));
    }

    /// Called when the reload of `generation` has replaced the events
    pub fn settle_moves(&self, generation: u32) {
        self.set_pending_moves.update(|moves| moves.settle(generation));
    }

    pub fn project_id(&self) -> String {
        self.config.with_value(|c| c.project_id.clone())
    }

    /// Fresh client for one action
    pub fn api(&self) -> MilestoneApi<FetchBackend> {
        self.config.with_value(api::client)
    }

    pub fn open_editor(&self, draft: EditDraft) {
        self.set_editing.set(Some(draft));
    }

    pub fn close_editor(&self) {
        self.set_editing.set(None);
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}

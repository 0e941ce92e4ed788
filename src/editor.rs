//! Milestone Editor State
//!
//! The working copy behind the edit dialog. Nothing here touches the
//! network until `save_draft` is called.

use serde_json::Value;

use crate::api::{ApiError, FilePart, HttpBackend, MilestoneApi};
use crate::models::{CalendarEvent, MilestonePatch, Priority, Subtask};

/// Working copy of one milestone while the editor is open
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub is_milestone: bool,
    pub priority: Priority,
    pub completed: bool,
    /// Manually entered progress, only used while there are no subtasks
    pub progress: u8,
    pub notes: String,
    pub reminder_time: Option<String>,
    pub subtasks: Vec<Subtask>,
    pub attachments: Vec<Value>,
}

impl EditDraft {
    pub fn from_event(event: &CalendarEvent) -> Self {
        let props = &event.props;
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            description: props.description.clone(),
            start: event.start.clone().unwrap_or_default(),
            end: event.end.clone().unwrap_or_default(),
            is_milestone: props.is_milestone,
            priority: props.priority.clone(),
            completed: props.completed,
            progress: props.progress,
            notes: props.notes.clone(),
            reminder_time: props.reminder_time.clone(),
            subtasks: props.subtasks.clone(),
            attachments: props.attachments.clone(),
        }
    }

    /// Returns false when the title is blank and nothing was added
    pub fn add_subtask(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        self.subtasks.push(Subtask::new(title));
        true
    }

    pub fn remove_subtask(&mut self, index: usize) {
        if index < self.subtasks.len() {
            self.subtasks.remove(index);
        }
    }

    pub fn toggle_subtask(&mut self, index: usize) {
        if let Some(subtask) = self.subtasks.get_mut(index) {
            subtask.done = !subtask.done;
        }
    }

    pub fn set_progress(&mut self, value: i64) {
        self.progress = value.clamp(0, 100) as u8;
    }

    pub fn set_reminder(&mut self, value: String) {
        self.reminder_time = Some(value).filter(|v| !v.trim().is_empty());
    }

    /// Progress as it will be saved
    pub fn effective_progress(&self) -> u8 {
        computed_progress(&self.subtasks, self.progress)
    }

    pub fn done_count(&self) -> usize {
        self.subtasks.iter().filter(|s| s.done).count()
    }

    /// Full update payload with progress recomputed
    pub fn to_patch(&self) -> MilestonePatch {
        MilestonePatch {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            start_date: Some(self.start.clone()),
            end_date: Some(self.end.clone()),
            priority: Some(self.priority.clone()),
            completed: Some(self.completed),
            progress: Some(self.effective_progress()),
            notes: Some(self.notes.clone()),
            reminder_time: Some(self.reminder_time.clone()),
            subtasks: Some(self.subtasks.clone()),
        }
    }
}

/// `round(100 * done / total)` for a non-empty list, else the manual value.
/// Halves round up.
pub fn computed_progress(subtasks: &[Subtask], manual: u8) -> u8 {
    let total = subtasks.len();
    if total == 0 {
        return manual;
    }
    let done = subtasks.iter().filter(|s| s.done).count();
    ((done * 200 + total) / (total * 2)) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The field update went through but some attachments did not
    UploadsFailed { failed: usize, attempted: usize },
}

/// What the editor does once a save has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AfterSave {
    pub close_editor: bool,
    pub reload: bool,
    pub alert: Option<&'static str>,
}

impl AfterSave {
    /// Once the update went through the editor closes, even if attachments
    /// failed; the staged files are gone with it.
    pub fn from_result(result: &Result<SaveOutcome, ApiError>) -> Self {
        match result {
            Ok(SaveOutcome::Saved) => Self { close_editor: true, reload: true, alert: None },
            Ok(SaveOutcome::UploadsFailed { .. }) => Self {
                close_editor: true,
                reload: true,
                alert: Some("Failed to save"),
            },
            Err(_) => Self { close_editor: false, reload: false, alert: Some("Failed to save") },
        }
    }
}

/// Persist the draft, then upload staged files one at a time.
///
/// A failed update aborts before any upload. Upload failures do not undo
/// the update; every staged file is still attempted.
pub async fn save_draft<B: HttpBackend>(
    api: &MilestoneApi<B>,
    draft: &EditDraft,
    files: Vec<Result<FilePart, ApiError>>,
) -> Result<SaveOutcome, ApiError> {
    api.update(&draft.id, &draft.to_patch()).await?;

    let attempted = files.len();
    let mut failed = 0;
    for file in files {
        let result = match file {
            Ok(part) => api.upload_attachment(&draft.id, part).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(_) => tracing::debug!(id = %draft.id, "attachment uploaded"),
            Err(e) => {
                tracing::warn!(id = %draft.id, error = %e, "attachment upload failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        Ok(SaveOutcome::UploadsFailed { failed, attempted })
    } else {
        Ok(SaveOutcome::Saved)
    }
}

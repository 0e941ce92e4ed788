//! Milestone Editor Component
//!
//! Modal dialog over `AppContext::editing`. Changes stay in the draft
//! until Save; Cancel discards them.

use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::browser;
use crate::components::SubtaskList;
use crate::context::{use_app_context, AppContext};
use crate::editor::{save_draft, AfterSave, EditDraft, SaveOutcome};
use crate::markdown::render_markdown;
use crate::models::{attachment_label, Priority};

/// Read one value out of the open draft
fn draft_field<T: Default>(ctx: AppContext, f: impl Fn(&EditDraft) -> T) -> T {
    ctx.editing.with(|d| d.as_ref().map(f).unwrap_or_default())
}

fn edit_draft(ctx: AppContext, f: impl FnOnce(&mut EditDraft)) {
    ctx.set_editing.update(|d| {
        if let Some(d) = d.as_mut() {
            f(d);
        }
    });
}

#[component]
pub fn MilestoneEditor() -> impl IntoView {
    let ctx = use_app_context();
    let file_input = NodeRef::<Input>::new();
    let (saving, set_saving) = signal(false);

    let has_subtasks = move || draft_field(ctx, |d| !d.subtasks.is_empty());
    let notes_html = move || draft_field(ctx, |d| render_markdown(&d.notes));
    let attachments = move || draft_field(ctx, |d| d.attachments.iter().map(attachment_label).collect::<Vec<_>>());

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(draft) = ctx.editing.get_untracked() else {
            return;
        };

        set_saving.set(true);
        spawn_local(async move {
            let files = match file_input.get_untracked() {
                Some(input) => browser::read_staged_files(&input).await,
                None => Vec::new(),
            };
            let api = ctx.api();
            let result = save_draft(&api, &draft, files).await;
            match &result {
                Ok(SaveOutcome::Saved) => tracing::info!(id = %draft.id, "milestone saved"),
                Ok(SaveOutcome::UploadsFailed { failed, attempted }) => {
                    tracing::error!(id = %draft.id, failed, attempted, "saved without all attachments")
                }
                Err(e) => tracing::error!(id = %draft.id, error = %e, "save failed"),
            }

            let next = AfterSave::from_result(&result);
            if next.close_editor {
                ctx.close_editor();
            }
            if next.reload {
                ctx.reload();
            }
            set_saving.set(false);
            if let Some(message) = next.alert {
                browser::alert(message);
            }
        });
    };

    view! {
        <Show when=move || ctx.editing.with(Option::is_some)>
            <div class="modal-backdrop">
                <div class="modal">
                    <h3>"Edit Milestone"</h3>
                    <form class="editor-form" on:submit=save>
                        <input
                            prop:value=move || draft_field(ctx, |d| d.title.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                edit_draft(ctx, |d| d.title = v);
                            }
                        />
                        <textarea
                            placeholder="Description"
                            prop:value=move || draft_field(ctx, |d| d.description.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                edit_draft(ctx, |d| d.description = v);
                            }
                        />
                        <div class="date-row">
                            <input
                                type="date"
                                prop:value=move || draft_field(ctx, |d| d.start.clone())
                                on:input=move |ev| {
                                    let v = event_target_value(&ev);
                                    edit_draft(ctx, |d| d.start = v);
                                }
                            />
                            <input
                                type="date"
                                prop:value=move || draft_field(ctx, |d| d.end.clone())
                                on:input=move |ev| {
                                    let v = event_target_value(&ev);
                                    edit_draft(ctx, |d| d.end = v);
                                }
                            />
                        </div>
                        <div class="form-row">
                            <select on:change=move |ev| {
                                let v = event_target_value(&ev);
                                edit_draft(ctx, |d| d.priority = Priority::from(v));
                            }>
                                {move || {
                                    let current = draft_field(ctx, |d| d.priority.clone());
                                    let mut choices = Priority::CHOICES.to_vec();
                                    if !choices.contains(&current) {
                                        choices.push(current.clone());
                                    }
                                    choices
                                        .into_iter()
                                        .map(|p| {
                                            let selected = p == current;
                                            let name = p.as_str().to_string();
                                            view! { <option value=name.clone() selected=selected>{name.clone()}</option> }
                                        })
                                        .collect_view()
                                }}
                            </select>
                            <label class="checkbox">
                                <input
                                    type="checkbox"
                                    prop:checked=move || draft_field(ctx, |d| d.completed)
                                    on:change=move |ev| {
                                        let v = event_target_checked(&ev);
                                        edit_draft(ctx, |d| d.completed = v);
                                    }
                                />
                                "Completed"
                            </label>
                            <input
                                type="number"
                                min="0"
                                max="100"
                                class="progress-input"
                                title=move || if has_subtasks() { "Computed from subtasks" } else { "" }
                                disabled=has_subtasks
                                prop:value=move || draft_field(ctx, |d| d.effective_progress().to_string())
                                on:input=move |ev| {
                                    let v = event_target_value(&ev).trim().parse::<i64>().unwrap_or(0);
                                    edit_draft(ctx, |d| d.set_progress(v));
                                }
                            />
                        </div>
                        <div class="notes">
                            <textarea
                                placeholder="Notes (Markdown)"
                                prop:value=move || draft_field(ctx, |d| d.notes.clone())
                                on:input=move |ev| {
                                    let v = event_target_value(&ev);
                                    edit_draft(ctx, |d| d.notes = v);
                                }
                            />
                            <div class="notes-preview" inner_html=notes_html></div>
                        </div>
                        <label class="reminder">
                            "Reminder "
                            <input
                                type="datetime-local"
                                prop:value=move || draft_field(ctx, |d| d.reminder_time.clone().unwrap_or_default())
                                on:input=move |ev| {
                                    let v = event_target_value(&ev);
                                    edit_draft(ctx, |d| d.set_reminder(v));
                                }
                            />
                        </label>

                        <SubtaskList ctx=ctx />

                        <div class="attachments">
                            <label>"Attachments"</label>
                            <ul>
                                {move || attachments().into_iter().map(|name| view! { <li>{name}</li> }).collect_view()}
                            </ul>
                            <input node_ref=file_input type="file" multiple />
                        </div>
                        <div class="modal-actions">
                            <button type="button" on:click=move |_| ctx.close_editor()>"Cancel"</button>
                            <button class="btn-primary" type="submit" disabled=move || saving.get()>
                                {move || if saving.get() { "Saving…" } else { "Save" }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}

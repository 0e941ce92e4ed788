//! Subtask List Component
//!
//! Checklist inside the milestone editor. Edits only the open draft.

use leptos::prelude::*;

use crate::context::AppContext;

#[component]
pub fn SubtaskList(ctx: AppContext) -> impl IntoView {
    let (new_title, set_new_title) = signal(String::new());

    let subtasks = move || {
        ctx.editing
            .with(|d| d.as_ref().map(|d| d.subtasks.clone()).unwrap_or_default())
    };
    let summary = move || {
        ctx.editing.with(|d| match d {
            Some(d) if !d.subtasks.is_empty() => format!("{}/{} done", d.done_count(), d.subtasks.len()),
            _ => String::new(),
        })
    };

    let add = move || {
        let title = new_title.get_untracked();
        let mut added = false;
        ctx.set_editing.update(|d| {
            if let Some(d) = d.as_mut() {
                added = d.add_subtask(&title);
            }
        });
        if added {
            set_new_title.set(String::new());
        }
    };

    view! {
        <div class="subtasks">
            <label>"Subtasks " <small class="muted">{summary}</small></label>
            <div class="subtask-rows">
                {move || {
                    subtasks()
                        .into_iter()
                        .enumerate()
                        .map(|(index, subtask)| view! {
                            <div class="subtask-row">
                                <input
                                    type="checkbox"
                                    prop:checked=subtask.done
                                    on:change=move |_| ctx.set_editing.update(|d| {
                                        if let Some(d) = d.as_mut() {
                                            d.toggle_subtask(index);
                                        }
                                    })
                                />
                                <div class="subtask-title">{subtask.title}</div>
                                <button
                                    type="button"
                                    class="btn-ghost"
                                    on:click=move |_| ctx.set_editing.update(|d| {
                                        if let Some(d) = d.as_mut() {
                                            d.remove_subtask(index);
                                        }
                                    })
                                >
                                    "Remove"
                                </button>
                            </div>
                        })
                        .collect_view()
                }}
                <div class="subtask-add">
                    <input
                        placeholder="New subtask"
                        prop:value=move || new_title.get()
                        on:input=move |ev| set_new_title.set(event_target_value(&ev))
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                ev.prevent_default();
                                add();
                            }
                        }
                    />
                    <button type="button" on:click=move |_| add()>"Add"</button>
                </div>
            </div>
        </div>
    }
}

//! Confirm Button Component
//!
//! Two-step button: the first click asks, the second one acts.

use leptos::prelude::*;

/// Button that asks `prompt` inline before running `on_confirm`
#[component]
pub fn ConfirmButton(
    #[prop(into)] label: String,
    #[prop(into)] prompt: String,
    #[prop(into)] button_class: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (asking, set_asking) = signal(false);

    let answer = move |ev: web_sys::MouseEvent, yes: bool| {
        ev.stop_propagation();
        set_asking.set(false);
        if yes {
            on_confirm.run(());
        }
    };

    move || {
        if asking.get() {
            view! {
                <span class="confirm-inline">
                    <span class="confirm-text">{prompt.clone()}</span>
                    <button type="button" class="confirm-btn" on:click=move |ev| answer(ev, true)>"Yes"</button>
                    <button type="button" class="cancel-btn" on:click=move |ev| answer(ev, false)>"No"</button>
                </span>
            }
            .into_any()
        } else {
            let class = button_class.clone();
            view! {
                <button
                    type="button"
                    class=class
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_asking.set(true);
                    }
                >
                    {label.clone()}
                </button>
            }
            .into_any()
        }
    }
}

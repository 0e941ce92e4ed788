//! Notification List Component

use leptos::prelude::*;

use crate::notifications::NoticeKind;
use crate::store::{use_app_store, AppStateStoreFields};

/// Upcoming and overdue notices from the last check
#[component]
pub fn NotificationList() -> impl IntoView {
    let store = use_app_store();

    view! {
        <Show when=move || store.notices().with(|n| !n.is_empty())>
            <div class="notifications">
                <h3>"Notifications"</h3>
                <ul>
                    <For
                        each=move || store.notices().get()
                        key=|notice| (notice.id.clone(), notice.text.clone())
                        children=|notice| {
                            let class = match notice.kind {
                                NoticeKind::Upcoming => "notice upcoming",
                                NoticeKind::Overdue => "notice overdue",
                            };
                            view! { <li class=class>{notice.text}</li> }
                        }
                    />
                </ul>
            </div>
        </Show>
    }
}

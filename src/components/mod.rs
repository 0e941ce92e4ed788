//! UI Components
//!
//! Reusable Leptos components.

mod calendar_view;
mod confirm_button;
mod milestone_editor;
mod milestone_sidebar;
mod new_milestone_form;
mod notification_list;
mod reset_demo_button;
mod subtask_list;

pub use calendar_view::CalendarView;
pub use confirm_button::ConfirmButton;
pub use milestone_editor::MilestoneEditor;
pub use milestone_sidebar::MilestoneSidebar;
pub use new_milestone_form::NewMilestoneForm;
pub use notification_list::NotificationList;
pub use reset_demo_button::ResetDemoButton;
pub use subtask_list::SubtaskList;

//! Leptos DragDrop
//!
//! Mouse-event drag and drop for Leptos, generic over the dragged key `K`
//! (e.g. an event id) and the drop target `T` (e.g. a calendar day).
//!
//! A press only becomes a drag once the pointer travels past
//! [`DRAG_THRESHOLD_PX`]; shorter gestures stay plain clicks.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Movement in pixels before a press turns into a drag
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// How long `drag_just_ended` stays raised after a drop
const CLICK_SUPPRESS_MS: i32 = 100;

/// Signals shared by every draggable and drop target of one surface
pub struct DndSignals<K: 'static, T: 'static> {
    /// Key being dragged, once past the threshold
    pub dragging_read: ReadSignal<Option<K>>,
    pub dragging_write: WriteSignal<Option<K>>,
    /// Target currently under the pointer
    pub drop_target_read: ReadSignal<Option<T>>,
    pub drop_target_write: WriteSignal<Option<T>>,
    /// Raised briefly after mouseup so the trailing click can be ignored
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Key pressed but not yet moved far enough
    pub pending_read: ReadSignal<Option<K>>,
    pub pending_write: WriteSignal<Option<K>>,
    /// Client position of the press
    pub start_read: ReadSignal<(i32, i32)>,
    pub start_write: WriteSignal<(i32, i32)>,
}

impl<K, T> Clone for DndSignals<K, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, T> Copy for DndSignals<K, T> {}

pub fn exceeds_threshold(start: (i32, i32), current: (i32, i32)) -> bool {
    (current.0 - start.0).abs() > DRAG_THRESHOLD_PX || (current.1 - start.1).abs() > DRAG_THRESHOLD_PX
}

pub fn create_dnd_signals<K, T>() -> DndSignals<K, T>
where
    K: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    let (dragging_read, dragging_write) = signal(None);
    let (drop_target_read, drop_target_write) = signal(None);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_read, pending_write) = signal(None);
    let (start_read, start_write) = signal((0, 0));
    DndSignals {
        dragging_read,
        dragging_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_read,
        pending_write,
        start_read,
        start_write,
    }
}

/// Reset all drag state and raise `drag_just_ended` for a moment
pub fn end_drag<K, T>(dnd: &DndSignals<K, T>)
where
    K: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    dnd.pending_write.set(None);
    dnd.dragging_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.drag_just_ended_write.set(true);

    let lower = dnd.drag_just_ended_write;
    let Some(win) = web_sys::window() else {
        lower.set(false);
        return;
    };
    let timer = Closure::<dyn FnMut()>::new(move || lower.set(false));
    if win
        .set_timeout_with_callback_and_timeout_and_arguments_0(timer.as_ref().unchecked_ref(), CLICK_SUPPRESS_MS)
        .is_err()
    {
        lower.set(false);
    }
    timer.forget();
}

/// Presses on form controls never start a drag
fn is_control(ev: &web_sys::MouseEvent) -> bool {
    ev.target().is_some_and(|t| {
        t.dyn_ref::<web_sys::HtmlInputElement>().is_some() || t.dyn_ref::<web_sys::HtmlButtonElement>().is_some()
    })
}

/// mousedown handler for a draggable carrying `key`
pub fn make_on_mousedown<K, T>(dnd: DndSignals<K, T>, key: K) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    K: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 || is_control(&ev) {
            return;
        }
        dnd.start_write.set((ev.client_x(), ev.client_y()));
        dnd.pending_write.set(Some(key.clone()));
    }
}

/// mouseenter handler for a drop target
pub fn make_on_target_mouseenter<K, T>(dnd: DndSignals<K, T>, target: T) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    K: Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.with_untracked(Option::is_some) {
            dnd.drop_target_write.set(Some(target.clone()));
        }
    }
}

/// mouseleave handler for a drop target
pub fn make_on_mouseleave<K, T>(dnd: DndSignals<K, T>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    K: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.with_untracked(Option::is_some) {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Attach a listener to `document` for the lifetime of the page
fn listen_on_document(event: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
    let handler = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        if doc.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref()).is_err() {
            tracing::warn!(event, "could not attach document listener");
        }
    }
    handler.forget();
}

/// Install the document-level move and release handlers.
///
/// `on_drop(key, target)` runs only for a real drag released over a
/// target; a plain click never reaches it. Call once per surface.
pub fn bind_global_mouseup<K, T, F>(dnd: DndSignals<K, T>, on_drop: F)
where
    K: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    F: Fn(K, T) + 'static,
{
    listen_on_document("mousemove", move |ev| {
        if dnd.dragging_read.with_untracked(Option::is_some) {
            return;
        }
        let Some(key) = dnd.pending_read.get_untracked() else {
            return;
        };
        if exceeds_threshold(dnd.start_read.get_untracked(), (ev.client_x(), ev.client_y())) {
            dnd.dragging_write.set(Some(key));
        }
    });

    listen_on_document("mouseup", move |_| {
        let Some(key) = dnd.dragging_read.get_untracked() else {
            // a press that never moved is left to the click handler
            dnd.pending_write.set(None);
            return;
        };
        let target = dnd.drop_target_read.get_untracked();
        end_drag(&dnd);
        if let Some(target) = target {
            on_drop(key, target);
        }
    });
}

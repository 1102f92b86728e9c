//! Leptos DragDrop Utilities
//!
//! Pointer-driven drag-and-drop for Leptos using mouse events.
//! Uses a movement threshold to distinguish click from drag, and asks a
//! caller-supplied resolver for the hovered target on every move.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// How long `drag_just_ended` stays set, so the trailing click can be ignored
const JUST_ENDED_MS: i32 = 100;

/// Pointer position in client coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Axis-aligned bounds of a mounted element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Edges are inclusive
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn from_dom_rect(rect: &web_sys::DomRect) -> Self {
        Self::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    /// Current bounds of an element
    pub fn measure(el: &web_sys::Element) -> Self {
        Self::from_dom_rect(&el.get_bounding_client_rect())
    }
}

/// True once the pointer has left the dead zone around `start`
pub fn exceeds_threshold(start: Point, now: Point, threshold: f64) -> bool {
    (now.x - start.x).abs() > threshold || (now.y - start.y).abs() > threshold
}

/// DnD state signals
///
/// `S` is the drag source payload, `T` the resolved drop target.
pub struct DndSignals<S: 'static, T: 'static> {
    pub dragging_read: ReadSignal<Option<S>>,
    pub dragging_write: WriteSignal<Option<S>>,
    pub drop_target_read: ReadSignal<Option<T>>,
    pub drop_target_write: WriteSignal<Option<T>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending source (mousedown but not yet dragging)
    pub pending_read: ReadSignal<Option<S>>,
    pub pending_write: WriteSignal<Option<S>>,
    /// Start position for movement detection
    pub start_read: ReadSignal<Point>,
    pub start_write: WriteSignal<Point>,
    /// Last pointer position seen while a drag is pending or active
    pub pointer_read: ReadSignal<Point>,
    pub pointer_write: WriteSignal<Point>,
}

impl<S, T> Clone for DndSignals<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for DndSignals<S, T> {}

pub fn create_dnd_signals<S, T>() -> DndSignals<S, T>
where
    S: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    let (dragging_read, dragging_write) = signal(None::<S>);
    let (drop_target_read, drop_target_write) = signal(None::<T>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_read, pending_write) = signal(None::<S>);
    let (start_read, start_write) = signal(Point::default());
    let (pointer_read, pointer_write) = signal(Point::default());
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
        pointer_read,
        pointer_write,
    }
}

fn is_dragging<S, T>(dnd: &DndSignals<S, T>) -> bool
where
    S: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    dnd.dragging_read.try_get_untracked().flatten().is_some()
}

fn reset<S, T>(dnd: &DndSignals<S, T>)
where
    S: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    dnd.dragging_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_write.set(None);
}

/// End drag operation
pub fn end_drag<S, T>(dnd: &DndSignals<S, T>)
where
    S: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    if !is_dragging(dnd) {
        dnd.pending_write.set(None);
        return;
    }
    reset(dnd);
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        // Capture checking closure to avoid panic in timeout
        let check = dnd.drag_just_ended_read;

        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            if check.try_get_untracked().is_some() {
                clear.set(false);
            }
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            JUST_ENDED_MS,
        );
        cb.forget();
    }
}

/// Abort the drag without reporting a drop
pub fn cancel_drag<S, T>(dnd: &DndSignals<S, T>)
where
    S: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    reset(dnd);
}

/// Create mousedown handler for draggable elements
/// Records pending drag with start position
pub fn make_on_mousedown<S, T>(dnd: DndSignals<S, T>, source: S) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    S: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Ignore if target is input or button
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
        }
        let at = Point::new(ev.client_x() as f64, ev.client_y() as f64);
        dnd.pending_write.set(Some(source.clone()));
        dnd.start_write.set(at);
        dnd.pointer_write.set(at);
    }
}

/// Bind document mousemove: starts the drag past the threshold, then
/// re-resolves the hovered target on every move
pub fn bind_global_mousemove<S, T, R>(dnd: DndSignals<S, T>, threshold: f64, resolve: R)
where
    S: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
    R: Fn(&S, Point) -> Option<T> + 'static,
{
    let _ = window_event_listener(leptos::ev::mousemove, move |ev: web_sys::MouseEvent| {
        let at = Point::new(ev.client_x() as f64, ev.client_y() as f64);

        // Use try_get_untracked to avoid panic if signal is disposed
        let Some(dragging) = dnd.dragging_read.try_get_untracked() else { return };
        let dragging = match dragging {
            Some(source) => Some(source),
            None => {
                let pending = dnd.pending_read.try_get_untracked().flatten();
                let start = dnd.start_read.try_get_untracked().unwrap_or(at);
                match pending {
                    Some(source) if exceeds_threshold(start, at, threshold) => {
                        dnd.dragging_write.set(Some(source.clone()));
                        Some(source)
                    }
                    _ => None,
                }
            }
        };

        if let Some(source) = dragging {
            dnd.pointer_write.set(at);
            let next = resolve(&source, at);
            if dnd.drop_target_read.try_get_untracked().flatten() != next {
                dnd.drop_target_write.set(next);
            }
        }
    });
}

/// Escape aborts an active drag
pub fn bind_escape_cancel<S, T>(dnd: DndSignals<S, T>)
where
    S: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    let _ = window_event_listener(leptos::ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" && is_dragging(&dnd) {
            cancel_drag(&dnd);
        }
    });
}

/// Bind global mouseup handler for drop detection
///
/// `on_drop` only fires when a drag was actually in progress and a target
/// was resolved; a plain click or a drop over nothing just clears state.
pub fn bind_global_mouseup<S, T, R, F>(dnd: DndSignals<S, T>, threshold: f64, resolve: R, on_drop: F)
where
    S: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
    R: Fn(&S, Point) -> Option<T> + 'static,
    F: Fn(S, T) + Clone + 'static,
{
    let _ = window_event_listener(leptos::ev::mouseup, move |_ev: web_sys::MouseEvent| {
        let dragging = dnd.dragging_read.try_get_untracked().flatten();
        let drop_target = dnd.drop_target_read.try_get_untracked().flatten();

        end_drag(&dnd);
        if let (Some(dragged), Some(target)) = (dragging, drop_target) {
            on_drop(dragged, target);
        }
    });

    bind_global_mousemove(dnd, threshold, resolve);
    bind_escape_cancel(dnd);
}

//! Leptos binding for drawer drag and drop
//!
//! Mounted drop targets register their measured bounds here; the global
//! pointer listeners from `leptos_dragdrop` ask [`CollisionRouter`] for the
//! hovered target on every move and hand the release to
//! [`Session::handle_drop`].

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_dragdrop::{bind_global_mouseup, create_dnd_signals, make_on_mousedown, DndSignals, Point, Rect};

use crate::config::DrawerConfig;
use crate::drag::{Collision, CollisionRouter, DragSource, DropEvent, DropOutcome, DropTargetKind, Droppable};
use crate::models::FolderId;
use crate::session::Session;
use crate::storage::DrawerStorage;
use crate::store::DrawerStore;

#[derive(Clone, Copy)]
pub struct DrawerDnd {
    pub signals: DndSignals<DragSource, Collision>,
    droppables: RwSignal<Vec<Droppable>>,
    /// Mirrors the session's open folder for the views
    pub open_folder: RwSignal<Option<FolderId>>,
    /// Bumped whenever the drawer or sheet changes
    pub revision: RwSignal<u64>,
}

impl Default for DrawerDnd {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawerDnd {
    pub fn new() -> Self {
        Self {
            signals: create_dnd_signals(),
            droppables: RwSignal::new(Vec::new()),
            open_folder: RwSignal::new(None),
            revision: RwSignal::new(0),
        }
    }

    /// Add or replace the droppable with this id
    pub fn register(&self, droppable: Droppable) {
        self.droppables.update(|list| {
            list.retain(|d| d.id != droppable.id);
            list.push(droppable);
        });
    }

    /// Register `el` under `id` with its current bounds
    pub fn register_element(&self, id: impl Into<String>, target: DropTargetKind, el: &web_sys::Element) {
        self.register(Droppable::new(id, target, Rect::measure(el)));
    }

    pub fn unregister(&self, id: &str) {
        self.droppables.update(|list| list.retain(|d| d.id != id));
    }

    pub fn droppable_count(&self) -> usize {
        self.droppables.with_untracked(Vec::len)
    }

    pub fn is_dragging(&self) -> bool {
        self.signals.dragging_read.get().is_some()
    }

    /// Whether the droppable `id` is the current hover target
    pub fn is_over(&self, id: &str) -> bool {
        self.signals
            .drop_target_read
            .with(|target| target.as_ref().is_some_and(|c| c.droppable_id == id))
    }

    pub fn on_mousedown(&self, source: DragSource) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
        make_on_mousedown(self.signals, source)
    }

    fn bump(&self) {
        self.revision.try_update(|r| *r += 1);
    }

    /// Re-render on every drawer commit, including undo and redo
    pub fn watch<S: DrawerStorage>(&self, store: &mut DrawerStore<S>) {
        let this = *self;
        store.subscribe(move |_| this.bump());
    }

    /// Open `folder` in the session and mirror it for the views
    pub fn open<S: DrawerStorage>(&self, session: &RefCell<Session<S>>, folder: Option<FolderId>) {
        let Ok(mut session) = session.try_borrow_mut() else {
            tracing::warn!("session busy, folder not opened");
            return;
        };
        session.set_open_folder(folder);
        self.open_folder.set(session.open_folder().map(str::to_string));
    }

    /// Bind the document listeners for the lifetime of the app
    pub fn install<S: DrawerStorage + 'static>(self, session: Rc<RefCell<Session<S>>>, config: &DrawerConfig) {
        let droppables = self.droppables;
        let open_folder = self.open_folder;
        let resolve = move |source: &DragSource, at: Point| {
            let open = open_folder.try_get_untracked().flatten();
            droppables
                .try_with_untracked(|list| CollisionRouter::new(list, open.as_deref()).resolve(source, at))
                .flatten()
        };

        let on_drop = move |source: DragSource, collision: Collision| {
            let Ok(mut session) = session.try_borrow_mut() else {
                tracing::warn!(droppable = %collision.droppable_id, "session busy, drop discarded");
                return;
            };
            let event = DropEvent {
                source,
                target: collision.target,
                open_folder: session.open_folder().map(str::to_string),
            };
            let outcome = session.handle_drop(event);
            let open = session.open_folder().map(str::to_string);
            drop(session);

            if open_folder.try_get_untracked().flatten() != open {
                open_folder.set(open);
            }
            if outcome != DropOutcome::Ignored {
                self.bump();
            }
        };

        bind_global_mouseup(self.signals, config.drag_threshold_px, resolve, on_drop);
        tracing::debug!(threshold = config.drag_threshold_px, "drag listeners bound");
    }
}

/// Make a [`DrawerDnd`] available to child components
pub fn provide_drawer_dnd() -> DrawerDnd {
    let dnd = DrawerDnd::new();
    provide_context(dnd);
    dnd
}

pub fn use_drawer_dnd() -> Option<DrawerDnd> {
    use_context::<DrawerDnd>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Card, CardType};

    fn zone(id: &str, left: f64) -> Droppable {
        Droppable::new(
            id,
            DropTargetKind::DrawerFolder { folder_id: id.to_string() },
            Rect::new(left, 0.0, 50.0, 50.0),
        )
    }

    #[test]
    fn test_register_replaces_same_id() {
        let dnd = DrawerDnd::new();
        dnd.register(zone("a", 0.0));
        dnd.register(zone("b", 100.0));
        dnd.register(zone("a", 200.0));
        assert_eq!(dnd.droppable_count(), 2);

        let left = dnd.droppables.with_untracked(|list| {
            list.iter().find(|d| d.id == "a").map(|d| d.rect.left)
        });
        assert_eq!(left, Some(200.0));

        dnd.unregister("a");
        dnd.unregister("missing");
        assert_eq!(dnd.droppable_count(), 1);
    }

    #[test]
    fn test_registered_targets_feed_the_router() {
        let dnd = DrawerDnd::new();
        dnd.register(zone("a", 0.0));
        dnd.register(zone("b", 100.0));
        let source = DragSource::SheetCard(Card::new("c", CardType::Loadout, "Kit"));
        let hit = dnd
            .droppables
            .with_untracked(|list| CollisionRouter::new(list, None).resolve(&source, Point::new(120.0, 10.0)));
        assert_eq!(hit.map(|c| c.droppable_id).as_deref(), Some("b"));
    }
}

//! Drag Context
//!
//! Gesture state between pointer-down and release. Hovering only publishes
//! the current collision; nothing is classified or mutated before release.

use leptos_dragdrop::Point;

use super::router::{Collision, CollisionRouter};
use super::source::{DragSource, DropTargetKind, Droppable};
use crate::models::FolderId;

/// A completed drag, ready for [`super::classify_drop`]
#[derive(Debug, Clone, PartialEq)]
pub struct DropEvent {
    pub source: DragSource,
    pub target: DropTargetKind,
    /// Folder whose contents the drawer was showing
    pub open_folder: Option<FolderId>,
}

#[derive(Debug, Default)]
pub struct DragContext {
    active: Option<DragSource>,
    over: Option<Collision>,
}

impl DragContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, source: DragSource) {
        tracing::debug!(source = source.id(), kind = ?source.kind(), "drag start");
        self.active = Some(source);
        self.over = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&DragSource> {
        self.active.as_ref()
    }

    /// Last published collision
    pub fn current(&self) -> Option<&Collision> {
        self.over.as_ref()
    }

    /// Re-resolve the hovered target for a pointer move
    pub fn over(&mut self, pointer: Point, droppables: &[Droppable], open_folder: Option<&str>) -> Option<&Collision> {
        let source = self.active.as_ref()?;
        self.over = CollisionRouter::new(droppables, open_folder).resolve(source, pointer);
        self.over.as_ref()
    }

    /// Abort; the gesture produces no drop
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            tracing::debug!("drag cancelled");
        }
        self.over = None;
    }

    /// Finish the gesture; `None` when nothing was dragged or hovered
    pub fn release(&mut self, open_folder: Option<&str>) -> Option<DropEvent> {
        let source = self.active.take()?;
        let collision = self.over.take()?;
        Some(DropEvent {
            source,
            target: collision.target,
            open_folder: open_folder.map(str::to_string),
        })
    }
}

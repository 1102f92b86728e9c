//! Drag Payloads and Drop Targets

use std::sync::Arc;

use leptos_dragdrop::Rect;

use crate::content::{Card, ItemType, Tracker, TrackerKind};
use crate::models::{DrawerItem, FolderId, ItemId};

/// What is being dragged
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    DrawerFolder { folder_id: FolderId },
    DrawerItem(Arc<DrawerItem>),
    SheetCard(Card),
    SheetTracker(Tracker),
}

/// Routing class of a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// A drawer item holding a whole character
    FullCharacter,
    DrawerFolder,
    DrawerItem,
    SheetCard,
    SheetTracker(TrackerKind),
}

impl DragSource {
    pub fn kind(&self) -> DragKind {
        match self {
            DragSource::DrawerFolder { .. } => DragKind::DrawerFolder,
            DragSource::DrawerItem(item) if item.item_type == ItemType::FullCharacterSheet => DragKind::FullCharacter,
            DragSource::DrawerItem(_) => DragKind::DrawerItem,
            DragSource::SheetCard(_) => DragKind::SheetCard,
            DragSource::SheetTracker(tracker) => DragKind::SheetTracker(tracker.kind()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            DragSource::DrawerFolder { folder_id } => folder_id,
            DragSource::DrawerItem(item) => &item.id,
            DragSource::SheetCard(card) => &card.id,
            DragSource::SheetTracker(tracker) => tracker.id(),
        }
    }
}

/// What a mounted drop target stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTargetKind {
    MainSheetZone,
    SheetCardZone,
    SheetTrackerZone,
    SheetCard { card_id: String },
    SheetTracker { tracker_id: String, kind: TrackerKind },
    DrawerFolder { folder_id: FolderId },
    DrawerItem { item_id: ItemId },
    /// "Up one level" control of the open folder
    DrawerGoUp,
    /// Slot before child `index` of `parent_id`; `index == len` is the end
    DrawerReorderGap { parent_id: Option<FolderId>, index: usize },
    /// Background of the open folder's listing
    DrawerDropZone { folder_id: Option<FolderId> },
}

impl DropTargetKind {
    /// Containers resolve by containment, list entries by nearest center
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            DropTargetKind::MainSheetZone
                | DropTargetKind::SheetCardZone
                | DropTargetKind::SheetTrackerZone
                | DropTargetKind::DrawerFolder { .. }
                | DropTargetKind::DrawerGoUp
                | DropTargetKind::DrawerDropZone { .. }
        )
    }

    /// Anything on the character sheet side
    pub fn is_sheet(&self) -> bool {
        matches!(
            self,
            DropTargetKind::MainSheetZone
                | DropTargetKind::SheetCardZone
                | DropTargetKind::SheetTrackerZone
                | DropTargetKind::SheetCard { .. }
                | DropTargetKind::SheetTracker { .. }
        )
    }
}

/// A drop target currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Droppable {
    /// DOM-unique key
    pub id: String,
    pub target: DropTargetKind,
    pub rect: Rect,
}

impl Droppable {
    pub fn new(id: impl Into<String>, target: DropTargetKind, rect: Rect) -> Self {
        Self { id: id.into(), target, rect }
    }
}

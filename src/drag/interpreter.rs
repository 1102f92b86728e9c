//! Drag-End Interpreter
//!
//! [`classify_drop`] reads the drawer and sheet and decides what a release
//! means; [`apply_drop`] performs it. Keeping the two apart means a drop is
//! classified exactly once, against the state at release time.

use crate::content::{Character, DrawerContent, GameSystem, Reidentify, TrackerKind};
use crate::error::DrawerError;
use crate::models::{FolderId, ItemId, PendingItem};
use crate::notice::{Notice, NoticeKind, Notifier};
use crate::sheet::SheetStore;
use crate::storage::DrawerStorage;
use crate::store::DrawerStore;

use super::context::DropEvent;
use super::source::{DragSource, DropTargetKind};

/// The single operation a drop resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum DropAction {
    /// No target, dropped on itself, or nothing to do
    Ignore,
    ReorderFolders { parent: Option<FolderId>, old: usize, new: usize },
    ReorderItems { parent: Option<FolderId>, old: usize, new: usize },
    MoveFolder { id: FolderId, destination: Option<FolderId> },
    MoveItem { id: ItemId, destination: Option<FolderId> },
    /// Copy drawer content onto the sheet
    CopyToSheet { content: DrawerContent },
    /// Sheet content waiting for a name
    Stage(PendingItem),
    ReorderCards { old: usize, new: usize },
    ReorderTrackers { kind: TrackerKind, old: usize, new: usize },
    LoadCharacter { character: Character, source_item: ItemId },
    Reject(Notice),
}

/// What [`apply_drop`] ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Ignored,
    DrawerChanged,
    SheetChanged,
    Staged,
    Rejected,
}

/// Where "go up" leads: `Some(parent)` of the open folder, `Some(None)` for
/// the root, `None` when no folder is open
fn go_up_destination<S: DrawerStorage>(open_folder: Option<&str>, drawer: &DrawerStore<S>) -> Option<Option<FolderId>> {
    let open = open_folder?;
    Some(drawer.find_parent_folder(open).map(|f| f.id.clone()))
}

fn folder_parent<S: DrawerStorage>(drawer: &DrawerStore<S>, id: &str) -> Option<FolderId> {
    drawer.find_parent_folder(id).map(|f| f.id.clone())
}

fn classify_folder_drop<S: DrawerStorage>(
    folder_id: &str,
    target: &DropTargetKind,
    open_folder: Option<&str>,
    drawer: &DrawerStore<S>,
) -> DropAction {
    if drawer.find_folder(folder_id).is_none() {
        return DropAction::Ignore;
    }
    let current_parent = folder_parent(drawer, folder_id);
    let destination = match target {
        DropTargetKind::DrawerFolder { folder_id: dest } if dest == folder_id => return DropAction::Ignore,
        DropTargetKind::DrawerFolder { folder_id: dest } => Some(dest.clone()),
        DropTargetKind::DrawerGoUp => match go_up_destination(open_folder, drawer) {
            Some(dest) => dest,
            None => return DropAction::Ignore,
        },
        DropTargetKind::DrawerReorderGap { parent_id, index } => {
            if *parent_id != current_parent {
                return DropAction::Ignore;
            }
            let siblings = match parent_id {
                Some(parent) => match drawer.find_folder(parent) {
                    Some(folder) => folder.folders.clone(),
                    None => return DropAction::Ignore,
                },
                None => drawer.drawer().folders.to_vec(),
            };
            let Some(old) = siblings.iter().position(|f| f.id == folder_id) else {
                return DropAction::Ignore;
            };
            // The gap before `index`; removing the folder first shifts later slots
            let new = if *index > old { index - 1 } else { *index };
            let new = new.min(siblings.len().saturating_sub(1));
            if new == old {
                return DropAction::Ignore;
            }
            return DropAction::ReorderFolders { parent: parent_id.clone(), old, new };
        }
        _ => return DropAction::Ignore,
    };
    if destination == current_parent {
        return DropAction::Ignore;
    }
    DropAction::MoveFolder { id: folder_id.to_string(), destination }
}

fn classify_item_drop<S: DrawerStorage>(
    event: &DropEvent,
    item_id: &str,
    drawer: &DrawerStore<S>,
    sheet: &dyn SheetStore,
) -> DropAction {
    let Some(item) = drawer.find_item(item_id) else {
        return DropAction::Ignore;
    };
    let Some(current_parent) = drawer.find_item_parent(item_id) else {
        return DropAction::Ignore;
    };

    let destination = match &event.target {
        DropTargetKind::DrawerItem { item_id: other } if other == item_id => return DropAction::Ignore,
        DropTargetKind::DrawerItem { item_id: other } => {
            if drawer.find_item_parent(other) != Some(current_parent.clone()) {
                return DropAction::Ignore;
            }
            let siblings = match &current_parent {
                Some(parent) => match drawer.find_folder(parent) {
                    Some(folder) => folder.items.clone(),
                    None => return DropAction::Ignore,
                },
                None => drawer.drawer().root_items.to_vec(),
            };
            let old = siblings.iter().position(|i| i.id == item_id);
            let new = siblings.iter().position(|i| i.id == *other);
            return match (old, new) {
                (Some(old), Some(new)) => DropAction::ReorderItems { parent: current_parent, old, new },
                _ => DropAction::Ignore,
            };
        }
        DropTargetKind::DrawerFolder { folder_id } => Some(folder_id.clone()),
        DropTargetKind::DrawerGoUp => match go_up_destination(event.open_folder.as_deref(), drawer) {
            Some(dest) => dest,
            None => return DropAction::Ignore,
        },
        DropTargetKind::MainSheetZone => {
            if let DrawerContent::Character(character) = &item.content {
                return DropAction::LoadCharacter {
                    character: character.clone(),
                    source_item: item.id.clone(),
                };
            }
            return classify_to_sheet(&item.content, item.game, sheet);
        }
        target if target.is_sheet() => return classify_to_sheet(&item.content, item.game, sheet),
        _ => return DropAction::Ignore,
    };
    if destination == current_parent {
        return DropAction::Ignore;
    }
    DropAction::MoveItem { id: item.id.clone(), destination }
}

/// Drawer → sheet: needs a loaded character of the same game system
fn classify_to_sheet(content: &DrawerContent, game: GameSystem, sheet: &dyn SheetStore) -> DropAction {
    let Some(sheet_game) = sheet.game() else {
        return DropAction::Reject(Notice::warning(NoticeKind::NoCharacterLoaded));
    };
    if sheet_game != game {
        return DropAction::Reject(Notice::warning(NoticeKind::GameMismatch { item: game, sheet: sheet_game }));
    }
    match content {
        DrawerContent::Card(_) | DrawerContent::Tracker(_) => DropAction::CopyToSheet { content: content.clone() },
        DrawerContent::Character(_) => DropAction::Reject(Notice::warning(NoticeKind::UnsupportedTarget {
            item_type: content.item_type(),
        })),
    }
}

fn classify_sheet_drop<S: DrawerStorage>(event: &DropEvent, drawer: &DrawerStore<S>, sheet: &dyn SheetStore) -> DropAction {
    let Some(game) = sheet.game() else {
        return DropAction::Ignore;
    };
    let destination = match &event.target {
        DropTargetKind::DrawerDropZone { folder_id } => folder_id.clone(),
        DropTargetKind::DrawerFolder { folder_id } => Some(folder_id.clone()),
        DropTargetKind::DrawerGoUp => match go_up_destination(event.open_folder.as_deref(), drawer) {
            Some(dest) => dest,
            None => return DropAction::Ignore,
        },
        DropTargetKind::SheetCard { card_id } => {
            let DragSource::SheetCard(card) = &event.source else {
                return DropAction::Ignore;
            };
            return match (sheet.card_index(&card.id), sheet.card_index(card_id)) {
                (Some(old), Some(new)) if old != new => DropAction::ReorderCards { old, new },
                _ => DropAction::Ignore,
            };
        }
        DropTargetKind::SheetTracker { tracker_id, kind } => {
            let DragSource::SheetTracker(tracker) = &event.source else {
                return DropAction::Ignore;
            };
            if tracker.kind() != *kind {
                return DropAction::Ignore;
            }
            return match (sheet.tracker_index(*kind, tracker.id()), sheet.tracker_index(*kind, tracker_id)) {
                (Some(old), Some(new)) if old != new => DropAction::ReorderTrackers { kind: *kind, old, new },
                _ => DropAction::Ignore,
            };
        }
        _ => return DropAction::Ignore,
    };
    let content = match &event.source {
        DragSource::SheetCard(card) => DrawerContent::Card(card.clone()),
        DragSource::SheetTracker(tracker) => DrawerContent::Tracker(tracker.clone()),
        _ => return DropAction::Ignore,
    };
    DropAction::Stage(PendingItem::new(game, &content, destination))
}

/// Decide what a release means without changing anything
pub fn classify_drop<S: DrawerStorage>(event: &DropEvent, drawer: &DrawerStore<S>, sheet: &dyn SheetStore) -> DropAction {
    let action = match &event.source {
        DragSource::DrawerFolder { folder_id } => {
            classify_folder_drop(folder_id, &event.target, event.open_folder.as_deref(), drawer)
        }
        DragSource::DrawerItem(item) => classify_item_drop(event, &item.id, drawer, sheet),
        DragSource::SheetCard(_) | DragSource::SheetTracker(_) => classify_sheet_drop(event, drawer, sheet),
    };
    tracing::debug!(source = event.source.id(), target = ?event.target, action = ?action, "drop classified");
    action
}

/// Carry out a classified drop
pub fn apply_drop<S: DrawerStorage>(
    action: DropAction,
    drawer: &mut DrawerStore<S>,
    sheet: &mut dyn SheetStore,
    notifier: &mut dyn Notifier,
) -> DropOutcome {
    let result: Result<DropOutcome, DrawerError> = match action {
        DropAction::Ignore => Ok(DropOutcome::Ignored),
        DropAction::ReorderFolders { parent, old, new } => drawer
            .reorder_folders(parent.as_deref(), old, new)
            .map(|_| DropOutcome::DrawerChanged),
        DropAction::ReorderItems { parent, old, new } => drawer
            .reorder_items(parent.as_deref(), old, new)
            .map(|_| DropOutcome::DrawerChanged),
        DropAction::MoveFolder { id, destination } => drawer
            .move_folder(&id, destination.as_deref())
            .map(|_| DropOutcome::DrawerChanged),
        DropAction::MoveItem { id, destination } => drawer
            .move_item(&id, destination.as_deref())
            .map(|_| DropOutcome::DrawerChanged),
        DropAction::CopyToSheet { content } => {
            let added = match content.reidentify(drawer.ids()) {
                DrawerContent::Card(card) => sheet.add_card(card),
                DrawerContent::Tracker(tracker) => sheet.add_tracker(tracker),
                DrawerContent::Character(_) => false,
            };
            Ok(if added { DropOutcome::SheetChanged } else { DropOutcome::Ignored })
        }
        DropAction::Stage(pending) => {
            drawer.stage_pending(pending);
            Ok(DropOutcome::Staged)
        }
        DropAction::ReorderCards { old, new } => sheet
            .reorder_cards(old, new)
            .map(|_| DropOutcome::SheetChanged)
            .map_err(DrawerError::from),
        DropAction::ReorderTrackers { kind, old, new } => sheet
            .reorder_trackers(kind, old, new)
            .map(|_| DropOutcome::SheetChanged)
            .map_err(DrawerError::from),
        DropAction::LoadCharacter { character, source_item } => {
            sheet.load_character(character, Some(source_item));
            Ok(DropOutcome::SheetChanged)
        }
        DropAction::Reject(notice) => {
            notifier.notify(notice);
            Ok(DropOutcome::Rejected)
        }
    };
    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            // Stale ids or a rejected move; the drawer did not change
            tracing::debug!(error = %e, "drop had no effect");
            DropOutcome::Ignored
        }
    }
}

//! Drag scenarios, end to end through a session

use std::sync::Arc;

use leptos_dragdrop::{Point, Rect};

use super::*;
use crate::config::DrawerConfig;
use crate::content::{Card, CardType, Character, DrawerContent, GameSystem, StatusTracker, Tracker};
use crate::ids::SequentialIds;
use crate::models::DrawerItem;
use crate::notice::NoticeKind;
use crate::session::Session;
use crate::sheet::{Sheet, SheetStore};
use crate::storage::MemoryStorage;
use crate::store::{DrawerStore, SaveOutcome};

fn session() -> Session<MemoryStorage> {
    let store = DrawerStore::new(MemoryStorage::new(), &DrawerConfig::default()).with_ids(SequentialIds::new("id"));
    Session::new(store)
}

fn with_character(game: GameSystem) -> Session<MemoryStorage> {
    let mut s = session();
    let mut hero = Character::new("hero", "Hero", game);
    for (id, title) in [("a", "Blade"), ("b", "Cloak"), ("c", "Crown")] {
        hero.cards.push(Card::new(id, CardType::CharacterTheme, title));
    }
    s.sheet = Sheet::with_character(hero);
    s
}

fn status(name: &str) -> DrawerContent {
    DrawerContent::Tracker(Tracker::Status(StatusTracker::new("status-1", name)))
}

fn theme(title: &str) -> DrawerContent {
    DrawerContent::Card(Card::new("card-1", CardType::CharacterTheme, title))
}

fn item(s: &Session<MemoryStorage>, id: &str) -> DragSource {
    DragSource::DrawerItem(s.drawer.find_item(id).unwrap())
}

fn drop_item(s: &mut Session<MemoryStorage>, id: &str, target: DropTargetKind) -> DropOutcome {
    let source = item(s, id);
    drop_on(s, source, target)
}

fn drop_on(s: &mut Session<MemoryStorage>, source: DragSource, target: DropTargetKind) -> DropOutcome {
    let event = DropEvent {
        source,
        target,
        open_folder: s.open_folder().map(str::to_string),
    };
    s.handle_drop(event)
}

#[test]
fn test_status_tracker_to_sheet() {
    let mut s = with_character(GameSystem::Legends);
    let id = s.drawer.add_item("Shaken", GameSystem::Legends, status("shaken"), None).unwrap();
    let before = s.drawer.drawer().clone();

    let outcome = drop_item(&mut s, &id, DropTargetKind::SheetTrackerZone);
    assert_eq!(outcome, DropOutcome::SheetChanged);

    let statuses = &s.sheet.character().unwrap().trackers.statuses;
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].name, "shaken");
    assert_ne!(statuses[0].id, "status-1");
    assert!(s.drawer.drawer().ptr_eq(&before));
    assert!(s.notices.is_empty());
}

#[test]
fn test_card_lands_in_cards_whatever_the_zone() {
    let mut s = with_character(GameSystem::Otherscape);
    let id = s.drawer.add_item("Edge", GameSystem::Otherscape, theme("Edge"), None).unwrap();
    let outcome = drop_item(&mut s, &id, DropTargetKind::SheetTrackerZone);
    assert_eq!(outcome, DropOutcome::SheetChanged);
    assert_eq!(s.sheet.character().unwrap().cards.len(), 4);
}

#[test]
fn test_game_mismatch_rejected_with_one_notice() {
    let mut s = with_character(GameSystem::CityOfMist);
    let id = s.drawer.add_item("Blade", GameSystem::Legends, theme("Blade"), None).unwrap();
    let before = s.drawer.drawer().clone();
    let sheet_before = s.sheet.character().cloned();

    let outcome = drop_item(&mut s, &id, DropTargetKind::MainSheetZone);
    assert_eq!(outcome, DropOutcome::Rejected);
    assert_eq!(s.notices.len(), 1);
    assert_eq!(
        s.notices.notices()[0].kind,
        NoticeKind::GameMismatch {
            item: GameSystem::Legends,
            sheet: GameSystem::CityOfMist
        }
    );
    assert!(s.drawer.drawer().ptr_eq(&before));
    assert_eq!(s.sheet.character().cloned(), sheet_before);
}

#[test]
fn test_transfer_without_character() {
    let mut s = session();
    let id = s.drawer.add_item("Blade", GameSystem::Legends, theme("Blade"), None).unwrap();
    let outcome = drop_item(&mut s, &id, DropTargetKind::SheetCardZone);
    assert_eq!(outcome, DropOutcome::Rejected);
    assert_eq!(s.notices.notices()[0].kind, NoticeKind::NoCharacterLoaded);
}

#[test]
fn test_sheet_card_staged_then_named() {
    let mut s = with_character(GameSystem::Legends);
    let mut card = s.sheet.character().unwrap().cards[0].clone();
    card.is_flipped = true;

    let outcome = drop_on(&mut s, DragSource::SheetCard(card.clone()), DropTargetKind::DrawerDropZone { folder_id: None });
    assert_eq!(outcome, DropOutcome::Staged);
    assert!(s.drawer.drawer().is_empty());
    assert!(s.drawer.pending().is_some());

    // Blank names keep the item staged
    assert!(s.confirm_pending("  ").is_err());
    assert!(s.drawer.pending().is_some());

    let id = s.confirm_pending("Bob").unwrap();
    let root = &s.drawer.drawer().root_items;
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].name, "Bob");
    assert_eq!(root[0].id, id);
    assert_ne!(id, card.id);
    assert_eq!(root[0].content, DrawerContent::Card(Card { is_flipped: false, ..card }));
    assert!(s.drawer.pending().is_none());
}

#[test]
fn test_sheet_tracker_staged_into_folder() {
    let mut s = with_character(GameSystem::Legends);
    let folder = s.drawer.add_folder("Statuses", None).unwrap();
    let tracker = Tracker::Status(StatusTracker::new("s1", "tired"));

    let target = DropTargetKind::DrawerFolder { folder_id: folder.clone() };
    assert_eq!(drop_on(&mut s, DragSource::SheetTracker(tracker), target), DropOutcome::Staged);
    assert_eq!(s.drawer.pending().unwrap().destination, Some(folder.clone()));

    s.drawer.cancel_pending();
    assert!(s.drawer.find_folder(&folder).unwrap().items.is_empty());
}

#[test]
fn test_no_target_and_self_drops_are_noops() {
    let mut s = session();
    let f = s.drawer.add_folder("A", None).unwrap();
    let id = s.drawer.add_item("Kit", GameSystem::Legends, theme("Kit"), Some(&f)).unwrap();
    let before = s.drawer.drawer().clone();

    let folder = DragSource::DrawerFolder { folder_id: f.clone() };
    assert_eq!(
        drop_on(&mut s, folder, DropTargetKind::DrawerFolder { folder_id: f.clone() }),
        DropOutcome::Ignored
    );
    assert_eq!(
        drop_item(&mut s, &id, DropTargetKind::DrawerItem { item_id: id.clone() }),
        DropOutcome::Ignored
    );
    // Already in that folder
    assert_eq!(
        drop_item(&mut s, &id, DropTargetKind::DrawerFolder { folder_id: f.clone() }),
        DropOutcome::Ignored
    );
    assert!(s.drawer.drawer().ptr_eq(&before));
    assert!(!s.drawer.can_redo());
}

#[test]
fn test_cancelled_gesture_changes_nothing() {
    let mut s = session();
    let f = s.drawer.add_folder("A", None).unwrap();
    let id = s.drawer.add_item("Kit", GameSystem::Legends, theme("Kit"), None).unwrap();
    let before = s.drawer.drawer().clone();
    let droppables = vec![Droppable::new(
        "folder-a",
        DropTargetKind::DrawerFolder { folder_id: f },
        Rect::new(0.0, 0.0, 200.0, 30.0),
    )];

    let mut ctx = DragContext::new();
    ctx.start(item(&s, &id));
    assert!(ctx.over(Point::new(20.0, 10.0), &droppables, None).is_some());
    ctx.cancel();
    assert!(ctx.release(None).is_none());
    assert!(s.drawer.drawer().ptr_eq(&before));
}

#[test]
fn test_gesture_moves_item_into_folder() {
    let mut s = session();
    let x = s.drawer.add_folder("X", None).unwrap();
    let w = s.drawer.add_folder("W", None).unwrap();
    let id = s.drawer.add_item("Kit", GameSystem::Legends, theme("Kit"), Some(&x)).unwrap();
    s.set_open_folder(Some(x.clone()));

    let droppables = vec![
        Droppable::new("up", DropTargetKind::DrawerGoUp, Rect::new(0.0, 0.0, 200.0, 30.0)),
        Droppable::new("kit", DropTargetKind::DrawerItem { item_id: id.clone() }, Rect::new(0.0, 40.0, 200.0, 30.0)),
        Droppable::new("w", DropTargetKind::DrawerFolder { folder_id: w.clone() }, Rect::new(0.0, 80.0, 200.0, 30.0)),
    ];

    let mut ctx = DragContext::new();
    ctx.start(item(&s, &id));
    ctx.over(Point::new(50.0, 50.0), &droppables, s.open_folder());
    let collision = ctx.over(Point::new(50.0, 95.0), &droppables, s.open_folder()).cloned();
    assert_eq!(collision.unwrap().droppable_id, "w");

    let event = ctx.release(s.open_folder()).unwrap();
    assert_eq!(s.handle_drop(event), DropOutcome::DrawerChanged);
    assert_eq!(s.drawer.find_item_parent(&id), Some(Some(w)));
    assert!(s.drawer.find_folder(&x).unwrap().items.is_empty());
}

#[test]
fn test_go_up_moves_to_parent_of_open_folder() {
    let mut s = session();
    let x = s.drawer.add_folder("X", None).unwrap();
    let y = s.drawer.add_folder("Y", Some(&x)).unwrap();
    let id = s.drawer.add_item("Kit", GameSystem::Legends, theme("Kit"), Some(&y)).unwrap();

    s.set_open_folder(Some(y.clone()));
    assert_eq!(drop_item(&mut s, &id, DropTargetKind::DrawerGoUp), DropOutcome::DrawerChanged);
    assert_eq!(s.drawer.find_item_parent(&id), Some(Some(x.clone())));

    // From a top-level folder, go-up is the root
    s.set_open_folder(Some(x.clone()));
    assert_eq!(drop_item(&mut s, &id, DropTargetKind::DrawerGoUp), DropOutcome::DrawerChanged);
    assert_eq!(s.drawer.find_item_parent(&id), Some(None));

    // Nothing open: nothing to go up from
    s.set_open_folder(None);
    assert_eq!(drop_item(&mut s, &id, DropTargetKind::DrawerGoUp), DropOutcome::Ignored);
}

#[test]
fn test_folder_reorder_gaps() {
    let mut s = session();
    let a = s.drawer.add_folder("A", None).unwrap();
    s.drawer.add_folder("B", None).unwrap();
    s.drawer.add_folder("C", None).unwrap();
    let source = DragSource::DrawerFolder { folder_id: a.clone() };

    // Gaps on either side of A do nothing
    for index in [0, 1] {
        let gap = DropTargetKind::DrawerReorderGap { parent_id: None, index };
        assert_eq!(drop_on(&mut s, source.clone(), gap), DropOutcome::Ignored);
    }
    let end = DropTargetKind::DrawerReorderGap { parent_id: None, index: 3 };
    assert_eq!(drop_on(&mut s, source.clone(), end), DropOutcome::DrawerChanged);
    let names: Vec<&str> = s.drawer.drawer().folders.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);

    // A gap under another parent is not a reorder
    let foreign = DropTargetKind::DrawerReorderGap { parent_id: Some("elsewhere".into()), index: 0 };
    assert_eq!(drop_on(&mut s, source, foreign), DropOutcome::Ignored);
}

#[test]
fn test_item_reorder_needs_shared_parent() {
    let mut s = session();
    let f = s.drawer.add_folder("F", None).unwrap();
    let one = s.drawer.add_item("One", GameSystem::Legends, theme("One"), None).unwrap();
    let two = s.drawer.add_item("Two", GameSystem::Legends, theme("Two"), None).unwrap();
    let nested = s.drawer.add_item("Nested", GameSystem::Legends, theme("Nested"), Some(&f)).unwrap();

    let target = DropTargetKind::DrawerItem { item_id: one.clone() };
    assert_eq!(drop_item(&mut s, &two, target), DropOutcome::DrawerChanged);
    let order: Vec<&str> = s.drawer.drawer().root_items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(order, vec!["Two", "One"]);

    let across = DropTargetKind::DrawerItem { item_id: nested };
    assert_eq!(drop_item(&mut s, &one, across), DropOutcome::Ignored);
}

#[test]
fn test_folder_into_own_subtree_is_ignored() {
    let mut s = session();
    let x = s.drawer.add_folder("X", None).unwrap();
    let y = s.drawer.add_folder("Y", Some(&x)).unwrap();
    let before = s.drawer.drawer().clone();

    let outcome = drop_on(&mut s, DragSource::DrawerFolder { folder_id: x }, DropTargetKind::DrawerFolder { folder_id: y });
    assert_eq!(outcome, DropOutcome::Ignored);
    assert!(s.drawer.drawer().ptr_eq(&before));
}

#[test]
fn test_full_character_load_and_save_back() {
    let mut s = session();
    let hero = Character::new("h", "Hero", GameSystem::CityOfMist);
    let id = s
        .drawer
        .add_item("Hero", GameSystem::CityOfMist, DrawerContent::Character(hero), None)
        .unwrap();

    let source = item(&s, &id);
    assert_eq!(source.kind(), DragKind::FullCharacter);
    assert_eq!(drop_on(&mut s, source, DropTargetKind::MainSheetZone), DropOutcome::SheetChanged);
    assert_eq!(s.sheet.character().unwrap().name, "Hero");
    assert_eq!(s.sheet.source_item_id(), Some(id.as_str()));

    s.sheet.add_card(Card::new("new", CardType::CharacterCard, "Mythos"));
    assert_eq!(s.save_character().unwrap(), Some(SaveOutcome::Updated(id.clone())));
    assert_eq!(s.drawer.drawer().root_items.len(), 1);
    match &s.drawer.find_item(&id).unwrap().content {
        DrawerContent::Character(c) => assert_eq!(c.cards.len(), 1),
        other => panic!("unexpected content {:?}", other),
    }
    assert!(matches!(s.notices.notices().last().unwrap().kind, NoticeKind::CharacterSaved { .. }));
}

#[test]
fn test_unsaved_character_gets_write_back_target() {
    let mut s = with_character(GameSystem::Legends);
    assert_eq!(s.save_character().unwrap(), Some(SaveOutcome::Staged));
    let id = s.confirm_pending("Hero").unwrap();
    assert_eq!(s.sheet.source_item_id(), Some(id.as_str()));
    assert_eq!(s.save_character().unwrap(), Some(SaveOutcome::Updated(id)));
}

#[test]
fn test_sheet_card_reorder() {
    let mut s = with_character(GameSystem::Legends);
    let a = s.sheet.character().unwrap().cards[0].clone();
    let target = DropTargetKind::SheetCard { card_id: "c".into() };
    assert_eq!(drop_on(&mut s, DragSource::SheetCard(a), target), DropOutcome::SheetChanged);
    let titles: Vec<&str> = s.sheet.character().unwrap().cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Cloak", "Crown", "Blade"]);
}

#[test]
fn test_moved_open_folder_closes_when_deleted() {
    let mut s = session();
    let x = s.drawer.add_folder("X", None).unwrap();
    s.set_open_folder(Some(x.clone()));
    s.drawer.delete_folder(&x).unwrap();
    // Any drop re-validates the open folder
    let stray = DragSource::DrawerItem(Arc::new(DrawerItem::new("ghost", "Ghost", GameSystem::Legends, theme("Ghost"))));
    assert_eq!(drop_on(&mut s, stray, DropTargetKind::DrawerGoUp), DropOutcome::Ignored);
    assert!(s.open_folder().is_none());
}

#[test]
fn test_import_into_open_folder() {
    let mut s = session();
    let x = s.drawer.add_folder("X", None).unwrap();
    s.set_open_folder(Some(x.clone()));
    let raw = crate::codec::export_tracker(&Tracker::Status(StatusTracker::new("s", "burning")), GameSystem::Legends).unwrap();
    assert!(s.import_file(&raw));
    assert_eq!(s.drawer.find_folder(&x).unwrap().items[0].name, "burning");
    assert!(!s.import_file("garbage"));
    assert_eq!(s.notices.len(), 2);
}

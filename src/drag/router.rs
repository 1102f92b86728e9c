//! Drag Collision Router
//!
//! Narrows the mounted drop targets to the ones that make sense for the
//! dragged kind, in priority tiers:
//!
//! | dragged           | tier 0                 | tier 1                  | tier 2                          |
//! |-------------------|------------------------|-------------------------|---------------------------------|
//! | full character    | main sheet zone        | drawer folder, go-up    | drawer items                    |
//! | drawer folder     | other folder, go-up    | reorder gaps            |                                 |
//! | drawer item       | drawer folder, go-up   | tracker/card/main zones | drawer items, sheet cards/trackers |
//! | sheet card/tracker| open folder drop zone  | drawer folder, go-up    | same-kind sheet siblings        |
//!
//! A lower tier is only consulted when the one above produced no hit, so a
//! drop "into" a folder is never mistaken for a reorder next to it.
//!
//! List entries (cards, trackers, drawer items, reorder gaps) only compete
//! while the pointer is inside the panel that lists them: a sheet zone for
//! sheet entries, a drawer drop zone for drawer entries.

use leptos_dragdrop::Point;

use super::source::{DragKind, DragSource, DropTargetKind, Droppable};

const TIER_COUNT: usize = 3;

/// The resolved hover target
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub droppable_id: String,
    pub target: DropTargetKind,
}

/// Priority tier of `target` for `source`; `None` if it is not a valid target
pub fn tier_of(source: &DragSource, target: &DropTargetKind, open_folder: Option<&str>) -> Option<usize> {
    use DropTargetKind as T;
    match source.kind() {
        DragKind::FullCharacter => match target {
            T::MainSheetZone => Some(0),
            T::DrawerFolder { .. } | T::DrawerGoUp => Some(1),
            T::DrawerItem { .. } => Some(2),
            _ => None,
        },
        DragKind::DrawerFolder => match target {
            T::DrawerFolder { folder_id } if folder_id != source.id() => Some(0),
            T::DrawerGoUp => Some(0),
            T::DrawerReorderGap { .. } => Some(1),
            _ => None,
        },
        DragKind::DrawerItem => match target {
            T::DrawerFolder { .. } | T::DrawerGoUp => Some(0),
            T::SheetTrackerZone | T::SheetCardZone | T::MainSheetZone => Some(1),
            T::DrawerItem { .. } | T::SheetCard { .. } | T::SheetTracker { .. } => Some(2),
            _ => None,
        },
        DragKind::SheetCard | DragKind::SheetTracker(_) => match target {
            T::DrawerDropZone { folder_id } if folder_id.as_deref() == open_folder => Some(0),
            T::DrawerFolder { .. } | T::DrawerGoUp => Some(1),
            T::SheetCard { .. } if source.kind() == DragKind::SheetCard => Some(2),
            T::SheetTracker { kind, .. } if source.kind() == DragKind::SheetTracker(*kind) => Some(2),
            _ => None,
        },
    }
}

/// Which panels the pointer is currently inside
#[derive(Debug, Clone, Copy, Default)]
struct Panels {
    sheet: bool,
    drawer: bool,
}

impl Panels {
    fn under(droppables: &[Droppable], pointer: Point) -> Self {
        let mut panels = Self::default();
        for d in droppables.iter().filter(|d| d.target.is_container() && d.rect.contains(pointer)) {
            match d.target {
                DropTargetKind::DrawerDropZone { .. } => panels.drawer = true,
                ref t if t.is_sheet() => panels.sheet = true,
                _ => {}
            }
        }
        panels
    }

    fn lists(&self, target: &DropTargetKind) -> bool {
        if target.is_sheet() {
            self.sheet
        } else {
            self.drawer
        }
    }
}

/// Containment (smallest rect wins) for containers, else nearest center
/// among list entries whose panel is under the pointer
fn pick<'d>(candidates: &[&'d Droppable], pointer: Point, panels: Panels) -> Option<&'d Droppable> {
    let contained = candidates
        .iter()
        .filter(|d| d.target.is_container() && d.rect.contains(pointer))
        .min_by(|a, b| a.rect.area().total_cmp(&b.rect.area()));
    if let Some(hit) = contained {
        return Some(*hit);
    }
    candidates
        .iter()
        .filter(|d| !d.target.is_container() && panels.lists(&d.target))
        .min_by(|a, b| {
            let da = a.rect.center().distance_sq(pointer);
            let db = b.rect.center().distance_sq(pointer);
            da.total_cmp(&db)
        })
        .copied()
}

/// Resolves the hovered target over one frame's set of droppables
pub struct CollisionRouter<'a> {
    droppables: &'a [Droppable],
    open_folder: Option<&'a str>,
}

impl<'a> CollisionRouter<'a> {
    pub fn new(droppables: &'a [Droppable], open_folder: Option<&'a str>) -> Self {
        Self { droppables, open_folder }
    }

    pub fn resolve(&self, source: &DragSource, pointer: Point) -> Option<Collision> {
        let panels = Panels::under(self.droppables, pointer);
        for tier in 0..TIER_COUNT {
            let candidates: Vec<&Droppable> = self
                .droppables
                .iter()
                .filter(|d| tier_of(source, &d.target, self.open_folder) == Some(tier))
                .collect();
            if let Some(hit) = pick(&candidates, pointer, panels) {
                tracing::trace!(tier, droppable = %hit.id, "collision");
                return Some(Collision {
                    droppable_id: hit.id.clone(),
                    target: hit.target.clone(),
                });
            }
        }
        None
    }
}

//! Drawer Models
//!
//! The drawer tree: folders own ordered child folders and items. Children
//! are held behind `Arc` so an edit can rebuild the path to the changed node
//! and share everything else with the previous tree.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::content::{DrawerContent, GameSystem, ItemType, Reidentify};
use crate::ids::IdGenerator;

pub type FolderId = String;
pub type ItemId = String;

/// A named, typed leaf holding a copy of sheet content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerItem {
    pub id: ItemId,
    pub name: String,
    pub game: GameSystem,
    pub item_type: ItemType,
    pub content: DrawerContent,
}

impl DrawerItem {
    /// The type tag is taken from the content so the two cannot disagree
    pub fn new(id: impl Into<String>, name: impl Into<String>, game: GameSystem, content: DrawerContent) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            game,
            item_type: content.item_type(),
            content,
        }
    }
}

impl Reidentify for DrawerItem {
    fn reidentify(&self, ids: &dyn IdGenerator) -> Self {
        Self {
            id: ids.next_id(),
            name: self.name.clone(),
            game: self.game,
            // A decoded item may carry a stale type; the content decides
            item_type: self.content.item_type(),
            content: self.content.reidentify(ids),
        }
    }

    fn visit_ids(&self, f: &mut dyn FnMut(&str)) {
        f(&self.id);
        self.content.visit_ids(f);
    }
}

/// A named container of folders and items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub folders: Vec<Arc<Folder>>,
    #[serde(default)]
    pub items: Vec<Arc<DrawerItem>>,
}

impl Folder {
    /// New empty folder
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            folders: Vec::new(),
            items: Vec::new(),
        }
    }

    /// True if `id` names this folder or any folder below it
    pub fn contains_folder(&self, id: &str) -> bool {
        self.id == id || self.folders.iter().any(|f| f.contains_folder(id))
    }

    /// Number of folders and items in the subtree, this folder included
    pub fn node_count(&self) -> usize {
        1 + self.items.len() + self.folders.iter().map(|f| f.node_count()).sum::<usize>()
    }
}

impl Reidentify for Folder {
    fn reidentify(&self, ids: &dyn IdGenerator) -> Self {
        Self {
            id: ids.next_id(),
            name: self.name.clone(),
            folders: self.folders.iter().map(|f| Arc::new(f.reidentify(ids))).collect(),
            items: self.items.iter().map(|i| Arc::new(i.reidentify(ids))).collect(),
        }
    }

    fn visit_ids(&self, f: &mut dyn FnMut(&str)) {
        f(&self.id);
        self.folders.iter().for_each(|child| child.visit_ids(f));
        self.items.iter().for_each(|item| item.visit_ids(f));
    }
}

/// The root aggregate: top-level folders plus root items
///
/// Cloning is two reference-count bumps. The `folders` allocation is the
/// identity the lookup cache keys on, so every edit that touches a folder
/// must produce a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawer {
    #[serde(default)]
    pub folders: Arc<Vec<Arc<Folder>>>,
    #[serde(default)]
    pub root_items: Arc<Vec<Arc<DrawerItem>>>,
}

impl Drawer {
    pub fn new(folders: Vec<Arc<Folder>>, root_items: Vec<Arc<DrawerItem>>) -> Self {
        Self {
            folders: Arc::new(folders),
            root_items: Arc::new(root_items),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.root_items.is_empty()
    }

    /// Both halves are the same allocations as `other`'s
    pub fn ptr_eq(&self, other: &Drawer) -> bool {
        Arc::ptr_eq(&self.folders, &other.folders) && Arc::ptr_eq(&self.root_items, &other.root_items)
    }

    /// Every id in the drawer, depth first
    pub fn all_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        for folder in self.folders.iter() {
            folder.visit_ids(&mut |id| out.push(id.to_string()));
        }
        for item in self.root_items.iter() {
            item.visit_ids(&mut |id| out.push(id.to_string()));
        }
        out
    }
}

/// Sheet content waiting for the user to name it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingItem {
    pub game: GameSystem,
    pub item_type: ItemType,
    pub content: DrawerContent,
    /// Folder to insert into; `None` is the drawer root
    pub destination: Option<FolderId>,
}

impl PendingItem {
    /// Stages a normalized copy of `content`
    pub fn new(game: GameSystem, content: &DrawerContent, destination: Option<FolderId>) -> Self {
        let content = content.normalized();
        Self {
            game,
            item_type: content.item_type(),
            content,
            destination,
        }
    }

    pub fn into_item(self, id: impl Into<String>, name: impl Into<String>) -> DrawerItem {
        DrawerItem::new(id, name, self.game, self.content)
    }
}

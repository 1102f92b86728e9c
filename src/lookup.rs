//! Tree Lookup Cache
//!
//! Memoized `id → folder`, `folder → parent` and `item → folder` indexes,
//! keyed by the identity of a drawer's top-level `folders` allocation.
//!
//! Entries hold a `Weak` to the allocation they were built from. Every tree
//! edit that touches a folder produces a new allocation, so an index is
//! correct for as long as its key is alive and is simply never matched again
//! afterwards; there is no invalidation step. Holding the `Weak` also keeps
//! the address from being reused while the entry exists.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Weak};

use crate::models::{Drawer, Folder, FolderId};

type FolderList = Vec<Arc<Folder>>;

/// Flattened view of one folder tree
#[derive(Debug, Default)]
pub struct FolderIndex {
    folders: HashMap<FolderId, Arc<Folder>>,
    parents: HashMap<FolderId, Arc<Folder>>,
    item_parents: HashMap<String, FolderId>,
}

impl FolderIndex {
    pub fn build(folders: &[Arc<Folder>]) -> Self {
        let mut index = Self::default();
        // Explicit stack; a malformed (cyclic) tree cannot recurse forever
        // because ids already seen are skipped.
        let mut stack: Vec<(Option<Arc<Folder>>, Arc<Folder>)> =
            folders.iter().rev().map(|f| (None, f.clone())).collect();
        while let Some((parent, folder)) = stack.pop() {
            if index.folders.contains_key(&folder.id) {
                continue;
            }
            index.folders.insert(folder.id.clone(), folder.clone());
            if let Some(parent) = parent {
                index.parents.insert(folder.id.clone(), parent);
            }
            for item in &folder.items {
                index.item_parents.insert(item.id.clone(), folder.id.clone());
            }
            for child in folder.folders.iter().rev() {
                stack.push((Some(folder.clone()), child.clone()));
            }
        }
        index
    }

    pub fn folder(&self, id: &str) -> Option<Arc<Folder>> {
        self.folders.get(id).cloned()
    }

    /// Parent of a nested folder; `None` for top-level or unknown folders
    pub fn parent(&self, id: &str) -> Option<Arc<Folder>> {
        self.parents.get(id).cloned()
    }

    pub fn item_parent(&self, item_id: &str) -> Option<&FolderId> {
        self.item_parents.get(item_id)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

struct Entry {
    key: Weak<FolderList>,
    index: Rc<FolderIndex>,
}

/// Identity-keyed cache of [`FolderIndex`]es
#[derive(Default)]
pub struct TreeIndexCache {
    entries: RefCell<Vec<Entry>>,
}

impl TreeIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for `tree`, built on first request for its folder allocation
    pub fn index(&self, tree: &Drawer) -> Rc<FolderIndex> {
        let key = Arc::as_ptr(&tree.folders);
        let mut entries = self.entries.borrow_mut();
        entries.retain(|e| e.key.strong_count() > 0);
        if let Some(entry) = entries.iter().find(|e| std::ptr::eq(e.key.as_ptr(), key)) {
            return entry.index.clone();
        }
        tracing::trace!(folders = tree.folders.len(), "building folder index");
        let index = Rc::new(FolderIndex::build(&tree.folders));
        entries.push(Entry {
            key: Arc::downgrade(&tree.folders),
            index: index.clone(),
        });
        index
    }

    pub fn find_folder(&self, tree: &Drawer, id: &str) -> Option<Arc<Folder>> {
        self.index(tree).folder(id)
    }

    pub fn find_parent_folder(&self, tree: &Drawer, id: &str) -> Option<Arc<Folder>> {
        self.index(tree).parent(id)
    }

    /// `Some(None)` for a root item, `Some(Some(folder))` for a nested one
    pub fn find_item_parent(&self, tree: &Drawer, item_id: &str) -> Option<Option<FolderId>> {
        if let Some(folder_id) = self.index(tree).item_parent(item_id) {
            return Some(Some(folder_id.clone()));
        }
        tree.root_items.iter().any(|it| it.id == item_id).then_some(None)
    }

    /// Live entries; dead ones are pruned on the next lookup
    pub fn len(&self) -> usize {
        self.entries.borrow().iter().filter(|e| e.key.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

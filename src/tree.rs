//! Tree Mutation Algorithms
//!
//! Pure edits over a [`Drawer`]. Each takes the current tree and returns a
//! new one, rebuilding only the folders on the path from the root to the
//! edited node; every other folder and item is shared by pointer with the
//! input. Searches stop at the first match since ids are unique.
//!
//! An edit that changes nothing returns `Err`; [`EditExt::or_original`] turns
//! that back into the input tree when the caller only wants "the tree after".

mod folders;
mod items;
mod merge;

pub use folders::*;
pub use items::*;
pub use merge::*;

use std::sync::Arc;

use crate::error::{TreeError, TreeResult};
use crate::models::{Drawer, DrawerItem, Folder, FolderId};

/// Collapse a failed edit back to the tree it was applied to
pub trait EditExt {
    fn or_original(self, original: &Drawer) -> Drawer;
}

impl EditExt for TreeResult<Drawer> {
    fn or_original(self, original: &Drawer) -> Drawer {
        self.unwrap_or_else(|_| original.clone())
    }
}

/// Move one element from `old` to `new`, keeping everything else in order
pub fn array_move<T: Clone>(list: &[T], old: usize, new: usize) -> TreeResult<Vec<T>> {
    let len = list.len();
    if old >= len {
        return Err(TreeError::IndexOutOfRange { index: old, len });
    }
    if new >= len {
        return Err(TreeError::IndexOutOfRange { index: new, len });
    }
    if old == new {
        return Err(TreeError::Unchanged);
    }
    let mut next = list.to_vec();
    let moved = next.remove(old);
    next.insert(new, moved);
    Ok(next)
}

/// Shallow copy of `folder` with new children folders
pub(crate) fn with_folders(folder: &Folder, folders: Vec<Arc<Folder>>) -> Folder {
    Folder {
        id: folder.id.clone(),
        name: folder.name.clone(),
        folders,
        items: folder.items.clone(),
    }
}

/// Shallow copy of `folder` with new items
pub(crate) fn with_items(folder: &Folder, items: Vec<Arc<DrawerItem>>) -> Folder {
    Folder {
        id: folder.id.clone(),
        name: folder.name.clone(),
        folders: folder.folders.clone(),
        items,
    }
}

type FolderEdit<'a> = &'a mut dyn FnMut(&Folder) -> TreeResult<Folder>;
type ItemEdit<'a> = &'a mut dyn FnMut(&DrawerItem) -> TreeResult<DrawerItem>;

/// Rewrites the path to folder `id`; `Ok(None)` when it is not in `folders`
fn update_folder_in(folders: &[Arc<Folder>], id: &str, edit: FolderEdit<'_>) -> TreeResult<Option<Vec<Arc<Folder>>>> {
    for (i, folder) in folders.iter().enumerate() {
        let replacement = if folder.id == id {
            Some(edit(&**folder)?)
        } else {
            update_folder_in(&folder.folders, id, edit)?.map(|children| with_folders(folder, children))
        };
        if let Some(updated) = replacement {
            let mut next = folders.to_vec();
            next[i] = Arc::new(updated);
            return Ok(Some(next));
        }
    }
    Ok(None)
}

/// Apply `edit` to the folder `id` wherever it is
pub(crate) fn update_folder(tree: &Drawer, id: &str, edit: FolderEdit<'_>) -> TreeResult<Drawer> {
    match update_folder_in(&tree.folders, id, edit)? {
        Some(folders) => Ok(Drawer {
            folders: Arc::new(folders),
            root_items: tree.root_items.clone(),
        }),
        None => Err(TreeError::folder(id)),
    }
}

/// Apply `edit` to the child lists of `parent`, or to the top level when `None`
pub(crate) fn update_container(
    tree: &Drawer,
    parent: Option<&str>,
    edit_folders: &mut dyn FnMut(&[Arc<Folder>]) -> TreeResult<Option<Vec<Arc<Folder>>>>,
    edit_items: &mut dyn FnMut(&[Arc<DrawerItem>]) -> TreeResult<Option<Vec<Arc<DrawerItem>>>>,
) -> TreeResult<Drawer> {
    match parent {
        None => {
            let folders = edit_folders(tree.folders.as_slice())?;
            let items = edit_items(tree.root_items.as_slice())?;
            if folders.is_none() && items.is_none() {
                return Err(TreeError::Unchanged);
            }
            Ok(Drawer {
                folders: folders.map(Arc::new).unwrap_or_else(|| tree.folders.clone()),
                root_items: items.map(Arc::new).unwrap_or_else(|| tree.root_items.clone()),
            })
        }
        Some(id) => update_folder(tree, id, &mut |folder: &Folder| {
            let folders = edit_folders(folder.folders.as_slice())?;
            let items = edit_items(folder.items.as_slice())?;
            if folders.is_none() && items.is_none() {
                return Err(TreeError::Unchanged);
            }
            Ok(Folder {
                id: folder.id.clone(),
                name: folder.name.clone(),
                folders: folders.unwrap_or_else(|| folder.folders.clone()),
                items: items.unwrap_or_else(|| folder.items.clone()),
            })
        }),
    }
}

/// Removes folder `id` from wherever it is, returning it and the rebuilt list
fn remove_folder_in(folders: &[Arc<Folder>], id: &str) -> Option<(Arc<Folder>, Vec<Arc<Folder>>)> {
    if let Some(pos) = folders.iter().position(|f| f.id == id) {
        let mut next = folders.to_vec();
        let removed = next.remove(pos);
        return Some((removed, next));
    }
    for (i, folder) in folders.iter().enumerate() {
        if let Some((removed, children)) = remove_folder_in(&folder.folders, id) {
            let mut next = folders.to_vec();
            next[i] = Arc::new(with_folders(folder, children));
            return Some((removed, next));
        }
    }
    None
}

fn update_item_in(folders: &[Arc<Folder>], id: &str, edit: ItemEdit<'_>) -> TreeResult<Option<Vec<Arc<Folder>>>> {
    for (i, folder) in folders.iter().enumerate() {
        let replacement = match folder.items.iter().position(|it| it.id == id) {
            Some(pos) => {
                let updated = edit(&*folder.items[pos])?;
                let mut items = folder.items.clone();
                items[pos] = Arc::new(updated);
                Some(with_items(folder, items))
            }
            None => update_item_in(&folder.folders, id, edit)?.map(|children| with_folders(folder, children)),
        };
        if let Some(updated) = replacement {
            let mut next = folders.to_vec();
            next[i] = Arc::new(updated);
            return Ok(Some(next));
        }
    }
    Ok(None)
}

/// Apply `edit` to item `id` wherever it is, root items first
pub(crate) fn update_item(tree: &Drawer, id: &str, edit: ItemEdit<'_>) -> TreeResult<Drawer> {
    if let Some(pos) = tree.root_items.iter().position(|it| it.id == id) {
        let updated = edit(&*tree.root_items[pos])?;
        let mut items = tree.root_items.to_vec();
        items[pos] = Arc::new(updated);
        return Ok(Drawer {
            folders: tree.folders.clone(),
            root_items: Arc::new(items),
        });
    }
    match update_item_in(&tree.folders, id, edit)? {
        Some(folders) => Ok(Drawer {
            folders: Arc::new(folders),
            root_items: tree.root_items.clone(),
        }),
        None => Err(TreeError::item(id)),
    }
}

fn remove_item_in(folders: &[Arc<Folder>], id: &str) -> Option<(Arc<DrawerItem>, Vec<Arc<Folder>>)> {
    for (i, folder) in folders.iter().enumerate() {
        let found = match folder.items.iter().position(|it| it.id == id) {
            Some(pos) => {
                let mut items = folder.items.clone();
                let removed = items.remove(pos);
                Some((removed, with_items(folder, items)))
            }
            None => remove_item_in(&folder.folders, id).map(|(removed, children)| (removed, with_folders(folder, children))),
        };
        if let Some((removed, updated)) = found {
            let mut next = folders.to_vec();
            next[i] = Arc::new(updated);
            return Some((removed, next));
        }
    }
    None
}

/// Find an item anywhere in the tree
pub fn find_item(tree: &Drawer, id: &str) -> Option<Arc<DrawerItem>> {
    fn walk(folders: &[Arc<Folder>], id: &str) -> Option<Arc<DrawerItem>> {
        folders.iter().find_map(|f| {
            f.items
                .iter()
                .find(|it| it.id == id)
                .cloned()
                .or_else(|| walk(&f.folders, id))
        })
    }
    tree.root_items
        .iter()
        .find(|it| it.id == id)
        .cloned()
        .or_else(|| walk(&tree.folders, id))
}

/// Where an item lives: `Some(None)` at the root, `Some(Some(folder))` nested
pub fn find_item_location(tree: &Drawer, id: &str) -> Option<Option<FolderId>> {
    fn walk(folders: &[Arc<Folder>], id: &str) -> Option<FolderId> {
        folders.iter().find_map(|f| {
            if f.items.iter().any(|it| it.id == id) {
                Some(f.id.clone())
            } else {
                walk(&f.folders, id)
            }
        })
    }
    if tree.root_items.iter().any(|it| it.id == id) {
        return Some(None);
    }
    walk(&tree.folders, id).map(Some)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_array_move() {
        let list = vec!['a', 'b', 'c', 'd'];
        assert_eq!(array_move(&list, 0, 2).unwrap(), vec!['b', 'c', 'a', 'd']);
        assert_eq!(array_move(&list, 3, 1).unwrap(), vec!['a', 'd', 'b', 'c']);
        assert_eq!(array_move(&list, 1, 1), Err(TreeError::Unchanged));
        assert_eq!(array_move(&list, 4, 1), Err(TreeError::IndexOutOfRange { index: 4, len: 4 }));
        assert_eq!(array_move(&list, 0, 9), Err(TreeError::IndexOutOfRange { index: 9, len: 4 }));
    }

    #[test]
    fn test_array_move_round_trip() {
        let list: Vec<u32> = (0..7).collect();
        for i in 0..7 {
            for j in 0..7 {
                if i == j {
                    continue;
                }
                let there = array_move(&list, i, j).unwrap();
                assert_eq!(array_move(&there, j, i).unwrap(), list, "i={} j={}", i, j);
            }
        }
    }

    #[test]
    fn test_find_item_and_location() {
        let tree = sample();
        assert_eq!(find_item(&tree, "i2").unwrap().name, "Two");
        assert_eq!(find_item_location(&tree, "i2"), Some(Some("y".to_string())));
        assert_eq!(find_item_location(&tree, "r2"), Some(None));
        assert!(find_item(&tree, "nope").is_none());
        assert_eq!(find_item_location(&tree, "nope"), None);
    }

    #[test]
    fn test_or_original_keeps_pointer() {
        let tree = sample();
        let after = rename_folder(&tree, "missing", "x").or_original(&tree);
        assert!(after.ptr_eq(&tree));
    }
}

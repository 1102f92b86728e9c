//! Item Edits

use std::sync::Arc;

use super::{array_move, remove_item_in, update_container, update_folder, update_item};
use crate::content::DrawerContent;
use crate::error::{TreeError, TreeResult};
use crate::models::{Drawer, DrawerItem, Folder};

/// Append `item` to `parent` (root items when `None`)
pub fn add_item(tree: &Drawer, item: DrawerItem, parent: Option<&str>) -> TreeResult<Drawer> {
    insert_item(tree, Arc::new(item), parent)
}

/// Insert half of a move; also the landing step for sheet → drawer transfers
pub fn insert_item(tree: &Drawer, item: Arc<DrawerItem>, parent: Option<&str>) -> TreeResult<Drawer> {
    match parent {
        None => {
            let mut items = tree.root_items.to_vec();
            items.push(item);
            Ok(Drawer {
                folders: tree.folders.clone(),
                root_items: Arc::new(items),
            })
        }
        Some(parent_id) => update_folder(tree, parent_id, &mut |parent: &Folder| {
            let mut next = parent.clone();
            next.items.push(item.clone());
            Ok(next)
        }),
    }
}

pub fn rename_item(tree: &Drawer, id: &str, name: &str) -> TreeResult<Drawer> {
    update_item(tree, id, &mut |item: &DrawerItem| {
        if item.name == name {
            return Err(TreeError::Unchanged);
        }
        Ok(DrawerItem {
            name: name.to_string(),
            ..item.clone()
        })
    })
}

/// Swap the stored content, keeping id and name
///
/// The type tag follows the new content.
pub fn replace_item_content(tree: &Drawer, id: &str, content: DrawerContent) -> TreeResult<Drawer> {
    update_item(tree, id, &mut |item: &DrawerItem| {
        if item.content == content {
            return Err(TreeError::Unchanged);
        }
        Ok(DrawerItem {
            id: item.id.clone(),
            name: item.name.clone(),
            game: item.game,
            item_type: content.item_type(),
            content: content.clone(),
        })
    })
}

pub fn delete_item(tree: &Drawer, id: &str) -> TreeResult<Drawer> {
    extract_item(tree, id).map(|(_, rest)| rest)
}

/// Detach item `id`, returning it together with the tree without it
pub fn extract_item(tree: &Drawer, id: &str) -> TreeResult<(Arc<DrawerItem>, Drawer)> {
    if let Some(pos) = tree.root_items.iter().position(|it| it.id == id) {
        let mut items = tree.root_items.to_vec();
        let removed = items.remove(pos);
        return Ok((
            removed,
            Drawer {
                folders: tree.folders.clone(),
                root_items: Arc::new(items),
            },
        ));
    }
    let (removed, folders) = remove_item_in(&tree.folders, id).ok_or_else(|| TreeError::item(id))?;
    Ok((
        removed,
        Drawer {
            folders: Arc::new(folders),
            root_items: tree.root_items.clone(),
        },
    ))
}

/// Extract then insert under `destination` (root items when `None`)
pub fn move_item(tree: &Drawer, id: &str, destination: Option<&str>) -> TreeResult<Drawer> {
    let (item, rest) = extract_item(tree, id)?;
    insert_item(&rest, item, destination)
}

/// Move the item at `old` to `new` within `parent`
pub fn reorder_items(tree: &Drawer, parent: Option<&str>, old: usize, new: usize) -> TreeResult<Drawer> {
    update_container(
        tree,
        parent,
        &mut |_: &[Arc<Folder>]| Ok(None),
        &mut |items: &[Arc<DrawerItem>]| array_move(items, old, new).map(Some),
    )
}

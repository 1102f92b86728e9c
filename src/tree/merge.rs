//! Bulk Merge and Re-identification

use std::sync::Arc;

use super::update_container;
use crate::content::Reidentify;
use crate::error::{TreeError, TreeResult};
use crate::ids::IdGenerator;
use crate::models::{Drawer, DrawerItem, Folder};

/// Append `folders` and `items` to `parent` in one edit (top level when `None`)
pub fn merge_into_folder(
    tree: &Drawer,
    parent: Option<&str>,
    folders: Vec<Arc<Folder>>,
    items: Vec<Arc<DrawerItem>>,
) -> TreeResult<Drawer> {
    if folders.is_empty() && items.is_empty() {
        return Err(TreeError::Unchanged);
    }
    update_container(
        tree,
        parent,
        &mut |existing: &[Arc<Folder>]| {
            if folders.is_empty() {
                return Ok(None);
            }
            let mut next = existing.to_vec();
            next.extend(folders.iter().cloned());
            Ok(Some(next))
        },
        &mut |existing: &[Arc<DrawerItem>]| {
            if items.is_empty() {
                return Ok(None);
            }
            let mut next = existing.to_vec();
            next.extend(items.iter().cloned());
            Ok(Some(next))
        },
    )
}

/// Clone `node` with every nested id (folders, items, content) replaced
///
/// Use whenever content is duplicated into the drawer so ids stay unique.
pub fn deep_re_id<T: Reidentify>(node: &T, ids: &dyn IdGenerator) -> T {
    node.reidentify(ids)
}

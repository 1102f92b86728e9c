//! Folder Edits

use std::sync::Arc;

use super::{array_move, remove_folder_in, update_container, update_folder};
use crate::error::{TreeError, TreeResult};
use crate::models::{Drawer, Folder};

/// Append `folder` as the last child of `parent` (top level when `None`)
pub fn add_folder(tree: &Drawer, folder: Folder, parent: Option<&str>) -> TreeResult<Drawer> {
    insert_folder(tree, Arc::new(folder), parent)
}

/// Insert half of a move: attach an existing subtree under `parent`
pub fn insert_folder(tree: &Drawer, folder: Arc<Folder>, parent: Option<&str>) -> TreeResult<Drawer> {
    match parent {
        None => {
            let mut folders = tree.folders.to_vec();
            folders.push(folder);
            Ok(Drawer {
                folders: Arc::new(folders),
                root_items: tree.root_items.clone(),
            })
        }
        Some(parent_id) => update_folder(tree, parent_id, &mut |parent: &Folder| {
            let mut next = parent.clone();
            next.folders.push(folder.clone());
            Ok(next)
        }),
    }
}

pub fn rename_folder(tree: &Drawer, id: &str, name: &str) -> TreeResult<Drawer> {
    update_folder(tree, id, &mut |folder: &Folder| {
        if folder.name == name {
            return Err(TreeError::Unchanged);
        }
        Ok(Folder {
            name: name.to_string(),
            ..folder.clone()
        })
    })
}

/// Remove the folder and everything below it
pub fn delete_folder(tree: &Drawer, id: &str) -> TreeResult<Drawer> {
    extract_folder(tree, id).map(|(_, rest)| rest)
}

/// Detach folder `id`, returning it together with the tree without it
pub fn extract_folder(tree: &Drawer, id: &str) -> TreeResult<(Arc<Folder>, Drawer)> {
    let (folder, folders) = remove_folder_in(&tree.folders, id).ok_or_else(|| TreeError::folder(id))?;
    Ok((
        folder,
        Drawer {
            folders: Arc::new(folders),
            root_items: tree.root_items.clone(),
        },
    ))
}

/// Extract then insert under `destination` (top level when `None`)
///
/// A destination inside the moved folder's own subtree is rejected.
pub fn move_folder(tree: &Drawer, id: &str, destination: Option<&str>) -> TreeResult<Drawer> {
    let (folder, rest) = extract_folder(tree, id)?;
    if let Some(dest) = destination {
        if folder.contains_folder(dest) {
            return Err(TreeError::WouldCycle { id: id.to_string() });
        }
    }
    insert_folder(&rest, folder, destination)
}

/// Move the child folder at `old` to `new` within `parent`
pub fn reorder_folders(tree: &Drawer, parent: Option<&str>, old: usize, new: usize) -> TreeResult<Drawer> {
    update_container(
        tree,
        parent,
        &mut |folders: &[Arc<Folder>]| array_move(folders, old, new).map(Some),
        &mut |_: &[Arc<crate::models::DrawerItem>]| Ok(None),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::*;
    use crate::tree::EditExt;

    fn names(folders: &[Arc<Folder>]) -> Vec<&str> {
        folders.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_add_folder_root_and_nested() {
        let tree = sample();
        let t1 = add_folder(&tree, Folder::new("n1", "New"), None).unwrap();
        assert_eq!(names(&t1.folders), vec!["x", "w", "n1"]);
        assert!(Arc::ptr_eq(&t1.root_items, &tree.root_items));

        let t2 = add_folder(&tree, Folder::new("n2", "Deep"), Some("y")).unwrap();
        let y = &t2.folders[0].folders[0];
        assert_eq!(names(&y.folders), vec!["z", "n2"]);
        assert!(Arc::ptr_eq(&t2.folders[1], &tree.folders[1]));
    }

    #[test]
    fn test_add_folder_unknown_parent() {
        let tree = sample();
        let err = add_folder(&tree, Folder::new("n", "N"), Some("ghost")).unwrap_err();
        assert_eq!(err, TreeError::folder("ghost"));
        let after = add_folder(&tree, Folder::new("n", "N"), Some("ghost")).or_original(&tree);
        assert!(after.ptr_eq(&tree));
    }

    #[test]
    fn test_rename_unknown_is_same_reference() {
        let tree = sample();
        assert!(rename_folder(&tree, "ghost", "x").unwrap_err().is_not_found());
        assert!(rename_folder(&tree, "ghost", "x").or_original(&tree).ptr_eq(&tree));
    }

    #[test]
    fn test_rename_deep_folder_shares_structure() {
        // x[ y[ z ] ], w
        let tree = sample();
        let renamed = rename_folder(&tree, "z", "Z2").unwrap();

        let (x0, x1) = (&tree.folders[0], &renamed.folders[0]);
        assert_eq!(x1.folders[0].folders[0].name, "Z2");
        // Path to z is rebuilt
        assert!(!Arc::ptr_eq(x0, x1));
        assert!(!Arc::ptr_eq(&x0.folders[0], &x1.folders[0]));
        // Off-path nodes are shared
        assert!(Arc::ptr_eq(&tree.folders[1], &renamed.folders[1]));
        assert!(Arc::ptr_eq(&x0.items[0], &x1.items[0]));
        assert!(Arc::ptr_eq(&x0.folders[0].items[0], &x1.folders[0].items[0]));
        assert!(Arc::ptr_eq(&tree.root_items, &renamed.root_items));
        assert!(!Arc::ptr_eq(&tree.folders, &renamed.folders));
        // Input untouched
        assert_eq!(tree.folders[0].folders[0].folders[0].name, "Z");
    }

    #[test]
    fn test_rename_same_name_unchanged() {
        let tree = sample();
        assert_eq!(rename_folder(&tree, "w", "W"), Err(TreeError::Unchanged));
    }

    #[test]
    fn test_delete_removes_subtree() {
        let tree = sample();
        let before = tree.all_ids();
        let deleted = delete_folder(&tree, "x").unwrap();

        let gone = ["x", "y", "z", "i1", "i2"];
        let after = deleted.all_ids();
        for id in gone {
            assert!(!after.iter().any(|a| a == id), "{} still present", id);
        }
        // 5 nodes plus the two embedded card ids
        assert_eq!(before.len() - after.len(), gone.len() + 2);
        assert!(Arc::ptr_eq(&deleted.folders[0], &tree.folders[1]));
        assert!(Arc::ptr_eq(&deleted.root_items, &tree.root_items));
    }

    #[test]
    fn test_delete_nested_keeps_siblings() {
        let tree = sample();
        let deleted = delete_folder(&tree, "z").unwrap();
        let y = &deleted.folders[0].folders[0];
        assert!(y.folders.is_empty());
        assert!(Arc::ptr_eq(&y.items[0], &tree.folders[0].folders[0].items[0]));
    }

    #[test]
    fn test_move_folder() {
        let tree = sample();
        let moved = move_folder(&tree, "z", Some("w")).unwrap();
        assert!(moved.folders[0].folders[0].folders.is_empty());
        assert_eq!(names(&moved.folders[1].folders), vec!["z"]);

        let to_root = move_folder(&tree, "y", None).unwrap();
        assert_eq!(names(&to_root.folders), vec!["x", "w", "y"]);
        assert_eq!(to_root.folders[2], tree.folders[0].folders[0]);
    }

    #[test]
    fn test_move_folder_into_own_subtree_rejected() {
        let tree = sample();
        assert_eq!(move_folder(&tree, "x", Some("z")), Err(TreeError::WouldCycle { id: "x".into() }));
        assert_eq!(move_folder(&tree, "x", Some("x")), Err(TreeError::WouldCycle { id: "x".into() }));
        assert!(move_folder(&tree, "x", Some("ghost")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_reorder_folders() {
        let tree = sample();
        let swapped = reorder_folders(&tree, None, 0, 1).unwrap();
        assert_eq!(names(&swapped.folders), vec!["w", "x"]);
        assert!(Arc::ptr_eq(&swapped.folders[0], &tree.folders[1]));

        let back = reorder_folders(&swapped, None, 1, 0).unwrap();
        assert_eq!(back, tree);

        assert_eq!(reorder_folders(&tree, None, 1, 1), Err(TreeError::Unchanged));
        assert!(matches!(reorder_folders(&tree, Some("y"), 0, 3), Err(TreeError::IndexOutOfRange { .. })));
        assert!(reorder_folders(&tree, Some("ghost"), 0, 1).unwrap_err().is_not_found());
    }
}

//! Drawer Store
//!
//! Owns the current drawer and everything that hangs off a commit: the
//! undo history, debounced persistence, the lookup cache and change
//! listeners. Every mutation goes through [`DrawerStore::commit`], which
//! replaces the tree in one assignment, so readers only ever see a whole
//! tree.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::codec::{self, ExportDocument};
use crate::config::DrawerConfig;
use crate::content::{Character, DrawerContent, GameSystem, ItemType};
use crate::error::{DrawerError, DrawerResult, TreeError, TreeResult};
use crate::history::History;
use crate::ids::{IdGenerator, UuidIds};
use crate::lookup::TreeIndexCache;
use crate::models::{Drawer, DrawerItem, Folder, FolderId, ItemId, PendingItem};
use crate::storage::{DebouncedWriter, DrawerStorage};
use crate::tree;

/// Result of [`DrawerStore::save_character`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written over the drawer item the character was loaded from
    Updated(ItemId),
    /// No item to write back to; staged for naming
    Staged,
}

type Listener = Box<dyn Fn(&Drawer)>;

fn valid_name(name: &str) -> TreeResult<&str> {
    match name.trim() {
        "" => Err(TreeError::EmptyName),
        trimmed => Ok(trimmed),
    }
}

pub struct DrawerStore<S: DrawerStorage> {
    history: History<Drawer>,
    pending: Option<PendingItem>,
    writer: DebouncedWriter<S>,
    ids: Box<dyn IdGenerator>,
    cache: TreeIndexCache,
    listeners: Vec<Listener>,
}

impl<S: DrawerStorage> DrawerStore<S> {
    /// Empty drawer backed by `storage`
    pub fn new(storage: S, config: &DrawerConfig) -> Self {
        Self::with_drawer(Drawer::default(), storage, config)
    }

    /// Restore whatever `storage` holds
    pub fn open(storage: S, config: &DrawerConfig) -> DrawerResult<Self> {
        let drawer = storage.load()?.unwrap_or_default();
        tracing::info!(folders = drawer.folders.len(), items = drawer.root_items.len(), "drawer restored");
        Ok(Self::with_drawer(drawer, storage, config))
    }

    fn with_drawer(drawer: Drawer, storage: S, config: &DrawerConfig) -> Self {
        Self {
            history: History::new(drawer, config.history_limit),
            pending: None,
            writer: DebouncedWriter::new(storage, config.persist_debounce()),
            ids: Box::new(UuidIds),
            cache: TreeIndexCache::new(),
            listeners: Vec::new(),
        }
    }

    /// Swap the id source, e.g. for deterministic ids in tests
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn drawer(&self) -> &Drawer {
        self.history.present()
    }

    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    pub fn storage(&self) -> &S {
        self.writer.inner()
    }

    /// Called with the new tree after every commit, undo and redo
    pub fn subscribe(&mut self, listener: impl Fn(&Drawer) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn publish(&mut self) {
        self.writer.schedule(self.history.present(), Utc::now());
        for listener in &self.listeners {
            listener(self.history.present());
        }
    }

    /// Make `result` the current drawer, or report why nothing changed
    pub fn commit(&mut self, action: &str, result: TreeResult<Drawer>) -> DrawerResult<()> {
        match result {
            Ok(next) => {
                self.history.push(next);
                self.publish();
                tracing::info!(action, "drawer updated");
                Ok(())
            }
            Err(e) => {
                tracing::debug!(action, error = %e, "drawer unchanged");
                Err(e.into())
            }
        }
    }

    // ========================
    // Lookups
    // ========================

    pub fn find_folder(&self, id: &str) -> Option<Arc<Folder>> {
        self.cache.find_folder(self.drawer(), id)
    }

    pub fn find_parent_folder(&self, id: &str) -> Option<Arc<Folder>> {
        self.cache.find_parent_folder(self.drawer(), id)
    }

    /// `Some(None)` for root items
    pub fn find_item_parent(&self, item_id: &str) -> Option<Option<FolderId>> {
        self.cache.find_item_parent(self.drawer(), item_id)
    }

    pub fn find_item(&self, id: &str) -> Option<Arc<DrawerItem>> {
        tree::find_item(self.drawer(), id)
    }

    // ========================
    // Folders
    // ========================

    pub fn add_folder(&mut self, name: &str, parent: Option<&str>) -> DrawerResult<FolderId> {
        let name = valid_name(name)?;
        let folder = Folder::new(self.ids.next_id(), name);
        let id = folder.id.clone();
        let next = tree::add_folder(self.drawer(), folder, parent);
        self.commit("add_folder", next)?;
        Ok(id)
    }

    pub fn rename_folder(&mut self, id: &str, name: &str) -> DrawerResult<()> {
        let name = valid_name(name)?;
        let next = tree::rename_folder(self.drawer(), id, name);
        self.commit("rename_folder", next)
    }

    pub fn delete_folder(&mut self, id: &str) -> DrawerResult<()> {
        let next = tree::delete_folder(self.drawer(), id);
        self.commit("delete_folder", next)
    }

    pub fn move_folder(&mut self, id: &str, destination: Option<&str>) -> DrawerResult<()> {
        let next = tree::move_folder(self.drawer(), id, destination);
        self.commit("move_folder", next)
    }

    pub fn reorder_folders(&mut self, parent: Option<&str>, old: usize, new: usize) -> DrawerResult<()> {
        let next = tree::reorder_folders(self.drawer(), parent, old, new);
        self.commit("reorder_folders", next)
    }

    // ========================
    // Items
    // ========================

    pub fn add_item(
        &mut self,
        name: &str,
        game: GameSystem,
        content: DrawerContent,
        parent: Option<&str>,
    ) -> DrawerResult<ItemId> {
        let name = valid_name(name)?;
        let item = DrawerItem::new(self.ids.next_id(), name, game, content);
        let id = item.id.clone();
        let next = tree::add_item(self.drawer(), item, parent);
        self.commit("add_item", next)?;
        Ok(id)
    }

    pub fn rename_item(&mut self, id: &str, name: &str) -> DrawerResult<()> {
        let name = valid_name(name)?;
        let next = tree::rename_item(self.drawer(), id, name);
        self.commit("rename_item", next)
    }

    pub fn delete_item(&mut self, id: &str) -> DrawerResult<()> {
        let next = tree::delete_item(self.drawer(), id);
        self.commit("delete_item", next)
    }

    pub fn move_item(&mut self, id: &str, destination: Option<&str>) -> DrawerResult<()> {
        let next = tree::move_item(self.drawer(), id, destination);
        self.commit("move_item", next)
    }

    pub fn reorder_items(&mut self, parent: Option<&str>, old: usize, new: usize) -> DrawerResult<()> {
        let next = tree::reorder_items(self.drawer(), parent, old, new);
        self.commit("reorder_items", next)
    }

    pub fn update_item_content(&mut self, id: &str, content: DrawerContent) -> DrawerResult<()> {
        let next = tree::replace_item_content(self.drawer(), id, content);
        self.commit("update_item_content", next)
    }

    /// Append already-built nodes under `parent` as one undo step
    pub fn merge(
        &mut self,
        parent: Option<&str>,
        folders: Vec<Arc<Folder>>,
        items: Vec<Arc<DrawerItem>>,
    ) -> DrawerResult<()> {
        let next = tree::merge_into_folder(self.drawer(), parent, folders, items);
        self.commit("merge", next)
    }

    // ========================
    // Import / export
    // ========================

    /// Re-identify and merge a decoded export file; returns nodes added
    pub fn import_document(&mut self, doc: ExportDocument, parent: Option<&str>) -> DrawerResult<usize> {
        let (folders, items) = doc.into_drawer_nodes(self.ids.as_ref())?;
        let added = folders.len() + items.len();
        let next = tree::merge_into_folder(self.drawer(), parent, folders, items);
        self.commit("import", next)?;
        Ok(added)
    }

    pub fn import_str(&mut self, raw: &str, parent: Option<&str>) -> DrawerResult<usize> {
        let doc = codec::import_str(raw)?;
        self.import_document(doc, parent)
    }

    pub fn export_folder(&self, id: &str) -> DrawerResult<String> {
        let folder = self.find_folder(id).ok_or_else(|| TreeError::folder(id))?;
        Ok(codec::export_folder(&folder)?)
    }

    pub fn export_item(&self, id: &str) -> DrawerResult<String> {
        let item = self.find_item(id).ok_or_else(|| TreeError::item(id))?;
        Ok(codec::export_item(&item)?)
    }

    pub fn export_drawer(&self) -> DrawerResult<String> {
        Ok(codec::export_drawer(self.drawer())?)
    }

    // ========================
    // Pending item
    // ========================

    pub fn pending(&self) -> Option<&PendingItem> {
        self.pending.as_ref()
    }

    /// Stage sheet content for naming; replaces any earlier pending item
    pub fn stage_pending(&mut self, pending: PendingItem) {
        if let Some(previous) = &self.pending {
            tracing::debug!(item_type = ?previous.item_type, "replacing unconfirmed pending item");
        }
        tracing::debug!(item_type = ?pending.item_type, destination = ?pending.destination, "pending item staged");
        self.pending = Some(pending);
    }

    /// Insert the pending item as `name`
    ///
    /// A blank name is rejected and the item stays staged. If the destination
    /// folder is gone the item lands at the drawer root.
    pub fn confirm_pending(&mut self, name: &str) -> DrawerResult<ItemId> {
        if self.pending.is_none() {
            return Err(DrawerError::NothingPending);
        }
        let name = valid_name(name)?.to_string();
        let Some(pending) = self.pending.take() else {
            return Err(DrawerError::NothingPending);
        };
        let destination = pending.destination.clone();
        let item = Arc::new(pending.into_item(self.ids.next_id(), name));
        let id = item.id.clone();

        let mut next = tree::insert_item(self.drawer(), item.clone(), destination.as_deref());
        if matches!(&next, Err(e) if e.is_not_found()) {
            tracing::debug!(destination = ?destination, "pending destination vanished, using root");
            next = tree::insert_item(self.drawer(), item, None);
        }
        self.commit("confirm_pending", next)?;
        Ok(id)
    }

    pub fn cancel_pending(&mut self) -> Option<PendingItem> {
        let pending = self.pending.take();
        if pending.is_some() {
            tracing::debug!("pending item discarded");
        }
        pending
    }

    /// Write a loaded character back to the drawer
    ///
    /// Overwrites `source_item_id` when it still names a full-sheet item,
    /// otherwise stages a new pending item at the root.
    pub fn save_character(&mut self, character: &Character, source_item_id: Option<&str>) -> DrawerResult<SaveOutcome> {
        let content = DrawerContent::Character(character.normalized());
        let target = source_item_id
            .and_then(|id| self.find_item(id))
            .filter(|item| item.item_type == ItemType::FullCharacterSheet);

        if let Some(item) = target {
            let next = tree::replace_item_content(self.drawer(), &item.id, content);
            return match self.commit("save_character", next) {
                Ok(()) | Err(DrawerError::Tree(TreeError::Unchanged)) => Ok(SaveOutcome::Updated(item.id.clone())),
                Err(e) => Err(e),
            };
        }
        self.stage_pending(PendingItem::new(character.game, &content, None));
        Ok(SaveOutcome::Staged)
    }

    // ========================
    // History & persistence
    // ========================

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        if self.history.undo().is_none() {
            return false;
        }
        self.publish();
        tracing::info!("undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.history.redo().is_none() {
            return false;
        }
        self.publish();
        tracing::info!("redo");
        true
    }

    /// Empty the drawer and its storage; history starts over
    pub fn clear(&mut self) -> DrawerResult<()> {
        // Storage first; a failed clear must not lose the in-memory drawer
        self.writer.clear()?;
        self.history.reset(Drawer::default());
        self.pending = None;
        for listener in &self.listeners {
            listener(self.history.present());
        }
        tracing::info!("drawer cleared");
        Ok(())
    }

    /// Write the pending save if its debounce delay has passed
    pub fn tick(&mut self, now: DateTime<Utc>) -> DrawerResult<bool> {
        Ok(self.writer.poll_at(now)?)
    }

    pub fn flush(&mut self) -> DrawerResult<bool> {
        Ok(self.writer.flush()?)
    }
}

//! Session
//!
//! One drawer, one sheet and the notices they produce, plus which drawer
//! folder is open. This is what the UI holds and what drops are applied to.

use crate::content::ItemType;
use crate::drag::{apply_drop, classify_drop, DropEvent, DropOutcome};
use crate::error::DrawerResult;
use crate::models::{FolderId, ItemId};
use crate::notice::{Notice, NoticeKind, NoticeLog, Notifier};
use crate::sheet::{Sheet, SheetStore};
use crate::storage::DrawerStorage;
use crate::store::{DrawerStore, SaveOutcome};

pub struct Session<S: DrawerStorage> {
    pub drawer: DrawerStore<S>,
    pub sheet: Sheet,
    pub notices: NoticeLog,
    open_folder: Option<FolderId>,
}

impl<S: DrawerStorage> Session<S> {
    pub fn new(drawer: DrawerStore<S>) -> Self {
        Self {
            drawer,
            sheet: Sheet::new(),
            notices: NoticeLog::new(),
            open_folder: None,
        }
    }

    pub fn open_folder(&self) -> Option<&str> {
        self.open_folder.as_deref()
    }

    /// Show `folder` in the drawer panel; `None` is the root
    pub fn set_open_folder(&mut self, folder: Option<FolderId>) {
        self.open_folder = folder.filter(|id| self.drawer.find_folder(id).is_some());
    }

    /// Open the parent of the open folder
    pub fn go_up(&mut self) {
        let parent = self
            .open_folder
            .as_deref()
            .and_then(|id| self.drawer.find_parent_folder(id))
            .map(|f| f.id.clone());
        self.open_folder = parent;
    }

    /// Classify and apply a finished drag
    pub fn handle_drop(&mut self, event: DropEvent) -> DropOutcome {
        let action = classify_drop(&event, &self.drawer, &self.sheet);
        let outcome = apply_drop(action, &mut self.drawer, &mut self.sheet, &mut self.notices);
        let stale = self
            .open_folder
            .as_deref()
            .is_some_and(|id| self.drawer.find_folder(id).is_none());
        if stale {
            self.open_folder = None;
        }
        outcome
    }

    /// Write the loaded character back to the drawer item it came from
    pub fn save_character(&mut self) -> DrawerResult<Option<SaveOutcome>> {
        let Some(character) = self.sheet.character().cloned() else {
            self.notices.notify(Notice::warning(NoticeKind::NoCharacterLoaded));
            return Ok(None);
        };
        let source = self.sheet.source_item_id().map(str::to_string);
        let outcome = self.drawer.save_character(&character, source.as_deref())?;
        if matches!(outcome, SaveOutcome::Updated(_)) {
            self.notices.notify(Notice::info(NoticeKind::CharacterSaved { name: character.name.clone() }));
        }
        Ok(Some(outcome))
    }

    /// Confirm the staged item; a character saved this way becomes the
    /// sheet's write-back target
    pub fn confirm_pending(&mut self, name: &str) -> DrawerResult<ItemId> {
        let is_character = self
            .drawer
            .pending()
            .is_some_and(|p| p.item_type == ItemType::FullCharacterSheet);
        let id = self.drawer.confirm_pending(name)?;
        if is_character {
            if let Some(character) = self.sheet.character().cloned() {
                self.sheet.load_character(character, Some(id.clone()));
            }
        }
        Ok(id)
    }

    /// Import an export file into the open folder, reporting the result as a notice
    pub fn import_file(&mut self, raw: &str) -> bool {
        let parent = self.open_folder.clone();
        match self.drawer.import_str(raw, parent.as_deref()) {
            Ok(added) => {
                self.notices.notify(Notice::info(NoticeKind::Imported { count: added }));
                true
            }
            Err(e) => {
                self.notices.notify(Notice::error(NoticeKind::ImportFailed { reason: e.to_string() }));
                false
            }
        }
    }
}

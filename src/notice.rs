//! Transient User Notices
//!
//! Rejected transfers and import results are reported here instead of as
//! errors; none of them lose data.

use crate::content::{GameSystem, ItemType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoticeKind {
    /// Drawer → sheet drop with no character loaded
    NoCharacterLoaded,
    /// Drawer → sheet drop across game systems
    GameMismatch { item: GameSystem, sheet: GameSystem },
    /// Item type has no place on the drop target
    UnsupportedTarget { item_type: ItemType },
    Imported { count: usize },
    ImportFailed { reason: String },
    /// Character written back over its drawer item
    CharacterSaved { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn info(kind: NoticeKind) -> Self {
        Self { level: NoticeLevel::Info, kind }
    }

    pub fn warning(kind: NoticeKind) -> Self {
        Self { level: NoticeLevel::Warning, kind }
    }

    pub fn error(kind: NoticeKind) -> Self {
        Self { level: NoticeLevel::Error, kind }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            NoticeKind::NoCharacterLoaded => "Load a character before dragging items onto the sheet".to_string(),
            NoticeKind::GameMismatch { item, sheet } => {
                format!("This item is for {}, but the loaded character plays {}", item, sheet)
            }
            NoticeKind::UnsupportedTarget { item_type } => format!("{:?} cannot be dropped there", item_type),
            NoticeKind::Imported { count: 1 } => "Imported 1 entry".to_string(),
            NoticeKind::Imported { count } => format!("Imported {} entries", count),
            NoticeKind::ImportFailed { reason } => format!("Import failed: {}", reason),
            NoticeKind::CharacterSaved { name } => format!("Saved \"{}\" to the drawer", name),
        }
    }
}

/// Where notices go; the UI shows them as toasts
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Collects notices until drained
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!("notice: {}", notice.message()),
            _ => tracing::warn!("notice: {}", notice.message()),
        }
        self.notices.push(notice);
    }
}

//! Error Types
//!
//! Tree edits report "nothing happened" as an error value instead of a silent
//! no-op, so callers can tell a missing target from an edit that had nothing
//! to do. None of these are fatal; the drawer is unchanged whenever one is
//! returned.

use thiserror::Error;

/// What kind of node an id was expected to name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    Item,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Folder => f.write_str("folder"),
            NodeKind::Item => f.write_str("item"),
        }
    }
}

/// Outcome of a tree edit that did not change the tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: NodeKind, id: String },
    #[error("edit has no effect")]
    Unchanged,
    #[error("index out of range: {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cannot move folder {id} into its own subtree")]
    WouldCycle { id: String },
    #[error("name must not be empty")]
    EmptyName,
}

impl TreeError {
    pub fn folder(id: impl Into<String>) -> Self {
        TreeError::NotFound { kind: NodeKind::Folder, id: id.into() }
    }

    pub fn item(id: impl Into<String>) -> Self {
        TreeError::NotFound { kind: NodeKind::Item, id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TreeError::NotFound { .. })
    }
}

pub type TreeResult<T> = Result<T, TreeError>;

/// Persistence failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored drawer is not valid: {0}")]
    Format(#[from] serde_json::Error),
    #[error("unsupported drawer version {0}")]
    Version(u32),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Import/export failures
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("file is not a valid export: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported export version {0}")]
    Version(u32),
    #[error("export file does not name a game system")]
    MissingGame,
}

/// Errors surfaced by the drawer store
#[derive(Debug, Error)]
pub enum DrawerError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("no pending item to confirm")]
    NothingPending,
}

impl DrawerError {
    /// True for the benign "target id did not resolve" case
    pub fn is_not_found(&self) -> bool {
        matches!(self, DrawerError::Tree(e) if e.is_not_found())
    }
}

pub type DrawerResult<T> = Result<T, DrawerError>;

//! Drawer Configuration
//!
//! Every field has a default, so a partial (or missing) config file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawerConfig {
    /// Undo depth, present state included
    pub history_limit: usize,
    pub persist_debounce_ms: u64,
    /// `localStorage` key in the browser, file stem on native
    pub storage_key: String,
    pub drag_threshold_px: f64,
    /// Rolling log directory; no file logging when unset
    pub log_dir: Option<PathBuf>,
    pub log_capacity: usize,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            persist_debounce_ms: 400,
            storage_key: "mist-drawer".to_string(),
            drag_threshold_px: leptos_dragdrop::DRAG_THRESHOLD_PX,
            log_dir: None,
            log_capacity: 1000,
        }
    }
}

impl DrawerConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Read `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, crate::error::StorageError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&raw)?)
    }

    pub fn persist_debounce(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.persist_debounce_ms as i64)
    }

    /// Drawer file for [`crate::storage::JsonFileStorage`] inside `dir`
    pub fn storage_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", self.storage_key))
    }
}

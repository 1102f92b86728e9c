//! Mist Drawer
//!
//! Client-side drawer for tabletop character sheets: a tree of folders and
//! items holding cards, trackers and whole characters, edited immutably with
//! undo/redo, persisted through a [`storage::DrawerStorage`] backend, and
//! exchanged with a character sheet by drag and drop.

pub mod codec;
pub mod config;
pub mod content;
pub mod dnd;
pub mod drag;
pub mod error;
pub mod history;
pub mod ids;
pub mod lookup;
pub mod models;
pub mod notice;
pub mod session;
pub mod sheet;
pub mod storage;
pub mod store;
pub mod tree;
pub mod web;

pub use config::DrawerConfig;
pub use error::{DrawerError, DrawerResult, TreeError, TreeResult};
pub use models::{Drawer, DrawerItem, Folder, PendingItem};
pub use session::Session;
pub use store::DrawerStore;

const APP_NAME: &str = "mist-drawer";

/// Start the rolling file log when `config.log_dir` is set
///
/// Returns whether a logger was installed. Browser builds always log to the
/// devtools console and ignore `log_dir`.
pub fn init_logging(config: &DrawerConfig) -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let Some(dir) = &config.log_dir else {
            return false;
        };
        match rolling_logger::init_logger_with_capacity(dir, APP_NAME, config.log_capacity) {
            Ok(()) => {
                tracing::info!(dir = %dir.display(), "file logging started");
                true
            }
            Err(e) => {
                eprintln!("failed to start file logging: {}", e);
                false
            }
        }
    }
    #[cfg(target_arch = "wasm32")]
    {
        let _ = config;
        match tracing_wasm::try_set_as_global_default() {
            Ok(()) => {
                tracing::info!("console logging started");
                true
            }
            Err(e) => {
                web_sys::console::warn_1(&format!("failed to start console logging: {}", e).into());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_no_log_dir_no_logger() {
        assert!(!init_logging(&DrawerConfig::default()));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_logging() {
        let dir = tempfile::tempdir().unwrap();
        let config = DrawerConfig {
            log_dir: Some(dir.path().to_path_buf()),
            ..DrawerConfig::default()
        };
        assert!(init_logging(&config));
        // Only one global logger per process
        assert!(!init_logging(&config));
        assert_eq!(
            rolling_logger::log_file_path(),
            Some(dir.path().join("mist-drawer.log"))
        );
    }

    #[cfg(target_arch = "wasm32")]
    #[test]
    fn test_console_logging_ignores_log_dir() {
        let config = DrawerConfig {
            log_dir: Some("/unused".into()),
            ..DrawerConfig::default()
        };
        assert!(init_logging(&config));
        assert!(!init_logging(&DrawerConfig::default()));
    }
}

//! Browser `localStorage` backend

use crate::config::DrawerConfig;
use crate::error::StorageError;
use crate::models::Drawer;
use crate::storage::{decode_drawer, encode_drawer, DrawerStorage};

fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("{:?}", err))
}

/// Keeps the drawer under one `localStorage` key
#[derive(Debug, Clone)]
pub struct LocalStorage {
    key: String,
}

impl LocalStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn from_config(config: &DrawerConfig) -> Self {
        Self::new(config.storage_key.clone())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

impl DrawerStorage for LocalStorage {
    fn load(&self) -> Result<Option<Drawer>, StorageError> {
        let raw = self.storage()?.get_item(&self.key).map_err(js_error)?;
        raw.as_deref().map(decode_drawer).transpose()
    }

    fn save(&mut self, drawer: &Drawer) -> Result<(), StorageError> {
        let raw = encode_drawer(drawer)?;
        // Quota errors land here
        self.storage()?.set_item(&self.key, &raw).map_err(js_error)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.storage()?.remove_item(&self.key).map_err(js_error)
    }
}

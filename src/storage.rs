//! Drawer Persistence
//!
//! Backends store the serialized `{ folders, rootItems }` tree inside a
//! versioned envelope and hand it back verbatim, ids included.
//! [`DebouncedWriter`] coalesces bursts of commits into one physical write
//! and flushes the last one on demand or when dropped.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::models::Drawer;

pub const STORAGE_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a Drawer,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: Drawer,
}

pub fn encode_drawer(drawer: &Drawer) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: STORAGE_VERSION,
        state: drawer,
    })?)
}

pub fn decode_drawer(raw: &str) -> Result<Drawer, StorageError> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    if envelope.version > STORAGE_VERSION {
        return Err(StorageError::Version(envelope.version));
    }
    Ok(envelope.state)
}

/// Durable home of the drawer
pub trait DrawerStorage {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<Drawer>, StorageError>;
    fn save(&mut self, drawer: &Drawer) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-process backend holding the serialized form
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    raw: Option<String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Physical writes performed so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl DrawerStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Drawer>, StorageError> {
        self.raw.as_deref().map(decode_drawer).transpose()
    }

    fn save(&mut self, drawer: &Drawer) -> Result<(), StorageError> {
        self.raw = Some(encode_drawer(drawer)?);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.raw = None;
        Ok(())
    }
}

/// JSON file backend; writes go to a sibling temp file and are renamed in
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DrawerStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Drawer>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        decode_drawer(&raw).map(Some)
    }

    fn save(&mut self, drawer: &Drawer) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encode_drawer(drawer)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Coalesces saves: only the newest scheduled drawer is written, once the
/// delay has passed since it was scheduled
pub struct DebouncedWriter<S: DrawerStorage> {
    inner: S,
    delay: Duration,
    pending: Option<(Drawer, DateTime<Utc>)>,
}

impl<S: DrawerStorage> DebouncedWriter<S> {
    pub fn new(inner: S, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            pending: None,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn load(&self) -> Result<Option<Drawer>, StorageError> {
        self.inner.load()
    }

    /// Replace whatever was pending with `drawer`
    pub fn schedule(&mut self, drawer: &Drawer, now: DateTime<Utc>) {
        self.pending = Some((drawer.clone(), now));
    }

    /// Write the pending drawer if its delay has elapsed; true if written
    pub fn poll_at(&mut self, now: DateTime<Utc>) -> Result<bool, StorageError> {
        match &self.pending {
            Some((_, at)) if now - *at >= self.delay => self.flush(),
            _ => Ok(false),
        }
    }

    /// Write the pending drawer now; true if there was one
    pub fn flush(&mut self) -> Result<bool, StorageError> {
        let Some((drawer, _)) = self.pending.take() else {
            return Ok(false);
        };
        if let Err(e) = self.inner.save(&drawer) {
            // Keep it so a later flush can retry
            self.pending = Some((drawer, Utc::now()));
            return Err(e);
        }
        Ok(true)
    }

    /// Clear the backend, then drop anything pending
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.inner.clear()?;
        self.pending = None;
        Ok(())
    }
}

impl<S: DrawerStorage> Drop for DebouncedWriter<S> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "final drawer save failed");
        }
    }
}

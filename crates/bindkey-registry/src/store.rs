//! Durable storage seam for the shortcut collection.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{Result, Shortcut};

/// Durable storage for the shortcut collection.
///
/// The in-memory registry is the source of truth during a session; the store
/// is loaded once at startup and written back after every mutation.
pub trait Store: Send + Sync {
    /// Load the full collection. An absent backing file is an empty
    /// collection, not an error.
    fn load(&self) -> Result<Vec<Shortcut>>;

    /// Persist the full collection, replacing previous contents.
    fn save(&self, shortcuts: &[Shortcut]) -> Result<()>;
}

/// JSON file store.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default store location under the user data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bindkey")
            .join("shortcuts.json")
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Vec<Shortcut>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "store_file_absent_starting_empty");
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, shortcuts: &[Shortcut]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(shortcuts)?;
        fs::write(&self.path, data)?;
        debug!(path = %self.path.display(), count = shortcuts.len(), "store_saved");
        Ok(())
    }
}

/// In-memory store for tests; can be told to fail saves. Clones share
/// state, so a test can keep a handle after the registry takes the store.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct MemStore {
    pub saved: std::sync::Arc<parking_lot::Mutex<Vec<Vec<Shortcut>>>>,
    pub fail_saves: std::sync::Arc<parking_lot::Mutex<bool>>,
}

#[cfg(test)]
impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Store for MemStore {
    fn load(&self) -> Result<Vec<Shortcut>> {
        Ok(self.saved.lock().last().cloned().unwrap_or_default())
    }

    fn save(&self, shortcuts: &[Shortcut]) -> Result<()> {
        if *self.fail_saves.lock() {
            return Err(std::io::Error::other("save failed").into());
        }
        self.saved.lock().push(shortcuts.to_vec());
        Ok(())
    }
}

//! Preference storage
//!
//! This module provides:
//! - A `KeyValueStore` seam the theme controller persists through
//! - File-backed storage for native platforms, one JSON file per key
//! - In-memory storage for WASM builds and tests

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, io, path::PathBuf};

/// Key under which the theme preference is stored.
pub const THEME_KEY: &str = "gemini-chat-theme";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Process-wide string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

// ============================================
// In-memory backend
// ============================================

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================
// File backend (for native platforms)
// ============================================

#[cfg(not(target_arch = "wasm32"))]
pub struct FileStore {
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted in the platform data directory.
    pub fn in_data_dir() -> Self {
        Self::new(default_storage_dir())
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let raw = match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        // Values are JSON strings; hand-edited raw text is accepted as-is.
        match serde_json::from_str::<String>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(_) => Ok(Some(raw.trim().to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.root)?;
        let encoded = serde_json::to_string(value)?;
        fs::write(self.path_for(key), encoded)?;
        Ok(())
    }
}

/// Get the preference directory for this app
#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("chatshell").join("preferences");
    }

    PathBuf::from("cache").join("preferences")
}

/// Store used by the app: files under `dir` (or the data directory) on
/// native platforms, memory on WASM.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_store(dir: Option<&Path>) -> Arc<dyn KeyValueStore> {
    let store = match dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::in_data_dir(),
    };
    tracing::info!(root = %store.root().display(), "preference store opened");
    Arc::new(store)
}

#[cfg(target_arch = "wasm32")]
pub fn open_store(_dir: Option<&Path>) -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

/// Sanitize storage key for filesystem use
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}

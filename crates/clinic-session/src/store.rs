//! Credential persistence
//!
//! The persisted record is deliberately small: the two opaque credential
//! strings plus the color-scheme preference. Everything else about the
//! session (the role in particular) is re-derived from the backend on
//! startup.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::preferences::ColorScheme;

/// The record a [`CredentialStore`] round-trips
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub color_scheme: ColorScheme,
}

/// Pluggable persistence backend for session credentials
pub trait CredentialStore: Send + Sync {
    /// Load the persisted record, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<PersistedSession>>;

    /// Save the record, replacing any previous one
    fn save(&self, record: &PersistedSession) -> Result<()>;

    /// Remove the persisted record
    fn clear(&self) -> Result<()>;
}

/// In-memory store for tests and embedders with their own storage
#[derive(Default)]
pub struct MemoryStore {
    record: Mutex<Option<PersistedSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistedSession>> {
        Ok(self.record.lock().clone())
    }

    fn save(&self, record: &PersistedSession) -> Result<()> {
        *self.record.lock() = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.record.lock() = None;
        Ok(())
    }
}

/// JSON file store
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-save never leaves a truncated record behind.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the platform config location
    pub fn at_default_location() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join("clinic-client").join("session.json"),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for JsonFileStore {
    fn load(&self) -> Result<Option<PersistedSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let record = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    fn save(&self, record: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(record)?;
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

//! Settings persistence for the clipboard history
//!
//! The history is persisted as one serialized JSON blob under a fixed key in
//! a key-value settings store. The store sits behind a trait so tests (and
//! the fallback path when the database cannot be opened) can run entirely in
//! memory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use directories::ProjectDirs;
use redb::{Database, ReadableTable, TableDefinition};
use tracing::warn;

use crate::shared::errors::{ClipboardError, ClipboardResult};

/// Redb table holding app settings blobs, keyed by setting name
const SETTINGS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("settings");

/// Key-value settings store for persisted blobs
pub trait SettingsStore: Send + Sync {
    fn read_value(&self, key: &str) -> ClipboardResult<Option<String>>;
    fn write_value(&self, key: &str, value: &str) -> ClipboardResult<()>;
}

/// Redb-backed settings store in the app data directory
pub struct RedbSettings {
    db: Database,
}

impl RedbSettings {
    pub fn new() -> ClipboardResult<Self> {
        let proj_dirs = ProjectDirs::from("com", "antigravity", "pastestack").ok_or_else(|| {
            ClipboardError::SystemIO("Failed to get project directories".to_string())
        })?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|e| {
            ClipboardError::SystemIO(format!("Failed to create data directory: {}", e))
        })?;

        Self::open(data_dir.join("settings.redb"))
    }

    /// Open (or create) a settings database at an explicit path
    pub fn open(path: impl AsRef<Path>) -> ClipboardResult<Self> {
        let db = Database::create(path)
            .map_err(|e| ClipboardError::Storage(format!("Failed to open database: {}", e)))?;

        // Create the table up front so reads never hit a missing table
        let write_txn = db
            .begin_write()
            .map_err(|e| ClipboardError::Storage(format!("Failed to begin write: {}", e)))?;
        {
            let _table = write_txn
                .open_table(SETTINGS_TABLE)
                .map_err(|e| ClipboardError::Storage(format!("Failed to open table: {}", e)))?;
        }
        write_txn
            .commit()
            .map_err(|e| ClipboardError::Storage(format!("Failed to commit: {}", e)))?;

        Ok(Self { db })
    }
}

impl SettingsStore for RedbSettings {
    fn read_value(&self, key: &str) -> ClipboardResult<Option<String>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| ClipboardError::Storage(format!("Failed to begin read: {}", e)))?;

        let table = read_txn
            .open_table(SETTINGS_TABLE)
            .map_err(|e| ClipboardError::Storage(format!("Failed to open table: {}", e)))?;

        let value = table
            .get(key)
            .map_err(|e| ClipboardError::Storage(format!("Failed to read key: {}", e)))?;

        Ok(value.map(|guard| guard.value().to_string()))
    }

    fn write_value(&self, key: &str, value: &str) -> ClipboardResult<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| ClipboardError::Storage(format!("Failed to begin write: {}", e)))?;

        {
            let mut table = write_txn
                .open_table(SETTINGS_TABLE)
                .map_err(|e| ClipboardError::Storage(format!("Failed to open table: {}", e)))?;

            table
                .insert(key, value)
                .map_err(|e| ClipboardError::Storage(format!("Failed to insert: {}", e)))?;
        }

        write_txn
            .commit()
            .map_err(|e| ClipboardError::Storage(format!("Failed to commit: {}", e)))?;

        Ok(())
    }
}

/// In-memory settings store (tests, and fallback when the database fails)
#[derive(Default)]
pub struct InMemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for InMemorySettings {
    fn read_value(&self, key: &str) -> ClipboardResult<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|p| p.into_inner());
        Ok(values.get(key).cloned())
    }

    fn write_value(&self, key: &str, value: &str) -> ClipboardResult<()> {
        let mut values = self.values.lock().unwrap_or_else(|p| p.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Open the default on-disk store, falling back to memory if that fails.
/// History then simply does not survive a restart, which is acceptable for
/// best-effort convenience state.
pub fn open_default_store() -> Arc<dyn SettingsStore> {
    match RedbSettings::new() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Failed to open settings database, using in-memory fallback");
            Arc::new(InMemorySettings::new())
        }
    }
}

//! Local record store for SkinConsult
//!
//! SQLite-backed durable cache. The whole record list is kept as one JSON
//! snapshot in a key/value table and overwritten wholesale on every
//! mutation; a `settings` table holds remote configuration.

use crate::records::Record;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Slot key for the serialized record list
pub const SNAPSHOT_KEY: &str = "intake_records_v3";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database corruption detected")]
    Corruption,
}

/// Durable local cache for the record list
pub struct RecordStore {
    conn: Connection,
    path: PathBuf,
}

impl RecordStore {
    /// Open or create the store database
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Initialize the schema
    pub fn initialize(&self) -> Result<(), StoreError> {
        self.check_integrity()?;
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS app_cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Check database integrity
    pub fn check_integrity(&self) -> Result<(), StoreError> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if result != "ok" {
            return Err(StoreError::Corruption);
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the last-saved record list.
    ///
    /// A missing or unparseable snapshot yields an empty list; corruption
    /// is swallowed and logged, never raised to the caller.
    pub fn load(&self) -> Vec<Record> {
        let raw: SqliteResult<String> = self.conn.query_row(
            "SELECT value FROM app_cache WHERE key = ?",
            params![SNAPSHOT_KEY],
            |row| row.get(0),
        );

        match raw {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!("discarding unparseable record snapshot: {}", e);
                    Vec::new()
                }
            },
            Err(rusqlite::Error::QueryReturnedNoRows) => Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read record snapshot: {}", e);
                Vec::new()
            }
        }
    }

    /// Serialize the full list and overwrite the prior snapshot.
    ///
    /// The replacement happens inside a transaction, so a failed write
    /// leaves the previous durable state unchanged.
    pub fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO app_cache (key, value) VALUES (?, ?)",
            params![SNAPSHOT_KEY, json],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Read a settings value
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value: SqliteResult<String> = self.conn.query_row(
            "SELECT value FROM settings WHERE key = ?",
            params![key],
            |row| row.get(0),
        );
        match value {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    /// Write a settings value
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Get the application data directory
pub fn get_app_data_dir() -> PathBuf {
    dirs::data_dir()
        .expect("Platform data directory must be available")
        .join("SkinConsult")
}

/// Get the store database path
pub fn get_db_path() -> PathBuf {
    get_app_data_dir().join("skinconsult.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(&dir.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        (dir, store)
    }

    #[test]
    fn test_empty_store_loads_empty_list() {
        let (_dir, store) = open_temp_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let (_dir, store) = open_temp_store();
        let a = Record {
            id: 1,
            full_name: "A".to_string(),
            ..Record::default()
        };
        let b = Record {
            id: 2,
            full_name: "B".to_string(),
            ..Record::default()
        };

        store.save(&[a.clone(), b]).unwrap();
        assert_eq!(store.load().len(), 2);

        store.save(&[a]).unwrap();
        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].full_name, "A");
    }

    #[test]
    fn test_settings_round_trip() {
        let (_dir, store) = open_temp_store();
        assert_eq!(store.get_setting("remote_base_url").unwrap(), None);
        store
            .set_setting("remote_base_url", "https://example.supabase.co")
            .unwrap();
        assert_eq!(
            store.get_setting("remote_base_url").unwrap().as_deref(),
            Some("https://example.supabase.co")
        );
    }
}

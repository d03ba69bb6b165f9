use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::storage::KeyValueStore;

/// SQLite-backed slot store. One row per slot in the `slots` table.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init()?;
        Ok(db)
    }

    pub fn default_path() -> PathBuf {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobtrack") {
            proj_dirs.data_dir().join("jobtrack.db")
        } else {
            PathBuf::from("jobtrack.db")
        }
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_slot_reads_as_none() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get("nothing").unwrap(), None);
    }

    #[test]
    fn set_overwrites_existing_slot() {
        let mut db = Database::open_in_memory().unwrap();
        db.set("k", "first").unwrap();
        db.set("k", "second").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn open_at_creates_parent_dirs_and_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("tracker.db");

        {
            let mut db = Database::open_at(&path).unwrap();
            db.set("k", "v").unwrap();
        }

        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("v"));
    }
}

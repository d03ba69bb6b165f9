//! Key-value slot storage
//!
//! The tracker keeps its whole state in one named slot. Anything that can
//! read and write a string by key can back it: the SQLite [`Database`] on
//! disk, or [`MemoryStore`] for tests and embedding.
//!
//! [`Database`]: crate::db::Database

use std::collections::HashMap;

use crate::error::Result;

pub trait KeyValueStore {
    /// Returns `Ok(None)` when the slot has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value` already in `key`.
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.slots.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

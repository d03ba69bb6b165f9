//! Persistence adapter: the record list lives as a JSON array in a single
//! slot. Reads and writes never fail from the caller's point of view; the
//! in-memory store stays authoritative for the session.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::ApplicationRecord;
use crate::storage::KeyValueStore;

/// Slot name holding the serialized record list.
pub const STORAGE_KEY: &str = "job-tracker-apps";

pub struct Persistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Missing slot, unreadable storage and malformed JSON all load as empty.
    pub fn load(&self) -> Vec<ApplicationRecord> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no saved applications");
                return Vec::new();
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read saved applications");
                return Vec::new();
            }
        };

        let entries = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(key = %self.key, error = %err, "discarding malformed saved applications");
                return Vec::new();
            }
        };

        // A record that cannot be read is dropped on its own; its neighbours
        // still load.
        let records: Vec<ApplicationRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(key = %self.key, index, error = %err, "skipping unreadable application");
                    None
                }
            })
            .collect();
        debug!(key = %self.key, count = records.len(), "loaded applications");
        records
    }

    /// Write errors are logged and dropped; the previous slot value is left
    /// in place.
    pub fn save(&mut self, records: &[ApplicationRecord]) {
        let json = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "failed to serialize applications");
                return;
            }
        };
        match self.store.set(&self.key, &json) {
            Ok(()) => debug!(key = %self.key, count = records.len(), "saved applications"),
            Err(err) => warn!(key = %self.key, error = %err, "failed to save applications"),
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

/// Give every record a usable identity: blank or repeated ids (hand-edited
/// or corrupted storage) are replaced with fresh ones.
pub(crate) fn normalize_ids(records: &mut [ApplicationRecord], mint: impl Fn() -> String) {
    let mut seen = HashSet::new();
    for record in records.iter_mut() {
        if record.id.trim().is_empty() || !seen.insert(record.id.clone()) {
            let fresh = mint();
            warn!(old = %record.id, new = %fresh, "reassigned application id");
            record.id = fresh;
            seen.insert(record.id.clone());
        }
    }
}

//! Record store: the canonical, insertion-ordered list of applications.
//!
//! Every successful mutation is written through to the persistence slot
//! before returning. Persistence problems never fail a mutation.

use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{ApplicationDraft, ApplicationRecord};
use crate::persist::{self, Persistence};
use crate::storage::KeyValueStore;

pub struct RecordStore<S> {
    records: Vec<ApplicationRecord>,
    persistence: Persistence<S>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Loads the saved list once, repairs ids, and writes the result back.
    pub fn open(backend: S) -> Self {
        Self::from_persistence(Persistence::new(backend))
    }

    pub fn from_persistence(persistence: Persistence<S>) -> Self {
        let mut records = persistence.load();
        persist::normalize_ids(&mut records, mint_id);
        let mut store = Self {
            records,
            persistence,
        };
        store.persist();
        store
    }

    pub fn list(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ApplicationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn create(&mut self, draft: ApplicationDraft) -> Result<String> {
        draft.validate()?;

        let mut id = mint_id();
        while self.get(&id).is_some() {
            id = mint_id();
        }

        debug!(%id, company = %draft.company_name, role = %draft.role, "created application");
        self.records.push(ApplicationRecord {
            id: id.clone(),
            details: draft,
        });
        self.persist();
        Ok(id)
    }

    pub fn update(&mut self, id: &str, draft: ApplicationDraft) -> Result<()> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        draft.validate()?;

        self.records[index].details = draft;
        debug!(%id, "updated application");
        self.persist();
        Ok(())
    }

    /// Removing an unknown id is a no-op. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return false;
        }
        debug!(%id, "deleted application");
        self.persist();
        true
    }

    #[cfg(test)]
    pub(crate) fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    fn persist(&mut self) {
        self.persistence.save(&self.records);
    }
}

fn mint_id() -> String {
    Uuid::new_v4().to_string()
}

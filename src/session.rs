//! The tracker session: what a front end talks to.
//!
//! Front ends issue four intents (`submit_new`, `submit_edit`, `remove`,
//! `set_query`) and read back the full list, the current query result, the
//! board grouping and the summary. The session owns the store; front ends
//! borrow it for as long as they render.

use crate::error::Result;
use crate::models::{ApplicationDraft, ApplicationRecord};
use crate::query::{self, BoardColumn, Query};
use crate::storage::KeyValueStore;
use crate::store::RecordStore;
use crate::summary::{self, Summary};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Table,
    Board,
}

impl View {
    pub fn toggle(self) -> Self {
        match self {
            View::Table => View::Board,
            View::Board => View::Table,
        }
    }
}

pub struct Tracker<S> {
    store: RecordStore<S>,
    query: Query,
    view: View,
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn open(backend: S) -> Self {
        Self::new(RecordStore::open(backend))
    }

    pub fn new(store: RecordStore<S>) -> Self {
        Self {
            store,
            query: Query::default(),
            view: View::default(),
        }
    }

    pub fn submit_new(&mut self, draft: ApplicationDraft) -> Result<String> {
        self.store.create(draft)
    }

    pub fn submit_edit(&mut self, id: &str, draft: ApplicationDraft) -> Result<()> {
        self.store.update(id, draft)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.store.delete(id)
    }

    pub fn set_query(&mut self, query: Query) {
        self.query = query;
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn get(&self, id: &str) -> Option<&ApplicationRecord> {
        self.store.get(id)
    }

    pub fn list(&self) -> &[ApplicationRecord] {
        self.store.list()
    }

    /// Records matching the current query, in display order.
    pub fn visible(&self) -> Vec<&ApplicationRecord> {
        query::run(self.store.list(), &self.query)
    }

    pub fn board(&self) -> Vec<BoardColumn<'_>> {
        query::board(self.store.list(), &self.query)
    }

    /// Always over the full list, regardless of the current query.
    pub fn summary(&self) -> Summary {
        summary::summarize(self.store.list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Status;
    use crate::query::StatusFilter;
    use crate::storage::MemoryStore;

    #[test]
    fn intents_flow_through_to_views() {
        let mut tracker = Tracker::open(MemoryStore::new());
        let google = tracker
            .submit_new(ApplicationDraft::new("Google", "SWE"))
            .unwrap();
        tracker
            .submit_new(ApplicationDraft {
                status: Status::Rejected,
                ..ApplicationDraft::new("Meta", "PM")
            })
            .unwrap();

        tracker.set_query(Query {
            status_filter: StatusFilter::Only(Status::Applied),
            ..Query::default()
        });
        let results = tracker.visible();
        let visible: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(visible, [google.as_str()]);

        let summary = tracker.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.count(&Status::Rejected), 1);

        assert!(tracker.remove(&google));
        assert!(tracker.visible().is_empty());
        assert_eq!(tracker.list().len(), 1);
    }

    #[test]
    fn stale_edit_target_is_reported() {
        let mut tracker = Tracker::open(MemoryStore::new());
        let err = tracker
            .submit_edit("gone", ApplicationDraft::new("Acme", "SWE"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(tracker.list().is_empty());
    }

    #[test]
    fn view_toggles() {
        let mut tracker = Tracker::open(MemoryStore::new());
        assert_eq!(tracker.view(), View::Table);
        tracker.set_view(tracker.view().toggle());
        assert_eq!(tracker.view(), View::Board);
    }
}

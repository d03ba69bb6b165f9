//! jobtrack - track job applications from the terminal
//!
//! The library holds the application-state core: a record store that writes
//! through to a single key-value slot, a query engine for filtered and
//! sorted views, and per-status summaries. The `jobtrack` binary is a thin
//! front end over [`session::Tracker`].

pub mod db;
pub mod error;
pub mod models;
pub mod persist;
pub mod query;
pub mod session;
pub mod storage;
pub mod store;
pub mod summary;

pub use error::{Error, Result};
pub use models::{
    ApplicationDraft, ApplicationRecord, CoverLetterType, InterviewRound, Priority, Status, YesNo,
};
pub use query::{Query, SortDirection, SortField, StatusFilter};
pub use session::{Tracker, View};

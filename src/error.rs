//! Error types for jobtrack
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (missing required field, unknown id, bad argument)
//! - 4: Operation failed (storage, IO, serialization)

use thiserror::Error;

/// Exit codes for the jobtrack CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("{field} is required")]
    Validation { field: &'static str },

    #[error("Application not found: {0}")]
    NotFound(String),

    #[error("Invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },

    // Operation failures (exit code 4)
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation { .. } | Error::NotFound(_) | Error::InvalidValue { .. } => {
                exit_codes::USER_ERROR
            }
            Error::Storage(_) | Error::Io(_) | Error::Json(_) => exit_codes::OPERATION_FAILED,
        }
    }

    pub(crate) fn invalid(field: &'static str, value: &str) -> Self {
        Error::InvalidValue {
            field,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

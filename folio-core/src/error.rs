//! Error types for Folio Core

use serde::Serialize;
use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for all Folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A newer chapter request replaced this one before it completed
    #[error("Request for chapter {chapter} was superseded by a newer request")]
    Superseded { chapter: u32 },

    #[error("Session is closed")]
    Closed,

    #[error("Unknown work: {0}")]
    UnknownWork(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by a content source
///
/// Kept cloneable so the failing cause can live in the session's error state
/// and still be handed back to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    #[error("Chapter {chapter} of '{work_id}' not found")]
    NotFound { work_id: String, chapter: u32 },

    #[error("Content source unreachable: {message}")]
    Transient { message: String },
}

impl FetchError {
    /// Whether the chapter does not exist (as opposed to a delivery failure)
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }

    /// Shorthand for a transient failure
    pub fn transient(message: impl Into<String>) -> Self {
        FetchError::Transient {
            message: message.into(),
        }
    }
}

//! Strict error handling with the ClipboardError enum
//!
//! All errors are serializable so a presentation layer can receive them
//! over IPC. Nothing in this crate escalates an error to a hard failure:
//! clipboard history is best-effort convenience state, so callers log and
//! carry on.

use serde::Serialize;
use thiserror::Error;

/// Errors produced by the clipboard core
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum ClipboardError {
    /// Settings store error (open, read, write, transaction)
    #[error("Storage error: {0}")]
    Storage(String),

    /// History blob could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Pasteboard operation error (read, write, decode)
    #[error("Pasteboard error: {0}")]
    Pasteboard(String),

    /// System I/O error (file operations, directories)
    #[error("System I/O error: {0}")]
    SystemIO(String),
}

impl From<std::io::Error> for ClipboardError {
    fn from(err: std::io::Error) -> Self {
        ClipboardError::SystemIO(err.to_string())
    }
}

impl From<serde_json::Error> for ClipboardError {
    fn from(err: serde_json::Error) -> Self {
        ClipboardError::Serialization(err.to_string())
    }
}

/// Helper type alias for clipboard results
pub type ClipboardResult<T> = Result<T, ClipboardError>;

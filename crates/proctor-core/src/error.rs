//! Error types for the supervision engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{BlockEvent, BlockStatus};

/// Error type for every public engine operation.
#[derive(Error, Debug)]
pub enum ProctorError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Plan not found for the given ID
    #[error("Plan with ID {id} not found")]
    PlanNotFound { id: u64 },
    /// Task block not found for the given ID
    #[error("Task block with ID {id} not found")]
    BlockNotFound { id: u64 },
    /// The block already has an accepted check-in
    #[error("Task block {id} is already checked in")]
    AlreadyCheckedIn { id: u64 },
    /// A status change the transition table does not allow
    #[error("Cannot apply {event} to a block in status '{from}'")]
    IllegalTransition { from: BlockStatus, event: BlockEvent },
    /// A stored row could not be decoded
    #[error("Corrupt record in '{table}' (id {id}): {reason}")]
    Corrupt {
        table: &'static str,
        id: u64,
        reason: String,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ProctorError {
    /// Creates a database error with context.
    pub fn database(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.into(),
            source,
        }
    }

    /// Creates an input validation error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wraps a `spawn_blocking` join failure.
    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::configuration(format!("Task join error: {error}"))
    }

    /// Whether the error is a rejected request the caller can act on, as
    /// opposed to an internal or storage failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::BlockNotFound { .. }
                | Self::PlanNotFound { .. }
                | Self::AlreadyCheckedIn { .. }
        )
    }
}

/// Failure of an external collaborator call.
///
/// Never escapes a public operation: the planner and the check-in processor
/// recover from every variant with their deterministic fallbacks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The call did not finish within the configured timeout
    #[error("collaborator timed out after {seconds}s")]
    Timeout { seconds: u64 },
    /// Network or connection failure
    #[error("collaborator transport error: {0}")]
    Transport(String),
    /// The endpoint answered with a non-success status
    #[error("collaborator returned HTTP {0}")]
    Status(u16),
    /// The reply could not be interpreted
    #[error("malformed collaborator response: {0}")]
    Malformed(String),
    /// No endpoint or credentials are configured
    #[error("collaborator is not configured")]
    NotConfigured,
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ProctorError::database(message, e))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, ProctorError>;

//! Error types for shortlist.

use crate::core::session::SessionStatus;
use std::io;
use thiserror::Error;

/// Result type alias for shortlist operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shortlist operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage I/O error.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Malformed or out-of-range input. Carries every violated field.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A choice for this round number already exists in the session.
    #[error("Round {round_number} has already been completed for session {session_id}")]
    DuplicateRound {
        /// Session the duplicate was submitted against.
        session_id: String,
        /// The repeated round number.
        round_number: u32,
    },

    /// Choices can only be appended to active sessions.
    #[error("Session {session_id} is {status}, cannot add choices")]
    InactiveSession {
        /// Session in a terminal state.
        session_id: String,
        /// Its current status.
        status: SessionStatus,
    },

    /// Ending a session that is already completed or abandoned.
    #[error("Session {session_id} is already {status}")]
    AlreadyTerminal {
        /// Session in a terminal state.
        session_id: String,
        /// Its current status.
        status: SessionStatus,
    },

    /// Session not found.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Store unavailable or timed out. Safe to retry with backoff.
    #[error("Store temporarily unavailable: {0}")]
    TransientStore(String),

    /// The at-most-one-active-session invariant was detected broken
    /// post-write. Fatal: surfaced, never silently repaired.
    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a validation error from collected field violations.
    #[must_use]
    pub fn validation(violations: Vec<String>) -> Self {
        Self::Validation(violations)
    }
}

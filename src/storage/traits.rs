//! Storage trait definitions.

use crate::core::session::{Session, SessionStatus};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Document store for session aggregates.
///
/// The store is a dumb collection keyed by `session_id`: atomic whole-document
/// get/put plus the scans the lifecycle manager and analytics need. It does
/// not enforce the at-most-one-active-session invariant; the
/// [`SessionManager`](crate::core::SessionManager) serializes mutations per
/// player on top of it.
pub trait SessionStore: Send + Sync {
    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get_session(&self, session_id: &str) -> Result<Option<Session>>;

    /// Save a whole session document.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn put_session(&self, session: &Session) -> Result<()>;

    /// Find the player's most recently started active session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn find_active_session(&self, player_id: &str) -> Result<Option<Session>>;

    /// Find the player's most recently started session regardless of
    /// status. The lifecycle manager uses this to recognize replayed
    /// rounds against a just-completed session.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn latest_session(&self, player_id: &str) -> Result<Option<Session>>;

    /// Count the player's active sessions. Used for the post-write
    /// invariant check; anything above 1 is a consistency violation.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn count_active_sessions(&self, player_id: &str) -> Result<usize>;

    /// List recent sessions, most recently started first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn list_sessions(&self, limit: usize) -> Result<Vec<SessionSummary>>;

    /// Load every session. Analytics and migration scan the full collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn all_sessions(&self) -> Result<Vec<Session>>;

    /// Delete a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn delete_session(&self, session_id: &str) -> Result<()>;
}

/// Summary information for a session listing.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// Session identifier.
    pub session_id: String,

    /// Owning player.
    pub player_id: String,

    /// Lifecycle status.
    pub status: SessionStatus,

    /// When the session started.
    pub start_time: DateTime<Utc>,

    /// Number of recorded rounds.
    pub rounds_completed: u32,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.session_id.clone(),
            player_id: session.player_id.clone(),
            status: session.status,
            start_time: session.start_time,
            rounds_completed: session.total_rounds_completed,
        }
    }
}

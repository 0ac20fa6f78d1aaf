//! In-memory storage backend for testing.

use crate::core::session::{Session, SessionStatus};
use crate::error::Result;
use crate::storage::traits::{SessionStore, SessionSummary};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage backend for testing.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryBackend {
    /// Create a new in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryBackend {
    fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.get(session_id).cloned())
    }

    fn put_session(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    fn find_active_session(&self, player_id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions
            .values()
            .filter(|s| s.player_id == player_id && s.status == SessionStatus::Active)
            .max_by_key(|s| s.start_time)
            .cloned())
    }

    fn latest_session(&self, player_id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions
            .values()
            .filter(|s| s.player_id == player_id)
            .max_by_key(|s| s.start_time)
            .cloned())
    }

    fn count_active_sessions(&self, player_id: &str) -> Result<usize> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions
            .values()
            .filter(|s| s.player_id == player_id && s.status == SessionStatus::Active)
            .count())
    }

    fn list_sessions(&self, limit: usize) -> Result<Vec<SessionSummary>> {
        let sessions = self.sessions.read().unwrap();
        let mut summaries: Vec<SessionSummary> =
            sessions.values().map(SessionSummary::from).collect();

        // Sort by start_time descending (most recent first)
        summaries.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        summaries.truncate(limit);
        Ok(summaries)
    }

    fn all_sessions(&self) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.values().cloned().collect())
    }

    fn delete_session(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(session_id);
        Ok(())
    }
}

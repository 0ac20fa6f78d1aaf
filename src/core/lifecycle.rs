//! Session lifecycle management.
//!
//! All session mutation goes through [`SessionManager`], which serializes
//! read-modify-write cycles per player with a keyed mutex. The store is a
//! plain document collection with no secondary uniqueness, so without this
//! lock two concurrent first-round submissions could both observe "no active
//! session" and each create one. Holding the player's lock across
//! find-or-create-and-save closes that window; the same lock covers round
//! appends, so the duplicate-round check and the append are atomic too.

use crate::core::session::{Choice, Session};
use crate::error::{Error, Result};
use crate::storage::SessionStore;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// How long after a session ends a resubmitted round number is still
/// treated as a replay of that session rather than the start of a new
/// game. Matches the 30-minute inactivity gap used to separate sessions
/// during legacy migration.
const REPLAY_WINDOW_MINUTES: i64 = 30;

/// Owns session creation, active-session lookup, round append, and
/// state transitions.
pub struct SessionManager<S> {
    store: S,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: SessionStore> SessionManager<S> {
    /// Create a manager over a session store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Access the underlying store (read paths: listings, analytics).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the mutex guarding a player's sessions.
    fn player_lock(&self, player_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        Arc::clone(
            locks
                .entry(player_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Return the player's most recently started active session, creating a
    /// fresh one if none exists.
    ///
    /// # Errors
    ///
    /// Returns storage errors, or [`Error::ConsistencyViolation`] if more
    /// than one active session is found for the player after the write.
    pub fn get_or_create_active(&self, player_id: &str, max_rounds: u32) -> Result<Session> {
        let lock = self.player_lock(player_id);
        let _guard = lock.lock().unwrap();
        self.get_or_create_locked(player_id, max_rounds)
    }

    /// Get-or-create body. Caller must hold the player's lock.
    fn get_or_create_locked(&self, player_id: &str, max_rounds: u32) -> Result<Session> {
        if let Some(session) = self.store.find_active_session(player_id)? {
            return Ok(session);
        }

        let session = Session::new(player_id, max_rounds);
        self.store.put_session(&session)?;

        // Post-write invariant check. The keyed lock prevents this manager
        // from racing itself; an out-of-band writer can still break the
        // invariant, and that must surface rather than be repaired.
        let active = self.store.count_active_sessions(player_id)?;
        if active > 1 {
            let message = format!(
                "player {player_id} has {active} active sessions after creating {}",
                session.session_id
            );
            eprintln!("shortlist: error: {message}");
            return Err(Error::ConsistencyViolation(message));
        }

        Ok(session)
    }

    /// Append one round to the player's active session, creating the session
    /// first if needed, and persist the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRound`] or [`Error::InactiveSession`] from
    /// the append, plus any storage or consistency error.
    pub fn record_round(&self, player_id: &str, max_rounds: u32, choice: Choice) -> Result<Session> {
        let lock = self.player_lock(player_id);
        let _guard = lock.lock().unwrap();

        // Replay guard: if the player's last session just ended and already
        // holds this round number, the submission is a resend of that round.
        // Without this, a client retry after the completing round would
        // silently open a second session.
        if self.store.find_active_session(player_id)?.is_none() {
            if let Some(recent) = self.store.latest_session(player_id)? {
                let ended_at = recent.end_time.unwrap_or(recent.start_time);
                let within_window =
                    chrono::Utc::now() - ended_at < Duration::minutes(REPLAY_WINDOW_MINUTES);
                if recent.status.is_terminal()
                    && within_window
                    && recent.has_round(choice.round_number)
                {
                    return Err(Error::DuplicateRound {
                        session_id: recent.session_id,
                        round_number: choice.round_number,
                    });
                }
            }
        }

        let mut session = self.get_or_create_locked(player_id, max_rounds)?;
        session.append_round(choice)?;
        self.store.put_session(&session)?;
        Ok(session)
    }

    /// End a session explicitly: completed if it reached `max_rounds`,
    /// abandoned otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] for an unknown id or
    /// [`Error::AlreadyTerminal`] if the session already ended.
    pub fn end_session(&self, session_id: &str) -> Result<Session> {
        // First read resolves the owning player so the mutation can happen
        // under that player's lock.
        let session = self
            .store
            .get_session(session_id)?
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

        let lock = self.player_lock(&session.player_id);
        let _guard = lock.lock().unwrap();

        // Re-read under the lock; a concurrent append may have completed it.
        let mut session = self
            .store
            .get_session(session_id)?
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        session.end()?;
        self.store.put_session(&session)?;
        Ok(session)
    }
}

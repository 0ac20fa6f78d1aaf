//! `shortlist end` command implementation.

use crate::config::load_config;
use crate::core::SessionManager;
use crate::error::Result;
use crate::storage::FileBackend;

/// Run the end command: close a session explicitly.
///
/// # Errors
///
/// Returns `SessionNotFound` for an unknown id, `AlreadyTerminal` if the
/// session already ended, or storage errors.
pub fn run(session_id: &str) -> Result<()> {
    let config = load_config()?;
    let store = FileBackend::new(config.storage.path)?;
    let manager = SessionManager::new(store);

    let session = manager.end_session(session_id)?;

    println!("Session {} is now {}", session.session_id, session.status);
    println!("Rounds completed: {}", session.total_rounds_completed);
    println!("Total time: {:.1}s", session.total_time_taken);

    Ok(())
}

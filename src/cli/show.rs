//! `shortlist show` command implementation.

use crate::config::load_config;
use crate::error::{Error, Result};
use crate::storage::{FileBackend, SessionStore};

/// Run the show command: dump the full session document as JSON.
///
/// # Errors
///
/// Returns `SessionNotFound` for an unknown id or storage errors.
pub fn run(session_id: &str) -> Result<()> {
    let config = load_config()?;
    let store = FileBackend::new(config.storage.path)?;

    let session = store
        .get_session(session_id)?
        .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}

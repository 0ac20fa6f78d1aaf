//! `shortlist clean` command implementation.

use crate::config::load_config;
use crate::core::session::SessionStatus;
use crate::error::Result;
use crate::storage::{FileBackend, SessionStore};
use chrono::{Duration, Utc};

/// Run the clean command.
///
/// Removes sessions started before the given duration ago. Active sessions
/// are kept unless `--all` is passed.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(before: &str, all: bool) -> Result<()> {
    let config = load_config()?;
    let store = FileBackend::new(config.storage.path)?;

    let duration = if all {
        Duration::zero() // Clean everything
    } else {
        parse_duration(before)?
    };

    let removed = clean_sessions(&store, duration, all)?;

    if removed == 0 {
        println!("No sessions to clean.");
    } else {
        println!("Cleaned {removed} session(s).");
    }

    Ok(())
}

/// Parse a duration string like "7d", "30d", "24h".
///
/// # Errors
///
/// Returns an error if the duration format is invalid.
fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if s.is_empty() {
        return Ok(Duration::days(7)); // Default
    }

    let parse_err = |_| crate::error::Error::Config(format!("Invalid duration: {s}"));

    if let Some(stripped) = s.strip_suffix('d') {
        let num: i64 = stripped.parse().map_err(parse_err)?;
        Ok(Duration::days(num))
    } else if let Some(stripped) = s.strip_suffix('h') {
        let num: i64 = stripped.parse().map_err(parse_err)?;
        Ok(Duration::hours(num))
    } else if let Some(stripped) = s.strip_suffix('m') {
        let num: i64 = stripped.parse().map_err(parse_err)?;
        Ok(Duration::minutes(num))
    } else {
        // Default to days if no unit
        let num: i64 = s.parse().map_err(parse_err)?;
        Ok(Duration::days(num))
    }
}

/// Clean sessions started before the given duration ago.
fn clean_sessions(store: &dyn SessionStore, before: Duration, include_active: bool) -> Result<usize> {
    let cutoff = Utc::now() - before;
    let sessions = store.list_sessions(10000)?;
    let mut removed = 0;

    for summary in sessions {
        if summary.start_time >= cutoff {
            continue; // Too recent
        }

        // Keep games still in progress
        if summary.status == SessionStatus::Active && !include_active {
            continue;
        }

        store.delete_session(&summary.session_id)?;
        removed += 1;
    }

    Ok(removed)
}

//! `shortlist sessions` command implementation.

use crate::config::load_config;
use crate::error::Result;
use crate::storage::{FileBackend, SessionStore};
use chrono::{DateTime, Local, Utc};

/// Default number of sessions to show.
const DEFAULT_LIMIT: usize = 20;

/// Run the sessions command.
///
/// Shows recent sessions with their IDs, player, status, and progress.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(limit: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let store = FileBackend::new(config.storage.path.clone())?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT);

    let sessions = store.list_sessions(limit)?;

    if sessions.is_empty() {
        println!("No sessions found.");
        println!("\nSessions are stored in: {}", config.storage.path.display());
        return Ok(());
    }

    println!(
        "{:<46} {:<16} {:<10} {:<17} Rounds",
        "Session ID", "Player", "Status", "Started"
    );
    println!("{}", "─".repeat(100));

    for summary in &sessions {
        println!(
            "{:<46} {:<16} {:<10} {:<17} {}",
            summary.session_id,
            summary.player_id,
            summary.status.as_str(),
            format_local_time(summary.start_time),
            summary.rounds_completed
        );
    }

    println!("{}", "─".repeat(100));
    println!("Showing {} session(s)", sessions.len());

    Ok(())
}

/// Format UTC time as local time for display.
fn format_local_time(utc: DateTime<Utc>) -> String {
    let local: DateTime<Local> = utc.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}

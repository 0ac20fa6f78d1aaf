//! `shortlist players` command implementation.

use crate::analytics::compute_player_summaries;
use crate::config::load_config;
use crate::error::Result;
use crate::storage::{FileBackend, SessionStore};
use chrono::{DateTime, Local, Utc};

/// Run the players command: per-player session history rollup.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(json: bool) -> Result<()> {
    let config = load_config()?;
    let store = FileBackend::new(config.storage.path)?;
    let sessions = store.all_sessions()?;

    let summaries = compute_player_summaries(&sessions);

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No players found.");
        return Ok(());
    }

    println!(
        "{:<16} {:>8} {:>10} {:>8} {:>12} {:<17}",
        "Player", "Sessions", "Completed", "Rounds", "Compl. Rate", "Last Played"
    );
    println!("{}", "─".repeat(80));

    for summary in &summaries {
        println!(
            "{:<16} {:>8} {:>10} {:>8} {:>11.1}% {:<17}",
            summary.player_id,
            summary.total_sessions,
            summary.completed_games,
            summary.total_rounds_played,
            summary.completion_rate,
            format_local_time(summary.last_session)
        );
    }

    println!("{}", "─".repeat(80));
    println!("{} player(s)", summaries.len());

    Ok(())
}

/// Format UTC time as local time for display.
fn format_local_time(utc: DateTime<Utc>) -> String {
    let local: DateTime<Local> = utc.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}

//! `shortlist migrate` command implementation.

use crate::config::load_config;
use crate::error::Result;
use crate::migration::{LegacyChoice, run_migration};
use crate::storage::FileBackend;
use std::fs;
use std::path::Path;

/// Run the migrate command: convert legacy flat choices into sessions.
///
/// The input file holds a JSON array of flat choice records, each carrying a
/// `player_id` alongside the choice fields. Not idempotent: a second run
/// duplicates every migrated session.
///
/// # Errors
///
/// Returns an error if the input cannot be read or sessions cannot be
/// written.
pub fn run(input: &Path) -> Result<()> {
    let config = load_config()?;
    let store = FileBackend::new(config.storage.path)?;

    let contents = fs::read_to_string(input)?;
    let flat: Vec<LegacyChoice> = serde_json::from_str(&contents)?;

    if flat.is_empty() {
        println!("No choices to migrate.");
        return Ok(());
    }

    println!("Migrating {} choice(s)...", flat.len());

    let report = run_migration(
        &store,
        &flat,
        config.migration.session_gap_minutes,
        config.game.max_rounds,
    )?;

    println!(
        "Created {} session(s) for {} player(s).",
        report.created_sessions, report.migrated_players
    );

    Ok(())
}

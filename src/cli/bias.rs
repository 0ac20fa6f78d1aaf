//! `shortlist bias` command implementation.

use crate::analytics::{DemographicBreakdown, compute_bias_analytics};
use crate::candidates::MemoryDirectory;
use crate::config::load_config;
use crate::error::Result;
use crate::storage::{FileBackend, SessionStore};
use std::path::{Path, PathBuf};

/// Run the bias command: demographic hiring-rate report.
///
/// Candidates are loaded from `candidates.json` in the shortlist home unless
/// an explicit path is given.
///
/// # Errors
///
/// Returns an error if candidates cannot be loaded or storage fails.
pub fn run(candidates: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config()?;
    let default_path: PathBuf = config.storage.path.join("candidates.json");
    let candidates_path = candidates.unwrap_or(&default_path);

    let directory = MemoryDirectory::load(candidates_path)?;
    let store = FileBackend::new(config.storage.path)?;
    let sessions = store.all_sessions()?;

    let report = compute_bias_analytics(&sessions, &directory)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    render_breakdown("Gender", &report.demographics.gender);
    render_breakdown("Race", &report.demographics.race);
    render_breakdown("Age Range", &report.demographics.age_range);

    println!("Choices analyzed: {}", report.total_choices);
    if report.skipped_choices > 0 {
        println!(
            "Choices skipped (unknown candidates): {}",
            report.skipped_choices
        );
    }
    println!("Candidates referenced: {}", report.total_candidates);

    Ok(())
}

/// Render one demographic dimension as a table.
fn render_breakdown(title: &str, breakdown: &DemographicBreakdown) {
    println!("{title} Hiring Rates:");
    println!("{}", "─".repeat(56));
    println!(
        "{:<16} {:>12} {:>10} {:>12}",
        "Category", "Appearances", "Chosen", "Rate"
    );
    println!("{}", "─".repeat(56));

    for (category, appearances) in &breakdown.appearances {
        let chosen = breakdown.chosen.get(category).copied().unwrap_or(0);
        let rate = breakdown
            .hiring_rates
            .get(category)
            .map_or("0.00", String::as_str);
        println!("{category:<16} {appearances:>12} {chosen:>10} {rate:>11}%");
    }
    println!("{}", "─".repeat(56));
    println!();
}

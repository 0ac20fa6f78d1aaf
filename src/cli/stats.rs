//! `shortlist stats` command implementation.

use crate::analytics::{compute_choice_stats, compute_session_stats};
use crate::config::load_config;
use crate::error::Result;
use crate::storage::{FileBackend, SessionStore};

/// Run the stats command: session and choice aggregates.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(json: bool) -> Result<()> {
    let config = load_config()?;
    let store = FileBackend::new(config.storage.path)?;
    let sessions = store.all_sessions()?;

    let session_stats = compute_session_stats(&sessions);
    let choice_stats = compute_choice_stats(&sessions);

    if json {
        let combined = serde_json::json!({
            "sessionStats": session_stats,
            "choiceStats": choice_stats,
        });
        println!("{}", serde_json::to_string_pretty(&combined)?);
        return Ok(());
    }

    println!("Session Statistics:");
    println!("{}", "─".repeat(50));
    println!("  Total sessions:     {}", session_stats.total_sessions);
    println!("  Completed:          {}", session_stats.completed_sessions);
    println!("  Abandoned:          {}", session_stats.abandoned_sessions);
    println!("  Active:             {}", session_stats.active_sessions);
    println!("  Completion rate:    {:.2}%", session_stats.completion_rate);
    println!("  Avg rounds/session: {:.1}", session_stats.avg_rounds_per_session);
    println!("  Avg time/session:   {:.1}s", session_stats.avg_time_per_session);
    println!("  Unique players:     {}", session_stats.unique_players);

    println!("\nChoice Statistics:");
    println!("{}", "─".repeat(50));
    println!("  Total choices:      {}", choice_stats.total_choices);
    println!("  Avg decision time:  {:.2}s", choice_stats.average_time_taken);
    println!("  Unique players:     {}", choice_stats.unique_player_count);
    println!("  Unique candidates:  {}", choice_stats.unique_candidate_count);

    println!("\n  Tab views:");
    for (tab, count) in &choice_stats.most_viewed_tabs {
        println!("    {tab:<10} {count}");
    }

    if !choice_stats.popular_positions.is_empty() {
        println!("\n  Popular positions:");
        for entry in &choice_stats.popular_positions {
            println!("    {:<30} {}", entry.position, entry.count);
        }
    }

    Ok(())
}

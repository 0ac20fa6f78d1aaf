//! `shortlist record` command implementation.

use crate::config::load_config;
use crate::core::recorder::{ChoiceRequest, record_choice};
use crate::core::session::Tab;
use crate::core::SessionManager;
use crate::error::{Error, Result};
use crate::storage::FileBackend;

/// Run the record command: submit one round for a player.
///
/// # Errors
///
/// Returns validation, conflict, or storage errors.
#[allow(clippy::too_many_arguments)]
pub fn run(
    player_id: &str,
    round_number: u32,
    chosen: &str,
    rejected: &str,
    position: &str,
    time_taken: f64,
    tabs: &[String],
) -> Result<()> {
    let tabs_viewed = parse_tabs(tabs)?;

    let config = load_config()?;
    let store = FileBackend::new(config.storage.path)?;
    let manager = SessionManager::new(store);

    let request = ChoiceRequest {
        player_id: player_id.to_string(),
        round_number,
        chosen_candidate_id: chosen.to_string(),
        rejected_candidate_id: rejected.to_string(),
        position: position.to_string(),
        time_taken,
        tabs_viewed,
    };

    let summary = record_choice(&manager, config.game.max_rounds, &request)?;

    println!(
        "Round {} recorded for session {}",
        summary.round_completed, summary.session_id
    );
    println!(
        "Rounds completed: {}/{}",
        summary.total_rounds, config.game.max_rounds
    );
    println!("Session status: {}", summary.session_status);

    Ok(())
}

/// Parse tab names, collecting every invalid entry.
fn parse_tabs(tabs: &[String]) -> Result<Vec<Tab>> {
    let mut parsed = Vec::new();
    let mut violations = Vec::new();

    for tab in tabs {
        match tab.parse::<Tab>() {
            Ok(t) => parsed.push(t),
            Err(e) => violations.push(e),
        }
    }

    if violations.is_empty() {
        Ok(parsed)
    } else {
        Err(Error::validation(violations))
    }
}

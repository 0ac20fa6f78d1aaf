//! Choice recording: input validation and round submission.

use crate::core::lifecycle::SessionManager;
use crate::core::session::{Choice, SessionStatus, Tab};
use crate::error::{Error, Result};
use crate::storage::SessionStore;
use chrono::Utc;
use serde::Serialize;

/// One round submission from the game client.
#[derive(Debug, Clone)]
pub struct ChoiceRequest {
    /// Submitting player.
    pub player_id: String,

    /// Round number within the session.
    pub round_number: u32,

    /// Candidate the player picked.
    pub chosen_candidate_id: String,

    /// Candidate the player passed over.
    pub rejected_candidate_id: String,

    /// Position being recruited for.
    pub position: String,

    /// Decision time in seconds.
    pub time_taken: f64,

    /// Profile tabs the player opened.
    pub tabs_viewed: Vec<Tab>,
}

/// Summary returned to the caller after a round is recorded.
#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    /// Session the round landed in.
    pub session_id: String,

    /// The round just recorded.
    pub round_completed: u32,

    /// Rounds recorded so far in the session.
    pub total_rounds: u32,

    /// Session status after the append.
    pub session_status: SessionStatus,
}

/// Validate a choice request, collecting every violated field.
///
/// `tabs_viewed` membership is enforced by the [`Tab`] enum at parse time,
/// so only range and shape checks remain here.
///
/// # Errors
///
/// Returns [`Error::Validation`] listing all violations, not just the first.
pub fn validate(request: &ChoiceRequest, max_rounds: u32) -> Result<()> {
    let mut violations = Vec::new();

    if request.player_id.trim().is_empty() {
        violations.push("player_id must be a non-empty string".to_string());
    }
    if request.round_number < 1 || request.round_number > max_rounds {
        violations.push(format!(
            "round_number must be between 1 and {max_rounds}, got {}",
            request.round_number
        ));
    }
    if !request.time_taken.is_finite() {
        violations.push("time_taken must be a finite number".to_string());
    } else if request.time_taken < 0.0 {
        violations.push("time_taken cannot be negative".to_string());
    }
    if request.chosen_candidate_id.trim().is_empty() {
        violations.push("chosen_candidate_id must be a non-empty string".to_string());
    }
    if request.rejected_candidate_id.trim().is_empty() {
        violations.push("rejected_candidate_id must be a non-empty string".to_string());
    }
    if !request.chosen_candidate_id.trim().is_empty()
        && request.chosen_candidate_id == request.rejected_candidate_id
    {
        violations.push("chosen_candidate_id and rejected_candidate_id must differ".to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(violations))
    }
}

/// Record one round for a player.
///
/// Resolves (or creates) the player's active session through the lifecycle
/// manager and appends the round. Conflict errors (`DuplicateRound`,
/// `InactiveSession`) propagate unchanged.
///
/// # Errors
///
/// Returns [`Error::Validation`] for malformed input, conflict errors from
/// the append, or storage errors.
pub fn record_choice<S: SessionStore>(
    manager: &SessionManager<S>,
    max_rounds: u32,
    request: &ChoiceRequest,
) -> Result<RoundSummary> {
    validate(request, max_rounds)?;

    let choice = Choice {
        round_number: request.round_number,
        chosen_candidate_id: request.chosen_candidate_id.clone(),
        rejected_candidate_id: request.rejected_candidate_id.clone(),
        position: request.position.clone(),
        time_taken: request.time_taken,
        tabs_viewed: request.tabs_viewed.clone(),
        timestamp: Utc::now(),
    };

    let session = manager.record_round(&request.player_id, max_rounds, choice)?;

    Ok(RoundSummary {
        session_id: session.session_id,
        round_completed: request.round_number,
        total_rounds: session.total_rounds_completed,
        session_status: session.status,
    })
}

//! Session and demographic analytics.
//!
//! Aggregates session documents into completion statistics and joins choices
//! against the candidate directory to compute hiring-rate bias per gender,
//! race, and age band. Report shapes (and their camelCase field names) match
//! the JSON the existing admin dashboard consumes.

use crate::candidates::CandidateDirectory;
use crate::core::session::{Session, SessionStatus, Tab};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Plain aggregate counts and averages over all sessions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    /// Number of sessions.
    pub total_sessions: usize,
    /// Sessions that reached `max_rounds`.
    pub completed_sessions: usize,
    /// Sessions ended early.
    pub abandoned_sessions: usize,
    /// Sessions still accepting choices.
    pub active_sessions: usize,
    /// `completed / total * 100`, rounded to 2 decimal places.
    pub completion_rate: f64,
    /// Mean rounds per session, rounded to 1 decimal place.
    pub avg_rounds_per_session: f64,
    /// Mean total time per session in seconds, rounded to 1 decimal place.
    pub avg_time_per_session: f64,
    /// Distinct player ids.
    pub unique_players: usize,
}

/// Compute aggregate session statistics.
#[must_use]
pub fn compute_session_stats(sessions: &[Session]) -> SessionStats {
    if sessions.is_empty() {
        return SessionStats::default();
    }

    let total = sessions.len();
    let completed = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
        .count();
    let abandoned = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Abandoned)
        .count();
    let active = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Active)
        .count();

    let total_rounds: u64 = sessions
        .iter()
        .map(|s| u64::from(s.total_rounds_completed))
        .sum();
    let total_time: f64 = sessions.iter().map(|s| s.total_time_taken).sum();
    let players: HashSet<&str> = sessions.iter().map(|s| s.player_id.as_str()).collect();

    #[allow(clippy::cast_precision_loss)]
    SessionStats {
        total_sessions: total,
        completed_sessions: completed,
        abandoned_sessions: abandoned,
        active_sessions: active,
        completion_rate: round2(completed as f64 / total as f64 * 100.0),
        avg_rounds_per_session: round1(total_rounds as f64 / total as f64),
        avg_time_per_session: round1(total_time / total as f64),
        unique_players: players.len(),
    }
}

/// Appearance/chosen tallies and hiring rates for one demographic dimension.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicBreakdown {
    /// Times a candidate of each category appeared (chosen or rejected).
    pub appearances: BTreeMap<String, u32>,
    /// Times a candidate of each category was chosen.
    pub chosen: BTreeMap<String, u32>,
    /// `chosen / appearances * 100`, formatted to 2 decimals (e.g. "70.00").
    pub hiring_rates: BTreeMap<String, String>,
}

impl DemographicBreakdown {
    /// Record an appearance for a category.
    fn appeared(&mut self, category: &str) {
        *self.appearances.entry(category.to_string()).or_insert(0) += 1;
    }

    /// Record a chosen outcome for a category.
    fn chose(&mut self, category: &str) {
        *self.chosen.entry(category.to_string()).or_insert(0) += 1;
    }

    /// Compute the formatted hiring rates from the tallies.
    fn finalize(&mut self) {
        self.hiring_rates = self
            .appearances
            .iter()
            .map(|(category, appearances)| {
                let chosen = self.chosen.get(category).copied().unwrap_or(0);
                let rate = f64::from(chosen) / f64::from(*appearances) * 100.0;
                (category.clone(), format!("{rate:.2}"))
            })
            .collect();
    }
}

/// Bias breakdowns across the three demographic dimensions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    /// By gender.
    pub gender: DemographicBreakdown,
    /// By race.
    pub race: DemographicBreakdown,
    /// By age band.
    pub age_range: DemographicBreakdown,
}

/// Full demographic bias report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasReport {
    /// Per-dimension tallies and hiring rates.
    pub demographics: Demographics,
    /// Choices that entered the tallies.
    pub total_choices: usize,
    /// Distinct candidate ids referenced by the analyzed choices.
    pub total_candidates: usize,
    /// Choices skipped because a candidate record was missing.
    pub skipped_choices: usize,
    /// Aggregate session statistics, for context.
    pub session_stats: SessionStats,
}

/// Map an age to its reporting band.
#[must_use]
pub fn age_range(age: u32) -> &'static str {
    match age {
        0..=25 => "18-25",
        26..=35 => "26-35",
        36..=45 => "36-45",
        46..=55 => "46-55",
        _ => "56+",
    }
}

/// Compute hiring-rate bias analytics over all recorded choices.
///
/// Every choice is joined against the candidate directory on both its chosen
/// and rejected side. A choice whose chosen or rejected candidate is missing
/// from the directory is skipped and counted, not treated as an error.
///
/// # Errors
///
/// Returns an error if the candidate directory lookup fails.
pub fn compute_bias_analytics(
    sessions: &[Session],
    directory: &dyn CandidateDirectory,
) -> Result<BiasReport> {
    let choices: Vec<_> = sessions.iter().flat_map(|s| s.choices.iter()).collect();

    let candidate_ids: Vec<String> = choices
        .iter()
        .flat_map(|c| {
            [
                c.chosen_candidate_id.clone(),
                c.rejected_candidate_id.clone(),
            ]
        })
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let candidates = directory.find_many(&candidate_ids)?;
    let by_id: BTreeMap<&str, _> = candidates
        .iter()
        .map(|c| (c.candidate_id.as_str(), c))
        .collect();

    let mut demographics = Demographics::default();
    let mut tallied = 0;
    let mut skipped = 0;

    for choice in &choices {
        let (Some(chosen), Some(rejected)) = (
            by_id.get(choice.chosen_candidate_id.as_str()),
            by_id.get(choice.rejected_candidate_id.as_str()),
        ) else {
            skipped += 1;
            continue;
        };

        for candidate in [chosen, rejected] {
            demographics.gender.appeared(candidate.gender.as_str());
            demographics.race.appeared(&candidate.race);
            demographics.age_range.appeared(age_range(candidate.age));
        }
        demographics.gender.chose(chosen.gender.as_str());
        demographics.race.chose(&chosen.race);
        demographics.age_range.chose(age_range(chosen.age));
        tallied += 1;
    }

    if skipped > 0 {
        eprintln!(
            "shortlist: warning: skipped {skipped} choice(s) referencing unknown candidates"
        );
    }

    demographics.gender.finalize();
    demographics.race.finalize();
    demographics.age_range.finalize();

    Ok(BiasReport {
        demographics,
        total_choices: tallied,
        total_candidates: candidate_ids.len(),
        skipped_choices: skipped,
        session_stats: compute_session_stats(sessions),
    })
}

/// Choice-level usage statistics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceStats {
    /// Number of recorded choices.
    pub total_choices: usize,
    /// Mean decision time in seconds, rounded to 2 decimal places.
    pub average_time_taken: f64,
    /// Distinct players.
    pub unique_player_count: usize,
    /// Distinct chosen candidates.
    pub unique_candidate_count: usize,
    /// View counts per profile tab.
    pub most_viewed_tabs: BTreeMap<String, u32>,
    /// Top 10 positions by choice count.
    pub popular_positions: Vec<PositionCount>,
}

/// Choice count for one position.
#[derive(Debug, Clone, Serialize)]
pub struct PositionCount {
    /// Position title.
    pub position: String,
    /// Number of choices recorded for it.
    pub count: u32,
}

/// Compute choice-level statistics across all sessions.
#[must_use]
pub fn compute_choice_stats(sessions: &[Session]) -> ChoiceStats {
    let mut tab_counts: BTreeMap<String, u32> = Tab::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), 0))
        .collect();

    let choices: Vec<_> = sessions.iter().flat_map(|s| s.choices.iter()).collect();
    if choices.is_empty() {
        return ChoiceStats {
            most_viewed_tabs: tab_counts,
            ..ChoiceStats::default()
        };
    }

    let total_time: f64 = choices.iter().map(|c| c.time_taken).sum();
    let players: HashSet<&str> = sessions
        .iter()
        .filter(|s| !s.choices.is_empty())
        .map(|s| s.player_id.as_str())
        .collect();
    let candidates: HashSet<&str> = choices
        .iter()
        .map(|c| c.chosen_candidate_id.as_str())
        .collect();

    let mut position_counts: BTreeMap<&str, u32> = BTreeMap::new();
    for choice in &choices {
        for tab in &choice.tabs_viewed {
            *tab_counts.entry(tab.as_str().to_string()).or_insert(0) += 1;
        }
        *position_counts.entry(choice.position.as_str()).or_insert(0) += 1;
    }

    let mut popular: Vec<PositionCount> = position_counts
        .into_iter()
        .map(|(position, count)| PositionCount {
            position: position.to_string(),
            count,
        })
        .collect();
    popular.sort_by(|a, b| b.count.cmp(&a.count).then(a.position.cmp(&b.position)));
    popular.truncate(10);

    #[allow(clippy::cast_precision_loss)]
    ChoiceStats {
        total_choices: choices.len(),
        average_time_taken: round2(total_time / choices.len() as f64),
        unique_player_count: players.len(),
        unique_candidate_count: candidates.len(),
        most_viewed_tabs: tab_counts,
        popular_positions: popular,
    }
}

/// Per-player session history rollup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    /// Player identifier.
    pub player_id: String,
    /// Sessions owned by this player.
    pub total_sessions: usize,
    /// Sessions that reached `max_rounds`.
    pub completed_games: usize,
    /// Earliest session start.
    pub first_session: DateTime<Utc>,
    /// Latest session start.
    pub last_session: DateTime<Utc>,
    /// Rounds recorded across all sessions.
    pub total_rounds_played: u64,
    /// Mean rounds per session, rounded to 1 decimal place.
    pub avg_rounds_per_game: f64,
    /// Total decision time in seconds, rounded to 2 decimal places.
    pub total_play_time: f64,
    /// Mean decision time per session, rounded to 1 decimal place.
    pub avg_time_per_game: f64,
    /// `completed / total * 100`, rounded to 1 decimal place.
    pub completion_rate: f64,
}

/// Roll sessions up per player, most recently active player first.
#[must_use]
pub fn compute_player_summaries(sessions: &[Session]) -> Vec<PlayerSummary> {
    let mut by_player: BTreeMap<&str, Vec<&Session>> = BTreeMap::new();
    for session in sessions {
        by_player
            .entry(session.player_id.as_str())
            .or_default()
            .push(session);
    }

    let mut summaries: Vec<PlayerSummary> = by_player
        .into_iter()
        .map(|(player_id, sessions)| {
            let total = sessions.len();
            let completed = sessions
                .iter()
                .filter(|s| s.status == SessionStatus::Completed)
                .count();
            let rounds: u64 = sessions
                .iter()
                .map(|s| u64::from(s.total_rounds_completed))
                .sum();
            let time: f64 = sessions.iter().map(|s| s.total_time_taken).sum();
            let first = sessions.iter().map(|s| s.start_time).min().unwrap_or_default();
            let last = sessions.iter().map(|s| s.start_time).max().unwrap_or_default();

            #[allow(clippy::cast_precision_loss)]
            PlayerSummary {
                player_id: player_id.to_string(),
                total_sessions: total,
                completed_games: completed,
                first_session: first,
                last_session: last,
                total_rounds_played: rounds,
                avg_rounds_per_game: round1(rounds as f64 / total as f64),
                total_play_time: round2(time),
                avg_time_per_game: round1(time / total as f64),
                completion_rate: round1(completed as f64 / total as f64 * 100.0),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.last_session.cmp(&a.last_session));
    summaries
}

/// Round to 2 decimal places.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Round to 1 decimal place.
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

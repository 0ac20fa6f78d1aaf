//! One-shot migration of legacy flat choice records into sessions.
//!
//! Early deployments stored each choice as a standalone record carrying a
//! `player_id`. This module groups those records into session documents using
//! a 30-minute inactivity gap: a gap longer than that between consecutive
//! choices starts a new session.
//!
//! The transform is a non-reentrant batch job. It performs no duplicate
//! detection, so running it twice against the same input doubles the
//! sessions; callers gate it administratively and must not run it alongside
//! live choice traffic for the same players.

use crate::core::session::{Choice, Session, SessionStatus};
use crate::error::Result;
use crate::storage::SessionStore;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Default inactivity gap separating two sessions, in minutes.
pub const DEFAULT_SESSION_GAP_MINUTES: i64 = 30;

/// A legacy flat choice record: one choice plus the player who made it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyChoice {
    /// Player who made the choice.
    pub player_id: String,

    /// The choice fields, flattened alongside `player_id` on the wire.
    #[serde(flatten)]
    pub choice: Choice,
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// Players whose choices were grouped.
    pub migrated_players: usize,

    /// Session documents created.
    pub created_sessions: usize,
}

/// Group legacy flat choices into session documents.
///
/// Choices are grouped per player and ordered by timestamp; a gap larger
/// than `gap_minutes` between consecutive choices starts a new group. Each
/// group becomes one session: completed if it holds at least `max_rounds`
/// choices, abandoned otherwise, with start/end times taken from the first
/// and last choice. Within each session, choices are ordered by round
/// number.
#[must_use]
pub fn group_into_sessions(
    flat: &[LegacyChoice],
    gap_minutes: i64,
    max_rounds: u32,
) -> Vec<Session> {
    let gap = Duration::minutes(gap_minutes);

    let mut by_player: BTreeMap<&str, Vec<&LegacyChoice>> = BTreeMap::new();
    for record in flat {
        by_player
            .entry(record.player_id.as_str())
            .or_default()
            .push(record);
    }

    let mut sessions = Vec::new();
    for (player_id, mut records) in by_player {
        records.sort_by_key(|r| r.choice.timestamp);

        let mut groups: Vec<Vec<&LegacyChoice>> = Vec::new();
        for record in records {
            let starts_new_group = groups.last().is_none_or(|group| {
                let last = group
                    .last()
                    .map_or(record.choice.timestamp, |r| r.choice.timestamp);
                record.choice.timestamp - last > gap
            });
            if starts_new_group {
                groups.push(Vec::new());
            }
            // A group always exists after the check above
            if let Some(group) = groups.last_mut() {
                group.push(record);
            }
        }

        for (index, group) in groups.iter().enumerate() {
            sessions.push(build_session(player_id, index + 1, group, max_rounds));
        }
    }

    sessions
}

/// Build one session document from a gap-delimited group of choices.
fn build_session(
    player_id: &str,
    group_index: usize,
    group: &[&LegacyChoice],
    max_rounds: u32,
) -> Session {
    let start_time = group
        .first()
        .map_or_else(chrono::Utc::now, |r| r.choice.timestamp);
    let end_time = group
        .last()
        .map_or_else(chrono::Utc::now, |r| r.choice.timestamp);

    let mut choices: Vec<Choice> = group.iter().map(|r| r.choice.clone()).collect();
    choices.sort_by_key(|c| c.round_number);

    let status = if choices.len() >= max_rounds as usize {
        SessionStatus::Completed
    } else {
        SessionStatus::Abandoned
    };

    let mut session = Session {
        // Deterministic-looking prefix for traceability, unique suffix so
        // repeated runs never collide on ids
        session_id: format!(
            "migrated_{player_id}_{group_index}_{}",
            Uuid::new_v4().simple()
        ),
        player_id: player_id.to_string(),
        choices,
        start_time,
        end_time: Some(end_time),
        status,
        total_rounds_completed: 0,
        total_time_taken: 0.0,
        max_rounds,
    };
    session.recompute_totals();
    session
}

/// Run the migration against a store: group the supplied flat choices and
/// insert the resulting sessions.
///
/// Not idempotent. A second run with the same input creates a second copy
/// of every session.
///
/// # Errors
///
/// Returns an error if a session cannot be written to the store.
pub fn run_migration(
    store: &dyn SessionStore,
    flat: &[LegacyChoice],
    gap_minutes: i64,
    max_rounds: u32,
) -> Result<MigrationReport> {
    let sessions = group_into_sessions(flat, gap_minutes, max_rounds);

    let players: std::collections::HashSet<&str> =
        flat.iter().map(|r| r.player_id.as_str()).collect();

    for session in &sessions {
        store.put_session(session)?;
    }

    Ok(MigrationReport {
        migrated_players: players.len(),
        created_sessions: sessions.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{DEFAULT_MAX_ROUNDS, Tab};
    use crate::storage::{MemoryBackend, SessionStore};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn legacy(player: &str, round: u32, minute: i64) -> LegacyChoice {
        LegacyChoice {
            player_id: player.to_string(),
            choice: Choice {
                round_number: round,
                chosen_candidate_id: "cand-a".to_string(),
                rejected_candidate_id: "cand-b".to_string(),
                position: "Software Engineer".to_string(),
                time_taken: 3.0,
                tabs_viewed: vec![Tab::Profile],
                timestamp: at(minute),
            },
        }
    }

    #[test]
    fn empty_input_creates_nothing() {
        let sessions = group_into_sessions(&[], DEFAULT_SESSION_GAP_MINUTES, 10);
        assert!(sessions.is_empty());
    }

    #[test]
    fn forty_minute_gap_splits_into_two_sessions() {
        // First cluster at minutes 0-2, second at 42-43 (40-minute gap)
        let flat = vec![
            legacy("p1", 1, 0),
            legacy("p1", 2, 1),
            legacy("p1", 3, 2),
            legacy("p1", 1, 42),
            legacy("p1", 2, 43),
        ];

        let sessions = group_into_sessions(&flat, DEFAULT_SESSION_GAP_MINUTES, 10);
        assert_eq!(sessions.len(), 2);

        let first = &sessions[0];
        assert_eq!(first.choices.len(), 3);
        let rounds: Vec<u32> = first.choices.iter().map(|c| c.round_number).collect();
        assert_eq!(rounds, vec![1, 2, 3]);
        assert_eq!(first.start_time, at(0));
        assert_eq!(first.end_time, Some(at(2)));

        let second = &sessions[1];
        assert_eq!(second.choices.len(), 2);
        assert_eq!(second.start_time, at(42));
    }

    #[test]
    fn gap_at_threshold_does_not_split() {
        let flat = vec![legacy("p1", 1, 0), legacy("p1", 2, 30)];
        let sessions = group_into_sessions(&flat, DEFAULT_SESSION_GAP_MINUTES, 10);
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn short_group_is_abandoned_full_group_completed() {
        let mut flat: Vec<LegacyChoice> =
            (1..=10).map(|round| legacy("p1", round, i64::from(round))).collect();
        flat.push(legacy("p2", 1, 0));

        let sessions = group_into_sessions(&flat, DEFAULT_SESSION_GAP_MINUTES, 10);
        assert_eq!(sessions.len(), 2);

        let full = sessions.iter().find(|s| s.player_id == "p1").unwrap();
        assert_eq!(full.status, SessionStatus::Completed);
        assert_eq!(full.total_rounds_completed, 10);

        let short = sessions.iter().find(|s| s.player_id == "p2").unwrap();
        assert_eq!(short.status, SessionStatus::Abandoned);
    }

    #[test]
    fn unordered_input_is_sorted_before_grouping() {
        let flat = vec![legacy("p1", 2, 5), legacy("p1", 1, 0), legacy("p1", 3, 8)];
        let sessions = group_into_sessions(&flat, DEFAULT_SESSION_GAP_MINUTES, 10);
        assert_eq!(sessions.len(), 1);
        let rounds: Vec<u32> = sessions[0].choices.iter().map(|c| c.round_number).collect();
        assert_eq!(rounds, vec![1, 2, 3]);
    }

    #[test]
    fn session_ids_carry_player_and_group_index() {
        let flat = vec![legacy("p1", 1, 0), legacy("p1", 1, 60)];
        let sessions = group_into_sessions(&flat, DEFAULT_SESSION_GAP_MINUTES, 10);
        assert!(sessions[0].session_id.starts_with("migrated_p1_1_"));
        assert!(sessions[1].session_id.starts_with("migrated_p1_2_"));
        assert_ne!(sessions[0].session_id, sessions[1].session_id);
    }

    #[test]
    fn totals_recomputed_on_migrated_sessions() {
        let flat = vec![legacy("p1", 1, 0), legacy("p1", 2, 1)];
        let sessions = group_into_sessions(&flat, DEFAULT_SESSION_GAP_MINUTES, 10);
        assert_eq!(sessions[0].total_rounds_completed, 2);
        assert!((sessions[0].total_time_taken - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn run_migration_writes_sessions_and_reports() {
        let store = MemoryBackend::new();
        let flat = vec![
            legacy("p1", 1, 0),
            legacy("p1", 1, 60),
            legacy("p2", 1, 0),
        ];

        let report =
            run_migration(&store, &flat, DEFAULT_SESSION_GAP_MINUTES, DEFAULT_MAX_ROUNDS).unwrap();
        assert_eq!(report.migrated_players, 2);
        assert_eq!(report.created_sessions, 3);
        assert_eq!(store.all_sessions().unwrap().len(), 3);
    }

    #[test]
    fn run_migration_honors_configured_max_rounds() {
        let store = MemoryBackend::new();
        let flat = vec![legacy("p1", 1, 0), legacy("p1", 2, 1)];

        run_migration(&store, &flat, DEFAULT_SESSION_GAP_MINUTES, 2).unwrap();

        let sessions = store.all_sessions().unwrap();
        assert_eq!(sessions[0].status, SessionStatus::Completed);
        assert_eq!(sessions[0].max_rounds, 2);
    }

    #[test]
    fn run_migration_twice_is_not_idempotent() {
        let store = MemoryBackend::new();
        let flat = vec![legacy("p1", 1, 0)];

        run_migration(&store, &flat, DEFAULT_SESSION_GAP_MINUTES, DEFAULT_MAX_ROUNDS).unwrap();
        run_migration(&store, &flat, DEFAULT_SESSION_GAP_MINUTES, DEFAULT_MAX_ROUNDS).unwrap();

        // Unique id suffixes mean the second run adds documents
        assert_eq!(store.all_sessions().unwrap().len(), 2);
    }

    #[test]
    fn legacy_choice_deserializes_flat_fields() {
        let json = r#"{
            "player_id": "p1",
            "round_number": 4,
            "chosen_candidate_id": "a",
            "rejected_candidate_id": "b",
            "position": "Analyst",
            "time_taken": 2.5,
            "tabs_viewed": ["WORK"],
            "timestamp": "2024-03-01T12:00:00Z"
        }"#;
        let record: LegacyChoice = serde_json::from_str(json).unwrap();
        assert_eq!(record.player_id, "p1");
        assert_eq!(record.choice.round_number, 4);
    }
}

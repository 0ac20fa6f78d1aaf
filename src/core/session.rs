//! Session and choice value types.
//!
//! A `Session` is the aggregate: choices are embedded values inside it, never
//! independently addressable documents. Derived totals are recomputed from
//! the choice list on every mutation, never maintained separately.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Default number of rounds in a game session.
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// Candidate profile tab a player can view before deciding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tab {
    /// Basic profile information.
    Profile,
    /// Skills listing.
    Skills,
    /// Work experience.
    Work,
    /// Education history.
    Education,
}

impl Tab {
    /// All tab types, in display order.
    pub const ALL: [Tab; 4] = [Tab::Profile, Tab::Skills, Tab::Work, Tab::Education];

    /// Wire name of the tab (e.g. `PROFILE`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Profile => "PROFILE",
            Tab::Skills => "SKILLS",
            Tab::Work => "WORK",
            Tab::Education => "EDUCATION",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PROFILE" => Ok(Tab::Profile),
            "SKILLS" => Ok(Tab::Skills),
            "WORK" => Ok(Tab::Work),
            "EDUCATION" => Ok(Tab::Education),
            other => Err(format!(
                "invalid tab '{other}', must be one of: PROFILE, SKILLS, WORK, EDUCATION"
            )),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Session is accepting choices.
    #[default]
    Active,
    /// Session reached `max_rounds` choices.
    Completed,
    /// Session was ended before reaching `max_rounds`.
    Abandoned,
}

impl SessionStatus {
    /// Whether this status is terminal (no further transitions).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Abandoned)
    }

    /// Wire name of the status (e.g. `active`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded round: who was chosen, who was rejected, and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    /// Round number within the session (1..=max_rounds).
    pub round_number: u32,

    /// Candidate the player picked.
    pub chosen_candidate_id: String,

    /// Candidate the player passed over.
    pub rejected_candidate_id: String,

    /// Position being recruited for.
    pub position: String,

    /// Decision time in seconds.
    pub time_taken: f64,

    /// Profile tabs the player opened. Duplicates permitted but meaningless.
    pub tabs_viewed: Vec<Tab>,

    /// When the choice was made.
    pub timestamp: DateTime<Utc>,
}

/// A bounded sequence of rounds played by one player.
///
/// Persisted as a single document; field names match the wire shape consumed
/// by existing dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub session_id: String,

    /// Player identifier. One player may own many sessions over time,
    /// but at most one active session at any instant.
    pub player_id: String,

    /// Recorded choices, in insertion order.
    pub choices: Vec<Choice>,

    /// When the session started.
    pub start_time: DateTime<Utc>,

    /// When the session ended. Set only on transition out of active.
    pub end_time: Option<DateTime<Utc>>,

    /// Lifecycle status.
    pub status: SessionStatus,

    /// Derived: `choices.len()`. Recomputed on every mutation.
    pub total_rounds_completed: u32,

    /// Derived: sum of `choices[*].time_taken`. Recomputed on every mutation.
    pub total_time_taken: f64,

    /// Rounds needed to complete this session.
    pub max_rounds: u32,
}

impl Session {
    /// Create a new active session for a player.
    #[must_use]
    pub fn new(player_id: &str, max_rounds: u32) -> Self {
        Self {
            session_id: generate_session_id(),
            player_id: player_id.to_string(),
            choices: Vec::new(),
            start_time: Utc::now(),
            end_time: None,
            status: SessionStatus::Active,
            total_rounds_completed: 0,
            total_time_taken: 0.0,
            max_rounds,
        }
    }

    /// Whether a choice for this round number already exists.
    #[must_use]
    pub fn has_round(&self, round_number: u32) -> bool {
        self.choices.iter().any(|c| c.round_number == round_number)
    }

    /// Recompute the derived totals from the choice list.
    pub fn recompute_totals(&mut self) {
        self.total_rounds_completed = u32::try_from(self.choices.len()).unwrap_or(u32::MAX);
        self.total_time_taken = self.choices.iter().map(|c| c.time_taken).sum();
    }

    /// Append a validated choice to this session.
    ///
    /// Transitions to `completed` (and sets `end_time`) once the choice
    /// count reaches `max_rounds`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InactiveSession`] if the session is terminal, or
    /// [`Error::DuplicateRound`] if the round number is already present.
    /// On failure the choice list is left unchanged.
    pub fn append_round(&mut self, choice: Choice) -> Result<()> {
        // Duplicate check first: a replayed round is reported as a duplicate
        // even when the session has since completed.
        if self.has_round(choice.round_number) {
            return Err(Error::DuplicateRound {
                session_id: self.session_id.clone(),
                round_number: choice.round_number,
            });
        }
        if self.status != SessionStatus::Active {
            return Err(Error::InactiveSession {
                session_id: self.session_id.clone(),
                status: self.status,
            });
        }

        self.choices.push(choice);
        self.recompute_totals();

        if self.total_rounds_completed >= self.max_rounds {
            self.status = SessionStatus::Completed;
            self.end_time = Some(Utc::now());
        }

        Ok(())
    }

    /// End this session explicitly.
    ///
    /// Completed if the round count reached `max_rounds`, abandoned
    /// otherwise. Ending an already-terminal session is an error, not a
    /// silent no-op, so double-ends stay visible in audit trails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyTerminal`] if the session is not active.
    pub fn end(&mut self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(Error::AlreadyTerminal {
                session_id: self.session_id.clone(),
                status: self.status,
            });
        }

        self.status = if self.total_rounds_completed >= self.max_rounds {
            SessionStatus::Completed
        } else {
            SessionStatus::Abandoned
        };
        self.end_time = Some(Utc::now());
        Ok(())
    }
}

/// Generate a unique session identifier.
fn generate_session_id() -> String {
    format!("session_{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_choice(round: u32, time: f64) -> Choice {
        Choice {
            round_number: round,
            chosen_candidate_id: "cand-a".to_string(),
            rejected_candidate_id: "cand-b".to_string(),
            position: "Software Engineer".to_string(),
            time_taken: time,
            tabs_viewed: vec![Tab::Profile, Tab::Skills],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_session_is_active_and_empty() {
        let session = Session::new("p1", DEFAULT_MAX_ROUNDS);
        assert_eq!(session.player_id, "p1");
        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.choices.is_empty());
        assert_eq!(session.total_rounds_completed, 0);
        assert!(session.end_time.is_none());
        assert!(session.session_id.starts_with("session_"));
    }

    #[test]
    fn session_ids_are_unique() {
        let a = Session::new("p1", DEFAULT_MAX_ROUNDS);
        let b = Session::new("p1", DEFAULT_MAX_ROUNDS);
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn append_round_updates_totals() {
        let mut session = Session::new("p1", DEFAULT_MAX_ROUNDS);
        session.append_round(make_choice(1, 10.0)).unwrap();
        session.append_round(make_choice(2, 5.5)).unwrap();

        assert_eq!(session.total_rounds_completed, 2);
        assert!((session.total_time_taken - 15.5).abs() < f64::EPSILON);
        assert_eq!(session.status, SessionStatus::Active);
    }

    #[test]
    fn append_duplicate_round_rejected_and_unchanged() {
        let mut session = Session::new("p1", DEFAULT_MAX_ROUNDS);
        session.append_round(make_choice(1, 10.0)).unwrap();

        let err = session.append_round(make_choice(1, 3.0)).unwrap_err();
        assert!(matches!(err, Error::DuplicateRound { round_number: 1, .. }));

        // Failure leaves the choice list untouched
        assert_eq!(session.choices.len(), 1);
        assert!((session.total_time_taken - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_order_rounds_allowed() {
        let mut session = Session::new("p1", DEFAULT_MAX_ROUNDS);
        session.append_round(make_choice(3, 1.0)).unwrap();
        session.append_round(make_choice(1, 1.0)).unwrap();
        assert_eq!(session.total_rounds_completed, 2);
    }

    #[test]
    fn session_completes_at_max_rounds() {
        let mut session = Session::new("p1", 2);
        session.append_round(make_choice(1, 1.0)).unwrap();
        assert_eq!(session.status, SessionStatus::Active);

        session.append_round(make_choice(2, 1.0)).unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.end_time.is_some());
    }

    #[test]
    fn append_to_completed_session_fails() {
        let mut session = Session::new("p1", 1);
        session.append_round(make_choice(1, 1.0)).unwrap();

        let err = session.append_round(make_choice(2, 1.0)).unwrap_err();
        assert!(matches!(err, Error::InactiveSession { .. }));
    }

    #[test]
    fn end_before_max_rounds_abandons() {
        let mut session = Session::new("p1", DEFAULT_MAX_ROUNDS);
        session.append_round(make_choice(1, 1.0)).unwrap();
        session.end().unwrap();

        assert_eq!(session.status, SessionStatus::Abandoned);
        assert!(session.end_time.is_some());
    }

    #[test]
    fn completed_iff_rounds_reach_max() {
        // Reaching max_rounds completes without an explicit end call
        let mut full = Session::new("p1", 1);
        full.append_round(make_choice(1, 1.0)).unwrap();
        assert_eq!(full.status, SessionStatus::Completed);

        // One round short: explicit end abandons
        let mut partial = Session::new("p2", 2);
        partial.append_round(make_choice(1, 1.0)).unwrap();
        partial.end().unwrap();
        assert_eq!(partial.status, SessionStatus::Abandoned);
    }

    #[test]
    fn end_terminal_session_is_an_error() {
        let mut session = Session::new("p1", DEFAULT_MAX_ROUNDS);
        session.end().unwrap();
        assert_eq!(session.status, SessionStatus::Abandoned);

        let err = session.end().unwrap_err();
        assert!(matches!(
            err,
            Error::AlreadyTerminal {
                status: SessionStatus::Abandoned,
                ..
            }
        ));
    }

    #[test]
    fn status_serialization_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Active).unwrap(),
            r#""active""#
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Abandoned).unwrap(),
            r#""abandoned""#
        );
    }

    #[test]
    fn tab_serialization_uppercase() {
        assert_eq!(serde_json::to_string(&Tab::Profile).unwrap(), r#""PROFILE""#);
        let parsed: Tab = serde_json::from_str(r#""EDUCATION""#).unwrap();
        assert_eq!(parsed, Tab::Education);
    }

    #[test]
    fn tab_from_str_rejects_unknown() {
        assert_eq!("work".parse::<Tab>().unwrap(), Tab::Work);
        assert!("RESUME".parse::<Tab>().is_err());
    }

    #[test]
    fn session_document_round_trips() {
        let mut session = Session::new("p1", DEFAULT_MAX_ROUNDS);
        session.append_round(make_choice(1, 12.5)).unwrap();

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains(r#""status":"active""#));
        assert!(json.contains(r#""tabs_viewed":["PROFILE","SKILLS"]"#));

        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.session_id, session.session_id);
        assert_eq!(parsed.total_rounds_completed, 1);
    }

    proptest! {
        // Derived totals always match the choice list, whatever gets appended.
        #[test]
        fn totals_match_choices(times in proptest::collection::vec(0.0f64..600.0, 1..10)) {
            let mut session = Session::new("p1", DEFAULT_MAX_ROUNDS);
            for (i, t) in times.iter().enumerate() {
                let round = u32::try_from(i).unwrap() + 1;
                session.append_round(make_choice(round, *t)).unwrap();
            }

            prop_assert_eq!(session.total_rounds_completed as usize, session.choices.len());
            let expected: f64 = times.iter().sum();
            prop_assert!((session.total_time_taken - expected).abs() < 1e-9);
        }
    }
}

//! Candidate directory: read-only lookup of candidate demographics.
//!
//! Candidates are owned by an external system; this crate only reads them to
//! join choices against demographic fields for bias analytics.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Candidate gender category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other / nonbinary.
    Other,
}

impl Gender {
    /// Wire name of the category (e.g. `female`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// A candidate profile as the game presents it.
///
/// Only the demographic fields matter to analytics; everything else the
/// generator attaches (name, education, work history, skills) rides along
/// as opaque profile data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique candidate identifier.
    pub candidate_id: String,

    /// Gender category.
    pub gender: Gender,

    /// Race category (enumerated by the generator, free-form here).
    pub race: String,

    /// Age in years (18-70 as generated).
    pub age: u32,

    /// Position the candidate applies for.
    pub position: String,

    /// Opaque profile fields the core never interprets.
    #[serde(default, flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

/// Read-only candidate lookup.
pub trait CandidateDirectory: Send + Sync {
    /// Look up one candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails. An unknown id is `None`,
    /// not an error.
    fn find(&self, candidate_id: &str) -> Result<Option<Candidate>>;

    /// Look up many candidates at once. Unknown ids are simply absent
    /// from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_many(&self, ids: &[String]) -> Result<Vec<Candidate>>;
}

/// In-memory candidate directory, loadable from a JSON export.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    candidates: HashMap<String, Candidate>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate to the directory.
    pub fn insert(&mut self, candidate: Candidate) {
        self.candidates
            .insert(candidate.candidate_id.clone(), candidate);
    }

    /// Load a directory from a JSON file containing an array of candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let candidates: Vec<Candidate> = serde_json::from_str(&contents)?;

        let mut directory = Self::new();
        for candidate in candidates {
            directory.insert(candidate);
        }
        Ok(directory)
    }

    /// Number of candidates in the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl CandidateDirectory for MemoryDirectory {
    fn find(&self, candidate_id: &str) -> Result<Option<Candidate>> {
        Ok(self.candidates.get(candidate_id).cloned())
    }

    fn find_many(&self, ids: &[String]) -> Result<Vec<Candidate>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.candidates.get(id).cloned())
            .collect())
    }
}

//! shortlist - session recording and hiring-bias analytics.
//!
//! Records the paired-candidate choices a player makes during a timed game,
//! groups them into bounded sessions, and aggregates them into demographic
//! hiring-rate statistics.

pub mod analytics;
pub mod candidates;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod migration;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};

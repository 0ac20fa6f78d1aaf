//! CLI command implementations.

pub mod bias;
pub mod clean;
pub mod end;
pub mod migrate;
pub mod players;
pub mod record;
pub mod sessions;
pub mod show;
pub mod stats;

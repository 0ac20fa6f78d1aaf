//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`SHORTLIST_*`)
//! 2. Config file (`~/.shortlist/config.toml`)
//! 3. Defaults

use crate::error::{Error, Result};
use crate::storage::file::get_shortlist_home;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// Game configuration.
    pub game: GameConfig,

    /// Migration configuration.
    pub migration: MigrationConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the shortlist home directory.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: get_shortlist_home(),
        }
    }
}

/// Game configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rounds needed to complete a session.
    pub max_rounds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { max_rounds: 10 }
    }
}

/// Migration configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Inactivity gap in minutes separating two legacy sessions.
    pub session_gap_minutes: i64,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            session_gap_minutes: 30,
        }
    }
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    // Try to load config file
    let config_path = get_config_path();
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path).map_err(Error::Storage)?;
        config = toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))?;
    }

    // Override with environment variables
    apply_env_overrides(&mut config);

    Ok(config)
}

/// Get the path to the config file.
fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("SHORTLIST_CONFIG") {
        return PathBuf::from(path);
    }

    // get_shortlist_home already honors SHORTLIST_HOME
    get_shortlist_home().join("config.toml")
}

/// Apply environment variable overrides to config.
fn apply_env_overrides(config: &mut Config) {
    // Storage path
    if let Ok(path) = env::var("SHORTLIST_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    } else if let Ok(home) = env::var("SHORTLIST_HOME") {
        config.storage.path = PathBuf::from(home);
    }

    // Game
    if let Ok(val) = env::var("SHORTLIST_MAX_ROUNDS") {
        if let Ok(max) = val.parse() {
            config.game.max_rounds = max;
        }
    }

    // Migration
    if let Ok(val) = env::var("SHORTLIST_SESSION_GAP_MINUTES") {
        if let Ok(minutes) = val.parse() {
            config.migration.session_gap_minutes = minutes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.game.max_rounds, 10);
        assert_eq!(config.migration.session_gap_minutes, 30);
    }

    #[test]
    fn default_storage_path_uses_home_resolution() {
        let config = Config::default();
        assert_eq!(config.storage.path, get_shortlist_home());
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
            [storage]
            path = "/var/lib/shortlist"

            [game]
            max_rounds = 5

            [migration]
            session_gap_minutes = 45
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/shortlist"));
        assert_eq!(config.game.max_rounds, 5);
        assert_eq!(config.migration.session_gap_minutes, 45);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let toml = r"
            [game]
            max_rounds = 3
        ";

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.game.max_rounds, 3);
        assert_eq!(config.migration.session_gap_minutes, 30); // Default
    }
}

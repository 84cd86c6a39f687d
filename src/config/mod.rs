//! Game configuration
//!
//! Timing constants for the reveal schedule and the scoring cap. Every field
//! has a default, so an empty TOML document (or no file at all) yields the
//! standard pacing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Static configuration for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Spacing between two consecutive reveals, in milliseconds
    #[serde(default = "default_reveal_interval_ms")]
    pub reveal_interval_ms: u64,

    /// Pause after the last reveal before input opens, in milliseconds
    #[serde(default = "default_trailing_pause_ms")]
    pub trailing_pause_ms: u64,

    /// How long a revealed cell stays lit
    #[serde(default = "default_reveal_hold_ms")]
    pub reveal_hold_ms: u64,

    /// How long a player click flashes its cell
    #[serde(default = "default_press_hold_ms")]
    pub press_hold_ms: u64,

    /// Upper bound on the combo multiplier used for round scores
    #[serde(default = "default_combo_cap")]
    pub combo_cap: u32,

    /// Level a Speed objective has to clear inside its time limit
    #[serde(default = "default_speed_level")]
    pub speed_level: u32,
}

fn default_reveal_interval_ms() -> u64 {
    1000
}

fn default_trailing_pause_ms() -> u64 {
    500
}

fn default_reveal_hold_ms() -> u64 {
    500
}

fn default_press_hold_ms() -> u64 {
    200
}

fn default_combo_cap() -> u32 {
    5
}

fn default_speed_level() -> u32 {
    5
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            reveal_interval_ms: default_reveal_interval_ms(),
            trailing_pause_ms: default_trailing_pause_ms(),
            reveal_hold_ms: default_reveal_hold_ms(),
            press_hold_ms: default_press_hold_ms(),
            combo_cap: default_combo_cap(),
            speed_level: default_speed_level(),
        }
    }
}

impl GameConfig {
    /// Get the global data directory path (~/.memgrid/)
    pub fn global_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".memgrid")
    }

    /// Get the global config file path (~/.memgrid/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_data_dir().join("config.toml")
    }

    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse game config")
    }

    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the global config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::global_config_path();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }

    pub fn trailing_pause(&self) -> Duration {
        Duration::from_millis(self.trailing_pause_ms)
    }

    pub fn reveal_hold(&self) -> Duration {
        Duration::from_millis(self.reveal_hold_ms)
    }

    pub fn press_hold(&self) -> Duration {
        Duration::from_millis(self.press_hold_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.reveal_interval(), Duration::from_secs(1));
        assert_eq!(config.trailing_pause(), Duration::from_millis(500));
        assert_eq!(config.combo_cap, 5);
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_toml_str("reveal_interval_ms = 800\ncombo_cap = 3\n").unwrap();
        assert_eq!(config.reveal_interval_ms, 800);
        assert_eq!(config.combo_cap, 3);
        assert_eq!(config.trailing_pause_ms, 500);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(GameConfig::from_toml_str("reveal_interval_ms = \"fast\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "press_hold_ms = 150\n").unwrap();

        let config = GameConfig::from_file(&path).unwrap();
        assert_eq!(config.press_hold(), Duration::from_millis(150));
    }
}

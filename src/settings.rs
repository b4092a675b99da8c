//! Session settings
//!
//! Loaded from a JSON file by the native binary. Every field has a default,
//! so a settings file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{INSTANCE_TIMEOUT_MS, MAX_SUBSTEPS};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Configuration of one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionSettings {
    /// Seed for id generation; the same seed replays the same session
    pub seed: u64,
    /// Number of players (teams 1..=player_count)
    pub player_count: u32,

    // === Timing ===
    /// Simulated time per tick as a multiple of the nominal 50 ms
    pub multiplier: f32,
    /// Maximum ticks run per `advance` call
    pub max_substeps: u32,
    /// Simulated time after which the session is over regardless of score
    pub instance_timeout_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            player_count: 2,
            multiplier: 1.0,
            max_substeps: MAX_SUBSTEPS,
            instance_timeout_ms: INSTANCE_TIMEOUT_MS,
        }
    }
}

impl SessionSettings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.player_count == 0 {
            return Err(SettingsError::Invalid("playerCount must be at least 1".into()));
        }
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "multiplier must be positive (got {})",
                self.multiplier
            )));
        }
        if self.max_substeps == 0 {
            return Err(SettingsError::Invalid("maxSubsteps must be at least 1".into()));
        }
        Ok(())
    }

    /// Simulated milliseconds covered by one tick
    pub fn tick_sim_ms(&self) -> f32 {
        crate::consts::STEP_INTERVAL_MS * self.multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = SessionSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.tick_sim_ms(), 50.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = SessionSettings::from_json(r#"{ "seed": 7, "playerCount": 3 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.player_count, 3);
        assert_eq!(settings.max_substeps, MAX_SUBSTEPS);
        assert_eq!(settings.instance_timeout_ms, INSTANCE_TIMEOUT_MS);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SessionSettings::from_json(r#"{ "playerCount": 0 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            SessionSettings::from_json(r#"{ "multiplier": -1.0 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            SessionSettings::from_json(r#"{ "maxSubsteps": 0 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            SessionSettings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SessionSettings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}

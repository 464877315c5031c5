//! Run configuration
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{STARTING_LIVES, STEER_STEP_DEGREES};
use crate::error::Result;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed run seed; `None` lets the driver pick one
    pub seed: Option<u64>,
    /// Lives at the start of a run
    pub starting_lives: u8,
    /// Aim change per tick while steering (degrees)
    pub steer_step_degrees: f32,
    /// Custom level pack; `None` uses the built-in campaign
    pub levels_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            starting_lives: STARTING_LIVES,
            steer_step_degrees: STEER_STEP_DEGREES,
            levels_path: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path)
            .map_err(crate::Error::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"seed": 99}"#).unwrap();
        assert_eq!(settings.seed, Some(99));
        assert_eq!(settings.starting_lives, STARTING_LIVES);
        assert_eq!(settings.steer_step_degrees, STEER_STEP_DEGREES);
        assert!(settings.levels_path.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: Some(5),
            starting_lives: 1,
            steer_step_degrees: 2.5,
            levels_path: Some(PathBuf::from("levels/custom.json")),
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        assert_eq!(Settings::load("/no/such/settings.json"), Settings::default());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ seed: }").is_err());
    }
}

//! Tournament configuration.
//!
//! ```rust
//! use quiz_core::config::TournamentConfig;
//!
//! let config = TournamentConfig::default();
//! assert_eq!(config.points.first, 3);
//! ```

use serde::{Deserialize, Serialize};
use std::{env, fs};

pub const CONFIG_PATH_ENV: &str = "QUIZ_CONFIG_PATH";

/// Match points handed out when a match is closed, by in-match placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsScheme {
    pub first: u32,
    pub second: u32,
    pub third: u32,
}

impl Default for PointsScheme {
    fn default() -> Self {
        Self { first: 3, second: 1, third: 0 }
    }
}

impl PointsScheme {
    pub fn for_placement(&self, placement: usize) -> u32 {
        match placement {
            0 => self.first,
            1 => self.second,
            2 => self.third,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TournamentConfig {
    #[serde(default)]
    pub points: PointsScheme,
}

impl TournamentConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), String> {
        let p = &self.points;
        if p.first < p.second || p.second < p.third {
            return Err(format!(
                "points must not increase with placement (got {}/{}/{})",
                p.first, p.second, p.third
            ));
        }
        if p.first == 0 {
            return Err("the winner must receive at least one point".to_string());
        }
        Ok(())
    }

    /// Load from the file named by `QUIZ_CONFIG_PATH`, or defaults when the
    /// variable is unset or blank.
    pub fn from_env() -> Result<Self, String> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file from {CONFIG_PATH_ENV}='{path}': {e}"))?;

        let config = Self::from_json(&content)
            .map_err(|e| format!("Failed to parse config JSON from {CONFIG_PATH_ENV}='{path}': {e}"))?;

        config
            .validate()
            .map_err(|e| format!("Invalid config from {CONFIG_PATH_ENV}='{path}': {e}"))?;

        Ok(config)
    }
}

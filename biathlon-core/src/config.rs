//! Race configuration types
//!
//! [`RaceConfigFile`] mirrors the JSON configuration file as written by race
//! organisers. [`RaceConfig`] is the validated form the state machine and the
//! report builder consume.

use crate::time::{parse_duration, parse_timestamp};
use crate::types::{Duration, RaceError, Result, Timestamp};
use serde::{Deserialize, Serialize};

/// Raw configuration file contents
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfigFile {
    /// Number of main laps
    pub laps: u32,
    /// Main lap length in meters
    #[serde(alias = "lapLength")]
    pub lap_len: u32,
    /// Penalty lap length in meters
    #[serde(alias = "penaltyLength")]
    pub penalty_len: u32,
    /// Number of firing lines per lap
    #[serde(default)]
    pub firing_lines: u32,
    /// Planned race start, `HH:MM:SS.mmm`
    pub start: String,
    /// Allowed lateness against the drawn start time, `HH:MM:SS`
    pub start_delta: String,
}

/// Validated race configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RaceConfig {
    /// Number of main laps
    pub laps: u32,
    /// Main lap length in meters
    pub lap_length: u32,
    /// Penalty lap length in meters
    pub penalty_length: u32,
    /// Number of firing lines per lap (informational)
    pub firing_lines: u32,
    /// Planned race start (informational)
    pub start: Timestamp,
    /// Allowed lateness against the drawn start time
    pub start_delta: Duration,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            laps: 1,
            lap_length: 1000,
            penalty_length: 150,
            firing_lines: 1,
            start: Timestamp::from_hms_opt(10, 0, 0).unwrap_or_default(),
            start_delta: Duration::zero(),
        }
    }
}

impl RaceConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the number of main laps
    pub fn with_laps(mut self, laps: u32) -> Self {
        self.laps = laps;
        self
    }

    /// Builder method: set the main lap length in meters
    pub fn with_lap_length(mut self, meters: u32) -> Self {
        self.lap_length = meters;
        self
    }

    /// Builder method: set the penalty lap length in meters
    pub fn with_penalty_length(mut self, meters: u32) -> Self {
        self.penalty_length = meters;
        self
    }

    /// Builder method: set the number of firing lines
    pub fn with_firing_lines(mut self, lines: u32) -> Self {
        self.firing_lines = lines;
        self
    }

    /// Builder method: set the planned race start
    pub fn with_start(mut self, start: Timestamp) -> Self {
        self.start = start;
        self
    }

    /// Builder method: set the allowed start lateness
    pub fn with_start_delta(mut self, delta: Duration) -> Self {
        self.start_delta = delta;
        self
    }

    /// Check the values the state machine divides by or counts against
    pub fn validate(&self) -> Result<()> {
        if self.laps == 0 {
            return Err(RaceError::ConfigError("laps must be at least 1".to_string()));
        }
        if self.lap_length == 0 {
            return Err(RaceError::ConfigError("lap length must be positive".to_string()));
        }
        if self.penalty_length == 0 {
            return Err(RaceError::ConfigError("penalty lap length must be positive".to_string()));
        }
        Ok(())
    }
}

impl TryFrom<RaceConfigFile> for RaceConfig {
    type Error = RaceError;

    fn try_from(raw: RaceConfigFile) -> Result<Self> {
        let start = parse_timestamp(&raw.start)
            .map_err(|e| RaceError::ConfigError(format!("invalid start time format: {}", e)))?;

        let start_delta = parse_duration(&raw.start_delta)
            .map_err(|e| RaceError::ConfigError(format!("invalid start delta format: {}", e)))?;

        let config = RaceConfig {
            laps: raw.laps,
            lap_length: raw.lap_len,
            penalty_length: raw.penalty_len,
            firing_lines: raw.firing_lines,
            start,
            start_delta,
        };
        config.validate()?;

        Ok(config)
    }
}

//! Configuration loading and parsing

use anyhow::{Context, Result};
use biathlon_core::{RaceConfig, RaceConfigFile};
use std::fs;
use std::path::Path;

/// Load the race configuration from a JSON file
pub fn load_config(path: &Path) -> Result<RaceConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("open config file error: {:?}", path))?;

    let raw: RaceConfigFile = serde_json::from_str(&content)
        .with_context(|| format!("read config error: {:?}", path))?;

    let config = RaceConfig::try_from(raw)
        .with_context(|| format!("invalid config: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use biathlon_core::Duration;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(
            r#"{
                "laps": 2,
                "lapLen": 3500,
                "penaltyLen": 150,
                "firingLines": 2,
                "start": "10:00:00.000",
                "startDelta": "00:01:30"
            }"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.laps, 2);
        assert_eq!(config.lap_length, 3500);
        assert_eq!(config.penalty_length, 150);
        assert_eq!(config.firing_lines, 2);
        assert_eq!(config.start_delta, Duration::seconds(90));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("nonexistent.json")).unwrap_err();
        assert!(err.to_string().contains("open config file error"));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_config("{invalid json}");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("read config error"));
    }

    #[test]
    fn test_invalid_start_format() {
        let file = write_config(
            r#"{
                "laps": 2,
                "lapLen": 3500,
                "penaltyLen": 150,
                "firingLines": 2,
                "start": "bad format",
                "startDelta": "00:01:30"
            }"#,
        );

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid start time format"));
    }

    #[test]
    fn test_invalid_start_delta() {
        let file = write_config(
            r#"{
                "laps": 2,
                "lapLen": 3500,
                "penaltyLen": 150,
                "firingLines": 2,
                "start": "10:00:00.000",
                "startDelta": "bad delta"
            }"#,
        );

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid start delta format"));
    }
}

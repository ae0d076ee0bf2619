// Configuration loading and parsing (comps.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::stats;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sources: Sources,
    pub matching: Matching,
    /// Curated comparable roster, in presentation order. Resolved against
    /// the prediction table at query time; misses are skipped.
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

/// Locations of the three source tables. Each is either an http(s) URL or a
/// path, depending on which fetcher the client is built with.
#[derive(Debug, Clone, Deserialize)]
pub struct Sources {
    pub pitching_stats: String,
    pub predictions: String,
    pub historical: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Matching {
    /// Reference player, "First Last" or "Last, First".
    pub reference_player: String,
    /// Season targeted when a lookup does not pin one.
    #[serde(default = "default_season")]
    pub default_season: i32,
}

fn default_season() -> i32 {
    stats::DEFAULT_SEASON
}

/// One curated roster entry, matched by case-insensitive containment of both
/// name fragments.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub first: String,
    pub last: String,
}

impl Default for Config {
    fn default() -> Self {
        let roster = [
            ("george", "kirby"),
            ("logan", "gilbert"),
            ("hunter", "brown"),
            ("bailey", "ober"),
            ("trevor", "rogers"),
        ]
        .into_iter()
        .map(|(first, last)| RosterEntry {
            first: first.to_string(),
            last: last.to_string(),
        })
        .collect();

        Config {
            sources: Sources {
                pitching_stats: "data/fangraphs_pitchers.csv".to_string(),
                predictions: "data/sorted_predictions.csv".to_string(),
                historical: "data/arbitration_history.csv".to_string(),
            },
            matching: Matching {
                reference_player: "Joe Ryan".to_string(),
                default_season: stats::DEFAULT_SEASON,
            },
            roster,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from a TOML file.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let non_empty = |field: &str, value: &str| {
        if value.trim().is_empty() {
            Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: "must not be empty".to_string(),
            })
        } else {
            Ok(())
        }
    };
    non_empty("sources.pitching_stats", &config.sources.pitching_stats)?;
    non_empty("sources.predictions", &config.sources.predictions)?;
    non_empty("sources.historical", &config.sources.historical)?;
    non_empty("matching.reference_player", &config.matching.reference_player)?;

    if config.matching.default_season < 1900 {
        return Err(ConfigError::ValidationError {
            field: "matching.default_season".to_string(),
            message: format!("implausible season {}", config.matching.default_season),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const COMPS_TOML: &str = r#"
[sources]
pitching_stats = "data/fangraphs_pitchers.csv"
predictions = "data/sorted_predictions.csv"
historical = "data/arbitration_history.csv"

[matching]
reference_player = "Joe Ryan"
default_season = 2025

[[roster]]
first = "george"
last = "kirby"

[[roster]]
first = "logan"
last = "gilbert"
"#;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(COMPS_TOML).unwrap();
        assert_eq!(config.matching.reference_player, "Joe Ryan");
        assert_eq!(config.matching.default_season, 2025);
        assert_eq!(config.roster.len(), 2);
        assert_eq!(config.roster[0].first, "george");
        assert_eq!(config.roster[1].last, "gilbert");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn default_season_falls_back_when_omitted() {
        let toml_text = r#"
[sources]
pitching_stats = "a.csv"
predictions = "b.csv"
historical = "c.csv"

[matching]
reference_player = "Joe Ryan"
"#;
        let config: Config = toml::from_str(toml_text).unwrap();
        assert_eq!(config.matching.default_season, stats::DEFAULT_SEASON);
        assert!(config.roster.is_empty());
    }

    #[test]
    fn blank_source_fails_validation() {
        let mut config = Config::default();
        config.sources.historical = "  ".to_string();
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn implausible_season_fails_validation() {
        let mut config = Config::default();
        config.matching.default_season = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn default_roster_is_ordered() {
        let config = Config::default();
        assert_eq!(config.roster.len(), 5);
        assert_eq!(config.roster[0].last, "kirby");
        assert_eq!(config.roster[4].last, "rogers");
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let err = load_config_from(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}

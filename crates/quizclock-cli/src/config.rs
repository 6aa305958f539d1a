//! quizclock configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizclock_core::scoring::{GradeBand, Scorer};

/// Top-level quizclock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizclockConfig {
    /// Time limit used when neither `--duration` nor the bank sets one.
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u32,
    /// Where `take` saves attempt records.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Replaces the built-in A-F table when non-empty.
    #[serde(default)]
    pub grade_bands: Vec<GradeBand>,
}

fn default_duration_secs() -> u32 {
    600
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizclock-results")
}

impl Default for QuizclockConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: default_duration_secs(),
            output_dir: default_output_dir(),
            grade_bands: Vec::new(),
        }
    }
}

impl QuizclockConfig {
    /// The scorer for the configured grade table.
    pub fn scorer(&self) -> Result<Scorer> {
        if self.grade_bands.is_empty() {
            return Ok(Scorer::default());
        }
        Scorer::with_bands(self.grade_bands.clone()).context("invalid [[grade_bands]] in config")
    }

    /// Pick the session length: explicit flag, then the bank's own limit,
    /// then the configured default. A zero bank limit is ignored.
    pub fn resolve_duration(&self, flag: Option<u32>, bank_duration: Option<u32>) -> u32 {
        flag.or(bank_duration.filter(|&d| d > 0))
            .unwrap_or(self.default_duration_secs)
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizclock.toml` in the current directory
/// 2. `~/.config/quizclock/config.toml`
///
/// `QUIZCLOCK_DURATION_SECS` overrides `default_duration_secs`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizclockConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizclock.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizclockConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizclockConfig::default(),
    };

    if let Ok(value) = std::env::var("QUIZCLOCK_DURATION_SECS") {
        config.default_duration_secs = parse_duration_override(&value)?;
    }

    Ok(config)
}

fn parse_duration_override(value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => anyhow::bail!("QUIZCLOCK_DURATION_SECS must be a positive integer, got '{value}'"),
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizclock"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizclock_core::Grade;

    #[test]
    fn default_config() {
        let config = QuizclockConfig::default();
        assert_eq!(config.default_duration_secs, 600);
        assert_eq!(config.output_dir, PathBuf::from("./quizclock-results"));
        assert_eq!(config.scorer().unwrap(), Scorer::default());
    }

    #[test]
    fn parse_grade_bands() {
        let toml_str = r#"
default_duration_secs = 300
output_dir = "results"

[[grade_bands]]
min_percent = 50
grade = "A"
feedback = "Pass"

[[grade_bands]]
min_percent = 0
grade = "F"
feedback = "Fail"
"#;
        let config: QuizclockConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_duration_secs, 300);
        let scorer = config.scorer().unwrap();
        assert_eq!(scorer.band_for(50).grade, Grade::A);
        assert_eq!(scorer.band_for(49).grade, Grade::F);
    }

    #[test]
    fn grade_table_without_zero_band_is_rejected() {
        let config: QuizclockConfig = toml::from_str(
            r#"
[[grade_bands]]
min_percent = 50
grade = "A"
feedback = "Pass"
"#,
        )
        .unwrap();
        assert!(config.scorer().is_err());
    }

    #[test]
    fn duration_precedence() {
        let config = QuizclockConfig::default();
        assert_eq!(config.resolve_duration(Some(30), Some(120)), 30);
        assert_eq!(config.resolve_duration(None, Some(120)), 120);
        assert_eq!(config.resolve_duration(None, Some(0)), 600);
        assert_eq!(config.resolve_duration(None, None), 600);
    }

    #[test]
    fn duration_override_must_be_positive() {
        assert_eq!(parse_duration_override(" 90 ").unwrap(), 90);
        assert!(parse_duration_override("0").is_err());
        assert!(parse_duration_override("ten").is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/no/such/quizclock.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}

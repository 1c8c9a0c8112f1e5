//! Layered configuration for the `shear` command.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags (applied via `apply_cli_overrides`)
//! 2. Environment variables (`SHEAR_*`)
//! 3. Config file (`--config <path>`, else `shear.toml` in the working directory)
//! 4. Compiled defaults

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use shear_core::calculations::sweep::MAX_SWEEP_POINTS;
use shear_core::calculations::{RangePolicy, DEFAULT_SWEEP_POINTS};
use shear_core::ForceUnit;
use thiserror::Error;
use tracing::{debug, warn};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "shear.toml";

/// Largest accepted `output.precision`
pub const MAX_PRECISION: usize = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {message}")]
    ReadError { path: String, message: String },

    #[error("invalid TOML in '{path}': {message}")]
    ParseError { path: String, message: String },

    #[error("invalid config value for '{field}': {message}")]
    ValidationFailed { field: String, message: String },
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values with a header row
    Csv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub unit: ForceUnit,
    /// Decimal places for Vn in text and CSV output
    pub precision: usize,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            unit: ForceUnit::Kilonewtons,
            precision: 2,
            format: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub points: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            points: DEFAULT_SWEEP_POINTS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub range_policy: RangePolicy,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShearConfig {
    pub output: OutputConfig,
    pub sweep: SweepConfig,
    pub validation: ValidationConfig,
}

/// Flag values that override every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub unit: Option<ForceUnit>,
    pub format: Option<OutputFormat>,
    pub precision: Option<usize>,
    pub points: Option<usize>,
    pub range_policy: Option<RangePolicy>,
}

impl ShearConfig {
    /// Load configuration with layered resolution.
    ///
    /// `explicit` must exist when given; otherwise `shear.toml` in `root` is
    /// read if present.
    pub fn load(
        explicit: Option<&Path>,
        root: &Path,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file: Option<PathBuf> = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let candidate = root.join(DEFAULT_CONFIG_FILE);
                candidate.exists().then_some(candidate)
            }
        };
        if let Some(path) = file {
            debug!(path = %path.display(), "loading config file");
            config = Self::from_file(&path)?;
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());

        if let Some(cli) = cli_overrides {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    #[cfg(test)]
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `SHEAR_UNIT`, `SHEAR_FORMAT`, `SHEAR_SWEEP_POINTS` and
    /// `SHEAR_RANGE_POLICY`. Unparseable values are logged and skipped.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SHEAR_UNIT") {
            match val.parse::<ForceUnit>() {
                Ok(unit) => self.output.unit = unit,
                Err(_) => warn!(var = "SHEAR_UNIT", value = %val, "ignoring invalid environment override"),
            }
        }
        if let Some(val) = lookup("SHEAR_FORMAT") {
            match OutputFormat::from_str(&val, true) {
                Ok(format) => self.output.format = format,
                Err(_) => warn!(var = "SHEAR_FORMAT", value = %val, "ignoring invalid environment override"),
            }
        }
        if let Some(val) = lookup("SHEAR_SWEEP_POINTS") {
            match val.trim().parse::<usize>() {
                Ok(points) => self.sweep.points = points,
                Err(_) => warn!(var = "SHEAR_SWEEP_POINTS", value = %val, "ignoring invalid environment override"),
            }
        }
        if let Some(val) = lookup("SHEAR_RANGE_POLICY") {
            match val.parse::<RangePolicy>() {
                Ok(policy) => self.validation.range_policy = policy,
                Err(_) => warn!(var = "SHEAR_RANGE_POLICY", value = %val, "ignoring invalid environment override"),
            }
        }
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(unit) = cli.unit {
            self.output.unit = unit;
        }
        if let Some(format) = cli.format {
            self.output.format = format;
        }
        if let Some(precision) = cli.precision {
            self.output.precision = precision;
        }
        if let Some(points) = cli.points {
            self.sweep.points = points;
        }
        if let Some(policy) = cli.range_policy {
            self.validation.range_policy = policy;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.precision > MAX_PRECISION {
            return Err(ConfigError::ValidationFailed {
                field: "output.precision".to_string(),
                message: format!("must be at most {}", MAX_PRECISION),
            });
        }
        if self.sweep.points < 2 || self.sweep.points > MAX_SWEEP_POINTS {
            return Err(ConfigError::ValidationFailed {
                field: "sweep.points".to_string(),
                message: format!("must be between 2 and {}", MAX_SWEEP_POINTS),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ShearConfig::default();
        assert_eq!(config.output.unit, ForceUnit::Kilonewtons);
        assert_eq!(config.output.precision, 2);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.sweep.points, 100);
        assert_eq!(config.validation.range_policy, RangePolicy::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = ShearConfig::from_toml(
            r#"
            [output]
            unit = "N"

            [validation]
            range_policy = "reject"
            "#,
        )
        .unwrap();
        assert_eq!(config.output.unit, ForceUnit::Newtons);
        assert_eq!(config.output.precision, 2);
        assert_eq!(config.validation.range_policy, RangePolicy::Reject);
        assert_eq!(config.sweep.points, 100);
    }

    #[test]
    fn test_invalid_toml() {
        let err = ShearConfig::from_toml("[output]\nunit = \"lbf\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ShearConfig::default();
        config.apply_env_overrides(env(&[
            ("SHEAR_UNIT", "N"),
            ("SHEAR_FORMAT", "CSV"),
            ("SHEAR_SWEEP_POINTS", "25"),
            ("SHEAR_RANGE_POLICY", "ignore"),
        ]));
        assert_eq!(config.output.unit, ForceUnit::Newtons);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.sweep.points, 25);
        assert_eq!(config.validation.range_policy, RangePolicy::Ignore);
    }

    #[test]
    fn test_invalid_env_is_skipped() {
        let mut config = ShearConfig::default();
        config.apply_env_overrides(env(&[("SHEAR_SWEEP_POINTS", "many"), ("SHEAR_UNIT", "lbf")]));
        assert_eq!(config, ShearConfig::default());
    }

    #[test]
    fn test_cli_beats_env() {
        let mut config = ShearConfig::default();
        config.apply_env_overrides(env(&[("SHEAR_UNIT", "N")]));
        config.apply_cli_overrides(&CliOverrides {
            unit: Some(ForceUnit::Kilonewtons),
            points: Some(10),
            ..Default::default()
        });
        assert_eq!(config.output.unit, ForceUnit::Kilonewtons);
        assert_eq!(config.sweep.points, 10);
    }

    #[test]
    fn test_validation() {
        let mut config = ShearConfig::default();
        config.sweep.points = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { ref field, .. }) if field == "sweep.points"
        ));

        let mut config = ShearConfig::default();
        config.output.precision = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[sweep]\npoints = 12\n").unwrap();

        let config = ShearConfig::load(None, dir.path(), None).unwrap();
        assert_eq!(config.sweep.points, 12);

        let missing = dir.path().join("nope.toml");
        let err = ShearConfig::load(Some(&missing), dir.path(), None).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}

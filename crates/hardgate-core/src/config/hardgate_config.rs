//! Top-level hardgate configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CharacteristicsConfig, GateConfig, PatternConfig, ScanConfig, ScoringConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`HARDGATE_*`)
/// 3. Project config (`hardgate.toml` in project root)
/// 4. User config (`~/.hardgate/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HardGateConfig {
    pub scan: ScanConfig,
    pub characteristics: CharacteristicsConfig,
    pub scoring: ScoringConfig,
    pub patterns: PatternConfig,
    pub gates: GateConfig,
}

/// Override arguments supplied by the embedding service.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_file_size: Option<u64>,
    pub max_matches_per_gate: Option<usize>,
    pub parallel_gates: Option<bool>,
    pub default_pass_threshold: Option<f64>,
    pub enabled_gates: Vec<String>,
}

pub const PROJECT_CONFIG_FILE: &str = "hardgate.toml";

impl HardGateConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config. A broken user file is reported, a
        // missing one is not.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                Self::merge_toml_file(&mut config, &user_config_path)?;
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &HardGateConfig) -> Result<(), ConfigError> {
        let percentages = [
            (
                "characteristics.frontend_threshold",
                config.characteristics.frontend_threshold,
            ),
            (
                "characteristics.backend_threshold",
                config.characteristics.backend_threshold,
            ),
            (
                "characteristics.min_presence_threshold",
                config.characteristics.min_presence_threshold,
            ),
            (
                "scoring.default_pass_threshold",
                config.scoring.default_pass_threshold,
            ),
            ("scoring.warning_margin", config.scoring.warning_margin),
        ];
        for (field, value) in percentages {
            if let Some(v) = value {
                if !(0.0..=100.0).contains(&v) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be between 0 and 100".to_string(),
                    });
                }
            }
        }
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.scan.max_matches_per_gate == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_matches_per_gate".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.patterns.cache_capacity == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "patterns.cache_capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.hardgate/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".hardgate").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut HardGateConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: HardGateConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut HardGateConfig, other: &HardGateConfig) {
        // Scan
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }
        if other.scan.max_matches_per_gate.is_some() {
            base.scan.max_matches_per_gate = other.scan.max_matches_per_gate;
        }
        if other.scan.parallel_gates.is_some() {
            base.scan.parallel_gates = other.scan.parallel_gates;
        }
        if other.scan.max_match_text.is_some() {
            base.scan.max_match_text = other.scan.max_match_text;
        }
        if !other.scan.extra_ignore.is_empty() {
            base.scan.extra_ignore = other.scan.extra_ignore.clone();
        }

        // Characteristics
        if other.characteristics.frontend_threshold.is_some() {
            base.characteristics.frontend_threshold = other.characteristics.frontend_threshold;
        }
        if other.characteristics.backend_threshold.is_some() {
            base.characteristics.backend_threshold = other.characteristics.backend_threshold;
        }
        if other.characteristics.min_presence_threshold.is_some() {
            base.characteristics.min_presence_threshold =
                other.characteristics.min_presence_threshold;
        }

        // Scoring
        if other.scoring.default_pass_threshold.is_some() {
            base.scoring.default_pass_threshold = other.scoring.default_pass_threshold;
        }
        if other.scoring.warning_margin.is_some() {
            base.scoring.warning_margin = other.scoring.warning_margin;
        }

        // Patterns
        if other.patterns.cache_capacity.is_some() {
            base.patterns.cache_capacity = other.patterns.cache_capacity;
        }
        if other.patterns.regex_size_limit.is_some() {
            base.patterns.regex_size_limit = other.patterns.regex_size_limit;
        }

        // Gates
        if !other.gates.enabled_gates.is_empty() {
            base.gates.enabled_gates = other.gates.enabled_gates.clone();
        }
        if !other.gates.disabled_gates.is_empty() {
            base.gates.disabled_gates = other.gates.disabled_gates.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `HARDGATE_SCAN_MAX_FILE_SIZE`, `HARDGATE_SCORING_PASS_THRESHOLD`, etc.
    fn apply_env_overrides(config: &mut HardGateConfig) {
        if let Ok(val) = std::env::var("HARDGATE_SCAN_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HARDGATE_SCAN_MAX_MATCHES") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.max_matches_per_gate = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HARDGATE_SCAN_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                config.scan.parallel_gates = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HARDGATE_SCORING_PASS_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.scoring.default_pass_threshold = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HARDGATE_SCORING_WARNING_MARGIN") {
            if let Ok(v) = val.parse::<f64>() {
                config.scoring.warning_margin = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HARDGATE_GATES") {
            let gates: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(String::from)
                .collect();
            if !gates.is_empty() {
                config.gates.enabled_gates = gates;
            }
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut HardGateConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.max_file_size {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = overrides.max_matches_per_gate {
            config.scan.max_matches_per_gate = Some(v);
        }
        if let Some(v) = overrides.parallel_gates {
            config.scan.parallel_gates = Some(v);
        }
        if let Some(v) = overrides.default_pass_threshold {
            config.scoring.default_pass_threshold = Some(v);
        }
        if !overrides.enabled_gates.is_empty() {
            config.gates.enabled_gates = overrides.enabled_gates.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

//! Scoring configuration.

use serde::{Deserialize, Serialize};

/// Thresholds for coverage-gate status.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Pass threshold used when a gate declares neither its own threshold
    /// nor an expected coverage. Default: 70.0.
    pub default_pass_threshold: Option<f64>,
    /// Points below the threshold that still yield WARNING. Default: 10.0.
    pub warning_margin: Option<f64>,
}

impl ScoringConfig {
    pub fn effective_default_pass_threshold(&self) -> f64 {
        self.default_pass_threshold.unwrap_or(70.0)
    }

    pub fn effective_warning_margin(&self) -> f64 {
        self.warning_margin.unwrap_or(10.0)
    }
}

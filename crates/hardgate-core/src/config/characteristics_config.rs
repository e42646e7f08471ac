//! Codebase characteristics thresholds.

use serde::{Deserialize, Serialize};

/// Share thresholds (percent of total files) used to derive technology facets.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CharacteristicsConfig {
    /// Frontend share above which the codebase counts as frontend. Default: 20.0.
    pub frontend_threshold: Option<f64>,
    /// Backend share above which the codebase counts as backend. Default: 20.0.
    pub backend_threshold: Option<f64>,
    /// Frontend share below which a backend codebase is backend-only. Default: 5.0.
    pub min_presence_threshold: Option<f64>,
}

impl CharacteristicsConfig {
    pub fn effective_frontend_threshold(&self) -> f64 {
        self.frontend_threshold.unwrap_or(20.0)
    }

    pub fn effective_backend_threshold(&self) -> f64 {
        self.backend_threshold.unwrap_or(20.0)
    }

    pub fn effective_min_presence_threshold(&self) -> f64 {
        self.min_presence_threshold.unwrap_or(5.0)
    }
}

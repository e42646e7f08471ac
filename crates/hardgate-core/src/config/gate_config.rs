//! Gate selection configuration.

use serde::{Deserialize, Serialize};

/// Which catalogue gates a scan evaluates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Gates to evaluate. Empty means every catalogue gate.
    #[serde(default)]
    pub enabled_gates: Vec<String>,
    /// Gates never evaluated, even when listed in `enabled_gates`.
    #[serde(default)]
    pub disabled_gates: Vec<String>,
}

impl GateConfig {
    /// Returns true when the gate with `id` should be evaluated.
    pub fn is_enabled(&self, id: &str) -> bool {
        if self.disabled_gates.iter().any(|g| g == id) {
            return false;
        }
        self.enabled_gates.is_empty() || self.enabled_gates.iter().any(|g| g == id)
    }
}

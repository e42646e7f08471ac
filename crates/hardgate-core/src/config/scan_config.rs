//! Scan configuration.

use serde::{Deserialize, Serialize};

/// Configuration for file access during gate evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum bytes read per file; longer content is truncated. Default: 1 MiB.
    pub max_file_size: Option<u64>,
    /// Matches collected per gate before scanning stops. Default: 1000.
    pub max_matches_per_gate: Option<usize>,
    /// Evaluate gates on the rayon pool instead of sequentially. Default: false.
    pub parallel_gates: Option<bool>,
    /// Maximum characters kept from a matched substring. Default: 200.
    pub max_match_text: Option<usize>,
    /// Extra ignore globs applied by the filesystem walker.
    #[serde(default)]
    pub extra_ignore: Vec<String>,
}

impl ScanConfig {
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(1_048_576)
    }

    pub fn effective_max_matches_per_gate(&self) -> usize {
        self.max_matches_per_gate.unwrap_or(1000)
    }

    pub fn effective_parallel_gates(&self) -> bool {
        self.parallel_gates.unwrap_or(false)
    }

    pub fn effective_max_match_text(&self) -> usize {
        self.max_match_text.unwrap_or(200)
    }
}

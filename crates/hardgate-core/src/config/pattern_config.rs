//! Pattern cache configuration.

use serde::{Deserialize, Serialize};

/// Configuration for regex compilation and caching.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PatternConfig {
    /// Maximum compiled patterns kept in the cache. Default: 10_000.
    pub cache_capacity: Option<u64>,
    /// Compiled-program size limit per regex, in bytes. Default: 10 MiB.
    pub regex_size_limit: Option<usize>,
}

impl PatternConfig {
    pub fn effective_cache_capacity(&self) -> u64 {
        self.cache_capacity.unwrap_or(10_000)
    }

    pub fn effective_regex_size_limit(&self) -> usize {
        self.regex_size_limit.unwrap_or(10 * 1_048_576)
    }
}

//! Compiled-pattern cache backed by moka.
//!
//! Write-once per key for the process lifetime. Compile failures are cached
//! as negative entries so a malformed pattern is compiled (and logged) once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hardgate_core::config::PatternConfig;
use hardgate_core::errors::PatternCompileError;
use moka::sync::Cache;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use super::normalize::cache_key;

type Compiled = Result<Arc<Regex>, PatternCompileError>;

/// Counters for cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PatternCacheStats {
    pub lookups: u64,
    pub compilations: u64,
    pub failures: u64,
    pub entries: u64,
}

impl PatternCacheStats {
    /// Fraction of lookups served without compiling (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            1.0 - (self.compilations as f64 / self.lookups as f64)
        }
    }
}

/// Thread-safe map from pattern text to compiled matcher.
pub struct PatternCache {
    cache: Cache<String, Compiled>,
    size_limit: usize,
    lookups: AtomicU64,
    compilations: AtomicU64,
    failures: AtomicU64,
}

impl PatternCache {
    pub fn new(config: &PatternConfig) -> Self {
        Self::with_capacity(
            config.effective_cache_capacity(),
            config.effective_regex_size_limit(),
        )
    }

    pub fn with_capacity(max_entries: u64, size_limit: usize) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
            size_limit,
            lookups: AtomicU64::new(0),
            compilations: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Return the compiled matcher for `pattern`, compiling on first use.
    ///
    /// Concurrent callers for the same key wait on a single compilation.
    pub fn get(&self, pattern: &str) -> Result<Arc<Regex>, PatternCompileError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let key = cache_key(pattern);
        self.cache.get_with(key.clone(), || self.compile(&key))
    }

    /// Compile every pattern ahead of a parallel scan. Returns how many
    /// compiled successfully.
    pub fn warm<'a>(&self, patterns: impl IntoIterator<Item = &'a str>) -> usize {
        patterns.into_iter().filter(|p| self.get(p).is_ok()).count()
    }

    pub fn stats(&self) -> PatternCacheStats {
        self.cache.run_pending_tasks();
        PatternCacheStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            compilations: self.compilations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }

    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn compile(&self, key: &str) -> Compiled {
        self.compilations.fetch_add(1, Ordering::Relaxed);
        let result = if key.is_empty() {
            Err(PatternCompileError::new(key, "empty pattern"))
        } else {
            RegexBuilder::new(key)
                .multi_line(true)
                .size_limit(self.size_limit)
                .build()
                .map(Arc::new)
                .map_err(|e| PatternCompileError::new(key, e.to_string()))
        };
        if let Err(e) = &result {
            self.failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(pattern = %key, error = %e.message, "pattern rejected");
        }
        result
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(&PatternConfig::default())
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_does_not_recompile() {
        let cache = PatternCache::default();
        let a = cache.get(r"logger\.info").unwrap();
        let b = cache.get("  logger\\.info ").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let stats = cache.stats();
        assert_eq!(stats.lookups, 2);
        assert_eq!(stats.compilations, 1);
    }

    #[test]
    fn failure_is_cached() {
        let cache = PatternCache::default();
        assert!(cache.get("([unclosed").is_err());
        assert!(cache.get("([unclosed").is_err());
        let stats = cache.stats();
        assert_eq!(stats.compilations, 1);
        assert_eq!(stats.failures, 1);
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let cache = PatternCache::default();
        assert!(cache.get("   ").is_err());
    }

    #[test]
    fn warm_counts_successes() {
        let cache = PatternCache::default();
        assert_eq!(cache.warm(["a+", "(", "b"]), 2);
    }
}

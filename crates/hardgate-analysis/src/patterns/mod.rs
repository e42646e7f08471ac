//! Pattern sources and compilation.
//!
//! - `cache`: process-lifetime compiled-regex cache, injected into the engine
//! - `library`: static per-gate, per-language pattern table
//! - `aggregator`: merges generated and static patterns with provenance
//! - `normalize`: cache and dedup keys

pub mod aggregator;
pub mod cache;
pub mod library;
pub mod normalize;

pub use aggregator::{AggregatedPattern, AggregatedPatterns, PatternAggregator, Provenance};
pub use cache::{PatternCache, PatternCacheStats};
pub use library::StaticPatternLibrary;

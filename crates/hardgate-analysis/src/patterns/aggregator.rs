//! Pattern aggregation: generated first, static appended, deduplicated.

use hardgate_core::types::FxHashSet;
use serde::{Deserialize, Serialize};

use super::normalize::dedup_key;

/// Where a pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Generated,
    Static,
}

/// One pattern in a gate's effective set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedPattern {
    pub source: String,
    pub provenance: Provenance,
}

/// The effective pattern set for one gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedPatterns {
    pub patterns: Vec<AggregatedPattern>,
    pub generated_count: usize,
    pub static_count: usize,
    pub duplicates_dropped: usize,
}

impl AggregatedPatterns {
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.source.as_str())
    }
}

pub struct PatternAggregator;

impl PatternAggregator {
    /// Merge `generated` and `static_patterns`.
    ///
    /// Generated entries are taken first so they win every collision. A
    /// later entry is dropped when its normalized form was already seen,
    /// which also covers exact duplicates. Blank entries are ignored.
    pub fn aggregate(generated: &[String], static_patterns: &[String]) -> AggregatedPatterns {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut out = AggregatedPatterns::default();

        let sources = generated
            .iter()
            .map(|p| (p, Provenance::Generated))
            .chain(static_patterns.iter().map(|p| (p, Provenance::Static)));

        for (pattern, provenance) in sources {
            let trimmed = pattern.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !seen.insert(dedup_key(trimmed)) {
                out.duplicates_dropped += 1;
                continue;
            }
            match provenance {
                Provenance::Generated => out.generated_count += 1,
                Provenance::Static => out.static_count += 1,
            }
            out.patterns.push(AggregatedPattern {
                source: trimmed.to_string(),
                provenance,
            });
        }

        tracing::debug!(
            generated_count = out.generated_count,
            static_count = out.static_count,
            duplicates_dropped = out.duplicates_dropped,
            "patterns aggregated"
        );
        out
    }
}

//! Criteria evaluator.
//!
//! Each relevant file is read once and tested against every pattern of the
//! gate: the aggregated flat patterns and the regexes of every criteria
//! leaf. Matches are deduplicated per gate by (file, line, normalized
//! text) and attributed to the leaves whose patterns produced them. The
//! condition tree is then folded bottom-up.

use std::sync::Arc;

use hardgate_core::config::ScanConfig;
use hardgate_core::types::{FxHashMap, FxHashSet, SmallVec4};
use regex::Regex;

use super::result::{
    ConditionKind, ConditionResult, PatternMatch, RejectedPattern, Termination,
};
use super::types::{CriteriaGroup, CriteriaNode, PatternCondition};
use crate::patterns::normalize::{cache_key, dedup_key};
use crate::patterns::{AggregatedPatterns, PatternCache, Provenance};
use crate::scanner::{FileSource, ScannedFile};

/// Per-gate scan bounds.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationLimits {
    pub max_matches: usize,
    pub max_match_text: usize,
}

impl From<&ScanConfig> for EvaluationLimits {
    fn from(config: &ScanConfig) -> Self {
        Self {
            max_matches: config.effective_max_matches_per_gate(),
            max_match_text: config.effective_max_match_text(),
        }
    }
}

impl Default for EvaluationLimits {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

/// Everything the evaluator learned about one gate.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub matches: Vec<PatternMatch>,
    pub conditions: Option<ConditionResult>,
    pub files_scanned: usize,
    pub files_matched: usize,
    pub files_skipped: usize,
    pub truncated_files: usize,
    pub rejected: Vec<RejectedPattern>,
    pub termination: Option<Termination>,
}

impl Evaluation {
    /// True when the criteria tree (if any) is satisfied.
    pub fn required_met(&self) -> bool {
        self.conditions.as_ref().map_or(true, |c| c.passed)
    }
}

/// A compiled pattern and the places its matches go.
struct Matcher {
    source: String,
    provenance: Provenance,
    regex: Arc<Regex>,
    /// (leaf index, pattern index) pairs fed by this matcher.
    slots: SmallVec4<(usize, usize)>,
}

pub struct CriteriaEvaluator<'a> {
    cache: &'a PatternCache,
    limits: EvaluationLimits,
}

impl<'a> CriteriaEvaluator<'a> {
    pub fn new(cache: &'a PatternCache, limits: EvaluationLimits) -> Self {
        Self { cache, limits }
    }

    pub fn evaluate(
        &self,
        flat: &AggregatedPatterns,
        criteria: Option<&CriteriaGroup>,
        files: &[&ScannedFile],
        source: &dyn FileSource,
    ) -> Evaluation {
        let leaves: Vec<&PatternCondition> = criteria.map(|c| c.leaves()).unwrap_or_default();
        let mut evaluation = Evaluation::default();

        let (matchers, leaf_valid) = self.compile(flat, &leaves, &mut evaluation.rejected);
        let mut leaf_matches: Vec<Vec<Vec<PatternMatch>>> = leaves
            .iter()
            .map(|leaf| vec![Vec::new(); leaf.patterns.len()])
            .collect();

        if !matchers.is_empty() {
            self.scan(files, source, &matchers, &mut leaf_matches, &mut evaluation);
        }

        if let Some(root) = criteria {
            let mut hits = leaf_matches.into_iter().zip(leaf_valid);
            evaluation.conditions = Some(fold_group(root, &mut hits));
        }
        evaluation
    }

    fn compile(
        &self,
        flat: &AggregatedPatterns,
        leaves: &[&PatternCondition],
        rejected: &mut Vec<RejectedPattern>,
    ) -> (Vec<Matcher>, Vec<Vec<bool>>) {
        let mut matchers: Vec<Matcher> = Vec::new();
        let mut by_key: FxHashMap<String, Option<usize>> = FxHashMap::default();

        let mut resolve = |pattern: &str, provenance: Provenance, matchers: &mut Vec<Matcher>| {
            let key = cache_key(pattern);
            if let Some(slot) = by_key.get(&key) {
                return *slot;
            }
            let slot = match self.cache.get(&key) {
                Ok(regex) => {
                    matchers.push(Matcher {
                        source: key.clone(),
                        provenance,
                        regex,
                        slots: SmallVec4::new(),
                    });
                    Some(matchers.len() - 1)
                }
                Err(e) => {
                    rejected.push(RejectedPattern {
                        pattern: e.pattern,
                        message: e.message,
                    });
                    None
                }
            };
            by_key.insert(key, slot);
            slot
        };

        for pattern in &flat.patterns {
            resolve(&pattern.source, pattern.provenance, &mut matchers);
        }

        let mut leaf_valid = Vec::with_capacity(leaves.len());
        for (leaf_idx, leaf) in leaves.iter().enumerate() {
            let mut valid = Vec::with_capacity(leaf.patterns.len());
            for (pattern_idx, weighted) in leaf.patterns.iter().enumerate() {
                let slot = resolve(&weighted.pattern, Provenance::Static, &mut matchers);
                if let Some(i) = slot {
                    matchers[i].slots.push((leaf_idx, pattern_idx));
                }
                valid.push(slot.is_some());
            }
            leaf_valid.push(valid);
        }

        (matchers, leaf_valid)
    }

    fn scan(
        &self,
        files: &[&ScannedFile],
        source: &dyn FileSource,
        matchers: &[Matcher],
        leaf_matches: &mut [Vec<Vec<PatternMatch>>],
        evaluation: &mut Evaluation,
    ) {
        let limit = self.limits.max_matches;
        let mut seen: FxHashSet<(usize, usize, String)> = FxHashSet::default();
        let mut matched_files: FxHashSet<usize> = FxHashSet::default();

        'files: for (file_idx, file) in files.iter().enumerate() {
            let content = match source.read(&file.relative_path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(file = %file.relative_path, error = %e, "skipping unreadable file");
                    evaluation.files_skipped += 1;
                    continue;
                }
            };
            evaluation.files_scanned += 1;
            if content.truncated {
                evaluation.truncated_files += 1;
            }

            let line_starts = line_starts(&content.text);
            for matcher in matchers {
                for found in matcher.regex.find_iter(&content.text) {
                    if found.start() == found.end() {
                        continue;
                    }
                    let line = line_starts.partition_point(|&s| s <= found.start());
                    let key = (file_idx, line, dedup_key(found.as_str()));
                    let is_new = !seen.contains(&key);
                    // Stop only when a match is actually being dropped.
                    if is_new && evaluation.matches.len() >= limit {
                        evaluation.termination = Some(Termination {
                            limit,
                            files_unscanned: files.len() - file_idx - 1,
                        });
                        break 'files;
                    }

                    let record = PatternMatch {
                        file: file.relative_path.clone(),
                        line,
                        pattern: matcher.source.clone(),
                        matched_text: truncate(found.as_str(), self.limits.max_match_text),
                        provenance: matcher.provenance,
                    };
                    for &(leaf, pattern) in &matcher.slots {
                        leaf_matches[leaf][pattern].push(record.clone());
                    }
                    if is_new {
                        seen.insert(key);
                        matched_files.insert(file_idx);
                        evaluation.matches.push(record);
                    }
                }
            }
        }

        evaluation.files_matched = matched_files.len();
        tracing::debug!(
            files_scanned = evaluation.files_scanned,
            match_count = evaluation.matches.len(),
            terminated = evaluation.termination.is_some(),
            "gate scan complete"
        );
    }
}

/// Byte offsets where each line starts; index 0 is line 1.
fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

type LeafHits = (Vec<Vec<PatternMatch>>, Vec<bool>);

fn fold_group(
    group: &CriteriaGroup,
    hits: &mut impl Iterator<Item = LeafHits>,
) -> ConditionResult {
    let children: Vec<ConditionResult> = group
        .conditions
        .iter()
        .map(|node| match node {
            CriteriaNode::Pattern(leaf) => {
                let (matches, valid) = hits.next().unwrap_or_default();
                fold_leaf(leaf, matches, &valid)
            }
            CriteriaNode::Criteria(inner) => fold_group(inner, hits),
        })
        .collect();

    // Only required children participate; a branch with none passes.
    let passed = group
        .operator
        .combine(children.iter().filter(|c| c.required).map(|c| c.passed))
        .unwrap_or(true);

    let total_weight: f64 = children.iter().map(|c| c.weight).sum();
    let earned_weight = if total_weight > 0.0 {
        group.weight * children.iter().map(|c| c.earned_weight).sum::<f64>() / total_weight
    } else if passed {
        group.weight
    } else {
        0.0
    };

    ConditionResult {
        name: group.name.clone(),
        kind: ConditionKind::Criteria,
        operator: group.operator,
        required: group.required,
        passed,
        weight: group.weight,
        earned_weight,
        matched_patterns: 0,
        total_patterns: 0,
        matches: Vec::new(),
        children,
    }
}

fn fold_leaf(
    leaf: &PatternCondition,
    per_pattern: Vec<Vec<PatternMatch>>,
    valid: &[bool],
) -> ConditionResult {
    let hit = |i: usize| per_pattern.get(i).is_some_and(|m| !m.is_empty());
    let usable: Vec<usize> = (0..leaf.patterns.len())
        .filter(|&i| valid.get(i).copied().unwrap_or(false))
        .collect();

    // A leaf whose patterns were all rejected cannot pass.
    let passed = leaf
        .operator
        .combine(usable.iter().map(|&i| hit(i)))
        .unwrap_or(false);

    let total_weight: f64 = usable.iter().map(|&i| leaf.patterns[i].weight).sum();
    let matched_weight: f64 = usable
        .iter()
        .filter(|&&i| hit(i))
        .map(|&i| leaf.patterns[i].weight)
        .sum();
    let earned_weight = if total_weight > 0.0 {
        leaf.weight * matched_weight / total_weight
    } else if passed {
        leaf.weight
    } else {
        0.0
    };

    let matched_patterns = usable.iter().filter(|&&i| hit(i)).count();
    let mut seen = FxHashSet::default();
    let matches: Vec<PatternMatch> = per_pattern
        .into_iter()
        .flatten()
        .filter(|m| seen.insert((m.file.clone(), m.line, dedup_key(&m.matched_text))))
        .collect();

    ConditionResult {
        name: leaf.name.clone(),
        kind: ConditionKind::Pattern,
        operator: leaf.operator,
        required: leaf.required,
        passed,
        weight: leaf.weight,
        earned_weight,
        matched_patterns,
        total_patterns: usable.len(),
        matches,
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers_are_one_based() {
        let starts = line_starts("a\nbb\nccc");
        assert_eq!(starts, vec![0, 2, 5]);
        assert_eq!(starts.partition_point(|&s| s <= 0), 1);
        assert_eq!(starts.partition_point(|&s| s <= 3), 2);
        assert_eq!(starts.partition_point(|&s| s <= 7), 3);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("ab", 5), "ab");
    }
}

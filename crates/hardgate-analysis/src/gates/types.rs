//! Typed gate model.
//!
//! Gates are immutable once loaded. The catalogue parses raw documents into
//! these types and rejects anything that does not validate, so the
//! evaluator and scorer never see an inconsistent gate.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use hardgate_core::errors::CatalogueError;
use hardgate_core::types::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::applicability::ApplicabilityRule;
use crate::scanner::{FileKind, Language};

/// Gate priority, used to order recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean operator of a condition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    #[serde(alias = "and")]
    And,
    #[default]
    #[serde(alias = "or")]
    Or,
}

impl Operator {
    /// Combine child verdicts. `None` when there are no participants.
    pub fn combine(&self, mut verdicts: impl Iterator<Item = bool>) -> Option<bool> {
        let first = verdicts.next()?;
        Some(match self {
            Self::And => first && verdicts.all(|v| v),
            Self::Or => first || verdicts.any(|v| v),
        })
    }
}

/// Confidence attached to a coverage estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateConfidence {
    High,
    #[default]
    Medium,
    Low,
}

/// How much of the relevant code a gate's patterns are expected to touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedCoverage {
    pub percentage: f64,
    #[serde(default)]
    pub confidence: EstimateConfidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files_expected: Option<usize>,
}

impl ExpectedCoverage {
    /// An infrastructure pattern is expected once per codebase, so a single
    /// matching file satisfies it.
    pub fn is_infrastructure(&self) -> bool {
        self.percentage >= 100.0
    }

    pub fn validate(&self, gate_id: &str) -> Result<(), CatalogueError> {
        if !(0.0..=100.0).contains(&self.percentage) {
            return Err(invalid(gate_id, "expected_coverage.percentage must be between 0 and 100"));
        }
        if self.max_files_expected == Some(0) {
            return Err(invalid(gate_id, "expected_coverage.max_files_expected must be greater than 0"));
        }
        Ok(())
    }
}

/// Whether a security gate counts every match or every offending file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationCount {
    #[default]
    Matches,
    Files,
}

/// Scoring for gates that reward pattern presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoveragePolicy {
    /// Overrides the expected-coverage percentage as the PASS threshold.
    pub pass_threshold: Option<f64>,
}

/// Scoring for gates where every match is a violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityPolicy {
    pub base_score: f64,
    pub violation_penalty: f64,
    pub max_penalty: f64,
    pub bonus_for_clean: f64,
    pub count: ViolationCount,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            base_score: 100.0,
            violation_penalty: 20.0,
            max_penalty: 100.0,
            bonus_for_clean: 0.0,
            count: ViolationCount::Matches,
        }
    }
}

/// The declared scoring policy of a gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum ScoringPolicy {
    Coverage(CoveragePolicy),
    Security(SecurityPolicy),
}

impl ScoringPolicy {
    pub fn is_security(&self) -> bool {
        matches!(self, Self::Security(_))
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::Coverage(CoveragePolicy::default())
    }
}

/// One regex in a pattern leaf. Plain strings carry weight 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPattern {
    pub pattern: String,
    pub weight: f64,
}

/// A `pattern` leaf: OR/AND over weighted regexes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternCondition {
    pub name: String,
    pub operator: Operator,
    pub weight: f64,
    pub required: bool,
    pub patterns: Vec<WeightedPattern>,
}

/// A `criteria` branch: AND/OR over child nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriteriaGroup {
    pub name: String,
    pub operator: Operator,
    pub weight: f64,
    pub required: bool,
    pub conditions: Vec<CriteriaNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CriteriaNode {
    Pattern(PatternCondition),
    Criteria(CriteriaGroup),
}

impl CriteriaGroup {
    /// Leaf conditions in depth-first order.
    pub fn leaves(&self) -> Vec<&PatternCondition> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

fn collect_leaves<'a>(group: &'a CriteriaGroup, out: &mut Vec<&'a PatternCondition>) {
    for node in &group.conditions {
        match node {
            CriteriaNode::Pattern(p) => out.push(p),
            CriteriaNode::Criteria(g) => collect_leaves(g, out),
        }
    }
}

/// Per-language pattern sets of a gate. `common` applies to every language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternSet {
    pub common: Vec<String>,
    pub by_language: BTreeMap<Language, Vec<String>>,
}

pub const COMMON_PATTERNS_KEY: &str = "common";

impl PatternSet {
    /// Build from a raw `{language -> patterns}` table.
    pub fn from_raw(
        gate_id: &str,
        raw: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self, CatalogueError> {
        let mut set = PatternSet::default();
        for (key, patterns) in raw {
            if key.eq_ignore_ascii_case(COMMON_PATTERNS_KEY) {
                set.common.extend(patterns.iter().cloned());
                continue;
            }
            let language =
                Language::from_name(key).ok_or_else(|| CatalogueError::UnknownLanguage {
                    gate: gate_id.to_string(),
                    language: key.clone(),
                })?;
            set.by_language
                .entry(language)
                .or_default()
                .extend(patterns.iter().cloned());
        }
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.common.is_empty() && self.by_language.values().all(Vec::is_empty)
    }

    /// True when the set has something to say about files in `language`.
    pub fn covers(&self, language: Option<Language>) -> bool {
        !self.common.is_empty()
            || language.is_some_and(|l| self.by_language.get(&l).is_some_and(|p| !p.is_empty()))
    }

    /// Common patterns, then each language's patterns in language order,
    /// exact duplicates removed.
    pub fn for_languages(&self, languages: &BTreeSet<Language>) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let language_sets = languages
            .iter()
            .filter_map(|l| self.by_language.get(l))
            .flatten();
        self.common
            .iter()
            .chain(language_sets)
            .filter(|p| seen.insert(p.as_str()))
            .cloned()
            .collect()
    }

    /// Append `other`'s patterns, skipping exact duplicates.
    pub fn merge(&mut self, other: PatternSet) {
        extend_unique(&mut self.common, other.common);
        for (language, patterns) in other.by_language {
            extend_unique(self.by_language.entry(language).or_default(), patterns);
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.common
            .iter()
            .chain(self.by_language.values().flatten())
            .map(String::as_str)
    }
}

fn extend_unique(target: &mut Vec<String>, patterns: Vec<String>) {
    for pattern in patterns {
        if !target.contains(&pattern) {
            target.push(pattern);
        }
    }
}

/// A validated hard gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gate {
    pub id: String,
    pub name: String,
    pub category: String,
    pub priority: Priority,
    pub description: Option<String>,
    pub patterns: PatternSet,
    pub criteria: Option<CriteriaGroup>,
    pub expected_coverage: Option<ExpectedCoverage>,
    pub policy: ScoringPolicy,
    pub applicability: ApplicabilityRule,
    pub file_types: Vec<FileKind>,
}

impl Gate {
    pub fn is_security_gate(&self) -> bool {
        self.policy.is_security()
    }

    /// Whether a file of `kind` and `language` is in scope for this gate.
    /// A gate without language-specific patterns covers every language.
    pub fn is_relevant(&self, kind: FileKind, language: Option<Language>) -> bool {
        self.file_types.contains(&kind)
            && (self.patterns.by_language.is_empty() || self.patterns.covers(language))
    }
}

pub(crate) fn invalid(gate_id: &str, message: impl Into<String>) -> CatalogueError {
    CatalogueError::InvalidGate {
        gate: gate_id.to_string(),
        message: message.into(),
    }
}

//! Per-gate result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{Gate, Operator, Priority};
use crate::applicability::ApplicabilityVerdict;
use crate::patterns::Provenance;

/// Terminal status of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateStatus {
    Pass,
    Fail,
    Warning,
    NotApplicable,
}

impl GateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Warning => "WARNING",
            Self::NotApplicable => "NOT_APPLICABLE",
        }
    }
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occurrence of a pattern in a scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    /// Relative path of the file, as listed in the scan.
    pub file: String,
    /// 1-based line of the match start.
    pub line: usize,
    pub pattern: String,
    pub matched_text: String,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    Pattern,
    Criteria,
}

/// Evaluation of one criteria node, mirroring the tree shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionResult {
    pub name: String,
    pub kind: ConditionKind,
    pub operator: Operator,
    pub required: bool,
    pub passed: bool,
    pub weight: f64,
    /// Share of `weight` earned: matched fraction for leaves, weighted mean
    /// of children for branches.
    pub earned_weight: f64,
    /// Leaves only: patterns with at least one match, and patterns that
    /// compiled.
    pub matched_patterns: usize,
    pub total_patterns: usize,
    pub matches: Vec<PatternMatch>,
    pub children: Vec<ConditionResult>,
}

impl ConditionResult {
    /// Matches in this node and all descendants.
    pub fn match_count(&self) -> usize {
        self.matches.len() + self.children.iter().map(|c| c.match_count()).sum::<usize>()
    }

    /// Required leaves that did not pass, depth-first.
    pub fn unmet_required(&self) -> Vec<&ConditionResult> {
        let mut out = Vec::new();
        collect_unmet(self, &mut out);
        out
    }

    pub fn find(&self, name: &str) -> Option<&ConditionResult> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

fn collect_unmet<'a>(node: &'a ConditionResult, out: &mut Vec<&'a ConditionResult>) {
    for child in node.children.iter().filter(|c| c.required && !c.passed) {
        match child.kind {
            ConditionKind::Pattern => out.push(child),
            ConditionKind::Criteria => {
                let before = out.len();
                collect_unmet(child, out);
                if out.len() == before {
                    out.push(child);
                }
            }
        }
    }
}

/// Scanning stopped once the gate hit its match limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termination {
    pub limit: usize,
    pub files_unscanned: usize,
}

/// A pattern that failed to compile and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedPattern {
    pub pattern: String,
    pub message: String,
}

/// Counters describing how a gate's verdict was reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateEvidence {
    pub generated_count: usize,
    pub static_count: usize,
    pub rejected_patterns: Vec<RejectedPattern>,
    pub files_scanned: usize,
    pub files_matched: usize,
    pub files_skipped: usize,
    pub relevant_files: usize,
    pub total_files: usize,
    pub truncated_files: usize,
    pub termination: Option<Termination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Normal,
    Reduced,
}

/// Why a gate's result carries reduced confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    GeneratedPatternsUnavailable { reason: String },
    PatternsRejected { count: usize },
    FilesSkipped { count: usize },
    FilesTruncated { count: usize },
    ScanTerminated { limit: usize },
    NoRelevantFiles,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeneratedPatternsUnavailable { reason } => {
                write!(f, "generated patterns unavailable ({reason})")
            }
            Self::PatternsRejected { count } => write!(f, "{count} pattern(s) rejected"),
            Self::FilesSkipped { count } => write!(f, "{count} file(s) unreadable"),
            Self::FilesTruncated { count } => write!(f, "{count} file(s) truncated"),
            Self::ScanTerminated { limit } => write!(f, "scan stopped at {limit} matches"),
            Self::NoRelevantFiles => f.write_str("no relevant files"),
        }
    }
}

/// Final, immutable result for one gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub gate_id: String,
    pub gate_name: String,
    pub category: String,
    pub priority: Priority,
    pub status: GateStatus,
    pub score: f64,
    pub is_security_gate: bool,
    /// Percent of expected files matched. Always `None` for security gates.
    pub coverage_percentage: Option<f64>,
    pub applicability: ApplicabilityVerdict,
    pub matches: Vec<PatternMatch>,
    pub conditions: Option<ConditionResult>,
    pub evidence: GateEvidence,
    pub confidence: Confidence,
    pub degradations: Vec<Degradation>,
    pub details: Vec<String>,
    pub recommendations: Vec<String>,
    pub execution_time_ms: u64,
}

impl GateResult {
    /// Result for a gate filtered out before any pattern work.
    pub fn not_applicable(gate: &Gate, verdict: ApplicabilityVerdict, total_files: usize) -> Self {
        Self {
            gate_id: gate.id.clone(),
            gate_name: gate.name.clone(),
            category: gate.category.clone(),
            priority: gate.priority,
            status: GateStatus::NotApplicable,
            score: 0.0,
            is_security_gate: gate.is_security_gate(),
            coverage_percentage: None,
            details: vec![format!("Not applicable: {}", verdict.reason)],
            applicability: verdict,
            matches: Vec::new(),
            conditions: None,
            evidence: GateEvidence {
                total_files,
                ..GateEvidence::default()
            },
            confidence: Confidence::Normal,
            degradations: Vec::new(),
            recommendations: Vec::new(),
            execution_time_ms: 0,
        }
    }

    pub fn is_applicable(&self) -> bool {
        self.status != GateStatus::NotApplicable
    }

    pub fn passed(&self) -> bool {
        self.status == GateStatus::Pass
    }

    /// Distinct files with at least one match.
    pub fn matched_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = self.matches.iter().map(|m| m.file.as_str()).collect();
        files.sort_unstable();
        files.dedup();
        files
    }
}

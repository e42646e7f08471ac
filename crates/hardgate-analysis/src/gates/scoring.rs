//! Coverage and violation scoring.
//!
//! One entry point, `Scorer::score`, branches on the gate's declared policy.
//! Coverage gates reward distinct matched files; security gates treat every
//! match as a violation and deduct from a base score.

use hardgate_core::config::ScoringConfig;
use serde::Serialize;

use super::result::{GateStatus, PatternMatch};
use super::types::{CoveragePolicy, ExpectedCoverage, ScoringPolicy, SecurityPolicy, ViolationCount};

/// Raw evaluation figures the scorer needs.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub matches: &'a [PatternMatch],
    pub files_matched: usize,
    pub relevant_files: usize,
    pub total_files: usize,
}

/// Which formula produced a score, with its inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum ScoreBasis {
    Coverage {
        files_matched: usize,
        /// Files the coverage ratio is taken over; 0 when nothing was in scope.
        denominator: usize,
        coverage: f64,
        threshold: f64,
        infrastructure: bool,
    },
    Security {
        violations: usize,
        penalty: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub score: f64,
    pub status: GateStatus,
    pub basis: ScoreBasis,
}

impl ScoreOutcome {
    /// Coverage percentage, never reported for security gates.
    pub fn coverage_percentage(&self) -> Option<f64> {
        match self.basis {
            ScoreBasis::Coverage { coverage, .. } => Some(coverage),
            ScoreBasis::Security { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    default_pass_threshold: f64,
    warning_margin: f64,
}

impl Scorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            default_pass_threshold: config.effective_default_pass_threshold(),
            warning_margin: config.effective_warning_margin(),
        }
    }

    pub fn score(
        &self,
        policy: &ScoringPolicy,
        expected: Option<&ExpectedCoverage>,
        input: ScoreInput<'_>,
    ) -> ScoreOutcome {
        match policy {
            ScoringPolicy::Coverage(coverage) => self.score_coverage(coverage, expected, input),
            ScoringPolicy::Security(security) => score_security(security, input),
        }
    }

    /// PASS threshold for a coverage gate: the explicit policy threshold,
    /// else a positive expected-coverage percentage, else the configured default.
    pub fn coverage_threshold(
        &self,
        policy: &CoveragePolicy,
        expected: Option<&ExpectedCoverage>,
    ) -> f64 {
        policy
            .pass_threshold
            .or_else(|| expected.map(|e| e.percentage).filter(|p| *p > 0.0))
            .unwrap_or(self.default_pass_threshold)
    }

    fn score_coverage(
        &self,
        policy: &CoveragePolicy,
        expected: Option<&ExpectedCoverage>,
        input: ScoreInput<'_>,
    ) -> ScoreOutcome {
        let threshold = self.coverage_threshold(policy, expected);
        let infrastructure = expected.is_some_and(ExpectedCoverage::is_infrastructure);
        let denominator = coverage_denominator(expected, input.relevant_files, input.total_files);

        let coverage = coverage_score(input.files_matched, denominator);
        let score = if infrastructure {
            if input.files_matched >= 1 {
                100.0
            } else {
                0.0
            }
        } else {
            coverage
        };

        ScoreOutcome {
            score,
            status: self.threshold_status(score, threshold),
            basis: ScoreBasis::Coverage {
                files_matched: input.files_matched,
                denominator,
                coverage,
                threshold,
                infrastructure,
            },
        }
    }

    fn threshold_status(&self, score: f64, threshold: f64) -> GateStatus {
        if score >= threshold {
            GateStatus::Pass
        } else if score >= threshold - self.warning_margin {
            GateStatus::Warning
        } else {
            GateStatus::Fail
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

/// `max_files_expected` when declared, else relevant files, else all files.
pub fn coverage_denominator(
    expected: Option<&ExpectedCoverage>,
    relevant_files: usize,
    total_files: usize,
) -> usize {
    expected
        .and_then(|e| e.max_files_expected)
        .unwrap_or(if relevant_files > 0 {
            relevant_files
        } else {
            total_files
        })
}

/// `min(100, matched / denominator * 100)`, 0 for an empty denominator.
pub fn coverage_score(files_matched: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let raw = (files_matched as f64 * 100.0) / denominator as f64;
    round2(raw.min(100.0))
}

/// `max(0, base - min(max_penalty, violations * penalty))`, plus the clean
/// bonus when there are no violations, capped at 100.
pub fn security_score(policy: &SecurityPolicy, violations: usize) -> f64 {
    let penalty = (violations as f64 * policy.violation_penalty).min(policy.max_penalty);
    let mut score = (policy.base_score - penalty).max(0.0);
    if violations == 0 {
        score += policy.bonus_for_clean;
    }
    round2(score.min(100.0))
}

/// Violations under the policy's counting mode.
pub fn count_violations(policy: &SecurityPolicy, matches: &[PatternMatch]) -> usize {
    match policy.count {
        ViolationCount::Matches => matches.len(),
        ViolationCount::Files => {
            let mut files: Vec<&str> = matches.iter().map(|m| m.file.as_str()).collect();
            files.sort_unstable();
            files.dedup();
            files.len()
        }
    }
}

fn score_security(policy: &SecurityPolicy, input: ScoreInput<'_>) -> ScoreOutcome {
    let violations = count_violations(policy, input.matches);
    let penalty = (violations as f64 * policy.violation_penalty).min(policy.max_penalty);
    ScoreOutcome {
        score: security_score(policy, violations),
        status: if violations == 0 {
            GateStatus::Pass
        } else {
            GateStatus::Fail
        },
        basis: ScoreBasis::Security {
            violations,
            penalty,
        },
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denominator_prefers_max_files_expected() {
        let expected = ExpectedCoverage {
            percentage: 60.0,
            confidence: Default::default(),
            reasoning: None,
            max_files_expected: Some(160),
        };
        assert_eq!(coverage_denominator(Some(&expected), 400, 900), 160);
        assert_eq!(coverage_denominator(None, 0, 12), 12);
        assert_eq!(coverage_score(128, 160), 80.0);
    }

    #[test]
    fn clean_bonus_is_capped() {
        let policy = SecurityPolicy {
            base_score: 95.0,
            bonus_for_clean: 10.0,
            ..SecurityPolicy::default()
        };
        assert_eq!(security_score(&policy, 0), 100.0);
        assert_eq!(security_score(&policy, 1), 75.0);
    }
}

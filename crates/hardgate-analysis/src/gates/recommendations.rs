//! Details and recommendations attached to gate results.

use super::evaluator::Evaluation;
use super::result::{ConditionResult, Degradation, GateStatus, PatternMatch};
use super::scoring::{ScoreBasis, ScoreOutcome};
use super::types::Gate;
use crate::scanner::ScannedFile;

/// Offending locations listed for a failed security gate before summarizing.
const MAX_LISTED_VIOLATIONS: usize = 5;

/// Human-readable account of how the score was reached.
pub fn details(
    outcome: &ScoreOutcome,
    evaluation: &Evaluation,
    degradations: &[Degradation],
) -> Vec<String> {
    let mut lines = Vec::new();
    match &outcome.basis {
        ScoreBasis::Coverage {
            files_matched,
            denominator,
            coverage,
            threshold,
            infrastructure,
        } => {
            if *infrastructure {
                lines.push(format!(
                    "Infrastructure pattern: {} in {files_matched} file(s)",
                    if *files_matched > 0 { "found" } else { "not found" }
                ));
            } else {
                lines.push(format!(
                    "Matched {files_matched} of {denominator} expected file(s) ({coverage:.1}% coverage, threshold {threshold:.1}%)"
                ));
            }
        }
        ScoreBasis::Security {
            violations,
            penalty,
        } => {
            lines.push(format!(
                "{violations} violation(s) found (penalty {penalty:.1})"
            ));
        }
    }
    if let Some(conditions) = &evaluation.conditions {
        let unmet = conditions.unmet_required();
        if !unmet.is_empty() {
            let names: Vec<&str> = unmet.iter().map(|c| c.name.as_str()).collect();
            lines.push(format!("Required conditions not met: {}", names.join(", ")));
        }
    }
    if let Some(termination) = &evaluation.termination {
        lines.push(format!(
            "Scan stopped after reaching {} matches; {} file(s) not scanned",
            termination.limit, termination.files_unscanned
        ));
    }
    if !degradations.is_empty() {
        let reasons: Vec<String> = degradations.iter().map(ToString::to_string).collect();
        lines.push(format!("Reduced confidence: {}", reasons.join("; ")));
    }
    lines
}

/// Next steps for the team owning the codebase.
pub fn recommendations(
    gate: &Gate,
    outcome: &ScoreOutcome,
    evaluation: &Evaluation,
    relevant: &[&ScannedFile],
) -> Vec<String> {
    match (&outcome.basis, outcome.status) {
        (ScoreBasis::Security { .. }, GateStatus::Fail) => security_findings(gate, &evaluation.matches),
        (ScoreBasis::Security { .. }, _) => Vec::new(),
        (ScoreBasis::Coverage { coverage, .. }, GateStatus::Pass) => {
            if *coverage >= 100.0 || outcome.score >= 100.0 {
                vec![format!("{} is fully implemented; keep it that way", gate.name)]
            } else {
                Vec::new()
            }
        }
        (ScoreBasis::Coverage { .. }, _) => {
            coverage_gaps(gate, evaluation.conditions.as_ref(), &evaluation.matches, relevant)
        }
    }
}

fn security_findings(gate: &Gate, matches: &[PatternMatch]) -> Vec<String> {
    let mut out: Vec<String> = matches
        .iter()
        .take(MAX_LISTED_VIOLATIONS)
        .map(|m| format!("{}: fix violation at {}:{}", gate.name, m.file, m.line))
        .collect();
    if matches.len() > MAX_LISTED_VIOLATIONS {
        out.push(format!(
            "...and {} more violation(s)",
            matches.len() - MAX_LISTED_VIOLATIONS
        ));
    }
    out
}

fn coverage_gaps(
    gate: &Gate,
    conditions: Option<&ConditionResult>,
    matches: &[PatternMatch],
    relevant: &[&ScannedFile],
) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(conditions) = conditions {
        for unmet in conditions.unmet_required() {
            out.push(format!("Add {} ({})", unmet.name, gate.name));
        }
    }

    // The largest relevant file without a match is the most likely place
    // the practice is missing.
    let top_unmatched = relevant
        .iter()
        .filter(|f| !matches.iter().any(|m| m.file == f.relative_path))
        .max_by(|a, b| {
            a.size
                .cmp(&b.size)
                .then_with(|| b.relative_path.cmp(&a.relative_path))
        });
    match top_unmatched {
        Some(file) => out.push(format!(
            "Implement {} starting with {}",
            gate.name, file.relative_path
        )),
        None if out.is_empty() => out.push(format!("Implement {}", gate.name)),
        None => {}
    }
    out
}

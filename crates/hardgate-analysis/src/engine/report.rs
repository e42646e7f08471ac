//! Scan-level report.

use serde::Serialize;

use crate::applicability::ApplicabilitySummary;
use crate::characteristics::CodebaseCharacteristics;
use crate::gates::{GateResult, GateStatus};
use crate::patterns::PatternCacheStats;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub characteristics: CodebaseCharacteristics,
    /// One result per enabled gate, in catalogue order.
    pub results: Vec<GateResult>,
    pub applicability_summary: ApplicabilitySummary,
    /// Mean score of applicable gates; 0 when none apply.
    pub overall_score: f64,
    pub pattern_cache: PatternCacheStats,
    pub duration_ms: u64,
}

impl ValidationReport {
    pub fn new(
        characteristics: CodebaseCharacteristics,
        results: Vec<GateResult>,
        pattern_cache: PatternCacheStats,
        duration_ms: u64,
    ) -> Self {
        let mut applicability_summary = ApplicabilitySummary::default();
        for result in &results {
            applicability_summary.record(&result.gate_id, &result.gate_name, &result.applicability);
        }
        let overall_score = overall_score(&results);
        Self {
            characteristics,
            results,
            applicability_summary,
            overall_score,
            pattern_cache,
            duration_ms,
        }
    }

    pub fn result(&self, gate_id: &str) -> Option<&GateResult> {
        self.results.iter().find(|r| r.gate_id == gate_id)
    }

    pub fn passed(&self) -> impl Iterator<Item = &GateResult> {
        self.with_status(GateStatus::Pass)
    }

    pub fn failed(&self) -> impl Iterator<Item = &GateResult> {
        self.with_status(GateStatus::Fail)
    }

    pub fn applicable(&self) -> impl Iterator<Item = &GateResult> {
        self.results.iter().filter(|r| r.is_applicable())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn with_status(&self, status: GateStatus) -> impl Iterator<Item = &GateResult> {
        self.results.iter().filter(move |r| r.status == status)
    }
}

fn overall_score(results: &[GateResult]) -> f64 {
    let scores: Vec<f64> = results
        .iter()
        .filter(|r| r.is_applicable())
        .map(|r| r.score)
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    (mean * 100.0).round() / 100.0
}

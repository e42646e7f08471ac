//! Typed stage context for the validation pipeline.
//!
//! Each stage consumes the previous stage's output by value, so a gate
//! cannot reach scoring without passing applicability, aggregation, and
//! evaluation in order.

use std::collections::BTreeSet;

use crate::applicability::ApplicabilityVerdict;
use crate::characteristics::CodebaseCharacteristics;
use crate::gates::{Degradation, Evaluation, ExpectedCoverage, Gate};
use crate::patterns::AggregatedPatterns;
use crate::scanner::{FileSource, Language, RepositoryScan, ScannedFile};

/// Scan-wide inputs shared by every gate.
pub struct ScanContext<'a> {
    pub scan: &'a RepositoryScan,
    pub source: &'a dyn FileSource,
    pub characteristics: CodebaseCharacteristics,
    pub total_files: usize,
}

impl<'a> ScanContext<'a> {
    pub fn new(
        scan: &'a RepositoryScan,
        source: &'a dyn FileSource,
        characteristics: CodebaseCharacteristics,
    ) -> Self {
        Self {
            scan,
            source,
            characteristics,
            total_files: scan.effective_total_files(),
        }
    }
}

/// A gate that passed the applicability filter, with its files in scope.
pub struct ApplicableGate<'a> {
    pub gate: &'a Gate,
    pub verdict: ApplicabilityVerdict,
    pub relevant: Vec<&'a ScannedFile>,
    pub languages: BTreeSet<Language>,
}

/// A gate with its effective pattern set.
pub struct AggregatedGate<'a> {
    pub applicable: ApplicableGate<'a>,
    pub patterns: AggregatedPatterns,
    pub expected: Option<ExpectedCoverage>,
    pub degradations: Vec<Degradation>,
}

/// A gate whose files have been scanned and criteria folded.
pub struct EvaluatedGate<'a> {
    pub aggregated: AggregatedGate<'a>,
    pub evaluation: Evaluation,
}

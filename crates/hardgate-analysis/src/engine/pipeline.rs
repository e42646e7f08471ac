//! Validation pipeline.
//!
//! characterize -> per gate: applicability -> aggregation -> evaluation ->
//! scoring. Gates run sequentially unless `scan.parallel_gates` is set, in
//! which case they fan out on rayon and share the pattern cache.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use hardgate_core::events::{
    EventDispatcher, GateEvaluatedEvent, GateSkippedEvent, PatternRejectedEvent,
    ScanCompleteEvent, ScanStartedEvent,
};
use hardgate_core::{EngineError, HardGateConfig};
use rayon::prelude::*;

use super::context::{AggregatedGate, ApplicableGate, EvaluatedGate, ScanContext};
use super::generator::{GenerationRequest, PatternGenerator};
use super::report::ValidationReport;
use crate::applicability::{ApplicabilityFilter, ApplicabilityVerdict};
use crate::characteristics::CharacteristicsAnalyzer;
use crate::gates::relevance::{languages_of, relevant_files};
use crate::gates::{
    recommendations, Confidence, CriteriaEvaluator, Degradation, EvaluationLimits, Gate,
    GateCatalogue, GateEvidence, GateResult, GateStatus, ScoreInput, Scorer,
};
use crate::patterns::{PatternAggregator, PatternCache, StaticPatternLibrary};
use crate::scanner::{walk_repository, FileSource, FsFileSource, RepositoryScan};

pub struct ValidationEngine {
    config: HardGateConfig,
    cache: Arc<PatternCache>,
    library: Option<StaticPatternLibrary>,
    generator: Option<Arc<dyn PatternGenerator>>,
    events: EventDispatcher,
    analyzer: CharacteristicsAnalyzer,
    scorer: Scorer,
    limits: EvaluationLimits,
}

impl ValidationEngine {
    pub fn new(config: HardGateConfig) -> Self {
        let cache = Arc::new(PatternCache::new(&config.patterns));
        Self {
            analyzer: CharacteristicsAnalyzer::new(&config.characteristics),
            scorer: Scorer::new(&config.scoring),
            limits: EvaluationLimits::from(&config.scan),
            cache,
            library: None,
            generator: None,
            events: EventDispatcher::new(),
            config,
        }
    }

    /// Share a pattern cache across engines.
    pub fn with_pattern_cache(mut self, cache: Arc<PatternCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the static library derived from the catalogue. The supplied
    /// library should already contain the catalogue's own patterns.
    pub fn with_library(mut self, library: StaticPatternLibrary) -> Self {
        self.library = Some(library);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn PatternGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &HardGateConfig {
        &self.config
    }

    pub fn pattern_cache(&self) -> &Arc<PatternCache> {
        &self.cache
    }

    /// Walk `root` and validate it with a filesystem source.
    pub fn validate_directory(
        &self,
        root: &Path,
        catalogue: &GateCatalogue,
    ) -> Result<ValidationReport, EngineError> {
        let scan = walk_repository(root, &self.config.scan)?;
        let source = FsFileSource::new(root, self.config.scan.effective_max_file_size());
        Ok(self.validate(&scan, catalogue, &source))
    }

    pub fn validate(
        &self,
        scan: &RepositoryScan,
        catalogue: &GateCatalogue,
        source: &dyn FileSource,
    ) -> ValidationReport {
        let started = Instant::now();
        let characteristics = self.analyzer.analyze(scan);
        tracing::info!(
            primary = %characteristics.primary_technology,
            frontend = characteristics.is_frontend,
            backend = characteristics.is_backend,
            api = characteristics.is_api,
            "codebase characterized"
        );
        let ctx = ScanContext::new(scan, source, characteristics);

        let derived;
        let library = match &self.library {
            Some(library) => library,
            None => {
                derived = StaticPatternLibrary::from_catalogue(catalogue);
                &derived
            }
        };

        let gates: Vec<&Gate> = catalogue
            .gates()
            .iter()
            .filter(|g| self.config.gates.is_enabled(&g.id))
            .collect();

        self.events.emit_scan_started(&ScanStartedEvent {
            total_files: ctx.total_files,
            gate_count: gates.len(),
        });

        let results: Vec<GateResult> = if self.config.scan.effective_parallel_gates() {
            let warmed = self.cache.warm(library.all_patterns());
            tracing::debug!(warmed, "pattern cache warmed");
            gates
                .par_iter()
                .map(|gate| self.evaluate_gate(&ctx, library, gate))
                .collect()
        } else {
            gates
                .iter()
                .map(|gate| self.evaluate_gate(&ctx, library, gate))
                .collect()
        };

        let cache_stats = self.cache.stats();
        let report = ValidationReport::new(
            ctx.characteristics,
            results,
            cache_stats,
            started.elapsed().as_millis() as u64,
        );

        self.events.emit_scan_complete(&ScanCompleteEvent {
            applicable_gates: report.applicability_summary.applicable_gates,
            not_applicable_gates: report.applicability_summary.not_applicable_gates,
            overall_score: report.overall_score,
            duration_ms: report.duration_ms,
        });
        tracing::info!(
            overall_score = report.overall_score,
            gates = report.results.len(),
            cache_hit_rate = cache_stats.hit_rate(),
            "validation complete"
        );
        report
    }

    fn evaluate_gate(
        &self,
        ctx: &ScanContext<'_>,
        library: &StaticPatternLibrary,
        gate: &Gate,
    ) -> GateResult {
        let span = tracing::info_span!("gate", gate_id = %gate.id);
        let _entered = span.enter();
        let started = Instant::now();

        let applicable = match self.check_applicability(ctx, gate) {
            Ok(applicable) => applicable,
            Err(verdict) => {
                self.events.emit_gate_skipped(&GateSkippedEvent {
                    gate_id: gate.id.clone(),
                    reason: verdict.reason.clone(),
                });
                return GateResult::not_applicable(gate, verdict, ctx.total_files);
            }
        };

        let aggregated = self.aggregate(ctx, library, applicable);
        let evaluated = self.evaluate(ctx, aggregated);
        let mut result = self.score(ctx, evaluated);
        result.execution_time_ms = started.elapsed().as_millis() as u64;

        self.events.emit_gate_evaluated(&GateEvaluatedEvent {
            gate_id: result.gate_id.clone(),
            status: result.status.to_string(),
            score: result.score,
            match_count: result.matches.len(),
            duration_ms: result.execution_time_ms,
        });
        tracing::info!(
            status = %result.status,
            score = result.score,
            match_count = result.matches.len(),
            files_scanned = result.evidence.files_scanned,
            gate_evaluation_time = result.execution_time_ms,
            "gate evaluated"
        );
        result
    }

    /// Stage 1: applicability. The only path to NOT_APPLICABLE.
    fn check_applicability<'a>(
        &self,
        ctx: &ScanContext<'a>,
        gate: &'a Gate,
    ) -> Result<ApplicableGate<'a>, ApplicabilityVerdict> {
        let verdict = ApplicabilityFilter::evaluate(&gate.applicability, &ctx.characteristics);
        tracing::debug!(
            applicable = verdict.is_applicable,
            reason = %verdict.reason,
            "applicability decided"
        );
        if !verdict.is_applicable {
            return Err(verdict);
        }
        let relevant = relevant_files(gate, ctx.scan);
        let languages = languages_of(&relevant);
        Ok(ApplicableGate {
            gate,
            verdict,
            relevant,
            languages,
        })
    }

    /// Stage 2: generated patterns first, static library appended.
    fn aggregate<'a>(
        &self,
        ctx: &ScanContext<'a>,
        library: &StaticPatternLibrary,
        applicable: ApplicableGate<'a>,
    ) -> AggregatedGate<'a> {
        let gate = applicable.gate;
        let mut degradations = Vec::new();
        let mut expected = gate.expected_coverage.clone();
        let mut generated = Vec::new();

        if let Some(generator) = &self.generator {
            let request = GenerationRequest {
                gate,
                languages: &applicable.languages,
                characteristics: &ctx.characteristics,
            };
            match generator.generate(&request) {
                Ok(output) if !output.patterns.is_empty() => {
                    if let Some(estimate) = output.expected_coverage {
                        match estimate.validate(&gate.id) {
                            Ok(()) => expected = Some(estimate),
                            Err(e) => tracing::warn!(error = %e, "ignoring generated coverage estimate"),
                        }
                    }
                    generated = output.patterns;
                }
                Ok(_) => {
                    tracing::warn!("pattern generator returned no patterns; using static patterns only");
                    degradations.push(Degradation::GeneratedPatternsUnavailable {
                        reason: "generator returned no patterns".to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "pattern generator failed; using static patterns only");
                    degradations.push(Degradation::GeneratedPatternsUnavailable {
                        reason: e.to_string(),
                    });
                }
            }
        }

        let static_patterns = library.patterns_for(&gate.id, &applicable.languages);
        let patterns = PatternAggregator::aggregate(&generated, &static_patterns);
        tracing::debug!(
            generated_count = patterns.generated_count,
            static_count = patterns.static_count,
            "gate patterns ready"
        );

        AggregatedGate {
            applicable,
            patterns,
            expected,
            degradations,
        }
    }

    /// Stage 3: read each relevant file once and fold the criteria tree.
    fn evaluate<'a>(&self, ctx: &ScanContext<'a>, aggregated: AggregatedGate<'a>) -> EvaluatedGate<'a> {
        let gate = aggregated.applicable.gate;
        let evaluation = CriteriaEvaluator::new(&self.cache, self.limits).evaluate(
            &aggregated.patterns,
            gate.criteria.as_ref(),
            &aggregated.applicable.relevant,
            ctx.source,
        );
        for rejected in &evaluation.rejected {
            self.events.emit_pattern_rejected(&PatternRejectedEvent {
                gate_id: gate.id.clone(),
                pattern: rejected.pattern.clone(),
                message: rejected.message.clone(),
            });
        }
        EvaluatedGate {
            aggregated,
            evaluation,
        }
    }

    /// Stage 4: policy scoring, status refinement, and evidence.
    fn score(&self, ctx: &ScanContext<'_>, evaluated: EvaluatedGate<'_>) -> GateResult {
        let EvaluatedGate {
            aggregated,
            evaluation,
        } = evaluated;
        let AggregatedGate {
            applicable,
            patterns,
            expected,
            mut degradations,
        } = aggregated;
        let gate = applicable.gate;

        let mut outcome = self.scorer.score(
            &gate.policy,
            expected.as_ref(),
            ScoreInput {
                matches: &evaluation.matches,
                files_matched: evaluation.files_matched,
                relevant_files: applicable.relevant.len(),
                total_files: ctx.total_files,
            },
        );

        // Criteria gates: unmet required conditions fail outright; once
        // they are met, a low score only warns.
        if gate.criteria.is_some() && !gate.is_security_gate() {
            if !evaluation.required_met() {
                outcome.status = GateStatus::Fail;
            } else if outcome.status == GateStatus::Fail {
                outcome.status = GateStatus::Warning;
            }
        }

        if applicable.relevant.is_empty() {
            degradations.push(Degradation::NoRelevantFiles);
        }
        if !evaluation.rejected.is_empty() {
            degradations.push(Degradation::PatternsRejected {
                count: evaluation.rejected.len(),
            });
        }
        if evaluation.files_skipped > 0 {
            degradations.push(Degradation::FilesSkipped {
                count: evaluation.files_skipped,
            });
        }
        if evaluation.truncated_files > 0 {
            degradations.push(Degradation::FilesTruncated {
                count: evaluation.truncated_files,
            });
        }
        if let Some(termination) = evaluation.termination {
            degradations.push(Degradation::ScanTerminated {
                limit: termination.limit,
            });
        }
        let confidence = if degradations.is_empty() {
            Confidence::Normal
        } else {
            Confidence::Reduced
        };

        let details = recommendations::details(&outcome, &evaluation, &degradations);
        let recommendations =
            recommendations::recommendations(gate, &outcome, &evaluation, &applicable.relevant);

        GateResult {
            gate_id: gate.id.clone(),
            gate_name: gate.name.clone(),
            category: gate.category.clone(),
            priority: gate.priority,
            status: outcome.status,
            score: outcome.score,
            is_security_gate: gate.is_security_gate(),
            coverage_percentage: outcome.coverage_percentage(),
            applicability: applicable.verdict,
            evidence: GateEvidence {
                generated_count: patterns.generated_count,
                static_count: patterns.static_count,
                rejected_patterns: evaluation.rejected,
                files_scanned: evaluation.files_scanned,
                files_matched: evaluation.files_matched,
                files_skipped: evaluation.files_skipped,
                relevant_files: applicable.relevant.len(),
                total_files: ctx.total_files,
                truncated_files: evaluation.truncated_files,
                termination: evaluation.termination,
            },
            matches: evaluation.matches,
            conditions: evaluation.conditions,
            confidence,
            degradations,
            details,
            recommendations,
            execution_time_ms: 0,
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(HardGateConfig::default())
    }
}

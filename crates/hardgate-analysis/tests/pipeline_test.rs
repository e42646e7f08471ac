//! End-to-end tests for the validation pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hardgate_analysis::engine::{
    GeneratedPatterns, GenerationRequest, PatternGenerator, PrecomputedGenerator,
};
use hardgate_analysis::gates::{Confidence, Degradation, GateCatalogue, GateStatus};
use hardgate_analysis::patterns::Provenance;
use hardgate_analysis::scanner::{MemoryFileSource, RepositoryScan, ScannedFile};
use hardgate_analysis::{ValidationEngine, ValidationReport};
use hardgate_core::config::{GateConfig, ScanConfig};
use hardgate_core::errors::GenerationError;
use hardgate_core::events::{
    EventDispatcher, GateEvaluatedEvent, GateEventHandler, GateSkippedEvent, ScanCompleteEvent,
    ScanStartedEvent,
};
use hardgate_core::HardGateConfig;

const SECRETS: &str = "AVOID_LOGGING_SECRETS";

const COVERAGE_GATE: &str = r#"
version = "1.0"

[[gates]]
id = "ERROR_HANDLING"
name = "Error Handling"
category = "Reliability"

[gates.patterns]
common = ['handle_errors\(']

[gates.expected_coverage]
percentage = 60
max_files_expected = 160
"#;

const CRITERIA_GATE: &str = r#"
version = "1.0"

[[gates]]
id = "RETRY"
name = "Retry"

[gates.criteria]
operator = "AND"

[[gates.criteria.conditions]]
type = "pattern"
name = "retry decorator"
required = true
patterns = ['@retry']

[[gates.criteria.conditions]]
type = "pattern"
name = "backoff"
required = false
patterns = ['backoff']
"#;

fn config_for(gates: &[&str]) -> HardGateConfig {
    HardGateConfig {
        gates: GateConfig {
            enabled_gates: gates.iter().map(|g| g.to_string()).collect(),
            disabled_gates: Vec::new(),
        },
        ..HardGateConfig::default()
    }
}

fn repo(files: &[(&str, &str)]) -> (RepositoryScan, MemoryFileSource) {
    let scan = RepositoryScan::from_files(
        files
            .iter()
            .map(|(path, text)| ScannedFile::new(*path, text.len() as u64))
            .collect(),
    );
    let mut source = MemoryFileSource::new();
    for (path, text) in files {
        source.insert(*path, *text);
    }
    (scan, source)
}

fn secrets_report(app_py: &str) -> ValidationReport {
    let (scan, source) = repo(&[("app.py", app_py), ("util.py", "def noop():\n    pass\n")]);
    let catalogue = GateCatalogue::builtin().unwrap();
    ValidationEngine::new(config_for(&[SECRETS])).validate(&scan, &catalogue, &source)
}

#[test]
fn test_security_gate_clean() {
    let report = secrets_report("import logging\nlogger = logging.getLogger(__name__)\nlogger.info('started')\n");
    let result = report.result(SECRETS).unwrap();
    assert!(result.is_security_gate);
    assert_eq!(result.status, GateStatus::Pass);
    assert_eq!(result.score, 100.0);
    assert_eq!(result.coverage_percentage, None);
    assert!(result.matches.is_empty());
    assert_eq!(result.evidence.files_scanned, 2);
}

#[test]
fn test_security_gate_two_violations() {
    let report = secrets_report(
        "logger.info(\"password=%s\", password)\nlogger.debug(\"token %s\", api_key)\nlogger.info('ok')\n",
    );
    let result = report.result(SECRETS).unwrap();
    assert_eq!(result.matches.len(), 2);
    assert_eq!(result.score, 60.0);
    assert_eq!(result.status, GateStatus::Fail);
    assert_eq!(result.coverage_percentage, None);
    assert_eq!(result.matches[0].line, 1);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("app.py:1")));
}

#[test]
fn test_security_gate_penalty_exceeds_base() {
    let body = "logger.info(\"password=%s\", password)\n".repeat(15);
    let report = secrets_report(&body);
    let result = report.result(SECRETS).unwrap();
    assert_eq!(result.matches.len(), 15);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.status, GateStatus::Fail);
}

#[test]
fn test_coverage_gate_with_expected_file_count() {
    let files: Vec<(String, String)> = (0..200)
        .map(|i| {
            let body = if i < 128 {
                "def run():\n    handle_errors(call)\n"
            } else {
                "def run():\n    call()\n"
            };
            (format!("src/module_{i:03}.py"), body.to_string())
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(p, b)| (p.as_str(), b.as_str())).collect();
    let (scan, source) = repo(&borrowed);

    let catalogue = GateCatalogue::from_toml_str(COVERAGE_GATE).unwrap();
    let report = ValidationEngine::default().validate(&scan, &catalogue, &source);
    let result = report.result("ERROR_HANDLING").unwrap();

    assert_eq!(result.evidence.files_matched, 128);
    assert_eq!(result.coverage_percentage, Some(80.0));
    assert_eq!(result.score, 80.0);
    assert_eq!(result.status, GateStatus::Pass);
    assert_eq!(result.confidence, Confidence::Normal);
    assert_eq!(report.overall_score, 80.0);
}

#[test]
fn test_ui_gate_skipped_on_backend_only_codebase() {
    let files: Vec<(String, &str)> = (0..40)
        .map(|i| (format!("src/main/java/Service{i}.java"), "class S {}\n"))
        .collect();
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(p, b)| (p.as_str(), *b)).collect();
    let (scan, source) = repo(&borrowed);

    let catalogue = GateCatalogue::builtin().unwrap();
    let report =
        ValidationEngine::new(config_for(&["UI_ERRORS"])).validate(&scan, &catalogue, &source);

    assert!(report.characteristics.is_backend_only);
    let result = report.result("UI_ERRORS").unwrap();
    assert!(!result.applicability.is_applicable);
    assert_eq!(result.status, GateStatus::NotApplicable);
    assert!(result.matches.is_empty());
    assert_eq!(source.reads(), 0);
    assert_eq!(report.applicability_summary.not_applicable_gates, 1);
    assert_eq!(report.overall_score, 0.0);
}

#[test]
fn test_parallel_matches_sequential() {
    let (scan, source) = repo(&[
        ("svc/app.py", "import structlog\nlog = structlog.get_logger()\nlog.info('password', password=p)\n"),
        ("svc/client.py", "@retry(wait=wait_exponential())\ndef call():\n    requests.get(url, timeout=5)\n"),
        ("web/App.tsx", "try { load() } catch (e) { toast.error(e.message) }\n"),
        ("tests/test_app.py", "def test_ok():\n    assert True\n"),
    ]);
    let catalogue = GateCatalogue::builtin().unwrap();

    let sequential = ValidationEngine::default().validate(&scan, &catalogue, &source);
    let mut parallel_config = HardGateConfig::default();
    parallel_config.scan = ScanConfig {
        parallel_gates: Some(true),
        ..ScanConfig::default()
    };
    let parallel = ValidationEngine::new(parallel_config).validate(&scan, &catalogue, &source);

    assert_eq!(sequential.results.len(), catalogue.len());
    assert_eq!(sequential.results.len(), parallel.results.len());
    for (a, b) in sequential.results.iter().zip(&parallel.results) {
        assert_eq!(a.gate_id, b.gate_id);
        assert_eq!(a.status, b.status, "{}", a.gate_id);
        assert_eq!(a.score, b.score, "{}", a.gate_id);
        assert_eq!(a.matches, b.matches, "{}", a.gate_id);
    }
    assert_eq!(sequential.overall_score, parallel.overall_score);
}

#[test]
fn test_generated_patterns_take_part() {
    let (scan, source) = repo(&[
        ("a.py", "handle_errors(x)\n"),
        ("b.py", "with error_boundary():\n    pass\n"),
        ("c.py", "pass\n"),
    ]);
    let catalogue = GateCatalogue::from_toml_str(COVERAGE_GATE).unwrap();
    let generator = PrecomputedGenerator::new().with_entry(
        "ERROR_HANDLING",
        GeneratedPatterns {
            patterns: vec![r"error_boundary\(".to_string(), r"handle_errors\(".to_string()],
            expected_coverage: None,
        },
    );
    let report = ValidationEngine::default()
        .with_generator(Arc::new(generator))
        .validate(&scan, &catalogue, &source);
    let result = report.result("ERROR_HANDLING").unwrap();

    assert_eq!(result.evidence.generated_count, 2);
    assert_eq!(result.evidence.static_count, 0, "static duplicate dropped");
    assert_eq!(result.evidence.files_matched, 2);
    assert!(result.matches.iter().all(|m| m.provenance == Provenance::Generated));
    assert!(result.degradations.is_empty());
}

struct FailingGenerator;

impl PatternGenerator for FailingGenerator {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GeneratedPatterns, GenerationError> {
        Err(GenerationError::Failed {
            gate: request.gate.id.clone(),
            message: "upstream timeout".to_string(),
        })
    }
}

#[test]
fn test_failing_generator_degrades_to_static() {
    let (scan, source) = repo(&[("a.py", "handle_errors(x)\n")]);
    let catalogue = GateCatalogue::from_toml_str(COVERAGE_GATE).unwrap();
    let report = ValidationEngine::default()
        .with_generator(Arc::new(FailingGenerator))
        .validate(&scan, &catalogue, &source);
    let result = report.result("ERROR_HANDLING").unwrap();

    assert_eq!(result.evidence.static_count, 1);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.confidence, Confidence::Reduced);
    assert!(matches!(
        result.degradations.as_slice(),
        [Degradation::GeneratedPatternsUnavailable { reason }] if reason.contains("upstream timeout")
    ));
}

#[test]
fn test_criteria_gate_statuses() {
    let catalogue = GateCatalogue::from_toml_str(CRITERIA_GATE).unwrap();

    let mut files = vec![("svc/a.py", "@retry\ndef call(): pass\n")];
    files.extend([
        ("svc/b.py", "pass\n"),
        ("svc/c.py", "pass\n"),
        ("svc/d.py", "pass\n"),
        ("svc/e.py", "pass\n"),
    ]);
    let (scan, source) = repo(&files);
    let report = ValidationEngine::default().validate(&scan, &catalogue, &source);
    let met = report.result("RETRY").unwrap();
    // 1 of 5 files is 20%, far under 70, but required conditions hold.
    assert_eq!(met.score, 20.0);
    assert_eq!(met.status, GateStatus::Warning);

    let (scan, source) = repo(&[("svc/a.py", "backoff = 2\n")]);
    let report = ValidationEngine::default().validate(&scan, &catalogue, &source);
    let unmet = report.result("RETRY").unwrap();
    assert_eq!(unmet.score, 100.0);
    assert_eq!(unmet.status, GateStatus::Fail);
    assert!(unmet
        .details
        .iter()
        .any(|d| d.contains("retry decorator")));
}

#[test]
fn test_match_limit_reduces_confidence() {
    let body = "logger.info(\"password=%s\", password)\n".repeat(10);
    let (scan, source) = repo(&[("a.py", body.as_str()), ("b.py", body.as_str())]);
    let mut config = config_for(&[SECRETS]);
    config.scan.max_matches_per_gate = Some(4);
    let catalogue = GateCatalogue::builtin().unwrap();
    let report = ValidationEngine::new(config).validate(&scan, &catalogue, &source);
    let result = report.result(SECRETS).unwrap();

    assert_eq!(result.matches.len(), 4);
    assert_eq!(result.evidence.termination.unwrap().files_unscanned, 1);
    assert_eq!(result.confidence, Confidence::Reduced);
    assert!(result
        .degradations
        .contains(&Degradation::ScanTerminated { limit: 4 }));
}

#[test]
fn test_disabled_gates_are_not_reported() {
    let (scan, source) = repo(&[("a.py", "pass\n")]);
    let catalogue = GateCatalogue::builtin().unwrap();
    let config = HardGateConfig {
        gates: GateConfig {
            enabled_gates: Vec::new(),
            disabled_gates: vec![SECRETS.to_string()],
        },
        ..HardGateConfig::default()
    };
    let report = ValidationEngine::new(config).validate(&scan, &catalogue, &source);
    assert_eq!(report.results.len(), catalogue.len() - 1);
    assert!(report.result(SECRETS).is_none());
}

#[derive(Default)]
struct Counter {
    started: AtomicUsize,
    skipped: AtomicUsize,
    evaluated: AtomicUsize,
    complete: AtomicUsize,
}

impl GateEventHandler for Counter {
    fn on_scan_started(&self, _event: &ScanStartedEvent) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }
    fn on_gate_skipped(&self, _event: &GateSkippedEvent) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
    }
    fn on_gate_evaluated(&self, _event: &GateEvaluatedEvent) {
        self.evaluated.fetch_add(1, Ordering::SeqCst);
    }
    fn on_scan_complete(&self, _event: &ScanCompleteEvent) {
        self.complete.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_lifecycle_events() {
    let files: Vec<(String, &str)> = (0..10)
        .map(|i| (format!("svc/Handler{i}.java"), "class H {}\n"))
        .collect();
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(p, b)| (p.as_str(), *b)).collect();
    let (scan, source) = repo(&borrowed);

    let counter = Arc::new(Counter::default());
    let mut events = EventDispatcher::new();
    events.register(counter.clone());

    let catalogue = GateCatalogue::builtin().unwrap();
    let report = ValidationEngine::default()
        .with_events(events)
        .validate(&scan, &catalogue, &source);

    let skipped = report.applicability_summary.not_applicable_gates;
    assert!(skipped >= 2, "UI gates skip on a Java-only repo");
    assert_eq!(counter.started.load(Ordering::SeqCst), 1);
    assert_eq!(counter.complete.load(Ordering::SeqCst), 1);
    assert_eq!(counter.skipped.load(Ordering::SeqCst), skipped);
    assert_eq!(
        counter.evaluated.load(Ordering::SeqCst),
        report.applicability_summary.applicable_gates
    );
}

#[test]
fn test_report_serializes() {
    let report = secrets_report("logger.info(\"password=%s\", password)\n");
    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let result = &value["results"][0];
    assert_eq!(result["gate_id"], SECRETS);
    assert_eq!(result["status"], "FAIL");
    assert_eq!(result["matches"][0]["provenance"], "static");
    assert!(value["pattern_cache"]["lookups"].as_u64().unwrap() > 0);
    assert_eq!(report.failed().count(), 1);
    assert_eq!(report.passed().count(), 0);
}

#[test]
fn test_scanner_payload_without_file_kind_still_scanned() {
    let leaking = "logger.info(\"password=%s\", password)\nlogger.debug(\"key %s\", api_key)\n";
    let catalogue = GateCatalogue::builtin().unwrap();

    for entry in [
        r#"{"relative_path": "app.py", "language": "python", "size": 80}"#,
        r#"{"relative_path": "app.py", "language": "python", "type": "code", "size": 80}"#,
        r#"{"relative_path": "app.py", "type": "Source Code"}"#,
    ] {
        let scan =
            RepositoryScan::from_json(&format!(r#"{{"file_list": [{entry}], "total_files": 1}}"#))
                .unwrap();
        let source = MemoryFileSource::new().with_file("app.py", leaking);
        let report =
            ValidationEngine::new(config_for(&[SECRETS])).validate(&scan, &catalogue, &source);
        let result = report.result(SECRETS).unwrap();

        assert_eq!(result.status, GateStatus::Fail, "{entry}");
        assert_eq!(result.score, 60.0, "{entry}");
        assert_eq!(result.matches.len(), 2, "{entry}");
        assert_eq!(source.reads(), 1, "{entry}");
    }
}

#[test]
fn test_exact_match_limit_keeps_normal_confidence() {
    let body = "logger.info(\"password=%s\", password)\n".repeat(4);
    let (scan, source) = repo(&[("a.py", "pass\n"), ("b.py", body.as_str())]);
    let mut config = config_for(&[SECRETS]);
    config.scan.max_matches_per_gate = Some(4);
    let catalogue = GateCatalogue::builtin().unwrap();
    let report = ValidationEngine::new(config).validate(&scan, &catalogue, &source);
    let result = report.result(SECRETS).unwrap();

    assert_eq!(result.matches.len(), 4);
    assert!(result.evidence.termination.is_none());
    assert_eq!(result.confidence, Confidence::Normal);
    assert!(result.degradations.is_empty());
}

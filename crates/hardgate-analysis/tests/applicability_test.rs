//! Tests for the gate applicability filter.

use hardgate_analysis::applicability::{
    ApplicabilityFilter, ApplicabilityRule, ApplicabilitySummary, Exclusion, Technology,
};
use hardgate_analysis::characteristics::{CodebaseCharacteristics, PrimaryTechnology};
use hardgate_analysis::gates::GateCatalogue;

fn backend_only() -> CodebaseCharacteristics {
    CodebaseCharacteristics {
        backend_share: 100.0,
        is_backend: true,
        is_backend_only: true,
        primary_technology: PrimaryTechnology::Backend,
        ..CodebaseCharacteristics::unknown()
    }
}

fn full_stack() -> CodebaseCharacteristics {
    CodebaseCharacteristics {
        backend_share: 60.0,
        frontend_share: 40.0,
        is_backend: true,
        is_frontend: true,
        is_api: true,
        primary_technology: PrimaryTechnology::Backend,
        ..CodebaseCharacteristics::unknown()
    }
}

fn ui_rule() -> ApplicabilityRule {
    ApplicabilityRule::derive("UI_ERRORS", "User Interface")
}

#[test]
fn test_ui_gate_not_applicable_on_backend_only() {
    let verdict = ApplicabilityFilter::evaluate(&ui_rule(), &backend_only());
    assert!(!verdict.is_applicable);
    assert!(!verdict.has_required);
    assert!(verdict.is_excluded);
    assert_eq!(verdict.required_technologies, vec![Technology::Frontend]);
    assert!(verdict.reason.contains("backend_only"), "{}", verdict.reason);
}

#[test]
fn test_ui_gate_applicable_with_frontend() {
    let verdict = ApplicabilityFilter::evaluate(&ui_rule(), &full_stack());
    assert!(verdict.is_applicable);
    assert!(verdict.has_required);
    assert!(!verdict.is_excluded);
}

#[test]
fn test_gate_without_requirements_always_applies() {
    let rule = ApplicabilityRule::derive("RETRY_LOGIC", "Availability");
    assert!(rule.is_unconditional());
    for ch in [backend_only(), full_stack(), CodebaseCharacteristics::unknown()] {
        assert!(ApplicabilityFilter::evaluate(&rule, &ch).is_applicable);
    }
}

#[test]
fn test_ambiguous_characteristics_are_applicable_unless_excluded() {
    let unknown = CodebaseCharacteristics::unknown();
    let verdict = ApplicabilityFilter::evaluate(&ui_rule(), &unknown);
    assert!(verdict.is_applicable);
    assert!(verdict.reason.contains("ambiguous"));

    let rule = ApplicabilityRule {
        requires: vec![Technology::Api],
        excludes: vec![Exclusion::NoApi],
    };
    let verdict = ApplicabilityFilter::evaluate(&rule, &unknown);
    assert!(!verdict.is_applicable, "explicit exclusion still holds");
}

#[test]
fn test_any_required_technology_suffices() {
    let rule = ApplicabilityRule {
        requires: vec![Technology::Frontend, Technology::Api],
        excludes: vec![],
    };
    let ch = CodebaseCharacteristics {
        is_api: true,
        ..backend_only()
    };
    assert!(ApplicabilityFilter::evaluate(&rule, &ch).is_applicable);
}

#[test]
fn test_derived_rules() {
    assert_eq!(ApplicabilityRule::derive("UI_ERROR_TOOLS", "Monitoring"), ui_rule());
    assert_eq!(ApplicabilityRule::derive("X", "UI"), ui_rule());
    assert!(ApplicabilityRule::derive("BUILD_INFO", "Build").is_unconditional());
}

#[test]
fn test_catalogue_rules_and_summary() {
    let catalogue = GateCatalogue::builtin().unwrap();
    let ch = backend_only();
    let mut summary = ApplicabilitySummary::default();
    for gate in catalogue.gates() {
        let verdict = ApplicabilityFilter::evaluate(&gate.applicability, &ch);
        summary.record(&gate.id, &gate.name, &verdict);
    }
    assert_eq!(summary.total_gates, catalogue.len());
    assert_eq!(
        summary.applicable_gates + summary.not_applicable_gates,
        summary.total_gates
    );
    let skipped: Vec<&str> = summary.not_applicable.iter().map(|g| g.gate_id.as_str()).collect();
    assert!(skipped.contains(&"UI_ERRORS"));
    assert!(skipped.contains(&"UI_ERROR_TOOLS"));
    assert!(skipped.contains(&"HTTP_CODES"), "no API markers");
    assert!(!skipped.contains(&"RETRY_LOGIC"));
}

//! Applicability rule and verdict types.

use serde::{Deserialize, Serialize};

use crate::characteristics::CodebaseCharacteristics;

/// A technology facet a gate may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    Frontend,
    Backend,
    Api,
    Infra,
}

impl Technology {
    /// True when the facet is present in `characteristics`.
    pub fn is_present(&self, characteristics: &CodebaseCharacteristics) -> bool {
        match self {
            Self::Frontend => characteristics.is_frontend,
            Self::Backend => characteristics.is_backend,
            Self::Api => characteristics.is_api,
            Self::Infra => characteristics.is_infra,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Api => "api",
            Self::Infra => "infra",
        }
    }
}

/// A condition under which a gate is excluded outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    /// Backend codebase with no meaningful frontend share.
    BackendOnly,
    /// Frontend codebase without a backend facet.
    FrontendOnly,
    /// No API or route markers anywhere in the repository.
    NoApi,
}

impl Exclusion {
    pub fn holds(&self, characteristics: &CodebaseCharacteristics) -> bool {
        match self {
            Self::BackendOnly => characteristics.is_backend_only && !characteristics.is_frontend,
            Self::FrontendOnly => characteristics.is_frontend && !characteristics.is_backend,
            Self::NoApi => !characteristics.is_api,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BackendOnly => "backend_only",
            Self::FrontendOnly => "frontend_only",
            Self::NoApi => "no_api",
        }
    }
}

/// Required and excluded technologies for one gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicabilityRule {
    pub requires: Vec<Technology>,
    pub excludes: Vec<Exclusion>,
}

impl ApplicabilityRule {
    /// Rule implied by a gate's category when the catalogue declares none.
    /// UI-facing gates require a frontend and are excluded on backend-only
    /// codebases; every other category is unconditional.
    pub fn derive(gate_id: &str, category: &str) -> Self {
        let category = category.trim().to_ascii_lowercase();
        let ui_facing = gate_id.starts_with("UI_")
            || category == "ui"
            || category.contains("user interface")
            || category.contains("frontend");
        if ui_facing {
            Self {
                requires: vec![Technology::Frontend],
                excludes: vec![Exclusion::BackendOnly],
            }
        } else {
            Self::default()
        }
    }

    pub fn is_unconditional(&self) -> bool {
        self.requires.is_empty() && self.excludes.is_empty()
    }
}

/// Outcome of the applicability check for one gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicabilityVerdict {
    pub is_applicable: bool,
    pub reason: String,
    pub required_technologies: Vec<Technology>,
    pub has_required: bool,
    pub is_excluded: bool,
}

/// One non-applicable gate, as listed in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotApplicableGate {
    pub gate_id: String,
    pub gate_name: String,
    pub reason: String,
}

/// Applicability totals for the report layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicabilitySummary {
    pub total_gates: usize,
    pub applicable_gates: usize,
    pub not_applicable_gates: usize,
    pub not_applicable: Vec<NotApplicableGate>,
}

impl ApplicabilitySummary {
    pub fn record(&mut self, gate_id: &str, gate_name: &str, verdict: &ApplicabilityVerdict) {
        self.total_gates += 1;
        if verdict.is_applicable {
            self.applicable_gates += 1;
        } else {
            self.not_applicable_gates += 1;
            self.not_applicable.push(NotApplicableGate {
                gate_id: gate_id.to_string(),
                gate_name: gate_name.to_string(),
                reason: verdict.reason.clone(),
            });
        }
    }
}

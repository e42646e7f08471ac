//! Gate catalogue: loads and validates versioned gate documents.
//!
//! Accepts TOML or JSON with the same shape. Malformed input is the one
//! error the engine surfaces to its caller; everything downstream works on
//! validated `Gate` values.

use std::collections::BTreeMap;
use std::path::Path;

use hardgate_core::errors::CatalogueError;
use hardgate_core::types::FxHashMap;
use serde::Deserialize;

use super::types::{
    invalid, CoveragePolicy, CriteriaGroup, CriteriaNode, ExpectedCoverage, Gate, Operator,
    PatternCondition, PatternSet, Priority, ScoringPolicy, SecurityPolicy, ViolationCount,
    WeightedPattern,
};
use crate::applicability::ApplicabilityRule;
use crate::scanner::FileKind;

/// Highest catalogue major version this build understands.
pub const SUPPORTED_CATALOGUE_MAJOR: u32 = 1;

const BUILTIN_CATALOGUE: &str = include_str!("hard_gates.toml");

// ---- raw document shape ----

#[derive(Debug, Deserialize)]
struct CatalogueDocument {
    version: RawVersion,
    #[serde(default)]
    gates: Vec<GateRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Text(String),
    Integer(u64),
    Float(f64),
}

impl RawVersion {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GateRecord {
    id: String,
    name: Option<String>,
    #[serde(default)]
    category: String,
    #[serde(default)]
    priority: Priority,
    description: Option<String>,
    #[serde(default)]
    patterns: BTreeMap<String, Vec<String>>,
    criteria: Option<CriteriaGroupRecord>,
    expected_coverage: Option<ExpectedCoverage>,
    #[serde(default)]
    scoring: ScoringRecord,
    applicability: Option<ApplicabilityRule>,
    file_types: Option<Vec<FileKind>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScoringRecord {
    is_security_gate: bool,
    pass_threshold: Option<f64>,
    base_score: Option<f64>,
    violation_penalty: Option<f64>,
    max_penalty: Option<f64>,
    bonus_for_clean: Option<f64>,
    count_by: Option<ViolationCount>,
}

#[derive(Debug, Deserialize)]
struct CriteriaGroupRecord {
    name: Option<String>,
    #[serde(default)]
    operator: Operator,
    #[serde(default = "unit_weight")]
    weight: f64,
    required: Option<bool>,
    #[serde(default)]
    conditions: Vec<CriteriaNodeRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum CriteriaNodeRecord {
    Pattern(PatternConditionRecord),
    Criteria(CriteriaGroupRecord),
}

#[derive(Debug, Deserialize)]
struct PatternConditionRecord {
    name: Option<String>,
    #[serde(default)]
    operator: Operator,
    #[serde(default = "unit_weight")]
    weight: f64,
    required: Option<bool>,
    #[serde(default)]
    patterns: Vec<PatternEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternEntry {
    Plain(String),
    Weighted {
        pattern: String,
        #[serde(default = "unit_weight")]
        weight: f64,
    },
}

fn unit_weight() -> f64 {
    1.0
}

// ---- validated catalogue ----

/// An ordered, validated set of gates.
#[derive(Debug, Clone)]
pub struct GateCatalogue {
    version: String,
    gates: Vec<Gate>,
    index: FxHashMap<String, usize>,
}

impl GateCatalogue {
    /// The embedded default catalogue of hard gates.
    pub fn builtin() -> Result<Self, CatalogueError> {
        Self::parse_toml(BUILTIN_CATALOGUE, "<builtin>")
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogueError> {
        Self::parse_toml(content, "<string>")
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogueError> {
        Self::parse_json(content, "<string>")
    }

    /// Load from disk. `.json` files are parsed as JSON, everything else as TOML.
    pub fn load(path: &Path) -> Result<Self, CatalogueError> {
        let content = std::fs::read_to_string(path).map_err(|_| CatalogueError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let label = path.display().to_string();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let catalogue = if is_json {
            Self::parse_json(&content, &label)?
        } else {
            Self::parse_toml(&content, &label)?
        };
        tracing::info!(path = %label, gates = catalogue.len(), "gate catalogue loaded");
        Ok(catalogue)
    }

    /// Build from already-typed gates, enforcing id uniqueness.
    pub fn from_gates(version: impl Into<String>, gates: Vec<Gate>) -> Result<Self, CatalogueError> {
        let version = version.into();
        check_version(&version)?;
        let mut index = FxHashMap::default();
        for (i, gate) in gates.iter().enumerate() {
            if gate.id.trim().is_empty() {
                return Err(invalid(&gate.id, "gate id must not be empty"));
            }
            if index.insert(gate.id.clone(), i).is_some() {
                return Err(CatalogueError::DuplicateGate(gate.id.clone()));
            }
        }
        Ok(Self {
            version,
            gates,
            index,
        })
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn get(&self, id: &str) -> Option<&Gate> {
        self.index.get(id).map(|&i| &self.gates[i])
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn parse_toml(content: &str, label: &str) -> Result<Self, CatalogueError> {
        let doc: CatalogueDocument = toml::from_str(content).map_err(|e| CatalogueError::ParseError {
            path: label.to_string(),
            message: e.to_string(),
        })?;
        Self::from_document(doc)
    }

    fn parse_json(content: &str, label: &str) -> Result<Self, CatalogueError> {
        let doc: CatalogueDocument =
            serde_json::from_str(content).map_err(|e| CatalogueError::ParseError {
                path: label.to_string(),
                message: e.to_string(),
            })?;
        Self::from_document(doc)
    }

    fn from_document(doc: CatalogueDocument) -> Result<Self, CatalogueError> {
        let version = doc.version.into_string();
        check_version(&version)?;
        let gates = doc
            .gates
            .into_iter()
            .map(build_gate)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_gates(version, gates)
    }
}

fn check_version(version: &str) -> Result<(), CatalogueError> {
    let major = version
        .trim()
        .trim_start_matches('v')
        .split('.')
        .next()
        .and_then(|m| m.parse::<u32>().ok());
    match major {
        Some(m) if (1..=SUPPORTED_CATALOGUE_MAJOR).contains(&m) => Ok(()),
        _ => Err(CatalogueError::UnsupportedVersion {
            found: version.to_string(),
            supported: SUPPORTED_CATALOGUE_MAJOR,
        }),
    }
}

fn build_gate(record: GateRecord) -> Result<Gate, CatalogueError> {
    let id = record.id.trim().to_string();
    if id.is_empty() {
        return Err(invalid("<unnamed>", "gate id must not be empty"));
    }

    let patterns = PatternSet::from_raw(&id, &record.patterns)?;
    if let Some(pattern) = patterns.all().find(|p| p.trim().is_empty()) {
        return Err(invalid(&id, format!("blank pattern '{pattern}'")));
    }

    if let Some(coverage) = &record.expected_coverage {
        coverage.validate(&id)?;
    }

    let policy = build_policy(&id, &record.scoring)?;

    let criteria = record
        .criteria
        .map(|root| build_group(&id, root, &id, true))
        .transpose()?;

    let file_types = record.file_types.unwrap_or_else(|| vec![FileKind::Source]);
    if file_types.is_empty() {
        return Err(invalid(&id, "file_types must not be empty"));
    }

    let applicability = record
        .applicability
        .unwrap_or_else(|| ApplicabilityRule::derive(&id, &record.category));

    Ok(Gate {
        name: record.name.unwrap_or_else(|| id.clone()),
        id,
        category: record.category,
        priority: record.priority,
        description: record.description,
        patterns,
        criteria,
        expected_coverage: record.expected_coverage,
        policy,
        applicability,
        file_types,
    })
}

fn build_policy(id: &str, scoring: &ScoringRecord) -> Result<ScoringPolicy, CatalogueError> {
    if !scoring.is_security_gate {
        let security_fields = [
            ("base_score", scoring.base_score.is_some()),
            ("violation_penalty", scoring.violation_penalty.is_some()),
            ("max_penalty", scoring.max_penalty.is_some()),
            ("bonus_for_clean", scoring.bonus_for_clean.is_some()),
            ("count_by", scoring.count_by.is_some()),
        ];
        if let Some((field, _)) = security_fields.iter().find(|(_, set)| *set) {
            return Err(invalid(id, format!("scoring.{field} requires is_security_gate = true")));
        }
        if let Some(t) = scoring.pass_threshold {
            if !(0.0..=100.0).contains(&t) {
                return Err(invalid(id, "scoring.pass_threshold must be between 0 and 100"));
            }
        }
        return Ok(ScoringPolicy::Coverage(CoveragePolicy {
            pass_threshold: scoring.pass_threshold,
        }));
    }

    if scoring.pass_threshold.is_some() {
        return Err(invalid(id, "scoring.pass_threshold does not apply to security gates"));
    }
    let defaults = SecurityPolicy::default();
    let base_score = scoring.base_score.unwrap_or(defaults.base_score);
    let policy = SecurityPolicy {
        base_score,
        violation_penalty: scoring.violation_penalty.unwrap_or(defaults.violation_penalty),
        max_penalty: scoring.max_penalty.unwrap_or(base_score),
        bonus_for_clean: scoring.bonus_for_clean.unwrap_or(defaults.bonus_for_clean),
        count: scoring.count_by.unwrap_or_default(),
    };
    if !(0.0..=100.0).contains(&policy.base_score) {
        return Err(invalid(id, "scoring.base_score must be between 0 and 100"));
    }
    for (field, value) in [
        ("violation_penalty", policy.violation_penalty),
        ("max_penalty", policy.max_penalty),
        ("bonus_for_clean", policy.bonus_for_clean),
    ] {
        if value < 0.0 || !value.is_finite() {
            return Err(invalid(id, format!("scoring.{field} must be a non-negative number")));
        }
    }
    Ok(ScoringPolicy::Security(policy))
}

fn check_weight(gate_id: &str, node: &str, weight: f64) -> Result<(), CatalogueError> {
    if weight < 0.0 || !weight.is_finite() {
        return Err(invalid(gate_id, format!("criteria node '{node}' has a negative weight")));
    }
    Ok(())
}

fn build_group(
    gate_id: &str,
    record: CriteriaGroupRecord,
    default_name: &str,
    is_root: bool,
) -> Result<CriteriaGroup, CatalogueError> {
    let name = record.name.unwrap_or_else(|| default_name.to_string());
    check_weight(gate_id, &name, record.weight)?;
    let required = match (record.required, is_root) {
        (Some(required), _) => required,
        (None, true) => true,
        (None, false) => {
            return Err(invalid(
                gate_id,
                format!("criteria node '{name}' is missing the mandatory `required` field"),
            ))
        }
    };

    let mut conditions = Vec::with_capacity(record.conditions.len());
    for (i, node) in record.conditions.into_iter().enumerate() {
        let child_default = format!("{name}.{}", i + 1);
        let built = match node {
            CriteriaNodeRecord::Pattern(leaf) => {
                CriteriaNode::Pattern(build_leaf(gate_id, leaf, &child_default)?)
            }
            CriteriaNodeRecord::Criteria(group) => {
                CriteriaNode::Criteria(build_group(gate_id, group, &child_default, false)?)
            }
        };
        conditions.push(built);
    }

    Ok(CriteriaGroup {
        name,
        operator: record.operator,
        weight: record.weight,
        required,
        conditions,
    })
}

fn build_leaf(
    gate_id: &str,
    record: PatternConditionRecord,
    default_name: &str,
) -> Result<PatternCondition, CatalogueError> {
    let name = record.name.unwrap_or_else(|| default_name.to_string());
    check_weight(gate_id, &name, record.weight)?;
    let required = record.required.ok_or_else(|| {
        invalid(
            gate_id,
            format!("criteria node '{name}' is missing the mandatory `required` field"),
        )
    })?;

    let patterns: Vec<WeightedPattern> = record
        .patterns
        .into_iter()
        .map(|entry| match entry {
            PatternEntry::Plain(pattern) => WeightedPattern {
                pattern,
                weight: 1.0,
            },
            PatternEntry::Weighted { pattern, weight } => WeightedPattern { pattern, weight },
        })
        .collect();

    if patterns.iter().all(|p| p.pattern.trim().is_empty()) {
        return Err(invalid(gate_id, format!("pattern condition '{name}' has no patterns")));
    }
    for p in &patterns {
        check_weight(gate_id, &name, p.weight)?;
    }

    Ok(PatternCondition {
        name,
        operator: record.operator,
        weight: record.weight,
        required,
        patterns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogue_loads() {
        let catalogue = GateCatalogue::builtin().unwrap();
        assert_eq!(catalogue.len(), 15);
        assert!(catalogue.get("AVOID_LOGGING_SECRETS").unwrap().is_security_gate());
    }

    #[test]
    fn version_major_checked() {
        assert!(check_version("1.4").is_ok());
        assert!(check_version("1").is_ok());
        assert!(check_version("2.0").is_err());
        assert!(check_version("zero").is_err());
    }
}

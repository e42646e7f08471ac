//! Generated-pattern seam.
//!
//! The transport-level model client lives outside this crate. The engine
//! only sees a `PatternGenerator`; `PrecomputedGenerator` serves cached
//! generator output loaded from JSON.

use std::collections::BTreeSet;
use std::path::Path;

use hardgate_core::errors::GenerationError;
use hardgate_core::types::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::characteristics::CodebaseCharacteristics;
use crate::gates::{ExpectedCoverage, Gate};
use crate::scanner::Language;

/// What the generator is asked for.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub gate: &'a Gate,
    /// Languages among the gate's relevant files.
    pub languages: &'a BTreeSet<Language>,
    pub characteristics: &'a CodebaseCharacteristics,
}

/// Candidate patterns for one gate. A present `expected_coverage`
/// replaces the catalogue's estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPatterns {
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub expected_coverage: Option<ExpectedCoverage>,
}

pub trait PatternGenerator: Send + Sync {
    fn generate(&self, request: &GenerationRequest<'_>)
        -> Result<GeneratedPatterns, GenerationError>;
}

/// Generator backed by a fixed gate-id -> patterns table.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedGenerator {
    entries: FxHashMap<String, GeneratedPatterns>,
}

impl PrecomputedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, gate_id: impl Into<String>, patterns: GeneratedPatterns) -> Self {
        self.insert(gate_id, patterns);
        self
    }

    pub fn insert(&mut self, gate_id: impl Into<String>, patterns: GeneratedPatterns) {
        self.entries.insert(gate_id.into(), patterns);
    }

    /// Parse `{ "<gate id>": { "patterns": [...], "expected_coverage": {...} } }`.
    pub fn from_json_str(json: &str) -> Result<Self, GenerationError> {
        let entries: FxHashMap<String, GeneratedPatterns> =
            serde_json::from_str(json).map_err(|e| GenerationError::Malformed(e.to_string()))?;
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GenerationError::Malformed(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PatternGenerator for PrecomputedGenerator {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GeneratedPatterns, GenerationError> {
        self.entries
            .get(&request.gate.id)
            .cloned()
            .ok_or_else(|| GenerationError::Unavailable {
                gate: request.gate.id.clone(),
            })
    }
}

//! Static pattern library: built-in per-gate, per-language regexes.
//!
//! Seeded from the gate catalogue and extendable with additional TOML
//! documents in the same `[[gates]]` layout, so deployments can ship extra
//! patterns without rebuilding.

use std::collections::{BTreeMap, BTreeSet};

use hardgate_core::errors::CatalogueError;
use hardgate_core::types::FxHashMap;
use serde::Deserialize;

use crate::gates::{GateCatalogue, PatternSet};
use crate::scanner::Language;

#[derive(Debug, Deserialize)]
struct LibraryDocument {
    #[serde(default)]
    gates: Vec<LibraryEntry>,
}

#[derive(Debug, Deserialize)]
struct LibraryEntry {
    id: String,
    #[serde(default)]
    patterns: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct StaticPatternLibrary {
    gates: FxHashMap<String, PatternSet>,
}

impl StaticPatternLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalogue(catalogue: &GateCatalogue) -> Self {
        let gates = catalogue
            .gates()
            .iter()
            .filter(|g| !g.patterns.is_empty())
            .map(|g| (g.id.clone(), g.patterns.clone()))
            .collect();
        Self { gates }
    }

    /// Merge another library document. Returns the number of gates touched.
    pub fn extend_from_toml_str(&mut self, content: &str) -> Result<usize, CatalogueError> {
        let doc: LibraryDocument = toml::from_str(content).map_err(|e| CatalogueError::ParseError {
            path: "<pattern library>".to_string(),
            message: e.to_string(),
        })?;
        let touched = doc.gates.len();
        for entry in doc.gates {
            let set = PatternSet::from_raw(&entry.id, &entry.patterns)?;
            self.insert(entry.id, set);
        }
        Ok(touched)
    }

    pub fn insert(&mut self, gate_id: impl Into<String>, patterns: PatternSet) {
        self.gates.entry(gate_id.into()).or_default().merge(patterns);
    }

    /// Common patterns, then language-specific ones in language order.
    pub fn patterns_for(&self, gate_id: &str, languages: &BTreeSet<Language>) -> Vec<String> {
        self.gates
            .get(gate_id)
            .map(|set| set.for_languages(languages))
            .unwrap_or_default()
    }

    pub fn get(&self, gate_id: &str) -> Option<&PatternSet> {
        self.gates.get(gate_id)
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Every pattern in the library, for cache warming.
    pub fn all_patterns(&self) -> impl Iterator<Item = &str> {
        self.gates.values().flat_map(|set| set.all())
    }
}

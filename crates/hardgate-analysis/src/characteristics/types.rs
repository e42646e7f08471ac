//! Characteristics snapshot types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::scanner::Language;

/// The dominant technology facet of a codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryTechnology {
    Backend,
    Frontend,
    Infra,
    Unknown,
}

impl PrimaryTechnology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Frontend => "frontend",
            Self::Infra => "infra",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PrimaryTechnology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived, read-only view of a scanned repository's technology mix.
/// Computed fresh per scan; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodebaseCharacteristics {
    pub languages: BTreeSet<Language>,
    /// Percent of files in frontend languages.
    pub frontend_share: f64,
    /// Percent of files in backend languages.
    pub backend_share: f64,
    /// Percent of files in infrastructure descriptors.
    pub infra_share: f64,
    pub is_frontend: bool,
    pub is_backend: bool,
    pub is_api: bool,
    pub is_backend_only: bool,
    pub is_infra: bool,
    pub primary_technology: PrimaryTechnology,
}

impl CodebaseCharacteristics {
    /// The record produced for absent or empty metadata.
    pub fn unknown() -> Self {
        Self {
            languages: BTreeSet::new(),
            frontend_share: 0.0,
            backend_share: 0.0,
            infra_share: 0.0,
            is_frontend: false,
            is_backend: false,
            is_api: false,
            is_backend_only: false,
            is_infra: false,
            primary_technology: PrimaryTechnology::Unknown,
        }
    }

    /// True when no primary technology could be determined.
    pub fn is_ambiguous(&self) -> bool {
        self.primary_technology == PrimaryTechnology::Unknown
    }
}

impl Default for CodebaseCharacteristics {
    fn default() -> Self {
        Self::unknown()
    }
}

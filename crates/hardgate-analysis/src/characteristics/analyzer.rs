//! Characteristics analyzer: language shares → technology facets.

use std::collections::BTreeSet;

use hardgate_core::config::CharacteristicsConfig;

use super::types::{CodebaseCharacteristics, PrimaryTechnology};
use crate::scanner::{LanguageFamily, RepositoryScan};

/// Classifies a repository into frontend/backend/API/infra facets.
#[derive(Debug, Clone)]
pub struct CharacteristicsAnalyzer {
    frontend_threshold: f64,
    backend_threshold: f64,
    min_presence_threshold: f64,
}

impl CharacteristicsAnalyzer {
    pub fn new(config: &CharacteristicsConfig) -> Self {
        Self {
            frontend_threshold: config.effective_frontend_threshold(),
            backend_threshold: config.effective_backend_threshold(),
            min_presence_threshold: config.effective_min_presence_threshold(),
        }
    }

    /// Derive characteristics from the scan's language histogram and markers.
    ///
    /// Shares are percentages of the total file count. Zero metadata yields
    /// `CodebaseCharacteristics::unknown()` (API markers still apply).
    pub fn analyze(&self, scan: &RepositoryScan) -> CodebaseCharacteristics {
        let mut frontend_files = 0usize;
        let mut backend_files = 0usize;
        let mut infra_files = 0usize;
        let mut counted_files = 0usize;
        let mut languages = BTreeSet::new();

        for (language, stats) in &scan.language_stats {
            if stats.files == 0 {
                continue;
            }
            languages.insert(*language);
            counted_files += stats.files;
            match language.family() {
                LanguageFamily::Frontend => frontend_files += stats.files,
                LanguageFamily::Backend => backend_files += stats.files,
                LanguageFamily::Infra => infra_files += stats.files,
                LanguageFamily::Other => {}
            }
        }

        let is_api = !scan.markers.is_empty();
        let total = scan.effective_total_files().max(counted_files);
        if total == 0 {
            return CodebaseCharacteristics {
                is_api,
                ..CodebaseCharacteristics::unknown()
            };
        }

        let share = |files: usize| files as f64 * 100.0 / total as f64;
        let frontend_share = share(frontend_files);
        let backend_share = share(backend_files);
        let infra_share = share(infra_files);

        let is_frontend = frontend_share > self.frontend_threshold;
        let is_backend = backend_share > self.backend_threshold;
        let is_backend_only = is_backend && frontend_share < self.min_presence_threshold;
        let is_infra = infra_share >= self.min_presence_threshold && infra_files > 0;

        CodebaseCharacteristics {
            languages,
            frontend_share,
            backend_share,
            infra_share,
            is_frontend,
            is_backend,
            is_api,
            is_backend_only,
            is_infra,
            primary_technology: primary_technology(backend_share, frontend_share, infra_share),
        }
    }
}

impl Default for CharacteristicsAnalyzer {
    fn default() -> Self {
        Self::new(&CharacteristicsConfig::default())
    }
}

/// Largest share wins; ties resolve backend, then frontend, then infra.
fn primary_technology(backend: f64, frontend: f64, infra: f64) -> PrimaryTechnology {
    if backend <= 0.0 && frontend <= 0.0 && infra <= 0.0 {
        return PrimaryTechnology::Unknown;
    }
    if backend >= frontend && backend >= infra {
        PrimaryTechnology::Backend
    } else if frontend >= infra {
        PrimaryTechnology::Frontend
    } else {
        PrimaryTechnology::Infra
    }
}

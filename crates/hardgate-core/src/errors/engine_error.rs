//! Top-level engine errors.

use super::{CatalogueError, ConfigError, FileReadError, HardGateErrorCode};

/// The errors that may escape a validation run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The repository root itself could not be walked.
    #[error("Repository scan error: {0}")]
    Scan(#[from] FileReadError),
}

impl HardGateErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Catalogue(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Scan(e) => e.error_code(),
        }
    }
}

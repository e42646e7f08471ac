//! Gate catalogue errors.

use super::error_code::{self, HardGateErrorCode};

/// Errors raised while loading or validating a gate catalogue.
///
/// A malformed catalogue is a deployment defect and is the one error
/// class the engine surfaces to its caller.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("Catalogue file not found: {path}")]
    FileNotFound { path: String },

    #[error("Catalogue parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Unsupported catalogue version {found} (supported major: {supported})")]
    UnsupportedVersion { found: String, supported: u32 },

    #[error("Duplicate gate id: {0}")]
    DuplicateGate(String),

    #[error("Invalid gate {gate}: {message}")]
    InvalidGate { gate: String, message: String },

    #[error("Unknown language '{language}' in gate {gate}")]
    UnknownLanguage { gate: String, language: String },
}

impl HardGateErrorCode for CatalogueError {
    fn error_code(&self) -> &'static str {
        error_code::CATALOGUE_ERROR
    }
}

//! Pattern generator errors.

use super::error_code::{self, HardGateErrorCode};

/// The generated-pattern source could not supply patterns for a gate.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("No generated patterns available for gate {gate}")]
    Unavailable { gate: String },

    #[error("Pattern generator failed for gate {gate}: {message}")]
    Failed { gate: String, message: String },

    #[error("Malformed generator output: {0}")]
    Malformed(String),
}

impl HardGateErrorCode for GenerationError {
    fn error_code(&self) -> &'static str {
        error_code::PATTERN_SOURCE_UNAVAILABLE
    }
}

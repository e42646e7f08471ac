//! Pattern compilation errors.

use super::error_code::{self, HardGateErrorCode};

/// A single regular expression failed to compile.
///
/// `Clone` so that negative results can live in the pattern cache.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Pattern '{pattern}' failed to compile: {message}")]
pub struct PatternCompileError {
    pub pattern: String,
    pub message: String,
}

impl PatternCompileError {
    pub fn new(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl HardGateErrorCode for PatternCompileError {
    fn error_code(&self) -> &'static str {
        error_code::PATTERN_COMPILE_ERROR
    }
}

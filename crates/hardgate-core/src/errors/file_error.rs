//! File access errors.

use super::error_code::{self, HardGateErrorCode};

/// Errors that can occur while reading a scanned file.
#[derive(Debug, thiserror::Error)]
pub enum FileReadError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Path escapes the repository root: {path}")]
    OutsideRoot { path: String },
}

impl FileReadError {
    /// The relative path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path } | Self::Io { path, .. } | Self::OutsideRoot { path } => path,
        }
    }
}

impl HardGateErrorCode for FileReadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::FILE_NOT_FOUND,
            _ => error_code::FILE_READ_ERROR,
        }
    }
}

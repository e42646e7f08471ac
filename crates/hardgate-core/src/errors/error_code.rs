//! HardGateErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to provide a structured error code
/// string for the report layer.
pub trait HardGateErrorCode {
    /// Returns the error code string (e.g., "CATALOGUE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the tagged error string: `[ERROR_CODE] message`.
    fn tagged_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CATALOGUE_ERROR: &str = "CATALOGUE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PATTERN_COMPILE_ERROR: &str = "PATTERN_COMPILE_ERROR";
pub const FILE_READ_ERROR: &str = "FILE_READ_ERROR";
pub const FILE_NOT_FOUND: &str = "FILE_NOT_FOUND";
pub const PATTERN_SOURCE_UNAVAILABLE: &str = "PATTERN_SOURCE_UNAVAILABLE";

//! Error handling for hardgate.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! Only `CatalogueError`, `ConfigError`, and an unreadable repository root
//! escape the engine. Per-pattern, per-file, and per-generator errors are
//! recorded as degradations on the affected gate result and never abort a
//! scan.

pub mod catalogue_error;
pub mod config_error;
pub mod engine_error;
pub mod error_code;
pub mod file_error;
pub mod generation_error;
pub mod pattern_error;

pub use catalogue_error::CatalogueError;
pub use config_error::ConfigError;
pub use engine_error::EngineError;
pub use error_code::HardGateErrorCode;
pub use file_error::FileReadError;
pub use generation_error::GenerationError;
pub use pattern_error::PatternCompileError;

//! Validation engine: the typed pipeline tying the stages together.

pub mod context;
pub mod generator;
pub mod pipeline;
pub mod report;

pub use context::ScanContext;
pub use generator::{GeneratedPatterns, GenerationRequest, PatternGenerator, PrecomputedGenerator};
pub use pipeline::ValidationEngine;
pub use report::ValidationReport;

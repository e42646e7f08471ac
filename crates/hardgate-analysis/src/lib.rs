//! hardgate-analysis: the gate validation and scoring engine.
//!
//! Evaluates a scanned codebase against a catalogue of hard gates:
//! characteristics -> applicability -> pattern aggregation -> criteria
//! evaluation -> scoring.
//!
//! - `scanner`: repository snapshot types, file sources, directory walker
//! - `characteristics`: technology facets of a codebase
//! - `applicability`: APPLICABLE / NOT_APPLICABLE decisions
//! - `patterns`: compiled-pattern cache, static library, aggregator
//! - `gates`: gate model, catalogue, evaluator, scorer
//! - `engine`: `ValidationEngine` and the pattern generator seam

pub mod applicability;
pub mod characteristics;
pub mod engine;
pub mod gates;
pub mod patterns;
pub mod scanner;

pub use engine::{ValidationEngine, ValidationReport};
pub use gates::{GateCatalogue, GateResult, GateStatus};

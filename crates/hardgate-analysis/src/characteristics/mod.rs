//! Codebase characteristics: technology facets derived from the language
//! histogram and API markers of a scan.

pub mod analyzer;
pub mod types;

pub use analyzer::CharacteristicsAnalyzer;
pub use types::{CodebaseCharacteristics, PrimaryTechnology};

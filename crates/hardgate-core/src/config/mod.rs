//! Configuration system for hardgate.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod characteristics_config;
pub mod gate_config;
pub mod hardgate_config;
pub mod pattern_config;
pub mod scan_config;
pub mod scoring_config;

pub use characteristics_config::CharacteristicsConfig;
pub use gate_config::GateConfig;
pub use hardgate_config::{ConfigOverrides, HardGateConfig};
pub use pattern_config::PatternConfig;
pub use scan_config::ScanConfig;
pub use scoring_config::ScoringConfig;

//! hardgate-core: errors, configuration, events, and tracing shared by the
//! hardgate validation engine.
//!
//! - Errors: one `thiserror` enum per subsystem, each carrying a stable code
//! - Config: TOML-based, layered resolution (overrides > env > project > user > defaults)
//! - Events: synchronous dispatcher for gate lifecycle notifications
//! - Tracing: `HARDGATE_LOG`-driven `EnvFilter` setup

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod types;

pub use config::HardGateConfig;
pub use errors::{EngineError, HardGateErrorCode};

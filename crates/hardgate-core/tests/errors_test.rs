//! Tests for the hardgate error taxonomy.

use hardgate_core::errors::*;

#[test]
fn test_every_error_has_a_code() {
    let catalogue = CatalogueError::DuplicateGate("X".into());
    assert_eq!(catalogue.error_code(), "CATALOGUE_ERROR");

    let config = ConfigError::FileNotFound { path: "/tmp".into() };
    assert_eq!(config.error_code(), "CONFIG_ERROR");

    let pattern = PatternCompileError::new("(", "unclosed group");
    assert_eq!(pattern.error_code(), "PATTERN_COMPILE_ERROR");

    let missing = FileReadError::NotFound { path: "a.rs".into() };
    assert_eq!(missing.error_code(), "FILE_NOT_FOUND");

    let io = FileReadError::Io {
        path: "b.rs".into(),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    assert_eq!(io.error_code(), "FILE_READ_ERROR");
    assert_eq!(io.path(), "b.rs");

    let generation = GenerationError::Unavailable { gate: "G".into() };
    assert_eq!(generation.error_code(), "PATTERN_SOURCE_UNAVAILABLE");
}

#[test]
fn test_engine_error_delegates_codes() {
    let engine: EngineError = CatalogueError::DuplicateGate("X".into()).into();
    assert_eq!(engine.error_code(), "CATALOGUE_ERROR");

    let engine: EngineError = ConfigError::ValidationFailed {
        field: "f".into(),
        message: "m".into(),
    }
    .into();
    assert_eq!(engine.error_code(), "CONFIG_ERROR");

    let engine: EngineError = FileReadError::NotFound { path: "repo".into() }.into();
    assert_eq!(engine.error_code(), "FILE_NOT_FOUND");
}

#[test]
fn test_tagged_string_format() {
    let err = CatalogueError::UnknownLanguage {
        gate: "STRUCTURED_LOGS".into(),
        language: "cobol".into(),
    };
    assert_eq!(
        err.tagged_string(),
        "[CATALOGUE_ERROR] Unknown language 'cobol' in gate STRUCTURED_LOGS"
    );
}

#[test]
fn test_pattern_error_is_cloneable() {
    let err = PatternCompileError::new("[a-", "unterminated class");
    let copy = err.clone();
    assert_eq!(err, copy);
    assert!(copy.to_string().contains("[a-"));
}

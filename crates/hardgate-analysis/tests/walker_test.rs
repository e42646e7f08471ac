//! Tests for the filesystem walker and directory validation.

use std::fs;
use std::path::Path;

use hardgate_analysis::gates::{GateCatalogue, GateStatus};
use hardgate_analysis::scanner::{walk_repository, FileKind, Language, RepoMarker};
use hardgate_analysis::ValidationEngine;
use hardgate_core::config::ScanConfig;
use hardgate_core::errors::FileReadError;
use hardgate_core::{EngineError, HardGateConfig};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, ".gitignore", "build/\n*.log\n");
    write(root, "src/app.py", "import logging\n\nlogger = logging.getLogger(__name__)\n");
    write(root, "src/controllers/user_controller.py", "def get_user():\n    return {}\n");
    write(root, "tests/test_app.py", "def test_ok():\n    assert True\n");
    write(root, "web/App.tsx", "export const App = () => null;");
    write(root, "build/out.py", "generated = True\n");
    write(root, "debug.log", "noise\n");
    write(root, "vendor/lib.py", "x = 1\n");
    dir
}

#[test]
fn test_walk_honours_gitignore() {
    let dir = fixture();
    let scan = walk_repository(dir.path(), &ScanConfig::default()).unwrap();

    let paths: Vec<&str> = scan.files.iter().map(|f| f.relative_path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "src/app.py",
            "src/controllers/user_controller.py",
            "tests/test_app.py",
            "vendor/lib.py",
            "web/App.tsx",
        ]
    );
    assert_eq!(scan.total_files, 5);
}

#[test]
fn test_walk_extra_ignore() {
    let dir = fixture();
    let config = ScanConfig {
        extra_ignore: vec!["vendor/**".to_string()],
        ..ScanConfig::default()
    };
    let scan = walk_repository(dir.path(), &config).unwrap();
    let listed = |path: &str| scan.files.iter().any(|f| f.relative_path == path);
    assert!(!listed("vendor/lib.py"));
    assert!(listed("src/app.py"));
    assert_eq!(scan.other_files, 0);
}

#[test]
fn test_walk_collects_stats_and_markers() {
    let dir = fixture();
    let scan = walk_repository(dir.path(), &ScanConfig::default()).unwrap();

    let python = scan.language_stats[&Language::Python];
    assert_eq!(python.files, 4);
    // 3 + 2 + 2 + 1 lines
    assert_eq!(python.lines, 8);
    assert_eq!(scan.language_stats[&Language::TypeScript].lines, 1);
    assert_eq!(scan.total_lines, 9);
    assert!(scan.markers.contains(&RepoMarker::ControllerFiles));

    let test_file = scan
        .files
        .iter()
        .find(|f| f.relative_path == "tests/test_app.py")
        .unwrap();
    assert_eq!(test_file.kind, FileKind::Test);
}

#[test]
fn test_walk_missing_root() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        walk_repository(&missing, &ScanConfig::default()),
        Err(FileReadError::NotFound { .. })
    ));
}

#[test]
fn test_validate_directory() {
    let dir = fixture();
    write(
        dir.path(),
        "src/auth.py",
        "logger.info(\"login password=%s\", password)\n",
    );
    let mut config = HardGateConfig::default();
    config.gates.enabled_gates = vec!["AVOID_LOGGING_SECRETS".to_string()];
    let catalogue = GateCatalogue::builtin().unwrap();

    let report = ValidationEngine::new(config)
        .validate_directory(dir.path(), &catalogue)
        .unwrap();
    let result = report.result("AVOID_LOGGING_SECRETS").unwrap();
    assert_eq!(result.status, GateStatus::Fail);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].file, "src/auth.py");
    assert_eq!(result.score, 80.0);
}

#[test]
fn test_validate_directory_missing_root() {
    let dir = TempDir::new().unwrap();
    let catalogue = GateCatalogue::builtin().unwrap();
    let err = ValidationEngine::default()
        .validate_directory(&dir.path().join("absent"), &catalogue)
        .unwrap_err();
    assert!(matches!(err, EngineError::Scan(FileReadError::NotFound { .. })));
}

//! Tests for the codebase characteristics analyzer.

use hardgate_analysis::characteristics::{CharacteristicsAnalyzer, PrimaryTechnology};
use hardgate_analysis::scanner::{FileKind, Language, RepositoryScan, ScannedFile};

fn scan(paths: &[&str]) -> RepositoryScan {
    RepositoryScan::from_files(paths.iter().map(|p| ScannedFile::new(*p, 100)).collect())
}

fn many(prefix: &str, ext: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}/file{i}.{ext}")).collect()
}

#[test]
fn test_backend_only_repository() {
    let paths = many("src/main/java", "java", 40);
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let ch = CharacteristicsAnalyzer::default().analyze(&scan(&refs));

    assert!(ch.is_backend);
    assert!(ch.is_backend_only);
    assert!(!ch.is_frontend);
    assert!(!ch.is_api);
    assert_eq!(ch.primary_technology, PrimaryTechnology::Backend);
    assert_eq!(ch.backend_share, 100.0);
}

#[test]
fn test_mixed_repository_is_not_backend_only() {
    let mut paths = many("api", "py", 30);
    paths.extend(many("web", "tsx", 20));
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let ch = CharacteristicsAnalyzer::default().analyze(&scan(&refs));

    assert!(ch.is_backend);
    assert!(ch.is_frontend);
    assert!(!ch.is_backend_only);
    assert_eq!(ch.primary_technology, PrimaryTechnology::Backend);
}

#[test]
fn test_tie_resolves_to_backend() {
    let mut paths = many("svc", "go", 5);
    paths.extend(many("ui", "ts", 5));
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let ch = CharacteristicsAnalyzer::default().analyze(&scan(&refs));
    assert_eq!(ch.primary_technology, PrimaryTechnology::Backend);
}

#[test]
fn test_frontend_dominant_repository() {
    let mut paths = many("src/components", "vue", 30);
    paths.extend(many("server", "py", 1));
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let ch = CharacteristicsAnalyzer::default().analyze(&scan(&refs));
    assert!(ch.is_frontend);
    assert!(!ch.is_backend);
    assert_eq!(ch.primary_technology, PrimaryTechnology::Frontend);
}

#[test]
fn test_empty_metadata_is_unknown() {
    let ch = CharacteristicsAnalyzer::default().analyze(&RepositoryScan::default());
    assert!(!ch.is_frontend && !ch.is_backend && !ch.is_api && !ch.is_backend_only);
    assert_eq!(ch.primary_technology, PrimaryTechnology::Unknown);
    assert!(ch.is_ambiguous());
}

#[test]
fn test_api_markers_set_api_regardless_of_mix() {
    let ch = CharacteristicsAnalyzer::default().analyze(&scan(&[
        "docs/openapi.yaml",
        "README.md",
    ]));
    assert!(ch.is_api);
    assert!(!ch.is_backend);
}

#[test]
fn test_scanner_payload_json() {
    let json = r#"{
        "file_list": [
            {"relative_path": "app/controllers/users_controller.rb", "language": "ruby", "type": "source", "size": 1200},
            {"relative_path": "notes.txt", "language": "text", "type": "documentation", "size": 10}
        ],
        "language_stats": {"ruby": {"files": 1, "lines": 40}},
        "total_files": 2,
        "total_lines": 41
    }"#;
    let scan = RepositoryScan::from_json(json).unwrap();
    assert_eq!(scan.files.len(), 2);
    assert!(scan.files[1].language.is_none());

    let ch = CharacteristicsAnalyzer::default().analyze(&scan);
    assert!(ch.is_api, "controller file is an API marker");
    assert_eq!(ch.backend_share, 50.0);
    assert!(ch.is_backend);
}

#[test]
fn test_histogram_keys_are_lenient() {
    let json = r#"{
        "file_list": [],
        "language_stats": {
            "Python": {"files": 3, "lines": 300},
            "python": {"files": 1, "lines": 20},
            "TypeScript": {"files": 2},
            "text": {"files": 2},
            "Unknown": {"files": 2}
        }
    }"#;
    let scan = RepositoryScan::from_json(json).unwrap();
    assert_eq!(scan.language_stats[&Language::Python].files, 4);
    assert_eq!(scan.language_stats[&Language::Python].lines, 320);
    assert_eq!(scan.language_stats[&Language::TypeScript].files, 2);
    assert_eq!(scan.other_files, 4);
    assert_eq!(scan.effective_total_files(), 10);

    // Unknown entries still count toward the shares' denominator.
    let ch = CharacteristicsAnalyzer::default().analyze(&scan);
    assert_eq!(ch.backend_share, 40.0);
    assert_eq!(ch.frontend_share, 20.0);
}

#[test]
fn test_missing_file_fields_are_derived_from_path() {
    let json = r#"{
        "file_list": [
            {"relative_path": "svc/app.py"},
            {"relative_path": "svc/tests/test_app.py", "type": "Test Code"},
            {"relative_path": "web/App.tsx", "language": "Klingon", "type": "Source Code"},
            {"relative_path": "svc/handler.go", "type": "code"}
        ]
    }"#;
    let scan = RepositoryScan::from_json(json).unwrap();
    let kinds: Vec<FileKind> = scan.files.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![FileKind::Source, FileKind::Test, FileKind::Source, FileKind::Source]
    );
    assert_eq!(scan.files[0].language, Some(Language::Python));
    assert_eq!(scan.files[2].language, Some(Language::TypeScript));
    assert_eq!(scan.effective_total_files(), 4);
}

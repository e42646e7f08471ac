//! Scanner data types: ScannedFile, LanguageStats, RepositoryScan.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::language_detect::{deserialize_lenient, Language};

/// Structural kind of a file, as assigned by the file classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Source,
    Test,
    Config,
    Documentation,
    Build,
    #[serde(other)]
    Other,
}

impl FileKind {
    /// Parse a scanner-supplied kind label. Unrecognized labels yield `None`
    /// so the caller can fall back to path classification.
    pub fn from_name(name: &str) -> Option<FileKind> {
        let lowered = name.trim().to_ascii_lowercase();
        let kind = match lowered.as_str() {
            "source" | "src" | "code" | "source code" | "source_code" => FileKind::Source,
            "test" | "tests" | "test code" | "test_code" => FileKind::Test,
            "config" | "configuration" | "settings" => FileKind::Config,
            "documentation" | "docs" | "doc" => FileKind::Documentation,
            "build" | "build script" | "build_script" => FileKind::Build,
            _ => return None,
        };
        Some(kind)
    }

    /// Classify a relative path. Test detection wins over source.
    pub fn classify(relative_path: &str, language: Option<Language>) -> FileKind {
        let lowered = relative_path.to_ascii_lowercase();
        let file_name = lowered.rsplit('/').next().unwrap_or(&lowered);

        if matches!(
            file_name,
            "dockerfile" | "makefile" | "pom.xml" | "build.gradle" | "build.gradle.kts"
                | "package.json" | "cargo.toml" | "go.mod" | "requirements.txt" | "setup.py"
                | "pyproject.toml" | "gemfile" | "composer.json"
        ) || file_name.starts_with("dockerfile.")
        {
            return FileKind::Build;
        }

        let in_test_dir = lowered.starts_with("test/")
            || lowered.starts_with("tests/")
            || lowered.contains("/test/")
            || lowered.contains("/tests/")
            || lowered.contains("/__tests__/")
            || lowered.contains("/spec/");
        let test_name = file_name.starts_with("test_")
            || file_name.contains("_test.")
            || file_name.contains(".test.")
            || file_name.contains(".spec.")
            || file_name.contains("tests.");

        match language {
            Some(lang) if lang.is_code() => {
                if in_test_dir || test_name {
                    FileKind::Test
                } else {
                    FileKind::Source
                }
            }
            Some(Language::Markdown) => FileKind::Documentation,
            Some(Language::Html | Language::Css | Language::Scss) => FileKind::Source,
            Some(_) => FileKind::Config,
            None => {
                let ext = file_name.rsplit('.').next().unwrap_or("");
                match ext {
                    "toml" | "ini" | "cfg" | "conf" | "properties" | "env" => FileKind::Config,
                    "txt" | "rst" | "adoc" => FileKind::Documentation,
                    _ => FileKind::Other,
                }
            }
        }
    }
}

/// One file in the scanned repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawScannedFile")]
pub struct ScannedFile {
    /// Path relative to the repository root, `/`-separated.
    pub relative_path: String,
    pub language: Option<Language>,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub size: u64,
}

/// Scanner entry as supplied. Missing or unrecognized `language` and
/// `type` values are re-derived from the path.
#[derive(Deserialize)]
struct RawScannedFile {
    relative_path: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    language: Option<Language>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    size: u64,
}

impl From<RawScannedFile> for ScannedFile {
    fn from(raw: RawScannedFile) -> Self {
        let language = raw
            .language
            .or_else(|| Language::from_path(std::path::Path::new(&raw.relative_path)));
        let kind = raw
            .kind
            .as_deref()
            .and_then(FileKind::from_name)
            .unwrap_or_else(|| FileKind::classify(&raw.relative_path, language));
        Self {
            relative_path: raw.relative_path,
            language,
            kind,
            size: raw.size,
        }
    }
}

impl ScannedFile {
    /// Build an entry, detecting language and kind from the path.
    pub fn new(relative_path: impl Into<String>, size: u64) -> Self {
        let relative_path = relative_path.into();
        let language = Language::from_path(std::path::Path::new(&relative_path));
        let kind = FileKind::classify(&relative_path, language);
        Self {
            relative_path,
            language,
            kind,
            size,
        }
    }
}

/// Per-language file and line counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub files: usize,
    #[serde(default)]
    pub lines: usize,
}

/// Repository-level markers that indicate an API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoMarker {
    ControllerFiles,
    RouteFiles,
    OpenApiSpec,
    GraphQlSchema,
    ProtoDefinitions,
}

impl RepoMarker {
    /// Detect the markers a single relative path carries.
    pub fn detect(relative_path: &str) -> Vec<RepoMarker> {
        let lowered = relative_path.to_ascii_lowercase();
        let file_name = lowered.rsplit('/').next().unwrap_or(&lowered);
        let stem = file_name.split('.').next().unwrap_or(file_name);
        let mut markers = Vec::new();

        if stem.ends_with("controller") || stem.ends_with("controllers") || lowered.contains("/controllers/") {
            markers.push(RepoMarker::ControllerFiles);
        }
        if stem == "router"
            || stem.ends_with("routes")
            || lowered.contains("/routes/")
            || stem == "urls"
        {
            markers.push(RepoMarker::RouteFiles);
        }
        if stem.starts_with("openapi") || stem.starts_with("swagger") {
            markers.push(RepoMarker::OpenApiSpec);
        }
        if file_name.ends_with(".graphql") || file_name.ends_with(".gql") {
            markers.push(RepoMarker::GraphQlSchema);
        }
        if file_name.ends_with(".proto") {
            markers.push(RepoMarker::ProtoDefinitions);
        }
        markers
    }
}

/// The repository snapshot supplied by the scanner collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawRepositoryScan")]
pub struct RepositoryScan {
    #[serde(rename = "file_list")]
    pub files: Vec<ScannedFile>,
    pub language_stats: BTreeMap<Language, LanguageStats>,
    /// Files counted under histogram entries that name no known language.
    pub other_files: usize,
    pub total_files: usize,
    pub total_lines: usize,
    pub markers: BTreeSet<RepoMarker>,
}

/// Scanner payload as supplied. Histogram keys are free-form language
/// names and are folded onto `Language` leniently.
#[derive(Deserialize)]
struct RawRepositoryScan {
    #[serde(rename = "file_list", default)]
    files: Vec<ScannedFile>,
    #[serde(default)]
    language_stats: BTreeMap<String, LanguageStats>,
    #[serde(default)]
    other_files: usize,
    #[serde(default)]
    total_files: usize,
    #[serde(default)]
    total_lines: usize,
    #[serde(default)]
    markers: BTreeSet<RepoMarker>,
}

impl From<RawRepositoryScan> for RepositoryScan {
    fn from(raw: RawRepositoryScan) -> Self {
        let mut language_stats: BTreeMap<Language, LanguageStats> = BTreeMap::new();
        let mut other_files = raw.other_files;
        for (name, stats) in raw.language_stats {
            match Language::from_name(&name) {
                Some(language) => {
                    let entry = language_stats.entry(language).or_default();
                    entry.files += stats.files;
                    entry.lines += stats.lines;
                }
                None => other_files += stats.files,
            }
        }
        let mut markers = raw.markers;
        for file in &raw.files {
            markers.extend(RepoMarker::detect(&file.relative_path));
        }
        Self {
            files: raw.files,
            language_stats,
            other_files,
            total_files: raw.total_files,
            total_lines: raw.total_lines,
            markers,
        }
    }
}

impl RepositoryScan {
    /// Build a scan from a file list, deriving the language histogram
    /// (file counts only) and markers from paths.
    pub fn from_files(files: Vec<ScannedFile>) -> Self {
        let mut language_stats: BTreeMap<Language, LanguageStats> = BTreeMap::new();
        let mut other_files = 0;
        let mut markers = BTreeSet::new();
        for file in &files {
            match file.language {
                Some(language) => language_stats.entry(language).or_default().files += 1,
                None => other_files += 1,
            }
            markers.extend(RepoMarker::detect(&file.relative_path));
        }
        Self {
            total_files: files.len(),
            files,
            language_stats,
            other_files,
            total_lines: 0,
            markers,
        }
    }

    /// Parse a scanner payload from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Total file count, falling back to the histogram (known and unknown
    /// languages) and then the file list when the scanner did not report one.
    pub fn effective_total_files(&self) -> usize {
        if self.total_files > 0 {
            return self.total_files;
        }
        let histogram: usize =
            self.language_stats.values().map(|s| s.files).sum::<usize>() + self.other_files;
        histogram.max(self.files.len())
    }
}

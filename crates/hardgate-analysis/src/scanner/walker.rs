//! Filesystem walker: builds a `RepositoryScan` from a directory.
//!
//! Honors `.gitignore`/`.ignore` files via the `ignore` crate plus the
//! configured `extra_ignore` globs. Line counts are taken from the bounded
//! read, so files larger than `max_file_size` are undercounted.

use std::io::Read;
use std::path::Path;

use hardgate_core::config::ScanConfig;
use hardgate_core::errors::FileReadError;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

use super::types::{RepoMarker, RepositoryScan, ScannedFile};

/// Walk `root` and produce the scanner payload the engine consumes.
pub fn walk_repository(root: &Path, config: &ScanConfig) -> Result<RepositoryScan, FileReadError> {
    if !root.is_dir() {
        return Err(FileReadError::NotFound {
            path: root.display().to_string(),
        });
    }

    let mut builder = WalkBuilder::new(root);
    builder.hidden(true).git_ignore(true).require_git(false);

    if !config.extra_ignore.is_empty() {
        let mut overrides = OverrideBuilder::new(root);
        for glob in &config.extra_ignore {
            if let Err(e) = overrides.add(&format!("!{glob}")) {
                tracing::warn!(glob = %glob, error = %e, "ignoring invalid extra_ignore glob");
            }
        }
        match overrides.build() {
            Ok(built) => {
                builder.overrides(built);
            }
            Err(e) => tracing::warn!(error = %e, "extra_ignore overrides rejected"),
        }
    }

    let max_file_size = config.effective_max_file_size();
    let mut files = Vec::new();
    let mut total_lines = 0usize;
    let mut scan = RepositoryScan::default();

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        let file = ScannedFile::new(relative_path, size);
        let lines = count_lines(entry.path(), max_file_size);
        match file.language {
            Some(language) => {
                let stats = scan.language_stats.entry(language).or_default();
                stats.files += 1;
                stats.lines += lines;
            }
            None => scan.other_files += 1,
        }
        total_lines += lines;
        scan.markers.extend(RepoMarker::detect(&file.relative_path));
        files.push(file);
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    scan.total_files = files.len();
    scan.total_lines = total_lines;
    scan.files = files;

    tracing::debug!(
        total_files = scan.total_files,
        total_lines = scan.total_lines,
        languages = scan.language_stats.len(),
        "repository walk complete"
    );
    Ok(scan)
}

fn count_lines(path: &Path, max_file_size: u64) -> usize {
    let Ok(file) = std::fs::File::open(path) else {
        return 0;
    };
    let mut bytes = Vec::new();
    if file.take(max_file_size).read_to_end(&mut bytes).is_err() {
        return 0;
    }
    if bytes.is_empty() {
        return 0;
    }
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count();
    if bytes.last() == Some(&b'\n') {
        newlines
    } else {
        newlines + 1
    }
}

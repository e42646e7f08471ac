//! Relevant-file selection.

use std::collections::BTreeSet;

use super::types::Gate;
use crate::scanner::{Language, RepositoryScan, ScannedFile};

/// Files in scope for `gate`, in scan order.
pub fn relevant_files<'a>(gate: &Gate, scan: &'a RepositoryScan) -> Vec<&'a ScannedFile> {
    scan.files
        .iter()
        .filter(|f| gate.is_relevant(f.kind, f.language))
        .collect()
}

/// Languages present among `files`.
pub fn languages_of(files: &[&ScannedFile]) -> BTreeSet<Language> {
    files.iter().filter_map(|f| f.language).collect()
}

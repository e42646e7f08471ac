//! Scanner boundary: the repository snapshot the engine evaluates.
//!
//! The engine consumes a `RepositoryScan` (file list, language histogram,
//! API markers) and reads file contents through a `FileSource`. `walker`
//! builds a scan from a directory on disk.

pub mod language_detect;
pub mod source;
pub mod types;
pub mod walker;

pub use language_detect::{Language, LanguageFamily};
pub use source::{FileContent, FileSource, FsFileSource, MemoryFileSource};
pub use types::{FileKind, LanguageStats, RepoMarker, RepositoryScan, ScannedFile};
pub use walker::walk_repository;

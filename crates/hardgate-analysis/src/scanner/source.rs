//! File content access with bounded reads.

use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use hardgate_core::errors::FileReadError;
use hardgate_core::types::FxHashMap;

/// Content of one file, possibly truncated to the configured bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub text: String,
    pub truncated: bool,
}

/// Read access to scanned file contents, keyed by relative path.
pub trait FileSource: Send + Sync {
    fn read(&self, relative_path: &str) -> Result<FileContent, FileReadError>;
}

/// Reads files under a repository root, at most `max_file_size` bytes each.
#[derive(Debug, Clone)]
pub struct FsFileSource {
    root: PathBuf,
    max_file_size: u64,
}

impl FsFileSource {
    pub fn new(root: impl Into<PathBuf>, max_file_size: u64) -> Self {
        Self {
            root: root.into(),
            max_file_size,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path, refusing absolute paths and `..` segments.
    fn resolve(&self, relative_path: &str) -> Result<PathBuf, FileReadError> {
        let rel = Path::new(relative_path);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(FileReadError::OutsideRoot {
                path: relative_path.to_string(),
            });
        }
        Ok(self.root.join(rel))
    }
}

impl FileSource for FsFileSource {
    fn read(&self, relative_path: &str) -> Result<FileContent, FileReadError> {
        let path = self.resolve(relative_path)?;
        let io_err = |source: std::io::Error| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FileReadError::NotFound {
                    path: relative_path.to_string(),
                }
            } else {
                FileReadError::Io {
                    path: relative_path.to_string(),
                    source,
                }
            }
        };

        let file = std::fs::File::open(&path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();

        let mut bytes = Vec::with_capacity(len.min(self.max_file_size) as usize);
        file.take(self.max_file_size)
            .read_to_end(&mut bytes)
            .map_err(io_err)?;

        Ok(FileContent {
            text: String::from_utf8_lossy(&bytes).into_owned(),
            truncated: len > self.max_file_size,
        })
    }
}

/// In-memory file source with a read counter.
///
/// Used by embedders that already hold file contents. `reads()` reports
/// how many reads the engine issued.
#[derive(Debug, Default)]
pub struct MemoryFileSource {
    files: FxHashMap<String, String>,
    max_file_size: Option<usize>,
    reads: AtomicUsize,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_file(mut self, relative_path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(relative_path, text);
        self
    }

    /// Bound reads to `max` bytes, truncating at a char boundary.
    pub fn with_max_file_size(mut self, max: usize) -> Self {
        self.max_file_size = Some(max);
        self
    }

    pub fn insert(&mut self, relative_path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(relative_path.into(), text.into());
    }

    /// Number of `read` calls served so far (including misses).
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl FileSource for MemoryFileSource {
    fn read(&self, relative_path: &str) -> Result<FileContent, FileReadError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let text = self
            .files
            .get(relative_path)
            .ok_or_else(|| FileReadError::NotFound {
                path: relative_path.to_string(),
            })?;

        match self.max_file_size {
            Some(max) if text.len() > max => {
                let mut end = max;
                while !text.is_char_boundary(end) {
                    end -= 1;
                }
                Ok(FileContent {
                    text: text[..end].to_string(),
                    truncated: true,
                })
            }
            _ => Ok(FileContent {
                text: text.clone(),
                truncated: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_truncates_on_char_boundary() {
        let source = MemoryFileSource::new()
            .with_file("a.txt", "héllo")
            .with_max_file_size(2);
        let content = source.read("a.txt").unwrap();
        assert_eq!(content.text, "h");
        assert!(content.truncated);
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn fs_source_rejects_escaping_paths() {
        let source = FsFileSource::new("/tmp", 1024);
        assert!(matches!(
            source.read("../etc/passwd"),
            Err(FileReadError::OutsideRoot { .. })
        ));
        assert!(matches!(
            source.read("/etc/passwd"),
            Err(FileReadError::OutsideRoot { .. })
        ));
    }
}

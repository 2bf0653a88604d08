//! Where module text comes from.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::paths::normalize;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("module not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("{}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

/// Resolves and reads module source text.
///
/// Paths passed in are absolute. `canonicalize` produces the cache key;
/// `read_source` receives only paths it returned.
pub trait ModuleSource: Send + Sync {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, SourceError>;

    fn read_source(&self, canonical: &Path) -> Result<String, SourceError>;
}

/// Reads modules from the filesystem.
#[derive(Copy, Clone, Debug, Default)]
pub struct FsSource;

impl ModuleSource for FsSource {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, SourceError> {
        std::fs::canonicalize(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
            _ => SourceError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })
    }

    fn read_source(&self, canonical: &Path) -> Result<String, SourceError> {
        std::fs::read_to_string(canonical).map_err(|e| SourceError::Io {
            path: canonical.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// In-memory modules keyed by normalized absolute path.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<FxHashMap<PathBuf, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl AsRef<Path>, source: impl Into<String>) {
        self.files.write().insert(normalize(path.as_ref()), source.into());
    }

    #[must_use]
    pub fn with_file(self, path: impl AsRef<Path>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }
}

impl ModuleSource for MemorySource {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, SourceError> {
        let normalized = normalize(path);
        if self.files.read().contains_key(&normalized) {
            Ok(normalized)
        } else {
            Err(SourceError::NotFound(normalized))
        }
    }

    fn read_source(&self, canonical: &Path) -> Result<String, SourceError> {
        self.files
            .read()
            .get(canonical)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(canonical.to_path_buf()))
    }
}

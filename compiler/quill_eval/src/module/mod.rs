//! Module loading.
//!
//! `import @./lib` resolves the path against the importing file's
//! directory, canonicalizes it through a [`ModuleSource`], and evaluates the
//! file once per [`ModuleCache`]. A module runs in a fresh scope whose
//! parent holds only the builtins; its value is a dictionary of the
//! bindings it declared with `export`.

mod cache;
mod source;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use cache::{Claim, LoadGuard, ModuleCache, SessionId};
pub use source::{FsSource, MemorySource, ModuleSource, SourceError};

use crate::errors::{io_error, module_not_found, EvalError};
use crate::paths;

/// Extension added to import paths that have none.
pub const MODULE_EXTENSION: &str = "quill";

/// Per-interpreter view of the shared module machinery.
#[derive(Clone)]
pub struct ModuleLoader {
    pub(crate) source: Arc<dyn ModuleSource>,
    pub(crate) cache: Arc<ModuleCache>,
    session: SessionId,
}

impl ModuleLoader {
    pub fn new(source: Arc<dyn ModuleSource>, cache: Arc<ModuleCache>) -> Self {
        ModuleLoader {
            source,
            cache,
            session: SessionId::next(),
        }
    }

    #[inline]
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn cache(&self) -> &Arc<ModuleCache> {
        &self.cache
    }

    /// Canonical cache key for `target` imported from a file in `base`.
    pub fn canonicalize(&self, target: &str, base: &Path) -> Result<PathBuf, EvalError> {
        self.source
            .canonicalize(&candidate_path(target, base))
            .map_err(source_error)
    }

    pub fn read(&self, canonical: &Path) -> Result<String, EvalError> {
        self.source.read_source(canonical).map_err(source_error)
    }
}

impl std::fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("cache", &self.cache)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Absolute path an import of `target` refers to, before canonicalization.
pub fn candidate_path(target: &str, base: &Path) -> PathBuf {
    let mut path = paths::resolve(target, base);
    if path.extension().is_none() {
        path.set_extension(MODULE_EXTENSION);
    }
    path
}

fn source_error(error: SourceError) -> EvalError {
    match error {
        SourceError::NotFound(path) => module_not_found(&path),
        SourceError::Io { path, message } => io_error(path.display().to_string(), message),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

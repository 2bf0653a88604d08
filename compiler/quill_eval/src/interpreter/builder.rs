//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use std::path::PathBuf;
use std::sync::Arc;

use quill_parse::DEFAULT_MAX_NESTING;
use quill_stack::DepthLimit;

use super::Interpreter;
use crate::builtins;
use crate::environment::Environment;
use crate::module::{FsSource, ModuleCache, ModuleLoader, ModuleSource};
use crate::policy::{DefaultPolicy, SecurityPolicy};
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Resource limits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Nested user function calls before `StackOverflow`. Default 2 000.
    pub max_call_depth: usize,
    /// Elements an `a..b` range may produce. Default 10 000 000.
    pub max_range_len: usize,
    /// Parser nesting depth. Default 1 000.
    pub max_nesting: usize,
}

impl Limits {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 2_000;
    pub const DEFAULT_MAX_RANGE_LEN: usize = 10_000_000;
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
            max_range_len: Self::DEFAULT_MAX_RANGE_LEN,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

/// Builder for creating Interpreter instances with various configurations.
///
/// Unset options default to printing to stdout, [`DefaultPolicy`], the
/// filesystem as module source and a cache private to this interpreter.
/// Share one `Arc<ModuleCache>` between interpreters to share loaded modules.
#[derive(Default)]
pub struct InterpreterBuilder {
    print_handler: Option<SharedPrintHandler>,
    policy: Option<Arc<dyn SecurityPolicy>>,
    module_source: Option<Arc<dyn ModuleSource>>,
    module_cache: Option<Arc<ModuleCache>>,
    limits: Limits,
    entry_file: Option<PathBuf>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Set the policy consulted before file access and imports.
    #[must_use]
    pub fn policy(mut self, policy: Arc<dyn SecurityPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    #[must_use]
    pub fn module_source(mut self, source: Arc<dyn ModuleSource>) -> Self {
        self.module_source = Some(source);
        self
    }

    #[must_use]
    pub fn module_cache(mut self, cache: Arc<ModuleCache>) -> Self {
        self.module_cache = Some(cache);
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.limits.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Path that [`Interpreter::eval_source`] treats the source as coming
    /// from. Relative imports and file handles resolve against its directory.
    #[must_use]
    pub fn entry_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.entry_file = Some(path.into());
        self
    }

    pub fn build(self) -> Interpreter {
        let globals = Environment::new();
        builtins::register(&globals);

        let source = self.module_source.unwrap_or_else(|| Arc::new(FsSource));
        let cache = self.module_cache.unwrap_or_else(|| Arc::new(ModuleCache::new()));

        Interpreter {
            globals,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            policy: self.policy.unwrap_or_else(|| Arc::new(DefaultPolicy)),
            modules: ModuleLoader::new(source, cache),
            limits: self.limits,
            call_depth: DepthLimit::new(self.limits.max_call_depth),
            import_stack: Vec::new(),
            entry_file: self.entry_file,
        }
    }
}

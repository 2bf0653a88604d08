//! Evaluating imported modules.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quill_ir::Position;
use quill_parse::ParseError;

use super::{Evaluation, Interpreter};
use crate::builtins::path_text;
use crate::environment::Environment;
use crate::errors::{circular_import, module_parse, ControlAction, EvalError, EvalResult};
use crate::module::Claim;
use crate::policy::Operation;
use crate::unit::Unit;
use crate::value::{Dict, Value};

impl Interpreter {
    /// `import target` from a file of `importer`.
    ///
    /// The module's value is the dictionary of its exported bindings,
    /// shared by every importer through the module cache.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn import(&mut self, target: &Value, importer: &Arc<Unit>) -> EvalResult {
        let text = path_text(target)?;
        let canonical = self.modules.canonicalize(&text, &importer.base_dir())?;
        if self.import_stack.contains(&canonical) {
            return Err(circular_import(self.import_chain(canonical)).into());
        }

        let cache = Arc::clone(&self.modules.cache);
        let result = match cache.claim(&canonical, self.modules.session()) {
            Claim::Cached(value) => {
                tracing::trace!(path = %canonical.display(), "module cache hit");
                Ok(value)
            }
            Claim::Cycle => Err(circular_import(self.import_chain(canonical)).into()),
            Claim::Load(guard) => {
                let value = self.load_module(&canonical)?;
                guard.finish(value.clone());
                Ok(value)
            }
        };
        result
    }

    /// Import stack from the first entry into `path`, closed by `path`.
    fn import_chain(&self, path: PathBuf) -> Vec<PathBuf> {
        let start = self
            .import_stack
            .iter()
            .position(|entry| *entry == path)
            .unwrap_or(self.import_stack.len());
        let mut chain = self.import_stack[start..].to_vec();
        chain.push(path);
        chain
    }

    fn load_module(&mut self, canonical: &Path) -> EvalResult {
        self.check_access(canonical, Operation::Execute)?;
        let source = self.modules.read(canonical)?;
        let unit = Unit::parse(&source, Some(canonical.to_path_buf()), self.limits.max_nesting)
            .map_err(|errors| parse_failure(canonical, &errors))?;
        tracing::debug!(path = %canonical.display(), "loading module");

        let env = self.globals.child();
        self.run_nested(&Arc::new(unit), &env).map_err(ControlAction::Error)?;
        Ok(Value::Dict(Dict::from_values(env.exports())))
    }

    /// Run `unit` with its path on the import stack.
    pub(crate) fn run_nested(&mut self, unit: &Arc<Unit>, env: &Environment) -> Result<Evaluation, Box<EvalError>> {
        if let Some(path) = unit.path() {
            self.import_stack.push(path.to_path_buf());
        }
        let result = self.exec_program(unit, env);
        if unit.path().is_some() {
            self.import_stack.pop();
        }
        result
    }
}

fn parse_failure(path: &Path, errors: &[ParseError]) -> EvalError {
    match errors.first() {
        Some(first) => module_parse(path, &first.message, first.position),
        None => module_parse(path, "syntax error", Position::default()),
    }
}

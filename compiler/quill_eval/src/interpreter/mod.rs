//! Tree-walking interpreter.
//!
//! # Architecture
//!
//! Evaluation functions take the [`Unit`] whose arena the node lives in
//! and the [`Environment`] to evaluate against, rather than storing them on
//! the interpreter. A closure carries its own `Arc<Unit>`, so calling a
//! function imported from another file switches arenas by passing a
//! different unit down.
//!
//! - `expr` - expressions, member access, indexing, slicing
//! - `stmt` - statements and place assignment
//! - `pattern` - destructuring
//! - `call` - function calls, argument binding, the call-depth guard
//! - `control` - `for` loops
//! - `tag` - markup and component tags
//! - `io` - `<==` and `==>`
//! - `import` - the module loader's evaluation half
//!
//! Errors are located at the innermost expression that raised them. Lazy
//! dictionary fields are forced on first access through [`Interpreter::dict_get`].

mod builder;
mod call;
mod control;
mod expr;
mod import;
mod io;
mod pattern;
mod stmt;
mod tag;

pub use builder::{InterpreterBuilder, Limits};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quill_ir::StmtKind;
use quill_parse::ParseError;
use quill_stack::{ensure_sufficient_stack, DepthLimit};
use rustc_hash::FxHashSet;

use crate::builtins::CallSite;
use crate::environment::Environment;
use crate::errors::{io_error, self_referential_field, type_mismatch, ControlAction, EvalError, EvalResult};
use crate::module::ModuleLoader;
use crate::policy::SecurityPolicy;
use crate::print_handler::{PrintHandler, SharedPrintHandler};
use crate::unit::Unit;
use crate::value::{render, Dict, Slot, Value};

pub struct Interpreter {
    /// Builtins; parent of every program and module scope.
    pub(crate) globals: Environment,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) policy: Arc<dyn SecurityPolicy>,
    pub(crate) modules: ModuleLoader,
    pub(crate) limits: Limits,
    pub(crate) call_depth: DepthLimit,
    /// Canonical paths of the modules being imported, outermost first.
    pub(crate) import_stack: Vec<PathBuf>,
    /// Path given to sources evaluated from a string.
    pub(crate) entry_file: Option<PathBuf>,
}

/// Result of running a program.
#[derive(Debug)]
pub struct Evaluation {
    /// Value of the last top-level statement.
    pub value: Value,
    /// Non-null values of top-level expression statements, in order.
    pub output: Vec<Value>,
}

impl Evaluation {
    /// The program's output as text, one value per line.
    pub fn rendered(&self) -> String {
        self.output.iter().map(render).collect::<Vec<_>>().join("\n")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{}", .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
    Syntax { errors: Vec<ParseError> },
    #[error("{0}")]
    Runtime(Box<EvalError>),
}

impl RunError {
    /// The runtime error, if evaluation got that far.
    pub fn runtime(&self) -> Option<&EvalError> {
        match self {
            RunError::Runtime(error) => Some(error),
            RunError::Syntax { .. } => None,
        }
    }
}

impl From<Box<EvalError>> for RunError {
    fn from(error: Box<EvalError>) -> Self {
        RunError::Runtime(error)
    }
}

impl Interpreter {
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// An interpreter with default settings.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn print_handler(&self) -> &PrintHandler {
        &self.print_handler
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn module_loader(&self) -> &ModuleLoader {
        &self.modules
    }

    /// Parse and run `source`. Relative paths resolve against the entry
    /// file's directory, or the working directory without one.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn eval_source(&mut self, source: &str) -> Result<Evaluation, RunError> {
        let unit = Unit::parse(source, self.entry_file.clone(), self.limits.max_nesting)
            .map_err(|errors| RunError::Syntax { errors })?;
        self.run_unit(&Arc::new(unit))
    }

    /// Read, parse and run the file at `path`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run_file(&mut self, path: &Path) -> Result<Evaluation, RunError> {
        let canonical = std::fs::canonicalize(path)
            .map_err(|e| Box::new(io_error(path.display().to_string(), e)))?;
        let source = std::fs::read_to_string(&canonical)
            .map_err(|e| Box::new(io_error(canonical.display().to_string(), e)))?;
        let unit = Unit::parse(&source, Some(canonical), self.limits.max_nesting)
            .map_err(|errors| RunError::Syntax { errors })?;
        self.run_unit(&Arc::new(unit))
    }

    /// Run an already parsed unit in a fresh scope below the globals.
    pub fn run_unit(&mut self, unit: &Arc<Unit>) -> Result<Evaluation, RunError> {
        let env = self.globals.child();
        Ok(self.run_nested(unit, &env)?)
    }

    pub(crate) fn exec_program(&mut self, unit: &Arc<Unit>, env: &Environment) -> Result<Evaluation, Box<EvalError>> {
        let mut output = Vec::new();
        let mut value = Value::Null;
        for &id in &unit.program.stmts {
            let stmt = unit.arena.get_stmt(id);
            let locate = |action: ControlAction| Box::new(unit.locate(*action.into_error(), stmt.span));
            value = self.eval_stmt(unit, env, id).map_err(locate)?;
            if matches!(stmt.kind, StmtKind::Expr(_)) && !value.is_null() {
                self.resolve(&value).map_err(locate)?;
                output.push(value.clone());
            }
        }
        Ok(Evaluation { value, output })
    }

    /// Call a function value from host code.
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value, Box<EvalError>> {
        let unit = Arc::new(Unit::empty(self.entry_file.clone()));
        let site = CallSite {
            unit: &unit,
            span: quill_ir::Span::DUMMY,
        };
        self.call_value(callee, args, &site).map_err(ControlAction::into_error)
    }

    /// Value of dictionary field `key`, forcing it if it is still pending.
    ///
    /// While a field is being forced its slot is marked, so an expression
    /// that needs its own field fails instead of recursing. If forcing fails
    /// the field is left pending and the next access tries again.
    pub fn dict_get(&mut self, dict: &Dict, key: &str) -> EvalResult<Option<Value>> {
        match dict.read().get(key) {
            None => return Ok(None),
            Some(Slot::Ready(value)) => return Ok(Some(value.clone())),
            Some(Slot::Pending(_) | Slot::Forcing) => {}
        }
        let thunk = {
            let mut data = dict.write();
            let Some(slot) = data.get_mut(key) else {
                return Ok(None);
            };
            match std::mem::replace(slot, Slot::Forcing) {
                Slot::Pending(thunk) => thunk,
                Slot::Forcing => return Err(self_referential_field(key).into()),
                Slot::Ready(value) => {
                    *slot = Slot::Ready(value.clone());
                    return Ok(Some(value));
                }
            }
        };
        tracing::trace!(key, "forcing dictionary field");

        let scope = thunk.env.child();
        scope.define("this", Value::Dict(dict.clone()));
        let result = self.eval(&thunk.unit, &scope, thunk.expr);

        let mut data = dict.write();
        let slot = data.get_mut(key).filter(|slot| matches!(slot, Slot::Forcing));
        match result {
            Ok(value) => {
                if let Some(slot) = slot {
                    *slot = Slot::Ready(value.clone());
                }
                Ok(Some(value))
            }
            Err(action) => {
                if let Some(slot) = slot {
                    *slot = Slot::Pending(thunk);
                }
                Err(ControlAction::Error(action.into_error()))
            }
        }
    }

    /// Force every pending field reachable from `value`.
    ///
    /// Rendering, equality, set operations and codecs only look at
    /// evaluated fields, so they run after this.
    pub fn resolve(&mut self, value: &Value) -> EvalResult<()> {
        let mut seen = FxHashSet::default();
        self.resolve_inner(value, &mut seen)
    }

    fn resolve_inner(&mut self, value: &Value, seen: &mut FxHashSet<usize>) -> EvalResult<()> {
        ensure_sufficient_stack(|| match value {
            Value::Array(items) => {
                for item in items.iter() {
                    self.resolve_inner(item, seen)?;
                }
                Ok(())
            }
            Value::Dict(dict) => {
                if !seen.insert(dict.addr()) {
                    return Ok(());
                }
                let pending = dict.read().pending_keys();
                for key in pending {
                    self.dict_get(dict, &key)?;
                }
                let values: Vec<Value> = dict
                    .read()
                    .iter()
                    .filter_map(|(_, slot)| match slot {
                        Slot::Ready(value) => Some(value.clone()),
                        Slot::Pending(_) | Slot::Forcing => None,
                    })
                    .collect();
                for value in &values {
                    self.resolve_inner(value, seen)?;
                }
                Ok(())
            }
            _ => Ok(()),
        })
    }

    /// Rendered text of a value after forcing it.
    pub fn rendered(&mut self, value: &Value) -> EvalResult<String> {
        self.resolve(value)?;
        Ok(render(value))
    }

    pub(crate) fn dict_keys(&mut self, value: &Value) -> EvalResult {
        match value {
            Value::Dict(dict) => Ok(Value::array(dict.read().keys().map(|k| Value::Str(Arc::clone(k))).collect())),
            other => Err(type_mismatch("dictionary", other).into()),
        }
    }

    pub(crate) fn dict_values(&mut self, value: &Value) -> EvalResult {
        let Value::Dict(dict) = value else {
            return Err(type_mismatch("dictionary", value).into());
        };
        let keys: Vec<Arc<str>> = dict.read().keys().cloned().collect();
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.dict_get(dict, &key)?.unwrap_or(Value::Null));
        }
        Ok(Value::array(values))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("policy", &self.policy)
            .field("modules", &self.modules)
            .field("limits", &self.limits)
            .field("call_depth", &self.call_depth.current())
            .finish_non_exhaustive()
    }
}

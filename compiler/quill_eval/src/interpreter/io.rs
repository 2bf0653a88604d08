//! `<==` reads and `==>`/`==>>` writes.
//!
//! File handles and path values go through the codec for their format after
//! a policy check; any other value on the right of `<==` is used directly.
//! With a dictionary pattern on the left, `<==` never fails: the outcome is
//! bound as `{data, error}`.

use std::io::{Read as _, Write as _};
use std::path::Path;
use std::sync::Arc;

use quill_ir::{ExprId, PatternId, PatternKind};

use super::pattern::BindMode;
use super::Interpreter;
use crate::codecs::{self, Format};
use crate::environment::Environment;
use crate::errors::{invalid_value, io_error, permission_denied, type_mismatch, ControlAction, EvalError, EvalResult};
use crate::paths;
use crate::policy::Operation;
use crate::pseudo::{self, file, path, PseudoKind};
use crate::unit::Unit;
use crate::value::{Dict, Value};

/// Where a read or write goes.
struct Target {
    text: String,
    format: Format,
}

impl Target {
    fn of(value: &Value) -> Option<Target> {
        match value {
            Value::Dict(dict) => match pseudo::kind_of_dict(dict)? {
                PseudoKind::File => Some(Target {
                    text: file::path(dict),
                    format: file::format(dict),
                }),
                PseudoKind::Path => {
                    let text = path::text(dict);
                    let format = Format::from_path(&text);
                    Some(Target { text, format })
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl Interpreter {
    pub(crate) fn exec_read(
        &mut self,
        unit: &Arc<Unit>,
        env: &Environment,
        pattern: PatternId,
        source: ExprId,
        declare: bool,
    ) -> EvalResult {
        let mode = if declare {
            BindMode::Define { export: false }
        } else {
            BindMode::Assign
        };
        let result = self
            .eval(unit, env, source)
            .and_then(|value| match Target::of(&value) {
                Some(target) => self.read_target(unit, &target),
                None => Ok(value),
            });

        let value = if matches!(unit.arena.get_pattern(pattern).kind, PatternKind::Dict { .. }) {
            match result {
                Ok(data) => outcome(data, Value::Null),
                Err(ControlAction::Error(error)) => {
                    tracing::debug!(%error, "captured error");
                    outcome(Value::Null, Value::Error(Arc::new(*error)))
                }
                Err(control) => return Err(control),
            }
        } else {
            result?
        };
        self.bind_pattern(unit, env, pattern, value, mode)?;
        Ok(Value::Null)
    }

    fn read_target(&mut self, unit: &Unit, target: &Target) -> EvalResult {
        let bytes = match target.text.as_str() {
            "-" | "stdin" => {
                let mut bytes = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut bytes)
                    .map_err(|e| io_error("stdin", e))?;
                bytes
            }
            "stdout" | "stderr" => {
                return Err(invalid_value(format!("cannot read from {}", target.text)).into());
            }
            text => {
                let path = paths::resolve(text, &unit.base_dir());
                self.check_access(&path, Operation::Read)?;
                tracing::debug!(path = %path.display(), format = target.format.as_str(), "read");
                std::fs::read(&path).map_err(|e| io_error(path.display().to_string(), e))?
            }
        };
        codecs::decode(&bytes, target.format).map_err(|e| invalid_value(e.to_string()).into())
    }

    pub(crate) fn exec_write(
        &mut self,
        unit: &Arc<Unit>,
        env: &Environment,
        value: ExprId,
        target: ExprId,
        append: bool,
    ) -> EvalResult {
        let value = self.eval(unit, env, value)?;
        self.resolve(&value)?;
        let target_value = self.eval(unit, env, target)?;
        let target = match &target_value {
            Value::Str(text) => Target {
                text: text.to_string(),
                format: Format::from_path(text),
            },
            other => Target::of(other).ok_or_else(|| type_mismatch("file handle or path", other))?,
        };
        let bytes = codecs::encode(&value, target.format).map_err(|e| invalid_value(e.to_string()))?;

        match target.text.as_str() {
            "-" | "stdout" => self.print_handler.print(&String::from_utf8_lossy(&bytes)),
            "stderr" => self.print_handler.eprint(&String::from_utf8_lossy(&bytes)),
            "stdin" => return Err(invalid_value("cannot write to stdin").into()),
            text => {
                let path = paths::resolve(text, &unit.base_dir());
                self.check_access(&path, Operation::Write)?;
                tracing::debug!(path = %path.display(), append, bytes = bytes.len(), "write");
                write_file(&path, &bytes, append).map_err(|e| io_error(path.display().to_string(), e))?;
            }
        }
        Ok(Value::Null)
    }

    pub(crate) fn check_access(&self, path: &Path, operation: Operation) -> Result<(), EvalError> {
        self.policy
            .check_access(path, operation)
            .map_err(|denied| permission_denied(&denied.path, denied.operation.as_str()))
    }
}

fn outcome(data: Value, error: Value) -> Value {
    Value::Dict(Dict::from_values([("data", data), ("error", error)]))
}

fn write_file(path: &Path, bytes: &[u8], append: bool) -> std::io::Result<()> {
    if append {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?
            .write_all(bytes)
    } else {
        std::fs::write(path, bytes)
    }
}

//! Statements and assignment to places.

use std::sync::Arc;

use quill_ir::{AssignTarget, ExprId, ExprKind, PatternId, PatternKind, StmtId, StmtKind};

use super::expr::position;
use super::pattern::BindMode;
use super::Interpreter;
use crate::environment::Environment;
use crate::errors::{index_out_of_bounds, invalid_value, type_mismatch, ControlAction, EvalResult};
use crate::unit::Unit;
use crate::value::{FunctionValue, Value};

impl Interpreter {
    /// Run statement `id`. Declarations and assignments evaluate to null.
    pub(crate) fn eval_stmt(&mut self, unit: &Arc<Unit>, env: &Environment, id: StmtId) -> EvalResult {
        self.eval_stmt_inner(unit, env, id).map_err(|action| match action {
            ControlAction::Error(error) => {
                ControlAction::Error(Box::new(unit.locate(*error, unit.arena.get_stmt(id).span)))
            }
            other => other,
        })
    }

    fn eval_stmt_inner(&mut self, unit: &Arc<Unit>, env: &Environment, id: StmtId) -> EvalResult {
        match &unit.arena.get_stmt(id).kind {
            StmtKind::Let { pattern, value, export } => {
                let value = self.eval(unit, env, *value)?;
                let value = named(value, unit, *pattern);
                self.bind_pattern(unit, env, *pattern, value, BindMode::Define { export: *export })?;
                Ok(Value::Null)
            }
            StmtKind::Assign { target, value, export } => {
                let value = self.eval(unit, env, *value)?;
                match target {
                    AssignTarget::Pattern(pattern) => {
                        let value = named(value, unit, *pattern);
                        let mode = if *export {
                            BindMode::Define { export: true }
                        } else {
                            BindMode::Assign
                        };
                        self.bind_pattern(unit, env, *pattern, value, mode)?;
                    }
                    AssignTarget::Place(place) => self.assign_place(unit, env, *place, value)?,
                }
                Ok(Value::Null)
            }
            StmtKind::Read {
                pattern,
                source,
                declare,
            } => self.exec_read(unit, env, *pattern, *source, *declare),
            StmtKind::Write { value, target, append } => self.exec_write(unit, env, *value, *target, *append),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(value) => self.eval(unit, env, *value)?,
                    None => Value::Null,
                };
                Err(ControlAction::Return(value))
            }
            StmtKind::Break => Err(ControlAction::Break),
            StmtKind::Continue => Err(ControlAction::Continue),
            StmtKind::Expr(expr) => self.eval(unit, env, *expr),
        }
    }

    /// Run `stmts` in `env` and yield the last statement's value.
    pub(crate) fn exec_block(&mut self, unit: &Arc<Unit>, env: &Environment, stmts: &[StmtId]) -> EvalResult {
        let mut value = Value::Null;
        for &stmt in stmts {
            value = self.eval_stmt(unit, env, stmt)?;
        }
        Ok(value)
    }

    /// `place = value` where place is `a`, `a.b` or `a[i]`.
    ///
    /// Dictionaries are updated in place, so every alias sees the change.
    /// Arrays are values: the element is replaced in a copy, which is then
    /// assigned back to the array's own place.
    fn assign_place(&mut self, unit: &Arc<Unit>, env: &Environment, place: ExprId, value: Value) -> EvalResult<()> {
        let (target, key) = match &unit.arena.get_expr(place).kind {
            ExprKind::Ident(name) => {
                env.assign(name, value);
                return Ok(());
            }
            ExprKind::Dot { target, name } => (*target, Value::from(name.as_str())),
            ExprKind::Index { target, index } => (*target, self.eval(unit, env, *index)?),
            _ => return Err(invalid_value("cannot assign to this expression").into()),
        };

        match self.eval(unit, env, target)? {
            Value::Dict(dict) => {
                let key = self.rendered(&key)?;
                dict.write().set(key, value);
                Ok(())
            }
            Value::Array(mut items) => {
                let Value::Int(i) = key else {
                    return Err(type_mismatch("integer index", &key).into());
                };
                let at = position(i, items.len()).ok_or_else(|| index_out_of_bounds(i, items.len()))?;
                Arc::make_mut(&mut items)[at] = value;
                self.assign_place(unit, env, target, Value::Array(items))
            }
            other => Err(type_mismatch("array or dictionary", &other).into()),
        }
    }
}

/// Give an anonymous function the name it is first bound to.
fn named(value: Value, unit: &Unit, pattern: PatternId) -> Value {
    let PatternKind::Ident(name) = &unit.arena.get_pattern(pattern).kind else {
        return value;
    };
    match value {
        Value::Function(function) if function.name.is_none() => Value::Function(Arc::new(FunctionValue {
            name: Some(name.clone()),
            unit: Arc::clone(&function.unit),
            expr: function.expr,
            env: function.env.clone(),
        })),
        other => other,
    }
}

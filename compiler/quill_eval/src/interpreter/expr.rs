//! Expression evaluation.

use std::sync::Arc;

use quill_ir::{BinaryOp, DictEntry, ExprId, ExprKind, Span, TemplatePart};
use quill_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::builtins::CallSite;
use crate::environment::Environment;
use crate::errors::{
    index_out_of_bounds, invalid_value, no_such_method, no_such_property, self_referential_field, type_mismatch,
    undefined_variable, ControlAction, EvalResult,
};
use crate::methods;
use crate::operators;
use crate::pseudo::{self, regex};
use crate::unit::Unit;
use crate::value::{Dict, DictData, FunctionValue, Slot, Thunk, Value};

impl Interpreter {
    /// Evaluate expression `id` of `unit` in `env`.
    ///
    /// Errors that do not carry a location yet are located at this node.
    pub(crate) fn eval(&mut self, unit: &Arc<Unit>, env: &Environment, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(unit, env, id)).map_err(|action| match action {
            ControlAction::Error(error) => {
                ControlAction::Error(Box::new(unit.locate(*error, unit.arena.get_expr(id).span)))
            }
            other => other,
        })
    }

    fn eval_inner(&mut self, unit: &Arc<Unit>, env: &Environment, id: ExprId) -> EvalResult {
        let expr = unit.arena.get_expr(id);
        match &expr.kind {
            ExprKind::Int(_) | ExprKind::Float(_) | ExprKind::Str(_) | ExprKind::Bool(_) | ExprKind::Null => {
                Ok(constant(&expr.kind))
            }
            ExprKind::Template(parts) => Ok(Value::from(self.render_parts(unit, env, parts)?)),
            ExprKind::Regex { pattern, flags } => Ok(regex::new(pattern, flags)?),
            ExprKind::At { kind, text } => Ok(pseudo::from_at(*kind, text)?),
            ExprKind::AtTemplate { kind, parts } => {
                let text = self.render_parts(unit, env, parts)?;
                Ok(pseudo::from_at(*kind, &text)?)
            }
            ExprKind::Ident(name) => env.lookup(name).ok_or_else(|| undefined_variable(name).into()),
            ExprKind::Array(items) => Ok(Value::array(self.eval_list(unit, env, items)?)),
            ExprKind::Dict(entries) => self.eval_dict(unit, env, entries),
            ExprKind::Function { .. } => Ok(Value::Function(Arc::new(FunctionValue {
                name: None,
                unit: Arc::clone(unit),
                expr: id,
                env: env.clone(),
            }))),
            ExprKind::Block(stmts) => self.exec_block(unit, &env.child(), stmts),
            ExprKind::Call { func, args } => self.eval_call(unit, env, expr.span, *func, args),
            ExprKind::Index { target, index } => {
                let target = self.eval(unit, env, *target)?;
                let index = self.eval(unit, env, *index)?;
                self.index(&target, &index)
            }
            ExprKind::Slice { target, start, end } => {
                let target = self.eval(unit, env, *target)?;
                let start = self.slice_bound(unit, env, *start)?;
                let end = self.slice_bound(unit, env, *end)?;
                slice(&target, start, end)
            }
            ExprKind::Dot { target, name } => {
                let target = self.eval(unit, env, *target)?;
                self.member(&target, name)
            }
            ExprKind::Binary { op, left, right } => self.eval_binary(unit, env, *op, *left, *right),
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(unit, env, *operand)?;
                Ok(operators::unary(*op, &operand)?)
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(unit, env, *cond)?.is_truthy() {
                    self.eval(unit, env, *then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.eval(unit, env, *else_branch)
                } else {
                    Ok(Value::Null)
                }
            }
            ExprKind::For {
                bindings,
                iterable,
                body,
            } => self.eval_for(unit, env, bindings, *iterable, *body),
            ExprKind::Tag(tag) => self.eval_tag(unit, env, tag, expr.span),
            ExprKind::Import(target) => {
                let target = self.eval(unit, env, *target)?;
                self.import(&target, unit)
            }
            ExprKind::Error => Err(invalid_value("cannot evaluate an invalid expression").into()),
        }
    }

    pub(crate) fn eval_list(&mut self, unit: &Arc<Unit>, env: &Environment, ids: &[ExprId]) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(ids.len());
        for &id in ids {
            values.push(self.eval(unit, env, id)?);
        }
        Ok(values)
    }

    /// Text of an interpolated string or tag body.
    pub(crate) fn render_parts(
        &mut self,
        unit: &Arc<Unit>,
        env: &Environment,
        parts: &[TemplatePart],
    ) -> EvalResult<String> {
        let mut out = String::new();
        for part in parts {
            match part {
                TemplatePart::Text(text) => out.push_str(text),
                TemplatePart::Expr(id) => {
                    let value = self.eval(unit, env, *id)?;
                    out.push_str(&self.rendered(&value)?);
                }
            }
        }
        Ok(out)
    }

    /// Constant fields are stored evaluated; everything else waits for
    /// first access.
    fn eval_dict(&mut self, unit: &Arc<Unit>, env: &Environment, entries: &[DictEntry]) -> EvalResult {
        let mut data = DictData::new();
        for entry in entries {
            match entry {
                DictEntry::Field { key, value } => data.insert(key.as_str(), field_slot(unit, env, *value)),
                DictEntry::Computed { key, value } => {
                    let key = self.eval(unit, env, *key)?;
                    let key = self.rendered(&key)?;
                    data.insert(key, field_slot(unit, env, *value));
                }
                DictEntry::Spread(source) => match self.eval(unit, env, *source)? {
                    Value::Null => {}
                    Value::Dict(source) => {
                        for (key, slot) in source.read().iter() {
                            if matches!(slot, Slot::Forcing) {
                                return Err(self_referential_field(key).into());
                            }
                            data.insert(Arc::clone(key), slot.clone());
                        }
                    }
                    other => return Err(type_mismatch("dictionary", &other).into()),
                },
            }
        }
        Ok(Value::Dict(Dict::from_data(data)))
    }

    fn eval_call(&mut self, unit: &Arc<Unit>, env: &Environment, span: Span, func: ExprId, args: &[ExprId]) -> EvalResult {
        let site = CallSite { unit, span };
        if let ExprKind::Dot { target, name } = &unit.arena.get_expr(func).kind {
            let receiver = self.eval(unit, env, *target)?;
            let args = self.eval_list(unit, env, args)?;
            if let Some(result) = methods::dispatch(self, &receiver, name, args.clone(), &site) {
                return result;
            }
            let callee = match &receiver {
                Value::Dict(dict) => self.dict_member(dict, name)?,
                _ => None,
            };
            let Some(callee) = callee else {
                return Err(no_such_method(name, &receiver).into());
            };
            return self.call_value(&callee, args, &site);
        }
        let callee = self.eval(unit, env, func)?;
        let args = self.eval_list(unit, env, args)?;
        self.call_value(&callee, args, &site)
    }

    /// `target.name`.
    pub(crate) fn member(&mut self, target: &Value, name: &str) -> EvalResult {
        match target {
            Value::Dict(dict) => Ok(self.dict_member(dict, name)?.unwrap_or(Value::Null)),
            Value::Str(s) if name == "length" => Ok(count(s.chars().count())),
            Value::Array(items) if name == "length" => Ok(count(items.len())),
            Value::Error(error) => match name {
                "message" => Ok(Value::from(error.message.as_str())),
                "code" => Ok(Value::from(error.code().as_str())),
                "line" => Ok(error.position.map_or(Value::Null, |p| Value::Int(i64::from(p.line)))),
                "column" => Ok(error.position.map_or(Value::Null, |p| Value::Int(i64::from(p.column)))),
                _ => Err(no_such_property(name, target).into()),
            },
            other => Err(no_such_property(name, other).into()),
        }
    }

    /// Pseudo-type property, else the stored field.
    pub(crate) fn dict_member(&mut self, dict: &Dict, name: &str) -> EvalResult<Option<Value>> {
        if let Some(value) = pseudo::property(dict, name)? {
            return Ok(Some(value));
        }
        self.dict_get(dict, name)
    }

    /// `target[index]`. A string index on any value is the same as dot access.
    pub(crate) fn index(&mut self, target: &Value, index: &Value) -> EvalResult {
        match (target, index) {
            (Value::Array(items), Value::Int(i)) => {
                let at = position(*i, items.len()).ok_or_else(|| index_out_of_bounds(*i, items.len()))?;
                Ok(items[at].clone())
            }
            (Value::Str(s), Value::Int(i)) => {
                let chars: Vec<char> = s.chars().collect();
                let at = position(*i, chars.len()).ok_or_else(|| index_out_of_bounds(*i, chars.len()))?;
                Ok(Value::from(chars[at].to_string()))
            }
            (Value::Dict(dict), key) => {
                let key = self.rendered(key)?;
                Ok(self.dict_member(dict, &key)?.unwrap_or(Value::Null))
            }
            (_, Value::Str(name)) => self.member(target, name),
            (Value::Array(_) | Value::Str(_), other) => Err(type_mismatch("integer index", other).into()),
            (other, _) => Err(type_mismatch("array, string or dictionary", other).into()),
        }
    }

    fn slice_bound(&mut self, unit: &Arc<Unit>, env: &Environment, bound: Option<ExprId>) -> EvalResult<Option<i64>> {
        let Some(bound) = bound else {
            return Ok(None);
        };
        match self.eval(unit, env, bound)? {
            Value::Null => Ok(None),
            Value::Int(n) => Ok(Some(n)),
            other => Err(type_mismatch("integer", &other).into()),
        }
    }

    fn eval_binary(&mut self, unit: &Arc<Unit>, env: &Environment, op: BinaryOp, left: ExprId, right: ExprId) -> EvalResult {
        let lhs = self.eval(unit, env, left)?;
        let logical = matches!(lhs, Value::Bool(_));
        match op {
            BinaryOp::And => return self.logical_and(unit, env, &lhs, right),
            BinaryOp::Intersect if logical => return self.logical_and(unit, env, &lhs, right),
            BinaryOp::Or => return self.logical_or(unit, env, &lhs, right),
            BinaryOp::Union if logical => return self.logical_or(unit, env, &lhs, right),
            BinaryOp::Coalesce if !lhs.is_null() => return Ok(lhs),
            BinaryOp::Coalesce => return self.eval(unit, env, right),
            _ => {}
        }
        let rhs = self.eval(unit, env, right)?;
        if matches!(
            op,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Union | BinaryOp::Intersect | BinaryOp::Sub | BinaryOp::In
        ) {
            self.resolve(&lhs)?;
            self.resolve(&rhs)?;
        }
        Ok(operators::binary(op, &lhs, &rhs, self.limits.max_range_len)?)
    }

    fn logical_and(&mut self, unit: &Arc<Unit>, env: &Environment, lhs: &Value, right: ExprId) -> EvalResult {
        if !lhs.is_truthy() {
            return Ok(Value::Bool(false));
        }
        Ok(Value::Bool(self.eval(unit, env, right)?.is_truthy()))
    }

    fn logical_or(&mut self, unit: &Arc<Unit>, env: &Environment, lhs: &Value, right: ExprId) -> EvalResult {
        if lhs.is_truthy() {
            return Ok(Value::Bool(true));
        }
        Ok(Value::Bool(self.eval(unit, env, right)?.is_truthy()))
    }
}

fn constant(kind: &ExprKind) -> Value {
    match kind {
        ExprKind::Int(n) => Value::Int(*n),
        ExprKind::Float(f) => Value::Float(*f),
        ExprKind::Str(s) => Value::from(s.as_str()),
        ExprKind::Bool(b) => Value::Bool(*b),
        _ => Value::Null,
    }
}

fn field_slot(unit: &Arc<Unit>, env: &Environment, value: ExprId) -> Slot {
    let kind = &unit.arena.get_expr(value).kind;
    if kind.is_constant() {
        return Slot::Ready(constant(kind));
    }
    Slot::Pending(Thunk {
        unit: Arc::clone(unit),
        expr: value,
        env: env.clone(),
    })
}

fn count(n: usize) -> Value {
    Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Array position of index `i`; negative indices count from the end.
pub(crate) fn position(i: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let i = if i < 0 { i.checked_add(len)? } else { i };
    if (0..len).contains(&i) {
        usize::try_from(i).ok()
    } else {
        None
    }
}

/// Clamp slice bounds to `0..=len`, counting negative bounds from the end.
fn slice_range(start: Option<i64>, end: Option<i64>, len: usize) -> (usize, usize) {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let clamp = |i: i64| {
        let i = if i < 0 { i.saturating_add(len_i).max(0) } else { i.min(len_i) };
        usize::try_from(i).unwrap_or(0)
    };
    let start = start.map_or(0, clamp);
    let end = end.map_or(len, clamp);
    (start, end.max(start))
}

/// `target[start:end]`; always a new array or string.
fn slice(target: &Value, start: Option<i64>, end: Option<i64>) -> EvalResult {
    match target {
        Value::Array(items) => {
            let (start, end) = slice_range(start, end, items.len());
            Ok(Value::array(items[start..end].to_vec()))
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let (start, end) = slice_range(start, end, chars.len());
            Ok(Value::from(chars[start..end].iter().collect::<String>()))
        }
        other => Err(type_mismatch("array or string", other).into()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn negative_positions_count_from_the_end() {
        assert_eq!(position(0, 3), Some(0));
        assert_eq!(position(-1, 3), Some(2));
        assert_eq!(position(-3, 3), Some(0));
        assert_eq!(position(-4, 3), None);
        assert_eq!(position(3, 3), None);
        assert_eq!(position(i64::MIN, 3), None);
    }

    #[test]
    fn slice_bounds_clamp() {
        assert_eq!(slice_range(Some(1), Some(10), 4), (1, 4));
        assert_eq!(slice_range(None, None, 4), (0, 4));
        assert_eq!(slice_range(Some(-2), None, 4), (2, 4));
        assert_eq!(slice_range(Some(3), Some(1), 4), (3, 3));
        assert_eq!(slice_range(Some(-10), Some(-1), 4), (0, 3));
    }
}

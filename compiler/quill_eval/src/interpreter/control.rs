//! `for` loops.
//!
//! A loop is an expression: it yields the non-null body values in order,
//! so `for` maps and filters at once.

use std::sync::Arc;

use quill_ir::{ExprId, ForBindings};

use super::pattern::BindMode;
use super::Interpreter;
use crate::environment::Environment;
use crate::errors::{range_too_large, type_mismatch, ControlAction, EvalResult};
use crate::unit::Unit;
use crate::value::{Dict, Value};

/// What a loop walks over.
enum Items {
    Array(Arc<Vec<Value>>),
    Keys(Dict, Vec<Arc<str>>),
    Chars(Vec<char>),
    Count(usize),
}

impl Items {
    fn len(&self) -> usize {
        match self {
            Items::Array(items) => items.len(),
            Items::Keys(_, keys) => keys.len(),
            Items::Chars(chars) => chars.len(),
            Items::Count(n) => *n,
        }
    }
}

fn int(i: usize) -> Value {
    Value::Int(i64::try_from(i).unwrap_or(i64::MAX))
}

impl Interpreter {
    pub(crate) fn eval_for(
        &mut self,
        unit: &Arc<Unit>,
        env: &Environment,
        bindings: &ForBindings,
        iterable: ExprId,
        body: ExprId,
    ) -> EvalResult {
        let items = match self.eval(unit, env, iterable)? {
            Value::Null => return Ok(Value::array(Vec::new())),
            Value::Array(items) => Items::Array(items),
            Value::Dict(dict) => {
                let keys = dict.read().keys().cloned().collect();
                Items::Keys(dict, keys)
            }
            Value::Str(s) => Items::Chars(s.chars().collect()),
            Value::Int(n) => {
                let n = usize::try_from(n.max(0)).unwrap_or(usize::MAX);
                if n > self.limits.max_range_len {
                    return Err(range_too_large(u64::try_from(n).unwrap_or(u64::MAX), self.limits.max_range_len).into());
                }
                Items::Count(n)
            }
            other => return Err(type_mismatch("array, dictionary, string or integer", &other).into()),
        };

        let mut out = Vec::new();
        for i in 0..items.len() {
            // (index or key, element or value)
            let (key, item) = match &items {
                Items::Array(values) => (int(i), values[i].clone()),
                Items::Keys(dict, keys) => {
                    let key = Value::Str(Arc::clone(&keys[i]));
                    let value = match bindings.second {
                        Some(_) => self.dict_get(dict, &keys[i])?.unwrap_or(Value::Null),
                        None => key.clone(),
                    };
                    (key, value)
                }
                Items::Chars(chars) => (int(i), Value::from(chars[i].to_string())),
                Items::Count(_) => (int(i), int(i)),
            };

            let scope = env.child();
            let define = BindMode::Define { export: false };
            match bindings.second {
                Some(second) => {
                    self.bind_pattern(unit, &scope, bindings.first, key, define)?;
                    self.bind_pattern(unit, &scope, second, item, define)?;
                }
                None => self.bind_pattern(unit, &scope, bindings.first, item, define)?,
            }

            match self.eval(unit, &scope, body) {
                Ok(Value::Null) | Err(ControlAction::Continue) => {}
                Ok(value) => out.push(value),
                Err(ControlAction::Break) => break,
                Err(other) => return Err(other),
            }
        }
        Ok(Value::array(out))
    }
}

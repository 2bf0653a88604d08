//! Destructuring.
//!
//! Array patterns bind by position; missing elements bind null and a
//! trailing `...rest` collects what is left. Dictionary patterns bind by
//! key, going through pseudo-type properties like dot access does, so
//! `{year} = @2024-01-15` works. A null field takes the pattern default.

use std::sync::Arc;

use quill_ir::{PatternId, PatternKind};
use rustc_hash::FxHashSet;

use super::Interpreter;
use crate::environment::Environment;
use crate::errors::{self_referential_field, type_mismatch, EvalResult};
use crate::unit::Unit;
use crate::value::{Dict, DictData, Slot, Value};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum BindMode {
    /// `let`, parameters, loop variables: new bindings in the current scope.
    Define { export: bool },
    /// Plain `=`: update the nearest existing binding.
    Assign,
}

impl BindMode {
    fn bind(self, env: &Environment, name: &str, value: Value) {
        match self {
            BindMode::Define { export } => env.define_with(name, value, export),
            BindMode::Assign => env.assign(name, value),
        }
    }
}

impl Interpreter {
    pub(crate) fn bind_pattern(
        &mut self,
        unit: &Arc<Unit>,
        env: &Environment,
        id: PatternId,
        value: Value,
        mode: BindMode,
    ) -> EvalResult<()> {
        match &unit.arena.get_pattern(id).kind {
            PatternKind::Ident(name) => {
                mode.bind(env, name, value);
                Ok(())
            }
            PatternKind::Array { elements, rest } => {
                let Value::Array(items) = &value else {
                    return Err(type_mismatch("array", &value).into());
                };
                for (i, &element) in elements.iter().enumerate() {
                    let item = items.get(i).cloned().unwrap_or(Value::Null);
                    self.bind_pattern(unit, env, element, item, mode)?;
                }
                if let Some(rest) = rest {
                    let tail = items.get(elements.len()..).map(<[Value]>::to_vec).unwrap_or_default();
                    mode.bind(env, rest, Value::array(tail));
                }
                Ok(())
            }
            PatternKind::Dict { fields, rest } => {
                let Value::Dict(dict) = &value else {
                    return Err(type_mismatch("dictionary", &value).into());
                };
                for field in fields {
                    let mut item = self.dict_member(dict, &field.key)?.unwrap_or(Value::Null);
                    if let (true, Some(default)) = (item.is_null(), field.default) {
                        item = self.eval(unit, env, default)?;
                    }
                    match field.nested {
                        Some(nested) => self.bind_pattern(unit, env, nested, item, mode)?,
                        None => mode.bind(env, field.binding_name(), item),
                    }
                }
                if let Some(rest) = rest {
                    let taken: FxHashSet<&str> = fields.iter().map(|field| field.key.as_str()).collect();
                    let mut remaining = DictData::new();
                    for (key, slot) in dict.read().iter() {
                        if taken.contains(&**key) {
                            continue;
                        }
                        if matches!(slot, Slot::Forcing) {
                            return Err(self_referential_field(key).into());
                        }
                        remaining.insert(Arc::clone(key), slot.clone());
                    }
                    mode.bind(env, rest, Value::Dict(Dict::from_data(remaining)));
                }
                Ok(())
            }
        }
    }
}

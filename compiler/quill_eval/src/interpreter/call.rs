//! Function calls.
//!
//! A call frame is a child of the function's captured environment, not of
//! the caller's. Missing arguments bind their default or null; extra
//! arguments are an arity error. `return` unwinds to here as
//! [`ControlAction::Return`].

use std::sync::Arc;

use quill_ir::{ExprId, ExprKind, Param};

use super::pattern::BindMode;
use super::Interpreter;
use crate::builtins::CallSite;
use crate::errors::{arity_mismatch, not_callable, stack_overflow, ControlAction, EvalResult};
use crate::value::{FunctionValue, Value};

const ANONYMOUS: &str = "<anonymous>";

fn callee_name(callee: &Value) -> &str {
    match callee {
        Value::Function(function) => function.name.as_deref().unwrap_or(ANONYMOUS),
        Value::Builtin(builtin) => builtin.name,
        _ => "",
    }
}

impl Interpreter {
    /// Call a function or builtin with evaluated arguments.
    #[tracing::instrument(level = "debug", skip_all, fields(callee = callee_name(callee), args = args.len()))]
    pub(crate) fn call_value(&mut self, callee: &Value, args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
        match callee {
            Value::Function(function) => self.call_function(function, args),
            Value::Builtin(builtin) => builtin.call(self, args, site),
            other => Err(not_callable(other).into()),
        }
    }

    fn call_function(&mut self, function: &Arc<FunctionValue>, args: Vec<Value>) -> EvalResult {
        let ExprKind::Function { params, body } = &function.unit.arena.get_expr(function.expr).kind else {
            return Err(not_callable(&Value::Function(Arc::clone(function))).into());
        };
        if args.len() > params.len() {
            let name = function.name.as_deref().unwrap_or(ANONYMOUS);
            return Err(arity_mismatch(name, format!("at most {}", params.len()), args.len()).into());
        }
        if self.call_depth.enter().is_err() {
            return Err(stack_overflow(self.call_depth.max()).into());
        }
        let result = self.invoke(function, params, *body, args);
        self.call_depth.exit();

        match result {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(action) => Err(ControlAction::Error(action.into_error())),
        }
    }

    fn invoke(
        &mut self,
        function: &FunctionValue,
        params: &[Param],
        body: ExprId,
        args: Vec<Value>,
    ) -> EvalResult {
        let unit = &function.unit;
        let frame = function.env.child();
        let mut args = args.into_iter();
        for param in params {
            let mut value = args.next().unwrap_or(Value::Null);
            if let (true, Some(default)) = (value.is_null(), param.default) {
                value = self.eval(unit, &frame, default)?;
            }
            self.bind_pattern(unit, &frame, param.pattern, value, BindMode::Define { export: false })?;
        }
        match &unit.arena.get_expr(body).kind {
            ExprKind::Block(stmts) => self.exec_block(unit, &frame, stmts),
            _ => self.eval(unit, &frame, body),
        }
    }
}

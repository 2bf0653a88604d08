//! Shared helpers for program tests.

use quill_eval::{buffer_handler, EvalError, Interpreter, RunError};

/// Interpreter that captures printed output.
pub fn interpreter() -> Interpreter {
    Interpreter::builder().print_handler(buffer_handler()).build()
}

/// Rendered top-level output of `source`.
pub fn run(source: &str) -> String {
    interpreter().eval_source(source).unwrap().rendered()
}

/// The runtime error `source` stops with.
pub fn run_err(source: &str) -> EvalError {
    runtime_error(interpreter().eval_source(source))
}

pub fn runtime_error(result: Result<quill_eval::Evaluation, RunError>) -> EvalError {
    match result {
        Err(RunError::Runtime(error)) => *error,
        Err(RunError::Syntax { errors }) => panic!("syntax errors: {errors:?}"),
        Ok(evaluation) => panic!("expected an error, got {:?}", evaluation.value),
    }
}

//! The `run` command: evaluate a script and print its output.

use std::path::Path;
use std::sync::Arc;

use quill_eval::{stdout_handler, Evaluation, Interpreter, RunError, SharedPrintHandler};

use super::{read_file, report_runtime_error, report_syntax_errors, stderr_emitter};
use crate::RunOptions;

/// Run a script, printing its output to stdout and any error to stderr.
///
/// Returns whether the script ran to completion.
pub fn run_file(options: &RunOptions) -> bool {
    let source = read_file(&options.file);
    let canonical = std::fs::canonicalize(&options.file).ok();
    let mut emitter = stderr_emitter();

    match execute(options, &source, stdout_handler()) {
        Ok(evaluation) => {
            let rendered = evaluation.rendered();
            if !rendered.is_empty() {
                println!("{rendered}");
            }
            true
        }
        Err(RunError::Syntax { errors }) => {
            let name = options.file.display().to_string();
            report_syntax_errors(&mut emitter, &name, &source, &errors);
            false
        }
        Err(RunError::Runtime(error)) => {
            report_runtime_error(
                &mut emitter,
                &error,
                (&options.file, &source),
                canonical.as_deref(),
            );
            false
        }
    }
}

/// Evaluate `source` as the script at `options.file`, sending prints to
/// `handler`.
#[tracing::instrument(level = "debug", skip_all, fields(file = %options.file.display()))]
pub fn execute(options: &RunOptions, source: &str, handler: SharedPrintHandler) -> Result<Evaluation, RunError> {
    let entry = std::fs::canonicalize(&options.file).unwrap_or_else(|_| options.file.clone());
    let script_dir = entry.parent().unwrap_or(Path::new("/")).to_path_buf();

    let mut builder = Interpreter::builder()
        .print_handler(handler)
        .policy(Arc::new(options.policy(&script_dir)))
        .entry_file(&entry);
    if let Some(depth) = options.max_depth {
        builder = builder.max_call_depth(depth);
    }
    builder.build().eval_source(source)
}

//! Quill Eval - tree-walking evaluator and module loader for Quill.
//!
//! # Architecture
//!
//! - [`Value`]: a closed tagged union. Dates, durations, paths, URLs,
//!   regexes and file handles are dictionaries tagged with `__type`
//!   ([`pseudo`]).
//! - [`Environment`]: reference-counted scopes with a parent link; closures
//!   keep the scope they were created in.
//! - [`Interpreter`]: walks the AST of a [`Unit`]. Errors and
//!   `return`/`break`/`continue` travel as [`ControlAction`] through `?`.
//! - [`module`]: import resolution, the shared [`ModuleCache`] and the
//!   [`ModuleSource`] abstraction over the filesystem.
//! - [`policy`]: the [`SecurityPolicy`] consulted before file access and
//!   imports.
//!
//! # Example
//!
//! ```
//! use quill_eval::{buffer_handler, Interpreter};
//!
//! let mut interp = Interpreter::builder().print_handler(buffer_handler()).build();
//! let result = interp.eval_source("let xs = 1, 2, 3\nfor (x in xs) { x * 2 }").unwrap();
//! assert_eq!(result.rendered(), "246");
//! ```

pub mod builtins;
pub mod codecs;
mod environment;
pub mod errors;
pub mod interpreter;
mod methods;
pub mod module;
pub mod operators;
pub mod paths;
pub mod policy;
mod print_handler;
pub mod pseudo;
mod unit;
mod value;

pub use environment::{Binding, Environment};
pub use errors::{ControlAction, EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{Evaluation, Interpreter, InterpreterBuilder, Limits, RunError};
pub use methods::natural_cmp;
pub use module::{FsSource, MemorySource, ModuleCache, ModuleLoader, ModuleSource, SourceError};
pub use policy::{DefaultPolicy, Operation, PermissionError, RootedPolicy, SecurityPolicy};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandler, SharedPrintHandler,
};
pub use unit::Unit;
pub use value::{render, Dict, DictData, FunctionValue, Slot, Thunk, Value};

//! Command-line driver for Quill.
//!
//! The `quill` binary is a thin argument dispatcher over [`commands`]; the
//! pieces that need testing (option parsing, running a script into a
//! buffer) live here in the library.

pub mod commands;
pub mod options;
mod tracing_setup;

pub use options::{OptionsError, RunOptions};
pub use tracing_setup::init_tracing;

//! Parser tests.
//!
//! - `expr`: operators, literals, postfix forms, control flow
//! - `stmt`: bindings, destructuring, read/write, statement boundaries
//! - `tag`: markup, components, raw-text bodies
//! - `errors`: diagnostics and recovery
//! - `props`: property tests

mod props;
mod stmt;

use crate::dump::dump_program;
use crate::{parse, ParseError};

/// Parse `source`, assert it has no errors, and dump it.
fn parse_ok(source: &str) -> String {
    let output = parse(source);
    assert!(
        output.errors.is_empty(),
        "unexpected errors for {source:?}: {:?}",
        output.errors
    );
    dump_program(&output.program, &output.arena)
}

/// Parse `source` and return its errors.
fn parse_errors(source: &str) -> Vec<ParseError> {
    parse(source).errors
}

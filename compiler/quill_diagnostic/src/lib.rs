//! Diagnostic system for Quill.
//!
//! Every reported problem carries:
//! - an error code for searchability
//! - a message (what went wrong)
//! - a primary label (where it went wrong), plus context labels
//! - optional notes and one help line
//!
//! The engine only produces [`Diagnostic`] values; rendering them with
//! source context is done by an [`emitter`].

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label, LabelStyle};
pub use error_code::{ErrorCode, Phase};

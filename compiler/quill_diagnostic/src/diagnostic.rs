use std::fmt;

use quill_ir::Span;

use crate::ErrorCode;

/// How a label is drawn under the source line.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LabelStyle {
    /// Where the problem is; underlined with `^`.
    Primary,
    /// Related location, such as the bracket that was never closed; underlined with `-`.
    Context,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn is_primary(&self) -> bool {
        self.style == LabelStyle::Primary
    }
}

/// One reported error: a code, a headline and the places it points at.
///
/// Quill stops at the first runtime error and reports every syntax error,
/// so every diagnostic is an error; there is no warning tier.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "a diagnostic does nothing until it is emitted"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            help: None,
        }
    }

    /// Point at the offending span.
    pub fn with_label(self, span: Span, message: impl Into<String>) -> Self {
        self.label(span, message.into(), LabelStyle::Primary)
    }

    /// Point at a related span.
    pub fn with_context(self, span: Span, message: impl Into<String>) -> Self {
        self.label(span, message.into(), LabelStyle::Context)
    }

    fn label(mut self, span: Span, message: String, style: LabelStyle) -> Self {
        self.labels.push(Label { span, message, style });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|label| label.is_primary()).map(|label| label.span)
    }
}

/// Plain one-line-per-part form, used when no source text is at hand.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        for label in &self.labels {
            let marker = match label.style {
                LabelStyle::Primary => "-->",
                LabelStyle::Context => ":::",
            };
            write!(f, "\n  {marker} {:?}: {}", label.span, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        if let Some(help) = &self.help {
            write!(f, "\n  = help: {help}")?;
        }
        Ok(())
    }
}

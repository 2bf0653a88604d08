//! Rendering diagnostics for a terminal.
//!
//! ```text
//! error[E1003]: unclosed `(` opened at 2:9: expected `)`, found `}`
//!   ::: page.quill:2:9
//!    |
//!  2 | let x = (1 + }
//!    |         - `(` opened here
//!   --> page.quill:2:14
//!    |
//!  2 | let x = (1 + }
//!    |              ^ unclosed delimiter
//! ```

use std::io::{self, Write};

use quill_ir::Span;

use crate::{Diagnostic, Label, LabelStyle};

use super::{DiagnosticEmitter, SourceFile};

mod ansi {
    pub const RED: &str = "\x1b[1;31m";
    pub const BLUE: &str = "\x1b[1;34m";
    pub const GREEN: &str = "\x1b[1;32m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// When to color output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Only when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

pub struct TerminalEmitter<W: Write> {
    out: W,
    colors: bool,
}

impl TerminalEmitter<io::Stderr> {
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(out: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            out,
            colors: mode.should_use_colors(is_tty),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&mut self, text: &str, color: &str) {
        let _ = if self.colors {
            write!(self.out, "{color}{text}{}", ansi::RESET)
        } else {
            write!(self.out, "{text}")
        };
    }

    fn label_color(style: LabelStyle) -> &'static str {
        match style {
            LabelStyle::Primary => ansi::RED,
            LabelStyle::Context => ansi::BLUE,
        }
    }

    /// `error[E1003]: message`
    fn headline(&mut self, diagnostic: &Diagnostic) {
        self.paint("error", ansi::RED);
        self.paint(&format!("[{}]", diagnostic.code), ansi::BOLD);
        let _ = writeln!(self.out, ": {}", diagnostic.message);
    }

    /// `--> file:line:col`, the source line, then the underline and the
    /// label's message.
    fn snippet(&mut self, label: &Label, source: SourceFile<'_>) {
        let pos = source.index.span_start(label.span);
        let gutter = " ".repeat(pos.line.to_string().len());
        let arrow = match label.style {
            LabelStyle::Primary => "-->",
            LabelStyle::Context => ":::",
        };
        let _ = writeln!(self.out, "{gutter} {arrow} {}:{pos}", source.name);

        let Some(line) = source.index.line_text(pos.line) else {
            return;
        };
        let _ = writeln!(self.out, "{gutter} |");
        let _ = writeln!(self.out, "{} | {line}", pos.line);

        let column = (pos.column as usize)
            .saturating_sub(1)
            .min(line.chars().count());
        // Keep tabs so the underline lines up with the text above it.
        let lead: String = line
            .chars()
            .take(column)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        let mark = match label.style {
            LabelStyle::Primary => "^",
            LabelStyle::Context => "-",
        };
        let underline = mark.repeat(underline_width(label.span, line, column));

        let _ = write!(self.out, "{gutter} | {lead}");
        let color = Self::label_color(label.style);
        self.paint(&underline, color);
        if !label.message.is_empty() {
            let _ = write!(self.out, " ");
            self.paint(&label.message, color);
        }
        let _ = writeln!(self.out);
    }

    /// Label without source text: just the byte range.
    fn bare_label(&mut self, label: &Label) {
        let _ = write!(self.out, "  --> {:?}: ", label.span);
        self.paint(&label.message, Self::label_color(label.style));
        let _ = writeln!(self.out);
    }

    fn trailer(&mut self, kind: &str, color: &str, text: &str) {
        let _ = write!(self.out, "  = ");
        self.paint(kind, color);
        let _ = writeln!(self.out, ": {text}");
    }
}

/// At least one column, never past the end of the line.
fn underline_width(span: Span, line: &str, column: usize) -> usize {
    let rest = line.chars().count().saturating_sub(column);
    (span.len() as usize).min(rest).max(1)
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, source: Option<SourceFile<'_>>) {
        self.headline(diagnostic);
        for label in &diagnostic.labels {
            match source {
                Some(source) if label.span != Span::DUMMY => self.snippet(label, source),
                _ => self.bare_label(label),
            }
        }
        for note in &diagnostic.notes {
            self.trailer("note", ansi::BOLD, note);
        }
        if let Some(help) = &diagnostic.help {
            self.trailer("help", ansi::GREEN, help);
        }
        let _ = writeln!(self.out);
    }

    fn flush(&mut self) {
        let _ = self.out.flush();
    }

    fn emit_summary(&mut self, error_count: usize) {
        if error_count == 0 {
            return;
        }
        self.paint("error", ansi::RED);
        let what = if error_count == 1 {
            "previous error".to_string()
        } else {
            format!("{error_count} previous errors")
        };
        let _ = writeln!(self.out, ": aborting due to {what}");
    }
}

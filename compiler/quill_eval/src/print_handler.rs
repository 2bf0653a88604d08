//! Where `print`, `println` and writes to `@stdout`/`@stderr` go.
//!
//! The binary prints to the process streams; tests and embedders capture
//! into a buffer. Enum dispatch keeps the set of handlers closed.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Captured standard output and standard error.
#[derive(Default)]
pub struct BufferPrintHandler {
    out: Mutex<String>,
    err: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> String {
        self.out.lock().clone()
    }

    pub fn errors(&self) -> String {
        self.err.lock().clone()
    }

    pub fn clear(&self) {
        self.out.lock().clear();
        self.err.lock().clear();
    }
}

pub enum PrintHandler {
    /// The process's stdout and stderr.
    Stdout,
    Buffer(BufferPrintHandler),
    /// Discards everything.
    Silent,
}

impl PrintHandler {
    pub fn print(&self, text: &str) {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
            Self::Buffer(buffer) => buffer.out.lock().push_str(text),
            Self::Silent => {}
        }
    }

    pub fn println(&self, text: &str) {
        match self {
            Self::Stdout => println!("{text}"),
            Self::Buffer(buffer) => {
                let mut out = buffer.out.lock();
                out.push_str(text);
                out.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Write to standard error.
    pub fn eprint(&self, text: &str) {
        match self {
            Self::Stdout => eprint!("{text}"),
            Self::Buffer(buffer) => buffer.err.lock().push_str(text),
            Self::Silent => {}
        }
    }

    /// Captured stdout text; empty for handlers that do not capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buffer) => buffer.output(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    /// Captured stderr text; empty for handlers that do not capture.
    pub fn errors(&self) -> String {
        match self {
            Self::Buffer(buffer) => buffer.errors(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }
}

pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn buffer_captures_streams_separately() {
        let handler = buffer_handler();
        handler.print("a");
        handler.println("b");
        handler.eprint("oops");
        assert_eq!(handler.output(), "ab\n");
        assert_eq!(handler.errors(), "oops");
    }

    #[test]
    fn clear_empties_both_streams() {
        let buffer = BufferPrintHandler::new();
        let handler = PrintHandler::Buffer(buffer);
        handler.println("x");
        handler.eprint("y");
        if let PrintHandler::Buffer(buffer) = &handler {
            buffer.clear();
        }
        assert_eq!(handler.output(), "");
        assert_eq!(handler.errors(), "");
    }

    #[test]
    fn silent_discards() {
        let handler = silent_handler();
        handler.println("hello");
        handler.eprint("world");
        assert_eq!(handler.output(), "");
        assert_eq!(handler.errors(), "");
    }

    #[test]
    fn buffer_is_shared_across_threads() {
        let handler = buffer_handler();
        let other = Arc::clone(&handler);
        let worker = std::thread::spawn(move || {
            for _ in 0..50 {
                other.println("a");
            }
        });
        for _ in 0..50 {
            handler.println("b");
        }
        worker.join().unwrap();
        assert_eq!(handler.output().lines().count(), 100);
    }
}

//! Render trace: the append-only history of what a render pass did.
//!
//! The file cache, block helpers and crash reports all write to a
//! [`TraceSink`]. [`RenderTrace`] records the lines so that a failed render
//! can print the history leading up to the failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

// =============================================================================
// TraceSink
// =============================================================================

/// Destination for human-readable progress lines.
///
/// Sinks are append-only: producers never read back what they pushed, and
/// nothing pushed here may influence cache behavior.
///
/// # Example
///
/// ```ignore
/// use render_cache::TraceSink;
///
/// struct Stderr;
///
/// impl TraceSink for Stderr {
///     fn push(&self, line: &str) {
///         eprintln!("{line}");
///     }
/// }
/// ```
pub trait TraceSink {
    /// Append one line.
    fn push(&self, line: &str);
}

impl<T: TraceSink + ?Sized> TraceSink for &T {
    fn push(&self, line: &str) {
        (**self).push(line);
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Arc<T> {
    fn push(&self, line: &str) {
        (**self).push(line);
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    fn push(&self, line: &str) {
        (**self).push(line);
    }
}

/// Sink that drops every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn push(&self, _line: &str) {}
}

// =============================================================================
// RenderTrace
// =============================================================================

/// Recording sink shared by everything taking part in one render pass.
///
/// Thread-safe: lines may be pushed through `&self` from any thread.
#[derive(Debug)]
pub struct RenderTrace {
    inner: Mutex<TraceState>,
    echo: bool,
}

#[derive(Debug, Default)]
struct TraceState {
    lines: Vec<String>,
    paths: Vec<PathBuf>,
}

impl RenderTrace {
    /// Create an empty trace, echoing to stderr if the global config asks for it.
    pub fn new() -> Self {
        Self::with_echo(crate::config::get().echo)
    }

    /// Create an empty trace with explicit echo behavior.
    pub fn with_echo(echo: bool) -> Self {
        Self {
            inner: Mutex::new(TraceState::default()),
            echo,
        }
    }

    /// Record that rendering of `path` has started.
    ///
    /// The path is remembered for crash reports.
    pub fn enter(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.push(&format!("→ render {}", path.display()));
        self.inner.lock().paths.push(path.to_path_buf());
    }

    /// Snapshot of all recorded lines.
    pub fn lines(&self) -> Vec<String> {
        self.inner.lock().lines.clone()
    }

    /// Snapshot of all entered paths, in order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.inner.lock().paths.clone()
    }

    /// Number of recorded lines.
    pub fn len(&self) -> usize {
        self.inner.lock().lines.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().lines.is_empty()
    }

    /// The whole history, one line per entry.
    pub fn print(&self) -> String {
        self.inner.lock().lines.join("\n")
    }
}

impl Default for RenderTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSink for RenderTrace {
    fn push(&self, line: &str) {
        if self.echo {
            eprintln!("{line}");
        }
        self.inner.lock().lines.push(line.to_owned());
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_print() {
        let trace = RenderTrace::with_echo(false);
        assert!(trace.is_empty());

        trace.push("first");
        trace.push("  second");

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.print(), "first\n  second");
    }

    #[test]
    fn test_enter_records_path() {
        let trace = RenderTrace::with_echo(false);
        trace.enter("pages/index.ejs");
        trace.enter("pages/about.ejs");

        assert_eq!(
            trace.paths(),
            vec![PathBuf::from("pages/index.ejs"), PathBuf::from("pages/about.ejs")]
        );
        assert_eq!(trace.lines()[0], "→ render pages/index.ejs");
    }

    #[test]
    fn test_forwarding_impls() {
        let trace = Arc::new(RenderTrace::with_echo(false));

        let by_ref: &RenderTrace = &trace;
        by_ref.push("ref");
        Arc::clone(&trace).push("arc");
        let boxed: Box<dyn TraceSink> = Box::new(Arc::clone(&trace));
        boxed.push("box");

        assert_eq!(trace.lines(), vec!["ref", "arc", "box"]);
    }

    #[test]
    fn test_thread_safety() {
        use std::thread;

        let trace = Arc::new(RenderTrace::with_echo(false));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let trace = Arc::clone(&trace);
                thread::spawn(move || {
                    for _ in 0..50 {
                        trace.push("line");
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(trace.len(), 400);
    }
}

//! Render diagnostics: cache errors, render traces and crash reports.

mod error;
mod format;
mod trace;

// Re-export all public types
pub use error::{CacheError, Result};
pub use format::{CRASH_MARKER, CrashReport, rerender_notice, rerender_notice_with};
pub use trace::{NoTrace, RenderTrace, TraceSink};

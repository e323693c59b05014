//! Crash report formatting.
//!
//! When a render fails the pipeline prints the render history recorded in
//! the [`RenderTrace`] together with the error that stopped it.

use std::error::Error;
use std::fmt;
use std::path::Path;

use chrono::Local;

use super::trace::{RenderTrace, TraceSink};
use crate::config::{self, Config};

// ============================================================================
// Coloring
// ============================================================================

/// Palette used by reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Frame,
    Crash,
    Body,
    Muted,
}

#[cfg(feature = "colored-diagnostics")]
fn colorize(text: &str, tone: Tone) -> String {
    use owo_colors::{OwoColorize, Stream};
    match tone {
        Tone::Frame => text.if_supports_color(Stream::Stderr, |t| t.yellow()).to_string(),
        Tone::Crash => text.if_supports_color(Stream::Stderr, |t| t.red()).to_string(),
        Tone::Body => text.if_supports_color(Stream::Stderr, |t| t.white()).to_string(),
        Tone::Muted => text
            .if_supports_color(Stream::Stderr, |t| t.bright_black())
            .to_string(),
    }
}

#[cfg(not(feature = "colored-diagnostics"))]
fn colorize(text: &str, _tone: Tone) -> String {
    text.to_owned()
}

/// Get paint function based on config.
fn paint(config: &Config, tone: Tone) -> Box<dyn Fn(&str) -> String> {
    if config.colored {
        Box::new(move |s| colorize(s, tone))
    } else {
        Box::new(|s: &str| s.to_owned())
    }
}

/// Disable colored output globally (for tests).
#[cfg(all(test, feature = "colored-diagnostics"))]
pub fn disable_colors() {
    owo_colors::set_override(false);
}

// ============================================================================
// Crash Report
// ============================================================================

/// Marker pushed to the trace when a crash report is built.
pub const CRASH_MARKER: &str = "→ CRASH...";

/// Report printed after a failed render.
///
/// # Example
///
/// ```ignore
/// if let Err(err) = render(&mut session, path) {
///     CrashReport::new(Some(&err), session.trace()).eprint();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CrashReport {
    history: String,
    message: String,
    paths: Vec<String>,
    timestamp: String,
}

impl CrashReport {
    /// Build a report from the error (if any) and the trace so far.
    ///
    /// Pushes [`CRASH_MARKER`] to the trace first, so the history ends with it.
    pub fn new(error: Option<&dyn Error>, trace: &RenderTrace) -> Self {
        trace.push(CRASH_MARKER);
        let message = match error {
            Some(err) => collapse_blank_lines(&error_chain(err)),
            None => "no errors".to_string(),
        };
        Self {
            history: trace.print(),
            message,
            paths: trace
                .paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    /// The cleaned-up error text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Format with the global configuration.
    pub fn format(&self) -> String {
        self.format_with(config::get())
    }

    /// Format with an explicit configuration.
    pub fn format_with(&self, config: &Config) -> String {
        let frame = paint(config, Tone::Frame);
        let body = paint(config, Tone::Body);
        let crash = paint(config, Tone::Crash);
        let muted = paint(config, Tone::Muted);

        let mut sections = vec![
            frame(&config.divider),
            frame(&format!("{} errors reports: [{}]", config.name, self.timestamp)),
            frame("\n>>> render history:"),
            body(&self.history).replace(CRASH_MARKER, &crash(CRASH_MARKER)),
            frame("\n>>> render report:"),
            body(&self.message),
        ];
        if !self.paths.is_empty() {
            sections.push(frame("\n>>> rendered files:"));
            sections.extend(self.paths.iter().map(|p| muted(p)));
        }
        sections.push(frame(&config.divider));
        sections.push(frame("Reports end!"));
        sections.join("\n")
    }

    /// Write the report to stderr.
    pub fn eprint(&self) {
        eprintln!("{self}");
    }
}

impl fmt::Display for CrashReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Notice printed before re-rendering a crashed file with debug output enabled.
pub fn rerender_notice(path: &Path) -> String {
    rerender_notice_with(path, config::get())
}

/// [`rerender_notice`] with an explicit configuration.
pub fn rerender_notice_with(path: &Path, config: &Config) -> String {
    let frame = paint(config, Tone::Frame);
    [
        config.divider.clone(),
        format!("Oops! {} crashed while render file:", config.name),
        path.display().to_string(),
        "debug output is disabled.".to_string(),
        "Starting re-render to detect what went wrong ...".to_string(),
    ]
    .iter()
    .map(|line| frame(line))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Render an error with its `source()` chain, one cause per line.
fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

fn collapse_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::CacheError;
    use std::io;

    fn plain() -> Config {
        crate::config::ConfigBuilder::new()
            .name("site")
            .divider("====")
            .colored(false)
            .build()
    }

    #[test]
    fn test_report_without_error() {
        let trace = RenderTrace::with_echo(false);
        trace.push("  caching new file");

        let report = CrashReport::new(None, &trace);
        assert_eq!(report.message(), "no errors");

        let text = report.format_with(&plain());
        assert!(text.starts_with("====\nsite errors reports: ["));
        assert!(text.contains(">>> render history:\n  caching new file\n→ CRASH..."));
        assert!(text.contains(">>> render report:\nno errors"));
        assert!(text.ends_with("====\nReports end!"));
    }

    #[test]
    fn test_report_pushes_crash_marker() {
        let trace = RenderTrace::with_echo(false);
        let _ = CrashReport::new(None, &trace);
        assert_eq!(trace.lines(), vec![CRASH_MARKER]);
    }

    #[test]
    fn test_report_includes_error_chain() {
        let trace = RenderTrace::with_echo(false);
        trace.enter("pages/index.ejs");
        let err = CacheError::io(
            "partials/missing.ejs",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );

        let report = CrashReport::new(Some(&err as &dyn Error), &trace);
        assert!(report.message().contains("partials/missing.ejs"));
        assert!(report.message().contains("caused by: gone"));

        let text = report.format_with(&plain());
        assert!(text.contains(">>> rendered files:\npages/index.ejs"));
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\nb\n  \nc"), "a\nb\nc");
    }

    #[test]
    fn test_rerender_notice() {
        let text = rerender_notice_with(Path::new("pages/index.ejs"), &plain());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "====");
        assert_eq!(lines[1], "Oops! site crashed while render file:");
        assert_eq!(lines[2], "pages/index.ejs");
    }

    #[cfg(feature = "colored-diagnostics")]
    #[test]
    fn test_colored_config_with_override_off() {
        disable_colors();
        let config = Config {
            colored: true,
            ..plain()
        };
        let text = rerender_notice_with(Path::new("a.ejs"), &config);
        assert!(!text.contains('\u{1b}'));
    }
}

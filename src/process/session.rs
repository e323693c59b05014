//! Render session tying the cache, blocks and trace of one pass together.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use super::block::{Block, BlockMethod, Blocks};
use crate::diagnostic::{CrashReport, RenderTrace, Result};
use crate::resource::file::{CacheEntry, DiskFs, FetchOptions, FileCache, Filesystem};

/// State shared by everything rendered in one pass.
///
/// Create one session per rendering pass; dropping it drops the file store.
///
/// # Example
///
/// ```ignore
/// let mut session = RenderSession::new();
/// session.enter(path);
/// let entry = session.fetch(path)?;
/// if entry.changed {
///     recompile(entry.text().unwrap_or_default());
/// }
/// ```
pub struct RenderSession<F = DiskFs> {
    trace: Arc<RenderTrace>,
    files: FileCache<Arc<RenderTrace>, F>,
    blocks: Blocks<Arc<RenderTrace>>,
}

impl RenderSession {
    /// Start a session reading from disk.
    pub fn new() -> Self {
        Self::with_fs(DiskFs)
    }
}

impl Default for RenderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Filesystem> RenderSession<F> {
    /// Start a session over the given filesystem.
    pub fn with_fs(fs: F) -> Self {
        Self::with_trace(Arc::new(RenderTrace::new()), fs)
    }

    /// Start a session recording into an existing trace.
    pub fn with_trace(trace: Arc<RenderTrace>, fs: F) -> Self {
        Self {
            files: FileCache::with_fs(Arc::clone(&trace), fs),
            blocks: Blocks::new(Arc::clone(&trace)),
            trace,
        }
    }

    /// Record that rendering of `path` has started.
    pub fn enter(&self, path: impl AsRef<Path>) {
        self.trace.enter(path);
    }

    /// Fetch a file through the session cache.
    pub fn fetch(&mut self, path: impl AsRef<Path>) -> Result<CacheEntry> {
        self.files.fetch(path)
    }

    /// Fetch a file through the session cache with options.
    pub fn fetch_with(
        &mut self,
        path: impl AsRef<Path>,
        options: FetchOptions,
    ) -> Result<CacheEntry> {
        self.files.fetch_with(path, options)
    }

    /// Add markup to a named block.
    pub fn block(&mut self, name: &str, markup: impl Into<String>, method: BlockMethod) -> &Block {
        self.blocks.block(name, markup, method)
    }

    /// Joined content of a named block.
    pub fn render_block(&self, name: &str) -> String {
        self.blocks.render(name)
    }

    /// The session trace.
    pub fn trace(&self) -> &RenderTrace {
        &self.trace
    }

    /// The session file cache.
    pub fn files(&self) -> &FileCache<Arc<RenderTrace>, F> {
        &self.files
    }

    /// Build a crash report from the session trace.
    pub fn crash_report(&self, error: Option<&dyn Error>) -> CrashReport {
        CrashReport::new(error, &self.trace)
    }
}

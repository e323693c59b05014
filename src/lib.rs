//! # render-cache
//!
//! File access and bookkeeping for template rendering passes.
//!
//! A rendering pipeline renders the same layouts and partials again and
//! again. This crate keeps their content between passes and rereads a file
//! only when its modification time moved:
//!
//! - **File cache**: mtime-keyed, with cache bypass and deferred reads
//! - **Render trace**: one human-readable line per cache decision
//! - **Blocks**: named markup fragments filled by any template in the pass
//! - **Crash reports**: the render history printed when a pass fails
//!
//! ## Quick Start
//!
//! ```ignore
//! use render_cache::prelude::*;
//!
//! let mut session = RenderSession::new();
//! session.enter(&path);
//!
//! let entry = session.fetch(&path)?;
//! if entry.changed {
//!     // content is new or was edited since the last pass
//!     recompile(entry.text().unwrap_or_default());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`resource::file`]: [`FileCache`], [`SharedFileCache`] and filesystems
//! - [`diagnostic`]: errors, [`RenderTrace`] and [`CrashReport`]
//! - [`process`]: [`RenderSession`] and [`Blocks`]
//! - [`config`]: runtime configuration for traces and reports

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod diagnostic;
pub mod prelude;
pub mod process;
pub mod resource;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{Config, ConfigBuilder};
pub use diagnostic::{
    CRASH_MARKER, CacheError, CrashReport, NoTrace, RenderTrace, Result, TraceSink,
    rerender_notice,
};
pub use process::{Block, BlockMethod, Blocks, RenderSession};
pub use resource::file::{
    CacheEntry, CacheEvent, DiskFs, FetchOptions, FileCache, Filesystem, Freshness, MemoryFs,
    SharedFileCache,
};

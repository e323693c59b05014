//! Prelude module for convenient imports.
//!
//! ```ignore
//! use render_cache::prelude::*;
//! ```

// Cache
pub use crate::resource::file::{
    CacheEntry, DiskFs, FetchOptions, FileCache, Filesystem, Freshness, MemoryFs,
    SharedFileCache,
};

// Diagnostics
pub use crate::diagnostic::{CacheError, CrashReport, NoTrace, RenderTrace, TraceSink};

// Render pass
pub use crate::process::{BlockMethod, Blocks, RenderSession};

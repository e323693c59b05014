//! File caching with mtime-based invalidation.
//!
//! # Caching Strategy
//!
//! ```text
//! FileCache (one per render session)
//! └── FxHashMap<PathBuf, CacheEntry>
//!     └── CacheEntry
//!         ├── modified: Freshness   ─┐
//!         ├── content: Option<str>   ├── replaced when the on-disk mtime differs
//!         └── changed: bool         ─┘   recomputed on every fetch
//! ```
//!
//! Every [`FileCache::fetch_with`] takes exactly one of three branches and
//! pushes one trace line naming it:
//!
//! | branch             | trace line                | store      |
//! |--------------------|---------------------------|------------|
//! | `skip_cache`       | `no cache`                | untouched  |
//! | mtime unchanged    | `getting file from cache` | `changed` cleared |
//! | new or mtime moved | `caching new file`        | overwritten |

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use rustc_hash::FxHashMap;

use super::read::{DiskFs, Filesystem};
use crate::diagnostic::{CacheError, Result, TraceSink};

// =============================================================================
// Entry Types
// =============================================================================

/// Freshness stamp of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Freshness {
    /// File modification time observed at the most recent read.
    Modified(SystemTime),
    /// No freshness check was performed (cache bypass).
    Unchecked,
}

impl Freshness {
    /// The recorded modification time, if any.
    pub fn modified_time(&self) -> Option<SystemTime> {
        match self {
            Self::Modified(time) => Some(*time),
            Self::Unchecked => None,
        }
    }

    /// Check if this stamp matches the given on-disk time.
    #[inline]
    fn matches(&self, current: SystemTime) -> bool {
        matches!(self, Self::Modified(time) if *time == current)
    }
}

/// Cached view of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Resolved path the entry is keyed by.
    pub path: PathBuf,
    /// Freshness stamp.
    pub modified: Freshness,
    /// File content, `None` when reading was deferred.
    pub content: Option<Arc<str>>,
    /// Whether this fetch had to go to the filesystem.
    pub changed: bool,
}

impl CacheEntry {
    /// File content as `&str`, if it was read.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// Options for [`FileCache::fetch_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Bypass the store entirely: always read, never record.
    pub skip_cache: bool,
    /// On a fresh read, record freshness only and leave content unread.
    pub defer_read: bool,
}

impl FetchOptions {
    /// Options for a cache bypass.
    pub fn no_cache() -> Self {
        Self {
            skip_cache: true,
            ..Self::default()
        }
    }

    /// Options for a deferred read.
    pub fn deferred() -> Self {
        Self {
            defer_read: true,
            ..Self::default()
        }
    }

    /// Set whether to bypass the store.
    pub fn with_skip_cache(mut self, skip_cache: bool) -> Self {
        self.skip_cache = skip_cache;
        self
    }

    /// Set whether to defer reading content.
    pub fn with_defer_read(mut self, defer_read: bool) -> Self {
        self.defer_read = defer_read;
        self
    }
}

/// Policy decision taken by a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent {
    /// Store bypassed.
    NoCache,
    /// Served from an unchanged stored entry.
    Hit,
    /// Read (or stat) from the filesystem and stored.
    Stored,
}

impl fmt::Display for CacheEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoCache => "no cache",
            Self::Hit => "getting file from cache",
            Self::Stored => "caching new file",
        })
    }
}

// =============================================================================
// FileCache
// =============================================================================

/// Mtime-keyed content cache for one render session.
///
/// Single-threaded: [`fetch_with`](Self::fetch_with) takes `&mut self`. Wrap it
/// in a [`SharedFileCache`](super::SharedFileCache) for concurrent callers.
pub struct FileCache<S, F = DiskFs> {
    entries: FxHashMap<PathBuf, CacheEntry>,
    sink: S,
    fs: F,
}

impl<S: TraceSink> FileCache<S> {
    /// Create an empty cache reading from disk.
    pub fn new(sink: S) -> Self {
        Self::with_fs(sink, DiskFs)
    }
}

impl<S: TraceSink, F: Filesystem> FileCache<S, F> {
    /// Create an empty cache over the given filesystem.
    pub fn with_fs(sink: S, fs: F) -> Self {
        Self {
            entries: FxHashMap::default(),
            sink,
            fs,
        }
    }

    /// Fetch a file with default options.
    pub fn fetch(&mut self, path: impl AsRef<Path>) -> Result<CacheEntry> {
        self.fetch_with(path, FetchOptions::default())
    }

    /// Fetch a file, reading it only if it is new or its mtime moved.
    ///
    /// I/O failures are returned unmodified with the path attached; the store
    /// is left as it was before the call.
    pub fn fetch_with(
        &mut self,
        path: impl AsRef<Path>,
        options: FetchOptions,
    ) -> Result<CacheEntry> {
        let path = path.as_ref();

        if options.skip_cache {
            self.emit(CacheEvent::NoCache);
            let content = self.read(path)?;
            return Ok(CacheEntry {
                path: path.to_path_buf(),
                modified: Freshness::Unchecked,
                content: Some(content),
                changed: true,
            });
        }

        let modified = self
            .fs
            .modified(path)
            .map_err(|e| CacheError::io(path, e))?;

        if let Some(entry) = self.entries.get_mut(path)
            && entry.modified.matches(modified)
        {
            entry.changed = false;
            let entry = entry.clone();
            self.emit(CacheEvent::Hit);
            return Ok(entry);
        }

        let content = if options.defer_read {
            None
        } else {
            Some(self.read(path)?)
        };
        let entry = CacheEntry {
            path: path.to_path_buf(),
            modified: Freshness::Modified(modified),
            content,
            changed: true,
        };
        self.entries.insert(entry.path.clone(), entry.clone());
        self.emit(CacheEvent::Stored);
        Ok(entry)
    }

    /// Stored entry for `path`, without touching the filesystem.
    pub fn peek(&self, path: impl AsRef<Path>) -> Option<&CacheEntry> {
        self.entries.get(path.as_ref())
    }

    /// Check if `path` has a stored entry.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.contains_key(path.as_ref())
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The trace sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The filesystem.
    pub fn fs(&self) -> &F {
        &self.fs
    }

    fn read(&self, path: &Path) -> Result<Arc<str>> {
        self.fs
            .read_to_string(path)
            .map(Arc::from)
            .map_err(|e| CacheError::io(path, e))
    }

    #[inline]
    fn emit(&self, event: CacheEvent) {
        self.sink.push(&format!("  {event}"));
    }
}

impl<S, F> fmt::Debug for FileCache<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCache")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

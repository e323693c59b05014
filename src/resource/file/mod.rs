//! File access for render passes, with mtime-keyed caching.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    File Access Flow                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  path ──► FileCache::fetch_with(path, options)              │
//! │                    │                                        │
//! │                    ├─► skip_cache                           │
//! │                    │   └─► Filesystem::read_to_string       │
//! │                    │                                        │
//! │                    ├─► Filesystem::modified == stored       │
//! │                    │   └─► stored entry, changed = false    │
//! │                    │                                        │
//! │                    └─► new or moved mtime                   │
//! │                        └─► read (unless deferred) + store   │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Filesystems
//!
//! The [`Filesystem`] trait is the cache's only view of storage:
//!
//! - [`DiskFs`]: physical files via `std::fs`
//! - [`MemoryFs`]: map-backed files with controllable mtimes
//!
//! # Sharing
//!
//! [`FileCache`] is single-threaded. [`SharedFileCache`] guards one with a
//! mutex for hosts that fetch from several threads.

mod cache;
mod read;
mod shared;
mod vfs;

pub use cache::{CacheEntry, CacheEvent, FetchOptions, FileCache, Freshness};
pub use read::{DiskFs, Filesystem, decode_utf8};
pub use shared::SharedFileCache;
pub use vfs::MemoryFs;

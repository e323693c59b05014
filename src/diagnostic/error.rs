//! Cache error type.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for file cache operations.
///
/// Only one kind exists: the underlying filesystem failed while the cache
/// was stating or reading a file. The cache never produces errors of its own;
/// a missing entry simply triggers a fresh read.
///
/// # Example
///
/// ```ignore
/// match cache.fetch(path) {
///     Ok(entry) if entry.changed => recompile(&entry),
///     Ok(_) => {}
///     Err(CacheError::Io { path, source }) => {
///         eprintln!("cannot load {}: {source}", path.display());
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum CacheError {
    /// Stat or read of a file failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl CacheError {
    /// Create an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The path the failed operation was working on.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }

    /// The kind of the underlying I/O error.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Io { source, .. } => source.kind(),
        }
    }
}

/// Result alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

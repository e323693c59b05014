//! Mutex-guarded file cache for concurrent hosts.

use std::path::Path;

use parking_lot::Mutex;

use super::cache::{CacheEntry, FetchOptions, FileCache};
use super::read::{DiskFs, Filesystem};
use crate::diagnostic::{Result, TraceSink};

/// A [`FileCache`] callable through `&self` from many threads.
///
/// Each fetch holds the lock for its whole stat-compare-store sequence, so
/// two callers racing on the same stale path cannot interleave; the later
/// one simply finds the entry the earlier one stored.
pub struct SharedFileCache<S, F = DiskFs> {
    inner: Mutex<FileCache<S, F>>,
}

impl<S: TraceSink> SharedFileCache<S> {
    /// Create an empty shared cache reading from disk.
    pub fn new(sink: S) -> Self {
        Self::from_cache(FileCache::new(sink))
    }
}

impl<S: TraceSink, F: Filesystem> SharedFileCache<S, F> {
    /// Create an empty shared cache over the given filesystem.
    pub fn with_fs(sink: S, fs: F) -> Self {
        Self::from_cache(FileCache::with_fs(sink, fs))
    }

    /// Wrap an existing cache, keeping its entries.
    pub fn from_cache(cache: FileCache<S, F>) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    /// Fetch a file with default options.
    pub fn fetch(&self, path: impl AsRef<Path>) -> Result<CacheEntry> {
        self.inner.lock().fetch(path)
    }

    /// Fetch a file; see [`FileCache::fetch_with`].
    pub fn fetch_with(&self, path: impl AsRef<Path>, options: FetchOptions) -> Result<CacheEntry> {
        self.inner.lock().fetch_with(path, options)
    }

    /// Stored entry for `path`, cloned out of the lock.
    pub fn peek(&self, path: impl AsRef<Path>) -> Option<CacheEntry> {
        self.inner.lock().peek(path).cloned()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Unwrap into the single-threaded cache.
    pub fn into_inner(self) -> FileCache<S, F> {
        self.inner.into_inner()
    }
}

#[cfg(feature = "batch")]
impl<S, F> SharedFileCache<S, F>
where
    S: TraceSink + Send,
    F: Filesystem + Send,
{
    /// Fetch many files from the rayon pool.
    ///
    /// Results are returned in input order; one failing path does not stop
    /// the others.
    pub fn fetch_all<P>(&self, paths: &[P], options: FetchOptions) -> Vec<Result<CacheEntry>>
    where
        P: AsRef<Path> + Sync,
    {
        use rayon::prelude::*;

        paths
            .par_iter()
            .map(|path| self.fetch_with(path, options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{NoTrace, RenderTrace};
    use crate::resource::file::MemoryFs;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_shared_fetch() {
        let fs = MemoryFs::new();
        fs.write("/t/a", "x");
        let cache = SharedFileCache::with_fs(NoTrace, &fs);

        assert!(cache.fetch("/t/a").unwrap().changed);
        assert!(!cache.fetch("/t/a").unwrap().changed);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.peek("/t/a").unwrap().text(), Some("x"));
    }

    #[test]
    fn test_concurrent_first_sight_reads_once() {
        let fs = Arc::new(MemoryFs::new());
        fs.write("/t/layout", "shared");
        let trace = Arc::new(RenderTrace::with_echo(false));
        let cache = Arc::new(SharedFileCache::with_fs(Arc::clone(&trace), Arc::clone(&fs)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.fetch("/t/layout").unwrap())
            })
            .collect();
        let changed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|e| e.changed)
            .count();

        assert_eq!(changed, 1);
        assert_eq!(fs.reads(), 1);
        assert_eq!(trace.len(), 8);
    }

    #[cfg(feature = "batch")]
    #[test]
    fn test_fetch_all_keeps_order() {
        let fs = MemoryFs::new();
        fs.write("/t/a", "A");
        fs.write("/t/b", "B");
        let cache = SharedFileCache::with_fs(NoTrace, &fs);

        let results = cache.fetch_all(&["/t/a", "/t/missing", "/t/b"], FetchOptions::default());

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().text(), Some("A"));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().text(), Some("B"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_into_inner_keeps_entries() {
        let fs = MemoryFs::new();
        fs.write("/t/a", "x");
        let cache = SharedFileCache::with_fs(NoTrace, &fs);
        cache.fetch("/t/a").unwrap();

        let mut inner = cache.into_inner();
        assert!(!inner.fetch("/t/a").unwrap().changed);
    }
}

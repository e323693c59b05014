//! In-memory filesystem.
//!
//! Provides a [`Filesystem`] backed by a map instead of the disk, for virtual
//! content and for driving modification times deterministically in tests.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::read::Filesystem;

#[derive(Debug, Clone)]
struct MemoryFile {
    content: String,
    modified: SystemTime,
}

/// A simple map-based filesystem.
///
/// Every write advances an internal clock by one second, so rewriting a file
/// always changes its modification time. Mutation goes through `&self`, so a
/// cache can borrow the filesystem while the caller keeps editing it.
///
/// # Example
///
/// ```ignore
/// use render_cache::{FileCache, MemoryFs, NoTrace};
///
/// let fs = MemoryFs::new();
/// fs.write("/site/index.ejs", "<h1>hi</h1>");
///
/// let mut cache = FileCache::with_fs(NoTrace, &fs);
/// assert!(cache.fetch("/site/index.ejs")?.changed);
/// ```
#[derive(Debug)]
pub struct MemoryFs {
    files: RwLock<FxHashMap<PathBuf, MemoryFile>>,
    clock: RwLock<SystemTime>,
    reads: AtomicUsize,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create a new empty filesystem.
    pub fn new() -> Self {
        Self {
            files: RwLock::new(FxHashMap::default()),
            clock: RwLock::new(SystemTime::UNIX_EPOCH + Duration::from_secs(1)),
            reads: AtomicUsize::new(0),
        }
    }

    /// Write a file, advancing its modification time.
    pub fn write(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let modified = self.tick();
        self.insert_with_mtime(path, content, modified);
    }

    /// Write a file with an explicit modification time.
    pub fn insert_with_mtime(
        &self,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
        modified: SystemTime,
    ) {
        self.files.write().insert(
            path.into(),
            MemoryFile {
                content: content.into(),
                modified,
            },
        );
    }

    /// Advance a file's modification time without changing its content.
    ///
    /// Returns `false` if the file does not exist.
    pub fn touch(&self, path: impl AsRef<Path>) -> bool {
        let modified = self.tick();
        match self.files.write().get_mut(path.as_ref()) {
            Some(file) => {
                file.modified = modified;
                true
            }
            None => false,
        }
    }

    /// Remove a file.
    pub fn remove(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.write().remove(path.as_ref()).map(|f| f.content)
    }

    /// Check if a path exists.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.read().contains_key(path.as_ref())
    }

    /// Get the number of files.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// Number of content reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn tick(&self) -> SystemTime {
        let mut clock = self.clock.write();
        *clock += Duration::from_secs(1);
        *clock
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no such file: {}", path.display()),
        )
    }
}

impl Filesystem for MemoryFs {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.files
            .read()
            .get(path)
            .map(|f| f.modified)
            .ok_or_else(|| Self::not_found(path))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let content = self
            .files
            .read()
            .get(path)
            .map(|f| f.content.clone())
            .ok_or_else(|| Self::not_found(path))?;
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_advances_mtime() {
        let fs = MemoryFs::new();
        fs.write("a.txt", "v1");
        let first = fs.modified(Path::new("a.txt")).unwrap();
        fs.write("a.txt", "v2");
        let second = fs.modified(Path::new("a.txt")).unwrap();

        assert!(second > first);
        assert_eq!(fs.read_to_string(Path::new("a.txt")).unwrap(), "v2");
        assert_eq!(fs.reads(), 1);
    }

    #[test]
    fn test_touch_keeps_content() {
        let fs = MemoryFs::new();
        fs.write("a.txt", "same");
        let before = fs.modified(Path::new("a.txt")).unwrap();

        assert!(fs.touch("a.txt"));
        assert!(fs.modified(Path::new("a.txt")).unwrap() > before);
        assert_eq!(fs.read_to_string(Path::new("a.txt")).unwrap(), "same");
        assert!(!fs.touch("missing.txt"));
    }

    #[test]
    fn test_explicit_mtime() {
        let fs = MemoryFs::new();
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(42);
        fs.insert_with_mtime("a.txt", "x", at);
        assert_eq!(fs.modified(Path::new("a.txt")).unwrap(), at);
    }

    #[test]
    fn test_missing_file() {
        let fs = MemoryFs::new();
        let err = fs.modified(Path::new("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(fs.read_to_string(Path::new("nope")).is_err());
        assert_eq!(fs.reads(), 0);
    }

    #[test]
    fn test_remove_and_len() {
        let fs = MemoryFs::new();
        fs.write("a", "1");
        fs.write("b", "2");
        assert_eq!(fs.len(), 2);
        assert_eq!(fs.remove("a"), Some("1".to_string()));
        assert!(!fs.contains("a"));
        assert!(!fs.is_empty());
    }
}

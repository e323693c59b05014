//! Filesystem access used by the file cache.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

/// The two filesystem primitives the cache depends on.
///
/// Both are synchronous and fail with an I/O error if the path does not
/// exist or is unreadable.
pub trait Filesystem {
    /// Last modification time of the file at `path`.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Full content of the file at `path` as text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

impl<T: Filesystem + ?Sized> Filesystem for &T {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        (**self).modified(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }
}

impl<T: Filesystem + ?Sized> Filesystem for Arc<T> {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        (**self).modified(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }
}

// =============================================================================
// DiskFs - Physical Files
// =============================================================================

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl Filesystem for DiskFs {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let data = read_disk(path)?;
        decode_utf8(data)
    }
}

/// Read file from disk.
fn read_disk(path: &Path) -> io::Result<Vec<u8>> {
    let meta = fs::metadata(path)?;
    if meta.is_dir() {
        return Err(io::Error::new(io::ErrorKind::IsADirectory, "is a directory"));
    }
    fs::read(path)
}

/// Decode bytes as UTF-8.
///
/// Valid input (a BOM included) is kept verbatim. Invalid sequences are
/// replaced with U+FFFD instead of failing the read.
pub fn decode_utf8(buf: Vec<u8>) -> io::Result<String> {
    String::from_utf8(buf).or_else(|e| Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

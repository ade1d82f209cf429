//! Filesystem access used by the loader and recorder.
//!
//! Everything that touches disk goes through [`FixtureStore`] so tests can
//! swap in an instrumented store.

use std::fs;
use std::io;
use std::path::Path;

pub trait FixtureStore: Send + Sync {
    /// Read a file, `Ok(None)` if it does not exist.
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;

    fn exists(&self, path: &Path) -> bool;

    /// Make sure `dir` exists and is a directory, creating it if needed.
    fn ensure_dir(&self, dir: &Path) -> io::Result<()>;

    /// Write `bytes` to `path`, creating parent directories.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Delete a file. Missing files are not an error.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl FixtureStore for DiskStore {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        if !path.is_file() {
            return Ok(None);
        }
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)?;
        if fs::metadata(dir)?.permissions().readonly() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", dir.display()),
            ));
        }
        Ok(())
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

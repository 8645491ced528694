//! Atomic file operations
//!
//! Snapshot writes follow the classic durable-replace pattern:
//!
//! 1. Write to `<path>.tmp`
//! 2. `sync_all()` the temp file
//! 3. Rename over `<path>` (atomic on POSIX filesystems)
//! 4. Sync the parent directory so the rename itself survives power loss
//!
//! A reader therefore sees either the previous file or the complete new
//! one, never a partial write.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations, tagged with the file involved
#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("could not open for writing file \"{path}\": {source}")]
    Create { path: PathBuf, source: io::Error },
    #[error("could not write file \"{path}\": {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not rename file \"{from}\" to \"{to}\": {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// `<path>.tmp`, keeping any existing extension (`a.stat` → `a.stat.tmp`)
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Atomically replace `path` with `content`
///
/// On any failure the destination is left untouched; a stale temp file may
/// remain and is cleaned up by the next snapshot load.
pub fn atomic_write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> AtomicResult<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| AtomicError::Create {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|source| AtomicError::Create {
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(content)
        .and_then(|_| file.sync_all())
        .map_err(|source| AtomicError::Write {
            path: temp_path.clone(),
            source,
        })?;
    drop(file);

    durable_rename(&temp_path, path)
}

/// Rename `from` over `to` and sync the containing directory
pub fn durable_rename(from: &Path, to: &Path) -> AtomicResult<()> {
    fs::rename(from, to).map_err(|source| AtomicError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;

    // Directory fsync is unsupported on some platforms; the rename already happened
    #[cfg(unix)]
    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

/// Remove a file, treating "not found" as success
///
/// Returns `Ok(true)` if a file was removed.
pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    match fs::remove_file(path.as_ref()) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_appends_suffix() {
        assert_eq!(
            temp_path_for(Path::new("pg_stat/pg_logger.stat")),
            PathBuf::from("pg_stat/pg_logger.stat.tmp")
        );
    }

    #[test]
    fn test_atomic_write_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counters.stat");

        atomic_write_bytes(&path, &[1, 2, 3, 4]).unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counters.stat");

        atomic_write_bytes(&path, b"old").unwrap();
        atomic_write_bytes(&path, b"new contents").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new contents");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pg_stat").join("nested").join("x.stat");

        atomic_write_bytes(&path, b"nested").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_atomic_write_into_missing_parent_that_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();

        let err = atomic_write_bytes(blocker.join("x.stat"), b"data").unwrap_err();
        assert!(matches!(err, AtomicError::Create { .. }));
    }

    #[test]
    fn test_remove_if_exists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.stat");

        assert!(!remove_if_exists(&path).unwrap());
        fs::write(&path, "x").unwrap();
        assert!(remove_if_exists(&path).unwrap());
        assert!(!path.exists());
    }
}

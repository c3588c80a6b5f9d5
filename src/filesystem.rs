//! Host filesystem primitives used by the sync engine
//!
//! The engine never touches the disk directly. It goes through [`Transfer`],
//! so hosts can substitute their own copy primitive and tests can observe
//! exactly which operations a pass performed.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

/// Copy and delete operations on the merged output tree.
pub trait Transfer {
    /// Copy `src` byte-for-byte to `dst`, creating parent directories and
    /// replacing any existing file.
    fn copy_file(&mut self, src: &Path, dst: &Path) -> Result<()>;

    /// Create `dir` and any missing parents.
    fn create_dir(&mut self, dir: &Path) -> Result<()>;

    /// Remove the file or directory tree at `path`. Returns `false` when
    /// nothing was there.
    fn remove(&mut self, path: &Path) -> Result<bool>;

    /// Delete everything inside `dir`, leaving `dir` itself in place.
    fn clear_dir(&mut self, dir: &Path) -> Result<()>;
}

/// [`Transfer`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskTransfer;

impl DiskTransfer {
    pub fn new() -> Self {
        Self
    }
}

impl Transfer for DiskTransfer {
    fn copy_file(&mut self, src: &Path, dst: &Path) -> Result<()> {
        if let Some(parent) = dst.parent() {
            self.create_dir(parent)?;
        }
        fs::copy(src, dst).map_err(|e| Error::Filesystem {
            message: format!(
                "Failed to copy '{}' to '{}': {}",
                src.display(),
                dst.display(),
                e
            ),
        })?;
        Ok(())
    }

    fn create_dir(&mut self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", dir.display(), e),
        })
    }

    fn remove(&mut self, path: &Path) -> Result<bool> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(Error::Io(e)),
        };
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        match removed {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Filesystem {
                message: format!("Failed to delete '{}': {}", path.display(), e),
            }),
        }
    }

    fn clear_dir(&mut self, dir: &Path) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Error::Io(e)),
        };
        for entry in entries {
            self.remove(&entry?.path())?;
        }
        Ok(())
    }
}

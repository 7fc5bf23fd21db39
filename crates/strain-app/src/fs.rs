//! Filesystem collaborator used by the stress loop
//!
//! The loop only needs three operations, so they sit behind a trait that
//! tests can replace.

use std::path::Path;

use strain_core::prelude::*;

/// The filesystem operations the stress loop depends on
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem {
    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Remove the file at `path`
    fn delete(&self, path: &Path) -> Result<()>;

    /// Create `path` and any missing parents. Succeeds if it already exists.
    fn ensure_directory(&self, path: &Path) -> Result<()>;
}

/// [`Filesystem`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn delete(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).fs_err(FsOp::Delete, path)
    }

    fn ensure_directory(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).fs_err(FsOp::CreateDir, path)
    }
}

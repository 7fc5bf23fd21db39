//! Run configuration
//!
//! Every value is a fixed constant for the binary. The struct exists so the
//! constants travel together and tests can shrink a run.

use std::path::{Path, PathBuf};

use strain_core::prelude::*;

use crate::writer::{BlobTask, WriteAccounting};

/// Units per blob (one mebibyte in byte accounting)
pub const DEFAULT_TOTAL_BYTES: u64 = 1 << 20;

/// Bytes per write operation
pub const DEFAULT_BLOCK_SIZE: usize = 1 << 10;

/// Progress lines per blob
pub const DEFAULT_PROGRESS_UPDATES: u64 = 1 << 3;

/// Output directory name under the program directory
pub const OUTPUT_DIR_NAME: &str = "out";

/// Component name shown in the first log column
pub const COMPONENT_NAME: &str = "strain";

/// Settings for one stress run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrainConfig {
    /// Where blobs go; `None` means `<program_dir>/out`
    pub output_dir: Option<PathBuf>,
    pub total_bytes: u64,
    pub block_size: usize,
    pub progress_updates: u64,
    pub accounting: WriteAccounting,
    pub component_name: String,
}

impl Default for StrainConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            total_bytes: DEFAULT_TOTAL_BYTES,
            block_size: DEFAULT_BLOCK_SIZE,
            progress_updates: DEFAULT_PROGRESS_UPDATES,
            accounting: WriteAccounting::default(),
            component_name: COMPONENT_NAME.to_string(),
        }
    }
}

impl StrainConfig {
    /// Resolve the directory blobs are written to
    pub fn resolve_output_dir(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(program_dir()?.join(OUTPUT_DIR_NAME)),
        }
    }

    /// Build the write job for `path`
    pub fn task(&self, path: impl Into<PathBuf>) -> BlobTask {
        BlobTask {
            path: path.into(),
            total_bytes: self.total_bytes,
            block_size: self.block_size,
            progress_updates: self.progress_updates,
            accounting: self.accounting,
        }
    }
}

/// Canonical directory containing the running executable
pub fn program_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| Error::program_location(format!("current_exe failed: {}", e)))?;
    let exe = dunce::canonicalize(&exe).unwrap_or(exe);

    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::program_location(format!("{} has no parent", exe.display())))
}

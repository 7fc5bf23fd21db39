//! Chunked blob writer with progress reporting
//!
//! One [`BlobTask`] is written as a sequence of fixed-size block writes. Each
//! block costs one draw from the OS CSPRNG (thrown away, it only adds CPU and
//! entropy pressure) and is filled from a fast non-secure generator.
//!
//! ## Accounting
//!
//! Under [`WriteAccounting::Operations`] the loop counter counts block writes,
//! not bytes, so a task of `N` "bytes" issues `N` writes of `block_size`
//! bytes each and leaves `N * block_size` bytes on disk while the log reports
//! `N`. That is the reference behavior of this tool and stays the default.
//! [`WriteAccounting::Bytes`] counts real bytes and trims the last block.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng};
use strain_core::prelude::*;
use strain_core::IndentContext;

use crate::config::{DEFAULT_BLOCK_SIZE, DEFAULT_PROGRESS_UPDATES};

/// What the write loop counts toward `total_bytes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteAccounting {
    /// One unit per block write; on-disk size is `total_bytes * block_size`
    #[default]
    Operations,
    /// One unit per byte written; on-disk size is `total_bytes`
    Bytes,
}

/// A single write job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobTask {
    pub path: PathBuf,
    pub total_bytes: u64,
    pub block_size: usize,
    pub progress_updates: u64,
    pub accounting: WriteAccounting,
}

impl BlobTask {
    /// Task with the default block size, progress cadence and accounting
    pub fn new(path: impl Into<PathBuf>, total_bytes: u64) -> Self {
        Self {
            path: path.into(),
            total_bytes,
            block_size: DEFAULT_BLOCK_SIZE,
            progress_updates: DEFAULT_PROGRESS_UPDATES,
            accounting: WriteAccounting::default(),
        }
    }

    pub fn with_accounting(mut self, accounting: WriteAccounting) -> Self {
        self.accounting = accounting;
        self
    }

    /// Counter distance between progress lines; 0 disables progress output
    pub fn progress_bucket(&self) -> u64 {
        self.total_bytes
            .checked_div(self.progress_updates)
            .unwrap_or(0)
    }
}

/// Outcome of one completed write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub path: PathBuf,
    /// Block writes issued
    pub operations: u64,
    /// Bytes actually handed to the file
    pub bytes_on_disk: u64,
    /// Progress lines emitted
    pub progress_lines: u64,
}

/// Writes [`BlobTask`]s, logging progress through the shared indent context
#[derive(Debug)]
pub struct BlobWriter {
    indent: IndentContext,
    secure: OsRng,
    fast: SmallRng,
    block: Vec<u8>,
}

impl BlobWriter {
    pub fn new(indent: IndentContext) -> Self {
        Self {
            indent,
            secure: OsRng,
            fast: SmallRng::from_entropy(),
            block: Vec::new(),
        }
    }

    /// Write `task` to disk
    ///
    /// The parent directory must exist. Existing content is truncated. On
    /// failure the partially written file is left in place.
    #[instrument(name = "write", skip_all)]
    pub fn write(&mut self, task: &BlobTask) -> Result<WriteSummary> {
        let path = task.path.as_path();
        let file = File::create(path).fs_err(FsOp::Open, path)?;
        let mut out = BufWriter::new(file);

        info!(
            "Writing {} bytes to \"{}\"... ",
            task.total_bytes,
            path.display()
        );

        let bucket = task.progress_bucket();
        let mut counter: u64 = 0;
        let mut operations: u64 = 0;
        let mut bytes_on_disk: u64 = 0;
        let mut progress_lines: u64 = 0;

        while counter < task.total_bytes {
            let mut entropy = [0u8; 1];
            self.secure
                .try_fill_bytes(&mut entropy)
                .map_err(|e| Error::entropy(e.to_string()))?;
            std::hint::black_box(entropy);

            let len = match task.accounting {
                WriteAccounting::Operations => task.block_size,
                WriteAccounting::Bytes => {
                    let remaining = task.total_bytes - counter;
                    remaining.min(task.block_size.max(1) as u64) as usize
                }
            };
            if self.block.len() < len {
                self.block.resize(len, 0);
            }
            let block = &mut self.block[..len];
            self.fast.fill_bytes(block);
            out.write_all(block).fs_err(FsOp::Write, path)?;

            operations += 1;
            bytes_on_disk += len as u64;

            let before = counter;
            counter += match task.accounting {
                WriteAccounting::Operations => 1,
                WriteAccounting::Bytes => len as u64,
            };

            if bucket > 0
                && progress_lines < task.progress_updates
                && counter / bucket > before / bucket
            {
                let _indent = self.indent.scope();
                info!(". (wrote {} of {})", counter, task.total_bytes);
                progress_lines += 1;
            }
        }

        out.flush().fs_err(FsOp::Flush, path)?;

        {
            let _indent = self.indent.scope();
            info!(
                " done: wrote {} bytes to \"{}\"",
                task.total_bytes,
                path.display()
            );
        }

        Ok(WriteSummary {
            path: task.path.clone(),
            operations,
            bytes_on_disk,
            progress_lines,
        })
    }
}

//! The stress loop: create, write, repeat
//!
//! Each iteration picks a fresh name inside the output directory, clears any
//! stale file at that path, and writes one blob. Blobs are never removed
//! after a successful write.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use strain_core::prelude::*;
use strain_core::IndentContext;
use tracing::info_span;

use crate::config::StrainConfig;
use crate::fs::Filesystem;
use crate::names::NameSource;
use crate::writer::{BlobWriter, WriteSummary};

/// How many iterations [`StressLoop::run`] may perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunLimit {
    /// Run until stopped or until an error escapes
    #[default]
    Unbounded,
    Iterations(u64),
}

impl RunLimit {
    fn allows(&self, completed: u64) -> bool {
        match self {
            RunLimit::Unbounded => true,
            RunLimit::Iterations(max) => completed < *max,
        }
    }
}

/// Cooperative stop flag, checked before each iteration
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    flag: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Drives repeated blob writes into one output directory
#[derive(Debug)]
pub struct StressLoop<F, N> {
    config: StrainConfig,
    output_dir: PathBuf,
    fs: F,
    names: N,
    writer: BlobWriter,
}

impl<F: Filesystem, N: NameSource> StressLoop<F, N> {
    /// Resolves the output directory once; it is created lazily by [`step`](Self::step)
    pub fn new(config: StrainConfig, fs: F, names: N, indent: IndentContext) -> Result<Self> {
        let output_dir = config.resolve_output_dir()?;
        Ok(Self {
            config,
            output_dir,
            fs,
            names,
            writer: BlobWriter::new(indent),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// One iteration body without the surrounding log lines
    pub fn step(&mut self) -> Result<WriteSummary> {
        self.fs
            .ensure_directory(&self.output_dir)
            .context("Preparing output directory")?;

        let path = self.output_dir.join(self.names.next_name());
        if self.fs.exists(&path) {
            warn!("Removing stale blob at \"{}\"", path.display());
            self.fs
                .delete(&path)
                .with_context(|| format!("Clearing {}", path.display()))?;
        }

        let task = self.config.task(path);
        self.writer.write(&task)
    }

    /// Run iterations until `limit` is reached or `stop` is set
    ///
    /// Returns the number of completed iterations. The first error ends the
    /// run; a blob being written at that point stays on disk as is.
    pub fn run(&mut self, limit: RunLimit, stop: &StopToken) -> Result<u64> {
        let mut completed: u64 = 0;

        while limit.allows(completed) && !stop.is_stopped() {
            info!("Started step {}", completed);
            {
                let span = info_span!("step", iteration = completed);
                let _entered = span.enter();
                self.step()?;
            }
            info!("Done.");
            completed += 1;
        }

        if stop.is_stopped() {
            info!("Stop requested after {} steps", completed);
        }
        Ok(completed)
    }
}

//! strain-app - Write loop and filesystem plumbing for disk-strain
//!
//! [`StressLoop`] drives one [`BlobWriter`] per iteration against a
//! [`Filesystem`] and a [`NameSource`]. Progress is logged through `tracing`
//! with the indent context from `strain-core`.

pub mod config;
pub mod fs;
pub mod names;
pub mod stress;
pub mod writer;

// Re-export primary types
pub use config::{program_dir, StrainConfig};
pub use fs::{Filesystem, StdFilesystem};
pub use names::{NameSource, ScriptedNames, UuidNames};
pub use stress::{RunLimit, StopToken, StressLoop};
pub use writer::{BlobTask, BlobWriter, WriteAccounting, WriteSummary};

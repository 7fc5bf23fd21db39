//! # strain-core - Errors and Indented Logging
//!
//! Foundation crate for disk-strain. It only depends on external crates
//! (chrono, thiserror, tracing, tracing-subscriber).
//!
//! ## Public API
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum; filesystem failures carry the operation and path
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//! - [`IoResultExt`] - Tags a raw `io::Result` with an [`FsOp`] and path
//!
//! ### Logging (`logging`)
//! - [`IndentContext`] - Shared indent state (baseline + delta)
//! - [`IndentGuard`] - RAII scope restoring the indent on drop
//! - [`IndentedFormat`] - `tracing` event formatter
//! - [`logging::init()`] - Install the stderr subscriber
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use strain_core::prelude::*;
//! ```

pub mod error;
pub mod logging;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

/// Prelude for common imports used throughout the disk-strain crates
pub mod prelude {
    pub use super::error::{Error, FsOp, IoResultExt, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, FsOp, IoResultExt, Result, ResultExt};
pub use logging::{IndentContext, IndentGuard, IndentedFormat, INDENT_STEP, SPACES_PER_DEPTH};

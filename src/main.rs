//! disk-strain - sustained disk-write stress generator
//!
//! This is the binary entry point. All logic lives in the workspace crates.
//! There are no arguments: the loop writes blobs into `<program_dir>/out/`
//! until the process is killed or an I/O error escapes.

use color_eyre::eyre::Result;
use strain_app::{RunLimit, StdFilesystem, StopToken, StrainConfig, StressLoop, UuidNames};
use strain_core::{logging, IndentContext};
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = StrainConfig::default();
    let indent = IndentContext::default();
    logging::init(&config.component_name, indent.clone())?;

    let mut stress = StressLoop::new(config, StdFilesystem, UuidNames, indent)?;
    info!("Output directory: {}", stress.output_dir().display());

    stress.run(RunLimit::Unbounded, &StopToken::new())?;
    Ok(())
}

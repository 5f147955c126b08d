//! # pcbdrill
//!
//! Converts PCB drill data into a G-code program for a CNC router.
//!
//! ## Architecture
//!
//! pcbdrill is organized as a workspace with multiple crates:
//!
//! 1. **pcbdrill-core** - Drill data model, geometry, tool moves, errors
//! 2. **pcbdrill-camtools** - Excellon parsing, toolpaths, G-code emission
//! 3. **pcbdrill-settings** - Configuration files
//! 4. **pcbdrill** - Conversion job and command-line front end

pub mod job;

pub use job::{is_input_error, ConversionJob, JobSummary};
pub use pcbdrill_core::{Error, MillingParams, Result};
pub use pcbdrill_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// `--version` text: package version and build date
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("BUILD_DATE"),
    ")"
);

/// Initialize logging to stderr
///
/// `RUST_LOG` takes precedence; otherwise the level is `warn`, or `debug`
/// when `verbose` is set. Stdout is left for the job summary.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_version_carries_build_date() {
        assert!(LONG_VERSION.starts_with(VERSION));
        assert!(LONG_VERSION.contains(BUILD_DATE));
        assert!(!BUILD_DATE.is_empty());
    }
}

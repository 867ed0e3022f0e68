//! Miette diagnostic conversion for CLI errors.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!(
            help = "Check elmdev.toml and ELMDEV_* environment variables",
            "Configuration error: {}",
            e
        ),
        CliError::Bind { addr, source } => miette::miette!(
            help = "Stop the process holding the port or pass --port",
            "Failed to bind to {}: {}",
            addr,
            source
        ),
        _ => miette::miette!("{}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::StageFailed { stage, message } => {
            miette::miette!("Build error in {}\n\n{}", stage, message.trim_end())
        }
        _ => miette::miette!("{}", err),
    }
}

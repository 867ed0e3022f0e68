//! Error handling for the elmdev CLI.
//!
//! The hierarchy:
//! - **Top-level errors** (`CliError`) are what commands return
//! - **Domain errors** (`BuildError`, `ConfigError`) carry the detail
//! - **Conversion** is automatic via `#[from]`
//!
//! Compile failures are *not* errors at this level. The pipeline recovers them,
//! notifies, and records them in the build outcome; only a caller that wants a
//! failing exit code (the one-shot `build` command) turns them into `CliError`.

use std::path::PathBuf;
use thiserror::Error;

pub use elmdev_config::ConfigError;

mod report;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline failures (toolchain, init, copy, compile)
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dev server could not bind its listener
    #[error("Failed to bind to {addr}: {source}\n\nHint: Is another dev server already running on this port?")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Dev server errors after startup
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Asset pipeline errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The compiler executable could not be spawned
    #[error("Compiler '{program}' not found: {reason}\n\nHint: Install Elm (https://elm-lang.org) or set compiler.program in elmdev.toml")]
    ToolchainNotFound { program: String, reason: String },

    /// The one-time initialization step failed
    #[error("Compiler initialization failed: {0}")]
    InitFailed(String),

    /// A source directory does not exist
    #[error("Source directory not found: {}\n\nHint: Check the paths section of elmdev.toml", .0.display())]
    SourceDirMissing(PathBuf),

    /// A stage of the pipeline failed to compile
    #[error("{stage} failed:\n{message}")]
    StageFailed { stage: String, message: String },

    /// Copying a file into the output directory failed
    #[error("Failed to copy {}: {source}", .file.display())]
    CopyFailed {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output directory could not be created
    #[error("Output directory is not writable: {}\n\nHint: Check directory permissions or change paths.out_dir", .0.display())]
    OutputNotWritable(PathBuf),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

//! Command-line interface definition for elmdev.
//!
//! Subcommands mirror the build tasks:
//!
//! - `elmdev elm-init` - Verify the Elm compiler and create `elm.json`
//! - `elmdev html` - Copy HTML pages into the output directory
//! - `elmdev elm` - Compile the Elm modules into the bundle
//! - `elmdev build` - Both of the above
//! - `elmdev watch` - Rebuild on every source change
//! - `elmdev start-server` - Serve the output directory and proxy the API
//! - `elmdev test` - Build, serve and watch

mod commands;
mod tests;

use clap::Parser;
use std::path::PathBuf;

pub use commands::{Command, ServerArgs};

/// elmdev - build, watch and serve an Elm front end
#[derive(Parser, Debug)]
#[command(
    name = "elmdev",
    version,
    about = "Build, watch and serve an Elm front end",
    long_about = "elmdev compiles Elm modules into a single bundle, copies HTML pages next to it,\n\
                  rebuilds on change and serves the result with an API proxy to your backend."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (default: elmdev.toml found from the project root)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

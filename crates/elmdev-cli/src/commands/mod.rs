//! Command implementations for the elmdev CLI.
//!
//! One module per task:
//!
//! - [`init`] - Initialize the Elm toolchain
//! - [`html`] - Copy HTML pages
//! - [`elm`] - Compile the Elm bundle
//! - [`build`] - Compile and copy once
//! - [`watch`] - Rebuild on change
//! - [`serve`] - Dev server with API proxy
//! - [`dev`] - Build, serve and watch together
//!
//! Each module provides an `execute` function taking the loaded [`Project`].

pub mod build;
pub mod dev;
pub mod elm;
pub mod html;
pub mod init;
pub mod serve;
pub(crate) mod utils;
pub mod watch;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;
pub use elm::execute as elm_execute;
pub use html::execute as html_execute;
pub use init::execute as init_execute;
pub use serve::execute as serve_execute;
pub use utils::Project;
pub use watch::execute as watch_execute;

use crate::cli::{Cli, Command};
use crate::error::Result;

/// Load the project named by the global flags and run the subcommand.
///
/// # Errors
///
/// Returns the first error of configuration loading or the command itself.
pub async fn run(cli: Cli) -> Result<()> {
    let project = Project::load(cli.cwd.as_deref(), cli.config.as_deref())?;

    match cli.command {
        Command::ElmInit => init_execute(&project).await,
        Command::Html => html_execute(&project).await,
        Command::Elm => elm_execute(&project).await,
        Command::Build => build_execute(&project).await,
        Command::Watch => watch_execute(&project).await,
        Command::StartServer(args) => serve_execute(project.with_port(args.port)?).await,
        Command::Test(args) => dev_execute(project.with_port(args.port)?).await,
    }
}

//! `elm`: initialize the toolchain and compile the bundle once.

use crate::commands::utils::{self, Project};
use crate::error::Result;
use crate::ui;

/// Execute the elm command.
///
/// # Errors
///
/// Returns error if initialization fails, or `CliError::Build` after
/// notifying if compilation fails.
pub async fn execute(project: &Project) -> Result<()> {
    let pipeline = utils::pipeline(project).await?;

    match pipeline.compile_and_bundle().await {
        Ok(report) => {
            match report.bundle {
                Some(bundle) => ui::success(&format!(
                    "Compiled {} module(s) into {} ({})",
                    report.modules,
                    bundle.display(),
                    ui::format_size(report.bytes)
                )),
                None => ui::warning(&format!(
                    "No Elm modules in {}",
                    project.layout.elm_dir.display()
                )),
            }
            Ok(())
        }
        Err(e) => Err(utils::stage_failures(vec![e])),
    }
}

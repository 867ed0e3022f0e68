//! `elm-init`: verify the compiler and create `elm.json` if needed.

use crate::commands::utils::{self, Project};
use crate::error::Result;
use crate::pipeline::ELM_MANIFEST;
use crate::ui;

/// Execute the elm-init command.
///
/// # Errors
///
/// Returns error if the compiler cannot be run or initialization fails.
pub async fn execute(project: &Project) -> Result<()> {
    let compiler = utils::init_compiler(project).await?;

    ui::info(&format!(
        "{} {} with {}",
        compiler.program(),
        compiler.version(),
        project.root.join(ELM_MANIFEST).display()
    ));
    Ok(())
}

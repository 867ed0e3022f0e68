//! `html`: copy HTML pages into the output directory once.

use crate::commands::utils::{self, Project};
use crate::error::Result;
use crate::pipeline;
use crate::ui;

/// Execute the html command.
///
/// Does not need the Elm toolchain.
///
/// # Errors
///
/// Returns `CliError::Build` after notifying if the copy fails.
pub async fn execute(project: &Project) -> Result<()> {
    let notifier = utils::notifier(&project.config.notify);

    match pipeline::copy_html_pages(&project.layout, notifier.as_ref()).await {
        Ok(copied) => {
            let bytes: u64 = copied.iter().map(|f| f.bytes).sum();
            ui::success(&format!(
                "Copied {} page(s) ({}) to {}",
                copied.len(),
                ui::format_size(bytes),
                project.layout.out_dir.display()
            ));
            Ok(())
        }
        Err(e) => Err(utils::stage_failures(vec![e])),
    }
}

//! `watch`: rebuild on every relevant source change until Ctrl+C.

use crate::commands::utils::{self, Project};
use crate::error::Result;
use crate::ui;
use tokio::signal;

/// Execute the watch command.
///
/// # Errors
///
/// Returns error if initialization fails or the watcher cannot start.
pub async fn execute(project: &Project) -> Result<()> {
    let pipeline = utils::pipeline(project).await?;
    let subscription = pipeline.watch(&project.config.watch)?;

    ui::info(&format!(
        "Watching for changes in: {}",
        subscription.root().display()
    ));
    ui::info("Press Ctrl+C to stop");

    signal::ctrl_c().await?;

    subscription.stop();
    ui::success("Stopped watching");
    Ok(())
}

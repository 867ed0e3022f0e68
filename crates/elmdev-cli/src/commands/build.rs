//! `build`: compile and copy once.

use crate::commands::utils::{self, Project};
use crate::error::Result;

/// Execute the build command.
///
/// Both stages always run. The exit status reflects failures, which have
/// already been notified by the pipeline.
///
/// # Errors
///
/// Returns error if initialization fails or any stage failed.
pub async fn execute(project: &Project) -> Result<()> {
    let pipeline = utils::pipeline(project).await?;
    let outcome = pipeline.build().await;

    if outcome.is_success() {
        Ok(())
    } else {
        Err(utils::stage_failures(outcome.failures()))
    }
}

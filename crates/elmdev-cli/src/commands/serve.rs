//! `start-server`: serve the output directory with the API proxy.

use crate::commands::utils::Project;
use crate::error::Result;
use crate::server::DevServer;
use crate::ui;
use tokio::signal;

/// Execute the start-server command.
///
/// Runs until Ctrl+C or until the server stops on its own.
///
/// # Errors
///
/// Returns error if the port is unavailable or the server fails.
pub async fn execute(project: Project) -> Result<()> {
    let server = DevServer::new(&project.config, project.layout.out_dir.clone())?;

    let shutdown = async {
        let _ = signal::ctrl_c().await;
        ui::info("Shutting down development server...");
    };
    server
        .start_until(|_| ui::info("Press Ctrl+C to stop"), shutdown)
        .await
}

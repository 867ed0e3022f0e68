//! `test`: the full development loop.
//!
//! 1. Initialize the toolchain and build once
//! 2. Start the dev server
//! 3. Once the server is listening, start watching
//! 4. Run until Ctrl+C or the server stops

use crate::commands::utils::{self, Project};
use crate::error::{CliError, Result};
use crate::server::DevServer;
use crate::ui;
use std::future::Future;
use std::net::SocketAddr;
use tokio::signal;
use tokio::sync::oneshot;

/// Execute the dev loop until Ctrl+C.
///
/// # Errors
///
/// Returns error if initialization fails, the server cannot start, or the
/// watcher cannot start.
pub async fn execute(project: Project) -> Result<()> {
    let shutdown = async {
        let _ = signal::ctrl_c().await;
    };
    run_until(project, |_| ui::info("Press Ctrl+C to stop"), shutdown).await
}

/// Build, serve, call `on_ready` with the bound address, then watch until
/// `shutdown` resolves or the server stops.
///
/// A failed initial build is reported but does not stop the loop; the next
/// change triggers another attempt. `on_ready` is not called when the server
/// fails to start.
///
/// # Errors
///
/// Returns error if initialization fails, the server cannot start, or the
/// watcher cannot start.
pub async fn run_until<F, S>(project: Project, on_ready: F, shutdown: S) -> Result<()>
where
    F: FnOnce(SocketAddr),
    S: Future<Output = ()>,
{
    let pipeline = utils::pipeline(&project).await?;

    ui::info("Performing initial build...");
    let outcome = pipeline.build().await;
    if !outcome.is_success() {
        ui::warning("Initial build failed, waiting for changes");
    }

    let server = DevServer::new(&project.config, project.layout.out_dir.clone())?;
    let (ready_tx, ready_rx) = oneshot::channel();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server_handle = tokio::spawn(server.start_until(
        move |addr| {
            let _ = ready_tx.send(addr);
        },
        async move {
            let _ = stop_rx.await;
        },
    ));

    let addr = tokio::select! {
        ready = ready_rx => match ready {
            Ok(addr) => addr,
            // The callback is dropped unsent only when startup failed.
            Err(_) => return server_exit(server_handle.await),
        },
        result = &mut server_handle => return server_exit(result),
    };
    on_ready(addr);

    let subscription = match pipeline.watch(&project.config.watch) {
        Ok(subscription) => subscription,
        Err(e) => {
            let _ = stop_tx.send(());
            return Err(e);
        }
    };
    ui::info(&format!(
        "Watching for changes in: {}",
        subscription.root().display()
    ));

    let result = tokio::select! {
        () = shutdown => {
            ui::info("Shutting down development server...");
            let _ = stop_tx.send(());
            server_exit(server_handle.await)
        }
        result = &mut server_handle => {
            ui::warning("Server task completed unexpectedly");
            server_exit(result)
        }
    };

    subscription.stop();
    if result.is_ok() {
        ui::success("Development server stopped");
    }
    result
}

fn server_exit(result: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match result {
        Ok(inner) => inner,
        Err(e) => Err(CliError::Server(e.to_string())),
    }
}

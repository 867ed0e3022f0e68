//! Development server.
//!
//! Serves the output directory as static files and forwards the API prefix
//! to the backend through [`ApiProxy`]. Proxied paths take priority over
//! files of the same name.

pub mod proxy;

pub use proxy::{ApiProxy, ProxyError};

use crate::error::{CliError, Result};
use axum::Router;
use elmdev_config::DevkitConfig;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

/// Static file server with an API proxy in front.
pub struct DevServer {
    host: String,
    port: u16,
    out_dir: PathBuf,
    proxy: Arc<ApiProxy>,
}

impl DevServer {
    /// Create a server for `out_dir` using the server and proxy sections of
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the proxy target is not a usable URL.
    pub fn new(config: &DevkitConfig, out_dir: impl Into<PathBuf>) -> Result<Self> {
        let proxy = ApiProxy::new(&config.proxy).map_err(|e| CliError::Server(e.to_string()))?;

        Ok(Self {
            host: config.server.host.clone(),
            port: config.server.port,
            out_dir: out_dir.into(),
            proxy: Arc::new(proxy),
        })
    }

    /// Use a different port than the configured one.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Build the router: proxy middleware in front of the static files.
    pub fn router(&self) -> Router {
        Router::new()
            .fallback_service(ServeDir::new(&self.out_dir))
            .layer(axum::middleware::from_fn_with_state(
                Arc::clone(&self.proxy),
                proxy::route_api,
            ))
    }

    /// Bind the listener without serving yet.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Bind` if the address is unavailable.
    pub async fn bind(self) -> Result<BoundServer> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|source| CliError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| CliError::Bind { addr, source })?;

        tracing::debug!(
            "serving {} (proxy {} -> {})",
            self.out_dir.display(),
            self.proxy.prefix(),
            self.proxy.target()
        );

        Ok(BoundServer {
            router: self.router(),
            listener,
            local_addr,
        })
    }

    /// Bind, announce the port, call `on_ready` once, then serve until the
    /// process stops or the server fails.
    ///
    /// `on_ready` is not called if binding fails.
    ///
    /// # Errors
    ///
    /// Returns error if binding fails or the server stops with an error.
    pub async fn start<F>(self, on_ready: F) -> Result<()>
    where
        F: FnOnce(SocketAddr),
    {
        self.start_until(on_ready, std::future::pending()).await
    }

    /// Like [`start`](Self::start), but stops once `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns error if binding fails or the server stops with an error.
    pub async fn start_until<F, S>(self, on_ready: F, shutdown: S) -> Result<()>
    where
        F: FnOnce(SocketAddr),
        S: Future<Output = ()> + Send,
    {
        let server = self.bind().await?;
        let addr = server.local_addr();

        crate::ui::success(&format!("Dev server listening on port {}", addr.port()));
        on_ready(addr);

        server.serve_until(shutdown).await
    }
}

/// A server whose listener is bound.
pub struct BoundServer {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl BoundServer {
    /// Address actually bound, with the real port when port 0 was requested.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// # Errors
    ///
    /// Returns `CliError::Server` if accepting connections fails.
    pub async fn serve(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .await
            .map_err(|e| CliError::Server(e.to_string()))
    }

    /// Serve until `signal` resolves.
    ///
    /// Stops accepting immediately instead of draining: abandoned proxy
    /// requests never finish, so a graceful drain could wait forever.
    pub async fn serve_until<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::select! {
            result = self.serve() => result,
            () = signal => {
                tracing::debug!("dev server stopped");
                Ok(())
            }
        }
    }
}

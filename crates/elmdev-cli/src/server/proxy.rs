//! Reverse proxy for the API prefix.
//!
//! Requests under the prefix are forwarded to the backend with the prefix
//! removed, so `/api/users?page=2` reaches `<target>/users?page=2`. Method,
//! headers (minus hop-by-hop ones) and body are passed through. `Host` is
//! kept as the browser sent it. The backend's status, headers and body are
//! streamed back unchanged.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use elmdev_config::{ProxyConfig, ProxyErrorMode};
use reqwest::Url;
use std::error::Error as _;
use std::sync::Arc;
use thiserror::Error;

/// Headers that describe a single connection and must not be forwarded.
static HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid proxy target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    #[error(transparent)]
    Upstream(#[from] reqwest::Error),
}

impl ProxyError {
    /// The error followed by every underlying cause, joined with `: `.
    ///
    /// Connection failures only name the OS error (`Connection refused`)
    /// deep in the source chain.
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}

/// Forwards requests under a path prefix to a backend.
#[derive(Debug, Clone)]
pub struct ApiProxy {
    client: reqwest::Client,
    prefix: String,
    target: Url,
    on_error: ProxyErrorMode,
}

impl ApiProxy {
    /// # Errors
    ///
    /// Returns `ProxyError::InvalidTarget` if the target is not an absolute
    /// `http` URL, or the HTTP client cannot be built.
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let invalid = |reason: String| ProxyError::InvalidTarget {
            target: config.target.clone(),
            reason,
        };

        let target = Url::parse(&config.target).map_err(|e| invalid(e.to_string()))?;
        // The client is built without TLS.
        if target.scheme() != "http" {
            return Err(invalid(format!("unsupported scheme '{}'", target.scheme())));
        }

        // Redirects go back to the browser untouched.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            prefix: config.prefix.trim_end_matches('/').to_string(),
            target,
            on_error: config.on_error,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Path remainder after the prefix, or `None` if `path` is not under it.
    ///
    /// The prefix matches whole segments only: `/api` and `/api/x` match,
    /// `/apix` does not.
    pub fn strip_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Backend URL for a request URI under the prefix.
    pub fn upstream_url(&self, uri: &Uri) -> Option<Url> {
        let rest = self.strip_prefix(uri.path())?;
        let rest = if rest.is_empty() { "/" } else { rest };

        let mut url = self.target.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}{rest}"));
        url.set_query(uri.query());
        Some(url)
    }

    /// Forward one request and return the backend's response.
    ///
    /// # Errors
    ///
    /// Returns error if the request body cannot be read or the backend is
    /// unreachable.
    pub async fn forward(&self, url: Url, req: Request) -> Result<Response, ProxyError> {
        let (parts, body) = req.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(ProxyError::Body)?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::CONTENT_LENGTH);

        let upstream = self
            .client
            .request(parts.method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        strip_hop_by_hop(&mut headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }

    /// Forward a request, applying the configured error policy on failure.
    ///
    /// With [`ProxyErrorMode::Abandon`] a failed request is logged and never
    /// answered; the client sees its own timeout.
    pub async fn handle(&self, url: Url, req: Request) -> Response {
        tracing::info!(
            method = %req.method(),
            path = %req.uri().path(),
            upstream = %url,
            "forwarding request through proxy"
        );

        match self.forward(url, req).await {
            Ok(response) => response,
            Err(err) => {
                let message = err.chain_message();
                tracing::error!("{}", message);
                match self.on_error {
                    ProxyErrorMode::Abandon => std::future::pending::<Response>().await,
                    ProxyErrorMode::BadGateway => {
                        (StatusCode::BAD_GATEWAY, message).into_response()
                    }
                }
            }
        }
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Connection may name further per-connection headers.
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::try_from(name.trim()).ok())
        .collect();

    for name in named.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

/// Middleware sending requests under the prefix to the proxy.
///
/// Everything else continues to the inner service.
pub async fn route_api(State(proxy): State<Arc<ApiProxy>>, req: Request, next: Next) -> Response {
    match proxy.upstream_url(req.uri()) {
        Some(url) => proxy.handle(url, req).await,
        None => next.run(req).await,
    }
}

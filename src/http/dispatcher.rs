//! Relay of requests to a single fixed upstream origin.
//!
//! # Design Decisions
//! - The request target is replaced by the upstream URI wholesale; the
//!   inbound path and query are dropped, not appended
//! - Headers pass through untouched apart from hop-by-hop ones
//! - Bodies are streamed in both directions, never buffered
//! - Transport failures map to 502; there is no retry or failover

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, Uri, Version},
    response::{IntoResponse, Response},
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};

use crate::http::response::strip_hop_by_hop;

/// Shared HTTP client used for every upstream.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Build the client shared by all dispatchers.
pub fn upstream_client() -> UpstreamClient {
    Client::builder(hyper_util::rt::TokioExecutor::new()).build(HttpConnector::new())
}

/// Forwards every request it receives to one upstream origin.
#[derive(Clone)]
pub struct Dispatcher {
    upstream: Uri,
    client: UpstreamClient,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("upstream", &self.upstream)
            .finish()
    }
}

impl Dispatcher {
    pub fn new(upstream: Uri, client: UpstreamClient) -> Self {
        Self { upstream, client }
    }

    /// Point `request` at the upstream origin.
    ///
    /// Upstreams are always spoken to over HTTP/1.1, whatever version the
    /// client used to reach the proxy.
    pub fn rewrite(&self, mut request: Request<Body>) -> Request<Body> {
        *request.uri_mut() = self.upstream.clone();
        *request.version_mut() = Version::HTTP_11;
        strip_hop_by_hop(request.headers_mut());
        request
    }

    /// Relay `request` upstream and return the upstream's response.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let inbound_path = request.uri().path().to_string();
        let method = request.method().clone();
        let request = self.rewrite(request);

        tracing::debug!(
            method = %method,
            path = %inbound_path,
            upstream = %self.upstream,
            "Forwarding request"
        );

        match self.client.request(request).await {
            Ok(response) => {
                let (mut parts, body) = response.into_parts();
                strip_hop_by_hop(&mut parts.headers);
                tracing::debug!(
                    upstream = %self.upstream,
                    status = %parts.status,
                    "Upstream responded"
                );
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::error!(
                    upstream = %self.upstream,
                    path = %inbound_path,
                    error = %e,
                    "Upstream request failed"
                );
                (StatusCode::BAD_GATEWAY, "Bad Gateway\n").into_response()
            }
        }
    }
}

/// Handler form of [`Dispatcher::forward`] for use as a route fallback.
pub async fn dispatch_handler(
    State(dispatcher): State<Dispatcher>,
    request: Request<Body>,
) -> Response {
    dispatcher.forward(request).await
}

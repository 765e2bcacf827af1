//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum app around the routing table
//! - Wire up request tracing
//! - Bind server to listener and serve until shutdown

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::routing::RoutingTable;

/// HTTP server for the reverse proxy.
pub struct HttpServer {
    router: Router,
    table: Arc<RoutingTable>,
}

impl HttpServer {
    /// Create a new HTTP server serving the given routing table.
    pub fn new(table: RoutingTable) -> Self {
        let table = Arc::new(table);
        let router = Self::build_router(table.clone());
        Self { router, table }
    }

    /// Every path goes through the routing table; the trace span carries
    /// a per-request id for log correlation.
    fn build_router(table: Arc<RoutingTable>) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(table)
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        id = %Uuid::new_v4(),
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }),
            )
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.table.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn proxy_handler(
    State(table): State<Arc<RoutingTable>>,
    request: Request<Body>,
) -> Response {
    table.handle(request).await
}

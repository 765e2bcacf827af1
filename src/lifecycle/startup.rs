//! Startup orchestration.
//!
//! Validate config → build routing table → bind listener → serve.
//! Any configuration error returns before the listener is bound, so a bad
//! entry never results in a partially started proxy.

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{ConfigError, ProxyConfig};
use crate::http::dispatcher::upstream_client;
use crate::http::HttpServer;
use crate::routing::RoutingTable;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Compose the routing table and bind the listener, without serving yet.
pub async fn bind(config: &ProxyConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    let table = RoutingTable::from_config(config, &upstream_client())?;
    if table.is_empty() {
        tracing::warn!("No entries configured; every request will get 404");
    }

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    Ok((HttpServer::new(table), listener))
}

/// Start the proxy and serve until `shutdown` fires.
pub async fn run(
    config: &ProxyConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    let (server, listener) = bind(config).await?;
    server.run(listener, shutdown).await.map_err(StartupError::Serve)
}

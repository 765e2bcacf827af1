//! Basic reverse proxy library.
//!
//! Maps URL path prefixes to fixed upstream origins, optionally behind an
//! HTTP Basic credential gate.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────▶ http::server ──▶ routing (longest prefix)
//!                                      │
//!                                      ▼
//!                          http::middleware::basic_auth  ── 400 / 401
//!                                      │
//!                                      ▼
//!     Client Response     http::dispatcher (rewrite target) ──▶ Upstream
//!     ◀──────────────────────────────────────────────────────── (502 on failure)
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RoutingTable;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing)
//!     → routing table picks a route by path prefix
//!     → middleware/basic_auth.rs (credential gate, if configured)
//!     → dispatcher.rs (rewrite target, relay upstream)
//!     → response.rs (hop-by-hop stripping)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod middleware;
pub mod response;
pub mod server;

pub use dispatcher::Dispatcher;
pub use server::HttpServer;

//! Observability subsystem.
//!
//! Structured `tracing` events from every subsystem, formatted by
//! `tracing-subscriber`. Each request runs inside a span carrying a
//! generated id (see `http::server`).

pub mod logging;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Build routing table → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and returned to the caller
//! - Listener binds last (traffic only when every route is composed)

pub mod shutdown;
pub mod startup;

pub use shutdown::{wait_for_signal, Shutdown};
pub use startup::StartupError;

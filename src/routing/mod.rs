//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     EntryConfig[]
//!     → Dispatcher per upstream
//!     → wrapped by credential gate (if a credential applies)
//!     → registered under path prefix (last registration wins)
//!     → sorted by prefix length, frozen as RoutingTable
//!
//! Incoming Request (path)
//!     → router.rs (route lookup)
//!     → matcher.rs (prefix test)
//!     → matched Route or 404
//! ```

pub mod matcher;
pub mod router;

pub use matcher::PathPrefixMatcher;
pub use router::{Route, RoutingTable};

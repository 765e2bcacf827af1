//! Request filters composed in front of route handlers.

pub mod basic_auth;

pub use basic_auth::{basic_auth_middleware, AuthConfigError, AuthError, BasicAuth};

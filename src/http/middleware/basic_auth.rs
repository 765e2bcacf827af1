//! HTTP Basic credential gate.
//!
//! Sits in front of a route's dispatcher as an axum middleware. Requests
//! without a well-formed `Authorization: Basic ...` header are rejected with
//! 400, wrong credentials with 401. No `WWW-Authenticate` challenge is sent.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;
use tracing::{debug, warn};

/// Body sent with every rejection.
const REJECTION_BODY: &str = "authorization failed\n";

/// A gate built with an empty username or password.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("username and password must be supplied")]
pub struct AuthConfigError;

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Header absent or not of the form `Basic <payload>`.
    #[error("missing or malformed Authorization header")]
    Malformed,
    /// Well-formed header carrying the wrong credential.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Malformed => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), REJECTION_BODY).into_response()
    }
}

/// Expected credential for one route.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BasicAuth {
    /// Create a gate; both halves of the credential must be non-empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, AuthConfigError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(AuthConfigError);
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check the `Authorization` header against the configured credential.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let value = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();

        let encoded = match value.split_once(' ') {
            Some(("Basic", encoded)) => encoded,
            _ => return Err(AuthError::Malformed),
        };

        // An undecodable payload counts as empty and fails the match below.
        let payload = BASE64.decode(encoded).unwrap_or_else(|e| {
            debug!(error = %e, "Authorization payload is not valid base64");
            Vec::new()
        });

        let Some(colon) = payload.iter().position(|&b| b == b':') else {
            return Err(AuthError::InvalidCredentials);
        };
        let (user, pass) = (&payload[..colon], &payload[colon + 1..]);

        if user == self.username.as_bytes() && pass == self.password.as_bytes() {
            Ok(())
        } else {
            warn!(user = %String::from_utf8_lossy(user), "Basic authentication failed");
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Middleware entry point: runs `next` only for authorized requests.
pub async fn basic_auth_middleware(
    State(auth): State<BasicAuth>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match auth.authorize(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            debug!(path = %request.uri().path(), error = %e, "Request rejected by credential gate");
            e.into_response()
        }
    }
}

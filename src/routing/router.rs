//! Route table construction and lookup.
//!
//! # Responsibilities
//! - Build one dispatcher per configured entry
//! - Wrap it in the credential gate when a credential applies
//! - Register the result under the entry's path prefix
//! - Look up the handler for an incoming path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Re-registering a prefix replaces the earlier handler
//! - Longest matching prefix wins
//! - Explicit no-match (404) rather than a silent default

use axum::{
    body::Body,
    http::{Request, Uri},
    middleware,
    response::Response,
    Router,
};
use tower::ServiceExt;

use crate::config::{validation::parse_upstream, ConfigError, ProxyConfig, ValidationError};
use crate::http::dispatcher::{dispatch_handler, Dispatcher, UpstreamClient};
use crate::http::middleware::basic_auth::{basic_auth_middleware, BasicAuth};
use crate::http::response::not_found;
use crate::routing::matcher::PathPrefixMatcher;

/// A registered prefix with its composed handler.
#[derive(Clone)]
pub struct Route {
    matcher: PathPrefixMatcher,
    upstream: Uri,
    auth: Option<BasicAuth>,
    service: Router,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("prefix", &self.matcher.prefix())
            .field("upstream", &self.upstream)
            .field("auth", &self.auth)
            .finish()
    }
}

impl Route {
    /// Compose a dispatcher for `upstream`, gated by `auth` if given.
    pub fn new(
        prefix: impl Into<String>,
        upstream: Uri,
        auth: Option<BasicAuth>,
        client: UpstreamClient,
    ) -> Self {
        let dispatcher = Dispatcher::new(upstream.clone(), client);
        let mut service = Router::new()
            .fallback(dispatch_handler)
            .with_state(dispatcher);
        if let Some(gate) = &auth {
            service = service.layer(middleware::from_fn_with_state(
                gate.clone(),
                basic_auth_middleware,
            ));
        }

        Self {
            matcher: PathPrefixMatcher::new(prefix),
            upstream,
            auth,
            service,
        }
    }

    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }

    pub fn upstream(&self) -> &Uri {
        &self.upstream
    }

    pub fn is_protected(&self) -> bool {
        self.auth.is_some()
    }

    /// Run the request through the gate (if any) and the dispatcher.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        match self.service.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}

/// Immutable prefix → handler table.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    /// Ordered by descending prefix length.
    routes: Vec<Route>,
}

impl RoutingTable {
    /// Build routes from explicit values, in registration order.
    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> Self {
        let mut registered: Vec<Route> = Vec::new();
        for route in routes {
            match registered.iter_mut().find(|r| r.prefix() == route.prefix()) {
                Some(existing) => {
                    tracing::warn!(
                        path = %route.prefix(),
                        previous = %existing.upstream,
                        upstream = %route.upstream,
                        "Path registered twice; later entry wins"
                    );
                    *existing = route;
                }
                None => registered.push(route),
            }
        }
        registered.sort_by_key(|r| std::cmp::Reverse(r.matcher.specificity()));
        Self { routes: registered }
    }

    /// Validate `config` and compose every entry, failing on the first bad one.
    ///
    /// `startup::bind` also takes configs built in code rather than loaded
    /// from disk, so the table validates again instead of trusting its
    /// caller. The per-entry errors below are unreachable once that passes.
    pub fn from_config(config: &ProxyConfig, client: &UpstreamClient) -> Result<Self, ConfigError> {
        crate::config::validate_config(config)?;

        let mut routes = Vec::with_capacity(config.entries.len());
        for (index, entry) in config.entries.iter().enumerate() {
            let upstream = parse_upstream(&entry.upstream).map_err(|reason| {
                ConfigError::Validation(vec![ValidationError::InvalidUpstream {
                    index,
                    upstream: entry.upstream.clone(),
                    reason,
                }])
            })?;
            let auth = config
                .effective_auth(entry)
                .map(|a| BasicAuth::new(a.username.as_str(), a.password.as_str()))
                .transpose()?;

            tracing::info!(
                path = %entry.path,
                upstream = %upstream,
                auth = auth.is_some(),
                "Added proxy path"
            );
            routes.push(Route::new(entry.path.as_str(), upstream, auth, client.clone()));
        }

        Ok(Self::from_routes(routes))
    }

    /// Most specific route whose prefix matches `path`.
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.matcher.matches(path))
    }

    /// Dispatch `request` to its route, or answer 404.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        match self.lookup(request.uri().path()) {
            Some(route) => route.handle(request).await,
            None => {
                tracing::debug!(path = %request.uri().path(), "No route matched");
                not_found()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

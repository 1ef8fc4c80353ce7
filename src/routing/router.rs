//! Route table construction.
//!
//! # Responsibilities
//! - Parse route spec lines and resolve their controllers and middleware
//! - Compose prefixed, normalized paths and check them against the route table
//! - Build bound dispatch closures and register them with the server
//!
//! # Design Decisions
//! - Two states only: uninitialized, then initialized by `init`
//! - Fail fast: a batch is fully resolved before anything is registered, so an
//!   error in any line registers nothing from that batch
//! - Controllers and middleware are resolved through `InstanceCache`, so each
//!   is loaded at most once no matter how many routes reference it
//! - Registration happens at startup on one thread; dispatch closures carry no
//!   reference back to the router

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::response::IntoResponse;
use futures_util::FutureExt;

use crate::config::schema::RoutingConfig;
use crate::observability::metrics;
use crate::routing::cache::InstanceCache;
use crate::routing::controller::{dispatch_fn, ControllerContext, Dispatch, SharedResource};
use crate::routing::error::RouteError;
use crate::routing::path::normalize;
use crate::routing::registry::ModuleSource;
use crate::routing::server::{HttpServer, RegisteredRoute, RouteSummary};
use crate::routing::pattern::{PathPattern, RouteTable};
use crate::routing::spec::RouteSpec;

/// Builds the dispatch table from route spec lines.
pub struct Router<S> {
    modules: Box<dyn ModuleSource>,
    config: RoutingConfig,
    cache: InstanceCache,
    server: Option<S>,
    context: ControllerContext,
    registered: Vec<RouteSummary>,
    table: RouteTable,
    fallback_installed: bool,
}

impl<S: HttpServer> Router<S> {
    /// Create an uninitialized router resolving names through `modules`.
    pub fn new(modules: impl ModuleSource + 'static, config: RoutingConfig) -> Self {
        Self {
            modules: Box::new(modules),
            config,
            cache: InstanceCache::new(),
            server: None,
            context: ControllerContext::default(),
            registered: Vec::new(),
            table: RouteTable::new(),
            fallback_installed: false,
        }
    }

    /// Bind the server and the optional shared resource passed to controllers.
    ///
    /// Only the first call takes effect.
    pub fn init(mut self, server: S, resource: Option<SharedResource>) -> Self {
        if self.server.is_some() {
            tracing::warn!("Router already initialised; ignoring repeated init");
            return self;
        }

        self.context = ControllerContext {
            server: server.handle(),
            resource,
        };
        self.server = Some(server);
        tracing::debug!(base_url = %self.context.server.base_url, "Router initialised");
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.server.is_some()
    }

    /// Register every line of `lines` under `prefix`, in order.
    pub fn route<L: AsRef<str>>(mut self, lines: &[L], prefix: &str) -> Result<Self, RouteError> {
        if self.server.is_none() {
            tracing::error!("Routes registered before the router was initialised");
            return Err(RouteError::NotInitialized);
        }
        if self.fallback_installed {
            tracing::warn!(prefix = %prefix, "Registering routes after the GET fallback was installed");
        }

        let mut pending = Vec::with_capacity(lines.len());
        let mut table = self.table.clone();

        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let route = self
                .resolve(line, prefix)
                .and_then(|route| table.insert(route.method, &route.pattern).map(|()| route))
                .inspect_err(|e| {
                    tracing::error!(line_number = index + 1, route = %line, error = %e, "Failed to register route");
                })?;
            pending.push(route);
        }

        let Some(server) = self.server.as_mut() else {
            return Err(RouteError::NotInitialized);
        };

        let count = pending.len();
        for route in pending {
            tracing::debug!(
                method = %route.method,
                path = %route.pattern.path(),
                target = %route.target,
                middleware = route.middleware.len(),
                "Route registered"
            );
            metrics::record_route_registered(route.method.as_str());
            self.registered.push(route.summary());
            server.register_route(route);
        }

        self.table = table;
        tracing::info!(prefix = %prefix, routes = count, "Route batch registered");
        Ok(self)
    }

    /// Register web routes (no prefix).
    pub fn route_web<L: AsRef<str>>(self, lines: &[L]) -> Result<Self, RouteError> {
        self.route(lines, "")
    }

    /// Register API routes under the configured API prefix.
    pub fn route_api<L: AsRef<str>>(self, lines: &[L]) -> Result<Self, RouteError> {
        let prefix = self.config.api_prefix.clone();
        self.route(lines, &prefix)
    }

    /// Install `handler` for every GET request no explicit route matched.
    ///
    /// Call this after all explicit routes.
    pub fn catch_get_requests<F, Fut, R>(self, handler: F) -> Result<Self, RouteError>
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.catch_get_requests_with(dispatch_fn(handler))
    }

    /// Like [`Router::catch_get_requests`] with an already erased handler.
    pub fn catch_get_requests_with(mut self, handler: Dispatch) -> Result<Self, RouteError> {
        let Some(server) = self.server.as_mut() else {
            tracing::error!("GET fallback installed before the router was initialised");
            return Err(RouteError::NotInitialized);
        };
        server.register_fallback(handler);
        self.fallback_installed = true;
        tracing::info!("GET fallback installed");
        Ok(self)
    }

    /// Routes registered so far, in registration order.
    pub fn routes(&self) -> &[RouteSummary] {
        &self.registered
    }

    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    /// Finish configuration and hand back the wired server.
    pub fn into_server(self) -> Result<S, RouteError> {
        self.server.ok_or(RouteError::NotInitialized)
    }

    fn resolve(&self, line: &str, prefix: &str) -> Result<RegisteredRoute, RouteError> {
        let delimiter = &self.config.controller_method_delimiter;
        let spec = RouteSpec::parse(line, delimiter)?;
        let pattern = PathPattern::parse(&normalize(prefix, &spec.path))?;

        let controller = self.cache.controller(&spec.controller, &self.context, || {
            self.modules.load_controller(&spec.controller)
        })?;

        let dispatch = controller
            .handle
            .action(&spec.action)
            .ok_or_else(|| RouteError::MethodNotFound {
                controller: spec.controller.clone(),
                method: spec.action.clone(),
            })?;

        let middleware = spec
            .middleware
            .iter()
            .map(|name| self.cache.middleware(name, || self.modules.load_middleware(name)))
            .collect::<Result<Vec<_>, _>>()?;

        let target = spec.target(delimiter);
        Ok(RegisteredRoute {
            method: spec.method,
            pattern,
            dispatch: instrument(target.clone(), dispatch),
            target,
            middleware,
        })
    }
}

impl<S> std::fmt::Debug for Router<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("initialized", &self.server.is_some())
            .field("routes", &self.registered.len())
            .field("controllers", &self.cache.controller_count())
            .field("middlewares", &self.cache.middleware_count())
            .finish()
    }
}

/// Record dispatch count and latency around `dispatch`.
fn instrument(target: String, dispatch: Dispatch) -> Dispatch {
    let target: Arc<str> = target.into();
    Arc::new(move |req: Request<Body>| {
        let target = Arc::clone(&target);
        let start = Instant::now();
        dispatch(req)
            .map(move |response| {
                metrics::record_dispatch(&target, response.status().as_u16(), start);
                response
            })
            .boxed()
    })
}

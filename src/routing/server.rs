//! Server handle the router registers into.
//!
//! Any HTTP server can host the route table by implementing [`HttpServer`].
//! The router hands over one [`RegisteredRoute`] per route spec and keeps no
//! reference to it afterwards.

use crate::routing::controller::{Dispatch, ServerHandle};
use crate::routing::middleware::MiddlewareBinding;
use crate::routing::pattern::PathPattern;
use crate::routing::spec::HttpMethod;

/// A fully resolved route, ready to be served.
pub struct RegisteredRoute {
    pub method: HttpMethod,
    /// Validated, normalized path, e.g. `/api/users/:id`.
    pub pattern: PathPattern,
    /// `Controller@action`, for logs and listings.
    pub target: String,
    /// Middleware chain, outermost first.
    pub middleware: Vec<MiddlewareBinding>,
    pub dispatch: Dispatch,
}

impl RegisteredRoute {
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            method: self.method,
            path: self.pattern.path().to_string(),
            target: self.target.clone(),
            middleware: self.middleware.iter().map(|m| m.name.clone()).collect(),
        }
    }
}

impl std::fmt::Debug for RegisteredRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredRoute")
            .field("method", &self.method)
            .field("path", &self.pattern.path())
            .field("target", &self.target)
            .field("middleware", &self.middleware)
            .finish_non_exhaustive()
    }
}

/// Printable description of a registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub method: HttpMethod,
    pub path: String,
    pub target: String,
    pub middleware: Vec<String>,
}

impl std::fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<7} {:<30} {}", self.method.as_str().to_uppercase(), self.path, self.target)?;
        if !self.middleware.is_empty() {
            write!(f, " [{}]", self.middleware.join(", "))?;
        }
        Ok(())
    }
}

/// Registration primitives of the hosting HTTP server.
pub trait HttpServer {
    /// Descriptor bound into every controller on init.
    fn handle(&self) -> ServerHandle;

    /// Register a route under its method and path.
    fn register_route(&mut self, route: RegisteredRoute);

    /// Register the catch-all GET handler.
    fn register_fallback(&mut self, handler: Dispatch);
}

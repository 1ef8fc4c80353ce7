//! The web application served by this crate.
//!
//! # Data Flow
//! ```text
//! config/app.toml [routes]
//!     → modules() (controllers and middleware artifacts)
//!     → build_router() (route_web, route_api, GET fallback)
//!     → AxumServer
//! ```
//!
//! Controllers receive the [`UserStore`] as their shared resource.

pub mod controllers;
pub mod middlewares;
pub mod store;

use std::sync::Arc;

use axum::{body::Body, http::Request, response::Redirect};

use crate::config::{AppConfig, MiddlewareManifest, RoutingConfig};
use crate::http::AxumServer;
use crate::routing::{middleware_fn, ModuleRegistry, RouteError, Router, SharedResource};

pub use controllers::{HomeController, UserController};
pub use store::{User, UserStore};

/// Registration table of every controller and middleware artifact.
pub fn modules(config: &RoutingConfig, manifest: MiddlewareManifest) -> ModuleRegistry {
    ModuleRegistry::new(config, manifest)
        .controller("HomeController", HomeController::default)
        .controller("UserController", UserController::default)
        .middleware("timestamp", middleware_fn(middlewares::timestamp))
        .middleware("require_json", middleware_fn(middlewares::require_json))
}

/// Wire the configured web and API routes onto a fresh [`AxumServer`].
///
/// Unmatched GET requests redirect to `/`.
pub fn build_router(
    config: &AppConfig,
    manifest: MiddlewareManifest,
    store: Arc<UserStore>,
) -> Result<Router<AxumServer>, RouteError> {
    Router::new(modules(&config.routing, manifest), config.routing.clone())
        .init(AxumServer::new(&config.server), Some(SharedResource::from_arc(store)))
        .route_web(&config.routes.web)?
        .route_api(&config.routes.api)?
        .catch_get_requests(redirect_home)
}

async fn redirect_home(_request: Request<Body>) -> Redirect {
    Redirect::to("/")
}

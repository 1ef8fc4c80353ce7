//! Routing and dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Route spec lines (web, api)
//!     → spec.rs (tokenize, validate method and Controller@action)
//!     → path.rs (prefix + path, collapse repeated separators)
//!     → pattern.rs (validate captures, reject duplicates and name conflicts)
//!     → cache.rs (get-or-load controller / middleware by name)
//!         → registry.rs (resolve name to artifact, fail with expected location)
//!     → router.rs (bind action to cached instance, build middleware chain)
//!     → server.rs (HttpServer::register_route)
//! ```
//!
//! # Design Decisions
//! - All resolution happens at startup; errors abort before traffic is served
//! - Controllers and middleware are resolved from an explicit registration table
//! - Each controller and middleware is loaded and initialized at most once
//! - Dispatch closures are self-contained; the router can be dropped after setup

pub mod cache;
pub mod controller;
pub mod error;
pub mod middleware;
pub mod path;
pub mod pattern;
pub mod registry;
pub mod router;
pub mod server;
pub mod spec;

pub use cache::{ControllerBinding, InstanceCache};
pub use controller::{
    dispatch_fn, Actions, Controller, ControllerContext, Dispatch, ServerHandle, SharedResource,
};
pub use error::RouteError;
pub use middleware::{middleware_fn, MiddlewareBinding, MiddlewareHandler};
pub use pattern::{PathPattern, RouteTable};
pub use registry::{ModuleRegistry, ModuleSource};
pub use router::Router;
pub use server::{HttpServer, RegisteredRoute, RouteSummary};
pub use spec::{HttpMethod, RouteSpec};

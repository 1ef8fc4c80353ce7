//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use webscaffold::config::{MiddlewareManifest, RoutingConfig};
use webscaffold::routing::controller::LoadedController;
use webscaffold::routing::{
    middleware_fn, Actions, Controller, ControllerContext, Dispatch, HttpMethod, HttpServer,
    MiddlewareHandler, ModuleRegistry, ModuleSource, RegisteredRoute, RouteError, ServerHandle,
};

pub const BASE_URL: &str = "http://test.local";

/// One registration seen by [`RecordingServer`].
pub struct Recorded {
    pub method: HttpMethod,
    pub path: String,
    pub target: String,
    pub middleware: Vec<String>,
    pub dispatch: Dispatch,
}

/// What a [`RecordingServer`] has seen so far.
#[derive(Default)]
pub struct Log {
    pub routes: Vec<Recorded>,
    pub fallback: Option<Dispatch>,
}

/// Server stub that records every registration.
///
/// Clones share one log, so a test can keep a clone and inspect it after the
/// router consumed the original.
#[derive(Clone, Default)]
pub struct RecordingServer {
    log: Arc<Mutex<Log>>,
}

impl RecordingServer {
    pub fn log(&self) -> MutexGuard<'_, Log> {
        self.log.lock().unwrap()
    }
}

impl HttpServer for RecordingServer {
    fn handle(&self) -> ServerHandle {
        ServerHandle {
            base_url: BASE_URL.into(),
            bind_address: "127.0.0.1:0".into(),
        }
    }

    fn register_route(&mut self, route: RegisteredRoute) {
        self.log().routes.push(Recorded {
            method: route.method,
            path: route.pattern.path().to_string(),
            target: route.target,
            middleware: route.middleware.into_iter().map(|m| m.name).collect(),
            dispatch: route.dispatch,
        });
    }

    fn register_fallback(&mut self, handler: Dispatch) {
        self.log().fallback = Some(handler);
    }
}

/// Counters shared between a test and the controllers it loads.
#[derive(Clone, Default)]
pub struct Probes {
    pub inits: Arc<AtomicUsize>,
    pub list_calls: Arc<AtomicUsize>,
}

impl Probes {
    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

/// Minimal users controller recording its calls.
pub struct UsersController {
    probes: Probes,
    base_url: Option<String>,
}

impl UsersController {
    async fn get_users(self: Arc<Self>, _request: Request<Body>) -> Response {
        self.probes.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.base_url {
            Some(base_url) => format!("users from {base_url}").into_response(),
            None => (StatusCode::INTERNAL_SERVER_ERROR, "not initialised").into_response(),
        }
    }

    async fn save_user(self: Arc<Self>, _request: Request<Body>) -> Response {
        StatusCode::CREATED.into_response()
    }
}

impl Controller for UsersController {
    fn init(&mut self, ctx: &ControllerContext) {
        self.probes.inits.fetch_add(1, Ordering::SeqCst);
        self.base_url = Some(ctx.server.base_url.clone());
    }

    fn actions() -> Actions<Self> {
        Actions::new()
            .action("getUsers", Self::get_users)
            .action("saveUser", Self::save_user)
    }
}

/// Rejects requests without an `authorization` header.
pub async fn auth(request: Request<Body>, next: Next) -> Response {
    if request.headers().contains_key("authorization") {
        next.run(request).await
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

pub fn routing_config() -> RoutingConfig {
    RoutingConfig {
        controllers_dir: "app/controllers".into(),
        middlewares_dir: "app/middlewares".into(),
        ..RoutingConfig::default()
    }
}

/// Registry with `UserController` and the `auth` middleware.
///
/// The manifest also maps `ghost` to an artifact nobody registered.
pub fn registry(probes: &Probes) -> ModuleRegistry {
    let manifest = MiddlewareManifest::new()
        .with("auth", "auth.rs")
        .with("ghost", "ghost.rs");
    let probes = probes.clone();
    ModuleRegistry::new(&routing_config(), manifest)
        .controller("UserController", move || UsersController {
            probes: probes.clone(),
            base_url: None,
        })
        .middleware("auth", middleware_fn(auth))
}

/// Module source that counts how often each artifact is loaded.
pub struct CountingSource {
    inner: ModuleRegistry,
    pub controller_loads: Arc<AtomicUsize>,
    pub middleware_loads: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(inner: ModuleRegistry) -> Self {
        Self {
            inner,
            controller_loads: Arc::default(),
            middleware_loads: Arc::default(),
        }
    }
}

impl ModuleSource for CountingSource {
    fn load_controller(&self, name: &str) -> Result<Box<dyn LoadedController>, RouteError> {
        self.controller_loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_controller(name)
    }

    fn load_middleware(&self, name: &str) -> Result<MiddlewareHandler, RouteError> {
        self.middleware_loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_middleware(name)
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

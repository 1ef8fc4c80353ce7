//! Instance cache for resolved controllers and middleware.
//!
//! # Responsibilities
//! - Memoize controller handles and middleware handlers by name
//! - Initialize each controller exactly once, on first load
//!
//! # Design Decisions
//! - Entries live for the process lifetime; there is no eviction or invalidation
//! - "check, load, init, store" runs under the DashMap shard lock for that key,
//!   so concurrent callers still load a name at most once
//! - Failed loads store nothing; a later call retries the loader

use std::sync::Arc;

use dashmap::DashMap;

use crate::routing::controller::{ControllerContext, ControllerHandle, LoadedController};
use crate::routing::error::RouteError;
use crate::routing::middleware::{MiddlewareBinding, MiddlewareHandler};

/// A loaded, initialized controller, shared by every route that references it.
#[derive(Clone)]
pub struct ControllerBinding {
    pub name: String,
    pub handle: ControllerHandle,
}

impl std::fmt::Debug for ControllerBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerBinding").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Memoized controller and middleware bindings.
#[derive(Default)]
pub struct InstanceCache {
    controllers: DashMap<String, ControllerBinding>,
    middlewares: DashMap<String, MiddlewareBinding>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached controller `name`, loading and initializing it on first use.
    pub fn controller<F>(
        &self,
        name: &str,
        ctx: &ControllerContext,
        load: F,
    ) -> Result<ControllerBinding, RouteError>
    where
        F: FnOnce() -> Result<Box<dyn LoadedController>, RouteError>,
    {
        let entry = self.controllers.entry(name.to_string()).or_try_insert_with(|| {
            let mut loaded = load()?;
            loaded.init(ctx);
            tracing::info!(controller = %name, "Controller loaded");
            Ok::<_, RouteError>(ControllerBinding {
                name: name.to_string(),
                handle: loaded.into_handle(),
            })
        })?;
        Ok(entry.value().clone())
    }

    /// Return the cached middleware `name`, loading it on first use.
    pub fn middleware<F>(&self, name: &str, load: F) -> Result<MiddlewareBinding, RouteError>
    where
        F: FnOnce() -> Result<MiddlewareHandler, RouteError>,
    {
        let entry = self.middlewares.entry(name.to_string()).or_try_insert_with(|| {
            let handler = load()?;
            tracing::info!(middleware = %name, "Middleware loaded");
            Ok::<_, RouteError>(MiddlewareBinding {
                name: name.to_string(),
                handler,
            })
        })?;
        Ok(entry.value().clone())
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// True if both bindings point at the same cached controller instance.
    pub fn same_instance(a: &ControllerBinding, b: &ControllerBinding) -> bool {
        Arc::ptr_eq(&a.handle, &b.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::controller::{Actions, Controller, Loaded};
    use crate::routing::middleware::middleware_fn;
    use axum::{body::Body, http::Request, middleware::Next};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Probe {
        inits: Arc<AtomicUsize>,
    }

    impl Controller for Probe {
        fn init(&mut self, _ctx: &ControllerContext) {
            self.inits.fetch_add(1, Ordering::SeqCst);
        }

        fn actions() -> Actions<Self> {
            Actions::new().action("index", |_this, _req: Request<Body>| async { "ok" })
        }
    }

    fn loader(loads: &AtomicUsize, inits: &Arc<AtomicUsize>) -> Result<Box<dyn LoadedController>, RouteError> {
        loads.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Loaded::new(Probe { inits: Arc::clone(inits) })))
    }

    #[test]
    fn test_controller_loaded_and_initialized_once() {
        let cache = InstanceCache::new();
        let ctx = ControllerContext::default();
        let loads = AtomicUsize::new(0);
        let inits = Arc::new(AtomicUsize::new(0));

        let a = cache.controller("Probe", &ctx, || loader(&loads, &inits)).unwrap();
        let b = cache.controller("Probe", &ctx, || loader(&loads, &inits)).unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert!(InstanceCache::same_instance(&a, &b));
        assert_eq!(cache.controller_count(), 1);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let cache = InstanceCache::new();
        let ctx = ControllerContext::default();

        let err = cache
            .controller("Missing", &ctx, || {
                Err(RouteError::ControllerNotFound {
                    name: "Missing".into(),
                    expected: "Missing.rs".into(),
                })
            })
            .unwrap_err();
        assert!(matches!(err, RouteError::ControllerNotFound { .. }));
        assert_eq!(cache.controller_count(), 0);

        let loads = AtomicUsize::new(0);
        let inits = Arc::new(AtomicUsize::new(0));
        assert!(cache.controller("Missing", &ctx, || loader(&loads, &inits)).is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_middleware_loaded_once() {
        let cache = InstanceCache::new();
        let loads = AtomicUsize::new(0);
        let load = || {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok::<_, RouteError>(middleware_fn(|req: Request<Body>, next: Next| next.run(req)))
        };

        let a = cache.middleware("auth", load).unwrap();
        let b = cache.middleware("auth", load).unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a.handler, &b.handler));
        assert_eq!(a.name, "auth");
        assert_eq!(cache.middleware_count(), 1);
    }

    #[test]
    fn test_concurrent_loads_are_serialized() {
        let cache = Arc::new(InstanceCache::new());
        let loads = Arc::new(AtomicUsize::new(0));
        let inits = Arc::new(AtomicUsize::new(0));

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let loads = Arc::clone(&loads);
                let inits = Arc::clone(&inits);
                std::thread::spawn(move || {
                    let ctx = ControllerContext::default();
                    cache.controller("Probe", &ctx, || loader(&loads, &inits)).unwrap();
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(inits.load(Ordering::SeqCst), 1);
    }
}

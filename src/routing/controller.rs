//! Controllers and bound actions.
//!
//! # Responsibilities
//! - Define the `Controller` trait implemented by the host application
//! - Map action names (`getUsers`) to async functions via `Actions`
//! - Erase controller types so the registry and cache can store any of them
//! - Produce bound-method dispatch closures over the cached instance
//!
//! # Design Decisions
//! - Action tables are explicit; there is no reflection or string eval
//! - A dispatch closure owns an `Arc` to its instance, so actions observe
//!   the state set by `init`
//! - `init` runs on `&mut self` before the instance is shared

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

/// A resolved request handler: either a bound controller action or a fallback.
pub type Dispatch = Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

type ActionFn<C> = Arc<dyn Fn(Arc<C>, Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wrap an async function into a [`Dispatch`].
pub fn dispatch_fn<F, Fut, R>(f: F) -> Dispatch
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    Arc::new(move |req: Request<Body>| f(req).map(R::into_response).boxed())
}

/// Descriptor of the server a controller is mounted on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerHandle {
    /// Public base URL (no trailing slash), used to build absolute links.
    pub base_url: String,
    /// Socket address the server listens on.
    pub bind_address: String,
}

/// Opaque shared resource handed to every controller on init (e.g. a DB pool).
#[derive(Clone)]
pub struct SharedResource(Arc<dyn Any + Send + Sync>);

impl SharedResource {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Share an existing `Arc` without re-wrapping it.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self(value)
    }

    /// Typed view of the resource, `None` if it holds another type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.0).downcast::<T>().ok()
    }
}

impl fmt::Debug for SharedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedResource(..)")
    }
}

/// Everything bound into a controller at initialization.
#[derive(Debug, Clone, Default)]
pub struct ControllerContext {
    pub server: ServerHandle,
    pub resource: Option<SharedResource>,
}

impl ControllerContext {
    /// Typed access to the shared resource.
    pub fn resource<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resource.as_ref().and_then(SharedResource::downcast::<T>)
    }
}

/// Named actions of a controller.
pub struct Actions<C> {
    table: HashMap<&'static str, ActionFn<C>>,
}

impl<C: Send + Sync + 'static> Actions<C> {
    pub fn new() -> Self {
        Self { table: HashMap::new() }
    }

    /// Register `f` under `name`. A later registration with the same name wins.
    pub fn action<F, Fut, R>(mut self, name: &'static str, f: F) -> Self
    where
        F: Fn(Arc<C>, Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        let action: ActionFn<C> =
            Arc::new(move |this: Arc<C>, req: Request<Body>| f(this, req).map(R::into_response).boxed());
        self.table.insert(name, action);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }
}

impl<C: Send + Sync + 'static> Default for Actions<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A request-handling controller.
pub trait Controller: Send + Sync + Sized + 'static {
    /// One-time setup with the server handle and shared resource.
    fn init(&mut self, _ctx: &ControllerContext) {}

    /// The actions routes may reference by name.
    fn actions() -> Actions<Self>;
}

/// A freshly loaded controller that has not been initialized yet.
pub trait LoadedController: Send {
    fn init(&mut self, ctx: &ControllerContext);

    /// Freeze the instance and hand out a shareable handle.
    fn into_handle(self: Box<Self>) -> ControllerHandle;
}

/// An initialized, shared controller instance.
pub trait BoundController: Send + Sync {
    /// Bound dispatch for `action`, `None` if the controller has no such action.
    fn action(&self, action: &str) -> Option<Dispatch>;
}

/// Shareable handle to an initialized controller.
pub type ControllerHandle = Arc<dyn BoundController>;

pub(crate) struct Loaded<C> {
    instance: C,
}

impl<C: Controller> Loaded<C> {
    pub(crate) fn new(instance: C) -> Self {
        Self { instance }
    }
}

impl<C: Controller> LoadedController for Loaded<C> {
    fn init(&mut self, ctx: &ControllerContext) {
        self.instance.init(ctx);
    }

    fn into_handle(self: Box<Self>) -> ControllerHandle {
        Arc::new(Bound {
            instance: Arc::new(self.instance),
            actions: C::actions(),
        })
    }
}

struct Bound<C> {
    instance: Arc<C>,
    actions: Actions<C>,
}

impl<C: Controller> BoundController for Bound<C> {
    fn action(&self, action: &str) -> Option<Dispatch> {
        let f = Arc::clone(self.actions.table.get(action)?);
        let instance = Arc::clone(&self.instance);
        let dispatch: Dispatch = Arc::new(move |req: Request<Body>| f(Arc::clone(&instance), req));
        Some(dispatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        hits: AtomicUsize,
        label: String,
    }

    impl Controller for Counter {
        fn init(&mut self, ctx: &ControllerContext) {
            self.label = ctx.server.base_url.clone();
        }

        fn actions() -> Actions<Self> {
            Actions::new().action("hit", |this: Arc<Self>, _req| async move {
                let n = this.hits.fetch_add(1, Ordering::SeqCst) + 1;
                format!("{} {}", this.label, n)
            })
        }
    }

    fn request() -> Request<Body> {
        Request::builder().uri("/").body(Body::empty()).unwrap()
    }

    async fn body_text(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_bound_dispatch_shares_instance_state() {
        let mut loaded: Box<dyn LoadedController> = Box::new(Loaded::new(Counter::default()));
        let ctx = ControllerContext {
            server: ServerHandle { base_url: "http://x".into(), bind_address: String::new() },
            resource: None,
        };
        loaded.init(&ctx);
        let handle = loaded.into_handle();

        let first = handle.action("hit").unwrap();
        let second = handle.action("hit").unwrap();
        assert_eq!(body_text(first(request()).await).await, "http://x 1");
        assert_eq!(body_text(second(request()).await).await, "http://x 2");
        assert!(handle.action("missing").is_none());
    }

    #[test]
    fn test_shared_resource_downcast() {
        let resource = SharedResource::new(42u32);
        assert_eq!(*resource.downcast::<u32>().unwrap(), 42);
        assert!(resource.downcast::<String>().is_none());

        let ctx = ControllerContext { server: ServerHandle::default(), resource: Some(resource) };
        assert!(ctx.resource::<u32>().is_some());
    }

    #[test]
    fn test_actions_table() {
        let actions = Counter::actions();
        assert!(actions.contains("hit"));
        assert_eq!(actions.names().collect::<Vec<_>>(), vec!["hit"]);
    }
}

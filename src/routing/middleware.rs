//! Route middleware.
//!
//! A middleware is a stateless callable `(request, next) -> response`. It may
//! short-circuit by returning its own response, or pass control on with
//! `next.run(request)`.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

/// Type-erased middleware callable.
pub type MiddlewareHandler = Arc<dyn Fn(Request<Body>, Next) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wrap an async function into a [`MiddlewareHandler`].
pub fn middleware_fn<F, Fut, R>(f: F) -> MiddlewareHandler
where
    F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    Arc::new(move |req: Request<Body>, next: Next| f(req, next).map(R::into_response).boxed())
}

/// A resolved middleware, cached by reference name.
#[derive(Clone)]
pub struct MiddlewareBinding {
    pub name: String,
    pub handler: MiddlewareHandler,
}

impl std::fmt::Debug for MiddlewareBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareBinding").field("name", &self.name).finish_non_exhaustive()
    }
}

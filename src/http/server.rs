//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Host the route table in an Axum router
//! - Wrap each route in its middleware chain
//! - Wire up cross-cutting layers (tracing, timeout, request ID)
//! - Bind to a listener and shut down gracefully

use std::future::Future;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware::{from_fn, Next},
    routing::{get, on, MethodFilter},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::routing::{Dispatch, HttpMethod, HttpServer, RegisteredRoute, ServerHandle};

/// Axum-backed route host.
pub struct AxumServer {
    router: Router,
    handle: ServerHandle,
    request_timeout: Duration,
}

impl AxumServer {
    /// Create an empty server with the given configuration.
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            router: Router::new(),
            handle: ServerHandle {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                bind_address: config.bind_address.clone(),
            },
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// The finished Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn into_router(self) -> Router {
        // Outermost first: the id must exist before the trace span opens.
        let layers = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = request_id(request).unwrap_or("-"),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(TimeoutLayer::new(self.request_timeout));
        self.router.layer(layers)
    }

    /// Run the server until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run the server until `shutdown` completes, then drain in-flight requests.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

impl HttpServer for AxumServer {
    fn handle(&self) -> ServerHandle {
        self.handle.clone()
    }

    fn register_route(&mut self, route: RegisteredRoute) {
        let dispatch = route.dispatch;
        let mut method_router = on(method_filter(route.method), move |req: Request<Body>| dispatch(req));

        // The last layer added runs first, so walk the chain innermost to outermost.
        for binding in route.middleware.into_iter().rev() {
            let handler = binding.handler;
            method_router = method_router.layer(from_fn(move |req: Request<Body>, next: Next| handler(req, next)));
        }

        let path = route.pattern.axum_path();
        self.router = std::mem::take(&mut self.router).route(&path, method_router);
    }

    fn register_fallback(&mut self, handler: Dispatch) {
        let fallback = get(move |req: Request<Body>| handler(req));
        self.router = std::mem::take(&mut self.router).fallback_service(fallback);
    }
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Delete => MethodFilter::DELETE,
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_from_config() {
        let config = ServerConfig {
            base_url: "http://example.com/".into(),
            ..ServerConfig::default()
        };
        let server = AxumServer::new(&config);
        assert_eq!(server.handle().base_url, "http://example.com");
        assert_eq!(server.handle().bind_address, "0.0.0.0:8000");
    }
}

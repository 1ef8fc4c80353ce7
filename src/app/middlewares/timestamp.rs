use std::time::{SystemTime, UNIX_EPOCH};

use axum::{body::Body, http::Request, middleware::Next, response::Response};

/// Time the request entered the middleware chain, in milliseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimestamp(pub u128);

/// Attach a [`RequestTimestamp`] to the request.
pub async fn timestamp(mut request: Request<Body>, next: Next) -> Response {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    request.extensions_mut().insert(RequestTimestamp(millis));
    next.run(request).await
}

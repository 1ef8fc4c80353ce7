use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Reject POST and PUT bodies that are not `application/json`.
pub async fn require_json(request: Request<Body>, next: Next) -> Response {
    let carries_body = matches!(*request.method(), Method::POST | Method::PUT);
    if carries_body && !is_json(&request) {
        tracing::debug!(path = %request.uri().path(), "Rejected non-JSON body");
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(json!({ "message": "Expected an application/json body" })),
        )
            .into_response();
    }
    next.run(request).await
}

fn is_json(request: &Request<Body>) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or("").trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

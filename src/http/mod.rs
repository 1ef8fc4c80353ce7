//! HTTP hosting of the route table.
//!
//! # Data Flow
//! ```text
//! Request
//!     → request.rs (assign x-request-id)
//!     → TraceLayer / TimeoutLayer
//!     → per-route middleware chain (in route-line order)
//!     → bound controller action
//! ```
//!
//! # Design Decisions
//! - `AxumServer` implements `routing::HttpServer`; the router never touches Axum directly
//! - Unmatched non-GET requests get 405 from the GET-only fallback

pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::AxumServer;

//! Convention-driven HTTP routing for controller-based web applications.
//!
//! Route lines such as `GET /users/:id UserController@getUser auth` are
//! resolved at startup into bound controller actions wrapped in their
//! middleware chains, then registered on an Axum server.

pub mod app;
pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use http::AxumServer;
pub use routing::{Router, RouteError};

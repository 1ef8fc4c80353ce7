//! Route middleware provided by the application.
//!
//! Each file here is one middleware artifact; `config/middlewares.toml` maps
//! the names used in route lines to these files.

pub mod require_json;
pub mod timestamp;

pub use require_json::require_json;
pub use timestamp::{timestamp, RequestTimestamp};

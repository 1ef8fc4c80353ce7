//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config/app.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!
//! config/middlewares.toml
//!     → manifest.rs (reference name → artifact file)
//!     → routing::ModuleRegistry
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; route changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod manifest;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use manifest::{load_manifest, MiddlewareManifest};
pub use schema::AppConfig;
pub use schema::ObservabilityConfig;
pub use schema::RoutesConfig;
pub use schema::RoutingConfig;
pub use schema::ServerConfig;

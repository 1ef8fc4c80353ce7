//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every section has defaults so a minimal file only lists its routes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Route spec parsing and module resolution.
    pub routing: RoutingConfig,

    /// Route spec lines.
    pub routes: RoutesConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Public base URL used when building absolute links.
    pub base_url: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Prefix applied to every API route.
    pub api_prefix: String,

    /// Separator between controller and action in a route line.
    pub controller_method_delimiter: String,

    /// Directory controller artifacts are expected in (used in error reports).
    pub controllers_dir: PathBuf,

    /// Directory middleware artifacts are expected in (used in error reports).
    pub middlewares_dir: PathBuf,

    /// Middleware manifest written by the scaffolding tool.
    pub middleware_manifest: PathBuf,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            controller_method_delimiter: "@".to_string(),
            controllers_dir: PathBuf::from("src/app/controllers"),
            middlewares_dir: PathBuf::from("src/app/middlewares"),
            middleware_manifest: PathBuf::from("config/middlewares.toml"),
        }
    }
}

/// Route spec lines, one route per entry.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutesConfig {
    /// Routes registered without a prefix.
    pub web: Vec<String>,

    /// Routes registered under `routing.api_prefix`.
    pub api: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

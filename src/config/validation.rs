//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and address formats
//! - Check the route spec delimiter and API prefix can be used by the router
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Route lines themselves are validated by the router at registration

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("routing.controller_method_delimiter must not be empty")]
    EmptyDelimiter,

    #[error("routing.controller_method_delimiter `{0}` must not contain whitespace")]
    WhitespaceDelimiter(String),

    #[error("routing.api_prefix `{0}` must start with `/`")]
    RelativeApiPrefix(String),

    #[error("server.bind_address `{0}` is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("observability.log_format `{0}` is not one of pretty, json")]
    InvalidLogFormat(String),

    #[error("observability.metrics_address `{0}` is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let delimiter = &config.routing.controller_method_delimiter;
    if delimiter.is_empty() {
        errors.push(ValidationError::EmptyDelimiter);
    } else if delimiter.chars().any(char::is_whitespace) {
        errors.push(ValidationError::WhitespaceDelimiter(delimiter.clone()));
    }

    if !config.routing.api_prefix.starts_with('/') {
        errors.push(ValidationError::RelativeApiPrefix(config.routing.api_prefix.clone()));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.server.bind_address.clone()));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(observability.log_level.clone()));
    }

    if !LOG_FORMATS.contains(&observability.log_format.as_str()) {
        errors.push(ValidationError::InvalidLogFormat(observability.log_format.clone()));
    }

    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(observability.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

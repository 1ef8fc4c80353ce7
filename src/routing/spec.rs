//! Route spec parsing.
//!
//! # Grammar
//! ```text
//! <METHOD> <PATH> <Controller><DELIM><action> [<middleware> ...]
//! ```
//!
//! # Design Decisions
//! - Tokens are split on any whitespace run
//! - Method is matched case-insensitively against a closed set
//! - A line either parses completely or is rejected; there are no partial specs

use std::fmt;
use std::str::FromStr;

use axum::http::Method;

use crate::routing::error::RouteError;

/// HTTP methods a route spec may bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Lowercase name, as written in route files.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            _ => Err(()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// One parsed route definition line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub method: HttpMethod,
    /// Path token as written, before prefixing and normalization.
    pub path: String,
    pub controller: String,
    pub action: String,
    /// Middleware names in execution order (first = outermost).
    pub middleware: Vec<String>,
}

impl RouteSpec {
    /// Parse one route line using `delimiter` to split the controller reference.
    pub fn parse(line: &str, delimiter: &str) -> Result<Self, RouteError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let [method, path, reference, middleware @ ..] = tokens.as_slice() else {
            return Err(RouteError::MalformedRoute { line: line.to_string() });
        };

        let method = method.parse::<HttpMethod>().map_err(|_| RouteError::UnsupportedMethod {
            method: method.to_string(),
            line: line.to_string(),
        })?;

        let (controller, action) = split_reference(reference, delimiter).ok_or_else(|| {
            RouteError::BadControllerReference {
                reference: reference.to_string(),
                delimiter: delimiter.to_string(),
            }
        })?;

        Ok(Self {
            method,
            path: path.to_string(),
            controller: controller.to_string(),
            action: action.to_string(),
            middleware: middleware.iter().map(|name| name.to_string()).collect(),
        })
    }

    /// `Controller<delim>action`, used in logs and route listings.
    pub fn target(&self, delimiter: &str) -> String {
        format!("{}{}{}", self.controller, delimiter, self.action)
    }
}

/// Split `Controller<delim>action`; both sides must be identifiers.
fn split_reference<'a>(reference: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    if delimiter.is_empty() {
        return None;
    }
    let (controller, action) = reference.split_once(delimiter)?;
    if is_identifier(controller) && is_identifier(action) {
        Some((controller, action))
    } else {
        None
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

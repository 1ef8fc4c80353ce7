//! Registration errors.
//!
//! Every variant is a structural configuration error found while the route
//! table is being built. None of them are per-request conditions; they are
//! propagated out of `Router::route` and abort startup.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised while parsing, resolving or registering a route spec.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A `route*` method was called before `Router::init`.
    #[error("router must be initialised with `init` (passing in a server) before routes are registered")]
    NotInitialized,

    /// Fewer than three whitespace separated tokens.
    #[error("malformed route `{line}`: expected `<method> <path> <Controller><delimiter><method> [middleware...]`")]
    MalformedRoute { line: String },

    /// Method token outside GET/POST/PUT/DELETE.
    #[error("unsupported HTTP method `{method}` in route `{line}`: expected one of get, post, put, delete")]
    UnsupportedMethod { method: String, line: String },

    /// Controller reference is not `<Identifier><delimiter><Identifier>`.
    #[error("bad controller reference `{reference}`: expected the format Controller{delimiter}method")]
    BadControllerReference { reference: String, delimiter: String },

    /// No controller artifact is registered under this name.
    #[error("controller `{name}` is not found (expected at {})", expected.display())]
    ControllerNotFound { name: String, expected: PathBuf },

    /// The controller was loaded but exposes no action with this name.
    #[error("method `{method}` is not defined in `{controller}`")]
    MethodNotFound { controller: String, method: String },

    /// The middleware name is unmapped, or its mapped artifact is missing.
    #[error("{}", middleware_not_found(name, expected.as_deref()))]
    MiddlewareNotFound {
        name: String,
        expected: Option<PathBuf>,
    },

    /// A path segment the server cannot match on, e.g. `:` with no name.
    #[error("invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The same method and path shape were registered twice.
    #[error("route {method} {path} is already registered")]
    DuplicateRoute { method: String, path: String },

    /// A capture at the same position as an earlier route uses another name.
    #[error("route path `{path}` names parameter `{name}` where `{existing}` already names it `{existing_name}`")]
    ConflictingRoute {
        path: String,
        name: String,
        existing: String,
        existing_name: String,
    },
}

fn middleware_not_found(name: &str, expected: Option<&std::path::Path>) -> String {
    match expected {
        Some(path) => format!("middleware `{}` does not exist (expected at {})", name, path.display()),
        None => format!("middleware `{}` is not registered in the middleware manifest", name),
    }
}

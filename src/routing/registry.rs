//! Controller and middleware resolution.
//!
//! # Responsibilities
//! - Map a controller name to a factory producing a fresh, uninitialized instance
//! - Map a middleware reference name to its artifact via the manifest, then to
//!   the handler registered for that artifact
//! - Report the expected artifact location when resolution fails
//!
//! # Design Decisions
//! - The table is built explicitly by the host application at startup; names
//!   are never resolved by loading code at runtime
//! - Resolution does not cache; `InstanceCache` guarantees at-most-once loading
//! - Resolution does not check actions; the router does, so the error names
//!   the route's target

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::manifest::MiddlewareManifest;
use crate::config::schema::RoutingConfig;
use crate::routing::controller::{Controller, Loaded, LoadedController};
use crate::routing::error::RouteError;
use crate::routing::middleware::MiddlewareHandler;

/// Source of controller and middleware artifacts, keyed by name.
pub trait ModuleSource: Send + Sync {
    /// Load a fresh controller instance. Initialization is the caller's job.
    fn load_controller(&self, name: &str) -> Result<Box<dyn LoadedController>, RouteError>;

    /// Load the middleware referenced by `name` in route lines.
    fn load_middleware(&self, name: &str) -> Result<MiddlewareHandler, RouteError>;
}

type ControllerFactory = Box<dyn Fn() -> Box<dyn LoadedController> + Send + Sync>;

/// Explicit registration table of the host application's modules.
pub struct ModuleRegistry {
    controllers_dir: PathBuf,
    middlewares_dir: PathBuf,
    manifest: MiddlewareManifest,
    controllers: HashMap<String, ControllerFactory>,
    /// Keyed by artifact file stem (`require_json` for `require_json.rs`).
    middlewares: HashMap<String, MiddlewareHandler>,
}

impl ModuleRegistry {
    pub fn new(config: &RoutingConfig, manifest: MiddlewareManifest) -> Self {
        Self {
            controllers_dir: config.controllers_dir.clone(),
            middlewares_dir: config.middlewares_dir.clone(),
            manifest,
            controllers: HashMap::new(),
            middlewares: HashMap::new(),
        }
    }

    /// Register a controller under `name`. `factory` runs once per load.
    pub fn controller<C, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        C: Controller,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let factory: ControllerFactory =
            Box::new(move || -> Box<dyn LoadedController> { Box::new(Loaded::new(factory())) });
        self.controllers.insert(name.into(), factory);
        self
    }

    /// Register the middleware artifact `artifact` (a file stem, e.g. `timestamp`).
    pub fn middleware(mut self, artifact: impl Into<String>, handler: MiddlewareHandler) -> Self {
        self.middlewares.insert(artifact.into(), handler);
        self
    }

    /// Where the artifact for controller `name` is expected to live.
    ///
    /// `UserController` lives in `user.rs`, `AdminUserController` in `admin_user.rs`.
    pub fn controller_path(&self, name: &str) -> PathBuf {
        self.controllers_dir.join(format!("{}.rs", artifact_stem(name)))
    }
}

/// Snake-case file stem of a controller name, without the `Controller` suffix.
fn artifact_stem(name: &str) -> String {
    let base = match name.strip_suffix("Controller") {
        Some(base) if !base.is_empty() => base,
        _ => name,
    };

    let mut stem = String::with_capacity(base.len() + 4);
    for (i, c) in base.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !stem.ends_with('_') {
                stem.push('_');
            }
            stem.push(c.to_ascii_lowercase());
        } else {
            stem.push(c);
        }
    }
    stem
}

impl ModuleSource for ModuleRegistry {
    fn load_controller(&self, name: &str) -> Result<Box<dyn LoadedController>, RouteError> {
        let factory = self.controllers.get(name).ok_or_else(|| RouteError::ControllerNotFound {
            name: name.to_string(),
            expected: self.controller_path(name),
        })?;
        Ok(factory())
    }

    fn load_middleware(&self, name: &str) -> Result<MiddlewareHandler, RouteError> {
        let file = self.manifest.file_for(name).ok_or_else(|| RouteError::MiddlewareNotFound {
            name: name.to_string(),
            expected: None,
        })?;

        let stem = Path::new(file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file);

        self.middlewares.get(stem).cloned().ok_or_else(|| RouteError::MiddlewareNotFound {
            name: name.to_string(),
            expected: Some(self.middlewares_dir.join(file)),
        })
    }
}

//! Route path patterns and the registered route table.
//!
//! Normalized paths use `:name` for a single-segment capture and `*` or
//! `*name` for a trailing catch-all. Axum panics when it is handed a pattern
//! it cannot insert, so every such pattern is rejected here as a
//! [`RouteError`] while the batch is still being resolved:
//! - a capture or catch-all name that is empty or not a word
//! - a catch-all that is not the last segment
//! - a literal `{` or `}`
//! - one name captured twice in a path
//! - a route whose shape (path with capture names erased) was already
//!   registered for the same method
//! - a capture named differently from an earlier route's capture at the
//!   same position

use std::collections::{HashMap, HashSet};

use crate::routing::error::RouteError;
use crate::routing::spec::HttpMethod;

/// Name given to an anonymous `*` catch-all.
const WILDCARD: &str = "wildcard";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

/// A validated route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    path: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Validate a normalized path such as `/api/users/:id`.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let invalid = |reason: String| RouteError::InvalidPath {
            path: path.to_string(),
            reason,
        };

        let raw: Vec<&str> = path.split('/').collect();
        let last = raw.len() - 1;
        let mut names = HashSet::new();
        let mut segments = Vec::with_capacity(raw.len());

        for (index, segment) in raw.into_iter().enumerate() {
            if segment.contains(&['{', '}'][..]) {
                return Err(invalid(format!("segment `{segment}` contains a brace")));
            }

            let parsed = if let Some(name) = segment.strip_prefix(':') {
                if !is_word(name) {
                    return Err(invalid(format!("`:{name}` needs a parameter name of letters, digits or `_`")));
                }
                Segment::Param(name.to_string())
            } else if let Some(name) = segment.strip_prefix('*') {
                if index != last {
                    return Err(invalid("a `*` catch-all must be the last segment".to_string()));
                }
                if !name.is_empty() && !is_word(name) {
                    return Err(invalid(format!("`*{name}` needs a name of letters, digits or `_`")));
                }
                Segment::CatchAll(if name.is_empty() { WILDCARD.to_string() } else { name.to_string() })
            } else {
                Segment::Static(segment.to_string())
            };

            if let Segment::Param(name) | Segment::CatchAll(name) = &parsed {
                if !names.insert(name.clone()) {
                    return Err(invalid(format!("parameter `{name}` is captured twice")));
                }
            }
            segments.push(parsed);
        }

        Ok(Self {
            path: path.to_string(),
            segments,
        })
    }

    /// The path as written, e.g. `/api/users/:id`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path in Axum's syntax, e.g. `/api/users/{id}`.
    pub fn axum_path(&self) -> String {
        self.join(|segment| match segment {
            Segment::Static(text) => text.clone(),
            Segment::Param(name) => format!("{{{name}}}"),
            Segment::CatchAll(name) => format!("{{*{name}}}"),
        })
    }

    /// The path with capture names erased: `/users/:id` and `/users/:userId` share a shape.
    pub fn shape(&self) -> String {
        self.join(|segment| shape_of(segment).to_string())
    }

    /// `(shape up to and including the capture, capture name)` per capture.
    fn captures(&self) -> Vec<(String, &str)> {
        let mut prefix = String::new();
        let mut captures = Vec::new();
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                prefix.push('/');
            }
            prefix.push_str(shape_of(segment));
            if let Segment::Param(name) | Segment::CatchAll(name) = segment {
                captures.push((prefix.clone(), name.as_str()));
            }
        }
        captures
    }

    fn join(&self, render: impl Fn(&Segment) -> String) -> String {
        self.segments.iter().map(render).collect::<Vec<_>>().join("/")
    }
}

fn shape_of(segment: &Segment) -> &str {
    match segment {
        Segment::Static(text) => text,
        Segment::Param(_) => "{}",
        Segment::CatchAll(_) => "{*}",
    }
}

fn is_word(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Routes registered so far, keyed for conflict detection.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashSet<(HttpMethod, String)>,
    /// Capture shape → (capture name, path that introduced it).
    captures: HashMap<String, (String, String)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `method` on `pattern`, failing without change if it conflicts.
    pub fn insert(&mut self, method: HttpMethod, pattern: &PathPattern) -> Result<(), RouteError> {
        let key = (method, pattern.shape());
        if self.routes.contains(&key) {
            return Err(RouteError::DuplicateRoute {
                method: method.as_str().to_uppercase(),
                path: pattern.path().to_string(),
            });
        }

        let captures = pattern.captures();
        for (shape, name) in &captures {
            if let Some((existing_name, existing)) = self.captures.get(shape) {
                if existing_name.as_str() != *name {
                    return Err(RouteError::ConflictingRoute {
                        path: pattern.path().to_string(),
                        name: name.to_string(),
                        existing: existing.clone(),
                        existing_name: existing_name.clone(),
                    });
                }
            }
        }

        for (shape, name) in captures {
            self.captures
                .entry(shape)
                .or_insert_with(|| (name.to_string(), pattern.path().to_string()));
        }
        self.routes.insert(key);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(path: &str) -> PathPattern {
        PathPattern::parse(path).unwrap()
    }

    #[test]
    fn test_axum_path() {
        assert_eq!(pattern("/api/users").axum_path(), "/api/users");
        assert_eq!(pattern("/api/users/:id").axum_path(), "/api/users/{id}");
        assert_eq!(pattern("/users/:id/posts/:post_id").axum_path(), "/users/{id}/posts/{post_id}");
        assert_eq!(pattern("/files/*").axum_path(), "/files/{*wildcard}");
        assert_eq!(pattern("/files/*rest").axum_path(), "/files/{*rest}");
        assert_eq!(pattern("/").axum_path(), "/");
        assert_eq!(pattern("/users/").axum_path(), "/users/");
    }

    #[test]
    fn test_shape_erases_names() {
        assert_eq!(pattern("/users/:id").shape(), "/users/{}");
        assert_eq!(pattern("/users/:userId").shape(), "/users/{}");
        assert_eq!(pattern("/files/*").shape(), pattern("/files/*rest").shape());
    }

    #[test]
    fn test_rejects_unmatchable_paths() {
        for path in ["/users/:", "/files/*/more", "/a/{b}", "/users/:id/:id", "/users/:i-d", "/x/**"] {
            let err = PathPattern::parse(path).unwrap_err();
            assert!(matches!(err, RouteError::InvalidPath { .. }), "{path}");
        }
    }

    #[test]
    fn test_table_duplicate_shape() {
        let mut table = RouteTable::new();
        table.insert(HttpMethod::Get, &pattern("/users/:id")).unwrap();
        table.insert(HttpMethod::Delete, &pattern("/users/:id")).unwrap();

        let err = table.insert(HttpMethod::Get, &pattern("/users/:id")).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRoute { ref method, .. } if method == "GET"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_table_capture_name_conflict() {
        let mut table = RouteTable::new();
        table.insert(HttpMethod::Get, &pattern("/users/:id")).unwrap();

        let err = table.insert(HttpMethod::Delete, &pattern("/users/:userId")).unwrap_err();
        match err {
            RouteError::ConflictingRoute { name, existing, existing_name, .. } => {
                assert_eq!(name, "userId");
                assert_eq!(existing, "/users/:id");
                assert_eq!(existing_name, "id");
            }
            other => panic!("expected ConflictingRoute, got {other:?}"),
        }

        let err = table.insert(HttpMethod::Get, &pattern("/users/:userId/posts")).unwrap_err();
        assert!(matches!(err, RouteError::ConflictingRoute { .. }));

        table.insert(HttpMethod::Get, &pattern("/users/:id/posts")).unwrap();
        table.insert(HttpMethod::Get, &pattern("/users/new")).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_table_catch_all_names() {
        let mut table = RouteTable::new();
        table.insert(HttpMethod::Get, &pattern("/files/*")).unwrap();
        let err = table.insert(HttpMethod::Post, &pattern("/files/*rest")).unwrap_err();
        assert!(matches!(err, RouteError::ConflictingRoute { .. }));

        let err = table.insert(HttpMethod::Get, &pattern("/files/*rest")).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_failed_insert_leaves_table_unchanged() {
        let mut table = RouteTable::new();
        table.insert(HttpMethod::Get, &pattern("/a/:x")).unwrap();
        assert!(table.insert(HttpMethod::Get, &pattern("/a/:y/b/:z")).is_err());

        // `/a/{}/b/{}` was not recorded, so `z` is not claimed.
        table.insert(HttpMethod::Get, &pattern("/a/:x/b/:w")).unwrap();
        assert_eq!(table.len(), 2);
    }
}

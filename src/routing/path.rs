//! Path composition.
//!
//! # Design Decisions
//! - Prefix and path are always joined with a separator, then every run of
//!   separators is collapsed (`/api/` + `//users` → `/api/users`)
//! - Trailing separators are kept; `/users/` and `/users` stay distinct routes
//! - Total function, no validation of segment contents

const SEPARATOR: char = '/';

/// Compose `prefix` and `raw` into a single absolute path with no repeated separators.
pub fn normalize(prefix: &str, raw: &str) -> String {
    let joined = format!("{SEPARATOR}{prefix}{SEPARATOR}{raw}");
    collapse_separators(&joined)
}

/// Collapse every run of consecutive separators into one.
pub fn collapse_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_was_separator = false;

    for c in path.chars() {
        if c == SEPARATOR {
            if previous_was_separator {
                continue;
            }
            previous_was_separator = true;
        } else {
            previous_was_separator = false;
        }
        out.push(c);
    }

    out
}

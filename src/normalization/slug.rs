//! URL slugs for blog posts.
//!
//! Letters from any script survive (Arabic titles keep their words), everything
//! that is not a word character, whitespace or `-` is dropped, and whitespace
//! runs become a single `-`.

use std::collections::HashSet;

/// Builds a URL-safe slug from a post title.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }

    out
}

/// Appends `-2`, `-3`, … to `base` until the candidate is not in `taken`.
pub fn unique_slug(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

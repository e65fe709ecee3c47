//! Slug derivation for icon keys and categories.

use std::collections::HashSet;

/// Category of icons with no container ancestor.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

const FALLBACK_SLUG: &str = "icon";

/// Lowercase `name` and collapse every run of non-alphanumerics into `-`.
///
/// Leading and trailing separators are dropped. Names with no alphanumeric
/// characters at all slug to `"icon"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Hands out unique keys derived from icon names.
///
/// The first icon with a given slug keeps it; later ones get `-2`, `-3`, ...
/// skipping any suffixed key already in use.
#[derive(Debug, Default)]
pub struct KeyAllocator {
    taken: HashSet<String>,
}

impl KeyAllocator {
    /// Create an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a unique key for `name`.
    pub fn allocate(&mut self, name: &str) -> String {
        let base = slugify(name);
        if self.taken.insert(base.clone()) {
            return base;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.taken.insert(candidate.clone()) {
                tracing::warn!(
                    "Duplicate icon key '{}' for \"{}\", using '{}'",
                    base,
                    name,
                    candidate
                );
                return candidate;
            }
            n += 1;
        }
    }
}

//! Namespace routing entries and their precedence ordering.
//!
//! An entry routes a namespace prefix either to a foreign realm or, for parent-inheritance
//! entries, to whatever parent the owning realm has. Matching is boundary-aware: the prefix
//! `com.foo` matches `com.foo` and `com.foo.Bar` but never `com.foobar`.

use std::cmp::Ordering;
use std::fmt;

use crate::realm::ScopeHandle;

/// Separator between namespace segments in unit names.
pub const NAMESPACE_SEPARATOR: char = '.';

/// A single namespace-routing entry of an import table.
///
/// `target = None` marks a parent-inheritance entry: visibility for the prefix is delegated
/// to the owning realm's parent rather than a foreign realm. Entries are immutable once
/// registered and live exactly as long as the owning table.
#[derive(Clone)]
pub struct NamespaceEntry {
    prefix: String,
    target: Option<ScopeHandle>,
}

impl NamespaceEntry {
    /// Create a new entry routing `prefix` to `target`.
    #[must_use]
    pub fn new(prefix: &str, target: Option<ScopeHandle>) -> NamespaceEntry {
        NamespaceEntry {
            prefix: prefix.to_string(),
            target,
        }
    }

    /// The namespace prefix this entry covers. Empty means catch-all.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The scope the prefix is routed to, `None` for parent-inheritance entries.
    #[must_use]
    pub fn target(&self) -> Option<&ScopeHandle> {
        self.target.as_ref()
    }

    /// `true` if this entry delegates to the owning realm's parent.
    #[must_use]
    pub fn is_parent_entry(&self) -> bool {
        self.target.is_none()
    }

    /// Whether this entry covers `name`.
    ///
    /// The match is namespace-boundary aware: `name` must equal the prefix or start with
    /// the prefix immediately followed by [`NAMESPACE_SEPARATOR`]. An empty prefix matches
    /// every name.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        if self.prefix.is_empty() {
            return true;
        }

        match name.strip_prefix(self.prefix.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with(NAMESPACE_SEPARATOR),
            None => false,
        }
    }
}

impl fmt::Debug for NamespaceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(handle) => write!(f, "{} -> {}", self.prefix, handle.id()),
            None => write!(f, "{} -> <parent>", self.prefix),
        }
    }
}

/// Total order over entry prefixes: most specific first.
///
/// A longer prefix sorts before a shorter one, equal lengths fall back to lexicographic
/// order. The empty catch-all prefix therefore always sorts last. Duplicate prefixes are
/// rejected at registration, so equal keys only occur for the same entry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct EntryKey(pub(crate) String);

impl Ord for EntryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .len()
            .cmp(&self.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for EntryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prefix: &str) -> NamespaceEntry {
        NamespaceEntry::new(prefix, None)
    }

    #[test]
    fn matches_exact_name() {
        assert!(entry("com.acme.Widget").matches("com.acme.Widget"));
    }

    #[test]
    fn matches_on_namespace_boundary() {
        let e = entry("com.acme");
        assert!(e.matches("com.acme.Widget"));
        assert!(e.matches("com.acme"));
        assert!(e.matches("com.acme.deep.Nested"));
    }

    #[test]
    fn rejects_raw_string_prefix() {
        let e = entry("com.foo");
        assert!(!e.matches("com.foobar"));
        assert!(!e.matches("com.foobar.Baz"));
    }

    #[test]
    fn empty_prefix_is_catch_all() {
        let e = entry("");
        assert!(e.matches("anything"));
        assert!(e.matches("com.acme.Widget"));
        assert!(e.matches(""));
    }

    #[test]
    fn unrelated_names_do_not_match() {
        let e = entry("com.acme");
        assert!(!e.matches("org.acme.Widget"));
        assert!(!e.matches("com"));
    }

    #[test]
    fn longer_prefix_sorts_first() {
        let mut keys = vec![
            EntryKey(String::new()),
            EntryKey("com.acme".to_string()),
            EntryKey("com".to_string()),
            EntryKey("com.acme.internal".to_string()),
        ];
        keys.sort();

        let order: Vec<&str> = keys.iter().map(|k| k.0.as_str()).collect();
        assert_eq!(order, ["com.acme.internal", "com.acme", "com", ""]);
    }

    #[test]
    fn equal_length_prefixes_sort_lexicographically() {
        let mut keys = vec![
            EntryKey("org.beta".to_string()),
            EntryKey("com.acme".to_string()),
        ];
        keys.sort();
        assert_eq!(keys[0].0, "com.acme");
    }
}

//! Ordered, duplicate-free tables of namespace-routing entries.
//!
//! Each realm owns two of these: one for foreign imports (entries routed to another realm or
//! to the parent) and one gating parent visibility. The table is backed by a concurrent
//! ordered map so resolution can read it without locking while setup-phase registration is
//! still possible through a shared reference.

use crossbeam_skiplist::SkipMap;

use crate::realm::entry::{EntryKey, NamespaceEntry};
use crate::realm::ScopeHandle;
use crate::{Error, Result};

/// An ordered, duplicate-free set of [`NamespaceEntry`] values.
///
/// Entries are kept most-specific-first (longer prefix before shorter, lexicographic on
/// ties), so [`ImportTable::matched`] returns the most specific covering entry and the empty
/// catch-all prefix always loses against any concrete prefix.
///
/// Registration of the identical `(prefix, target)` pair twice is an idempotent no-op;
/// registering an existing prefix against a different target fails with
/// [`Error::DuplicatePrefix`]. Entries are never removed.
pub struct ImportTable {
    entries: SkipMap<EntryKey, NamespaceEntry>,
}

impl ImportTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> ImportTable {
        ImportTable {
            entries: SkipMap::new(),
        }
    }

    /// Register a routing from `prefix` to `target`.
    ///
    /// `target = None` records a parent-inheritance entry.
    ///
    /// # Errors
    /// Returns [`Error::DuplicatePrefix`] if the prefix is already routed to a different
    /// target.
    pub fn add(&self, prefix: &str, target: Option<ScopeHandle>) -> Result<()> {
        let key = EntryKey(prefix.to_string());

        if let Some(existing) = self.entries.get(&key) {
            let existing = existing.value();
            let same_target = match (existing.target(), target.as_ref()) {
                (None, None) => true,
                (Some(a), Some(b)) => a.id() == b.id(),
                _ => false,
            };

            if same_target {
                return Ok(());
            }

            return Err(Error::DuplicatePrefix {
                prefix: prefix.to_string(),
                existing: existing
                    .target()
                    .map_or_else(|| "<parent>".to_string(), |h| h.id().to_string()),
            });
        }

        self.entries.insert(key, NamespaceEntry::new(prefix, target));
        Ok(())
    }

    /// The most specific entry covering `name`, if any.
    #[must_use]
    pub fn matched(&self, name: &str) -> Option<NamespaceEntry> {
        for entry in self.entries.iter() {
            if entry.value().matches(name) {
                return Some(entry.value().clone());
            }
        }

        None
    }

    /// Every entry covering `name`, most specific first.
    ///
    /// Used by resource enumeration, which merges results from all covering imports instead
    /// of stopping at the first.
    #[must_use]
    pub fn all_matching(&self, name: &str) -> Vec<NamespaceEntry> {
        self.entries
            .iter()
            .filter(|e| e.value().matches(name))
            .map(|e| e.value().clone())
            .collect()
    }

    /// Snapshot of all entries, most specific first.
    #[must_use]
    pub fn entries(&self) -> Vec<NamespaceEntry> {
        self.entries.iter().map(|e| e.value().clone()).collect()
    }

    /// `true` if no entry has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for ImportTable {
    fn default() -> Self {
        Self::new()
    }
}

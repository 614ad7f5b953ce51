//! Read-only inspection of realm state.
//!
//! A [`RealmSnapshot`] is a pure projection over a realm's current configuration: its id,
//! strategy, search path and both import tables. It carries no behavioral contract beyond
//! accurately reflecting the state at the moment it was taken.

use std::fmt;

use crate::realm::{Realm, ScopeHandle};

/// Structured snapshot of one realm's configuration.
#[derive(Debug, Clone)]
pub struct RealmSnapshot {
    /// The realm id
    pub id: String,
    /// Identifier of the delegation strategy
    pub strategy: String,
    /// Id of the parent realm, if one is wired
    pub parent: Option<String>,
    /// Search-path location ids, in search order
    pub locations: Vec<String>,
    /// Foreign import entries, most specific first, rendered as `prefix -> target`
    pub foreign_imports: Vec<String>,
    /// Parent-visibility prefixes, most specific first
    pub parent_visibility: Vec<String>,
}

impl RealmSnapshot {
    /// Take a snapshot of `realm`.
    #[must_use]
    pub fn of(realm: &Realm) -> RealmSnapshot {
        RealmSnapshot {
            id: realm.id().to_string(),
            strategy: realm.strategy().name().to_string(),
            parent: realm.parent().map(|p| p.id().to_string()),
            locations: realm.location_ids(),
            foreign_imports: realm
                .foreign_imports()
                .entries()
                .iter()
                .map(|e| format!("{e:?}"))
                .collect(),
            parent_visibility: realm
                .parent_visibility()
                .entries()
                .iter()
                .map(|e| e.prefix().to_string())
                .collect(),
        }
    }
}

impl fmt::Display for RealmSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "realm =    {}", self.id)?;
        writeln!(f, "strategy = {}", self.strategy)?;
        writeln!(
            f,
            "parent =   {}",
            self.parent.as_deref().unwrap_or("<none>")
        )?;

        for (index, location) in self.locations.iter().enumerate() {
            writeln!(f, "location[{index}] = {location}")?;
        }

        writeln!(f, "Number of foreign imports: {}", self.foreign_imports.len())?;
        for import in &self.foreign_imports {
            writeln!(f, "import: {import}")?;
        }

        if !self.parent_visibility.is_empty() {
            writeln!(
                f,
                "Number of parent imports: {}",
                self.parent_visibility.len()
            )?;
            for prefix in &self.parent_visibility {
                writeln!(f, "import: {prefix} -> <parent>")?;
            }
        }

        Ok(())
    }
}

/// Render a realm chain from `realm` up through its parents.
///
/// One snapshot per realm, separated by rulers, innermost realm first. Broken parent links
/// (disposed realms) end the chain.
#[must_use]
pub fn display_hierarchy(realm: &Realm) -> String {
    let mut out = String::new();
    out.push_str("-----------------------------------------------------\n");

    let mut snapshot = Some(RealmSnapshot::of(realm));
    let mut next = realm.parent().and_then(ScopeHandle::upgrade);

    while let Some(current) = snapshot.take() {
        out.push_str(&current.to_string());
        out.push('\n');

        if let Some(parent) = next.take() {
            snapshot = Some(RealmSnapshot::of(&parent));
            next = parent.parent().and_then(ScopeHandle::upgrade);
        }
    }

    out.push_str("-----------------------------------------------------\n");
    out
}

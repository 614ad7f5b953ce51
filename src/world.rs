//! The registry owning realms and wiring their hierarchy.
//!
//! A [`World`] creates, names and disposes realms, wires parent links, and carries the two
//! process-wide pieces of configuration every realm inherits: the shared bootstrap scope and
//! the [`LockingMode`]. Realms are owned here; everything else in the crate references them
//! through weak [`ScopeHandle`](crate::realm::ScopeHandle)s, so import cycles between realms
//! cannot leak.

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};

use crate::bootstrap::{BootstrapScope, EmptyBootstrap};
use crate::realm::{LockingMode, Realm, RealmRc};
use crate::strategy::Strategy;
use crate::{Error, Result};

/// Registry of realms sharing one bootstrap scope and one locking mode.
pub struct World {
    realms: DashMap<String, RealmRc>,
    bootstrap: Arc<dyn BootstrapScope>,
    locking: LockingMode,
}

impl World {
    /// Create a world with no bootstrap content and per-name self-load locking.
    #[must_use]
    pub fn new() -> World {
        World::with_bootstrap(Arc::new(EmptyBootstrap), LockingMode::PerName)
    }

    /// Create a world with the given bootstrap scope and locking mode.
    ///
    /// The locking mode is the place where a host without a reentrant loading primitive
    /// selects the conservative whole-scope fallback; it is decided once here and injected
    /// into every realm at construction, never read ambiently per call.
    #[must_use]
    pub fn with_bootstrap(bootstrap: Arc<dyn BootstrapScope>, locking: LockingMode) -> World {
        World {
            realms: DashMap::new(),
            bootstrap,
            locking,
        }
    }

    /// The locking mode every realm of this world resolves under.
    #[must_use]
    pub fn locking(&self) -> LockingMode {
        self.locking
    }

    /// Create and register a new realm.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateRealm`] if the id is already taken.
    pub fn new_realm(&self, id: &str, strategy: Arc<dyn Strategy>) -> Result<RealmRc> {
        match self.realms.entry(id.to_string()) {
            Entry::Occupied(_) => Err(Error::DuplicateRealm(id.to_string())),
            Entry::Vacant(slot) => {
                let realm = Realm::new(id, strategy, self.bootstrap.clone(), self.locking);
                slot.insert(realm.clone());
                Ok(realm)
            }
        }
    }

    /// Look up a registered realm by id.
    ///
    /// # Errors
    /// Returns [`Error::NoSuchRealm`] if the id is not registered.
    pub fn realm(&self, id: &str) -> Result<RealmRc> {
        self.realms
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| Error::NoSuchRealm(id.to_string()))
    }

    /// Wire `parent` as the parent of `child`.
    ///
    /// A parent is set at most once per realm; re-parenting is not supported.
    ///
    /// # Errors
    /// - [`Error::NoSuchRealm`] if either id is not registered
    /// - [`Error::ParentAlreadySet`] if the child already has a parent
    pub fn set_parent(&self, child: &str, parent: &str) -> Result<()> {
        let child = self.realm(child)?;
        let parent = self.realm(parent)?;
        child.set_parent(parent.handle())
    }

    /// Close and unregister a realm.
    ///
    /// Disposal drops the realm's cached units and locks; any later resolution against a
    /// surviving reference fails with [`Error::ScopeClosed`], and handles pointing at the
    /// realm stop upgrading once the last reference is gone.
    ///
    /// # Errors
    /// Returns [`Error::NoSuchRealm`] if the id is not registered.
    pub fn dispose_realm(&self, id: &str) -> Result<()> {
        let (_, realm) = self
            .realms
            .remove(id)
            .ok_or_else(|| Error::NoSuchRealm(id.to_string()))?;
        realm.close();
        Ok(())
    }

    /// Ids of all registered realms.
    #[must_use]
    pub fn realm_ids(&self) -> Vec<String> {
        self.realms.iter().map(|r| r.key().clone()).collect()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::SelfFirst;

    #[test]
    fn realm_ids_are_unique() {
        let world = World::new();
        world.new_realm("app", Arc::new(SelfFirst)).unwrap();

        let result = world.new_realm("app", Arc::new(SelfFirst));
        assert!(matches!(result, Err(Error::DuplicateRealm(ref id)) if id == "app"));
    }

    #[test]
    fn lookup_of_unknown_realm_fails() {
        let world = World::new();
        assert!(matches!(
            world.realm("nope"),
            Err(Error::NoSuchRealm(ref id)) if id == "nope"
        ));
    }

    #[test]
    fn disposal_closes_and_unregisters() {
        let world = World::new();
        let realm = world.new_realm("app", Arc::new(SelfFirst)).unwrap();

        world.dispose_realm("app").unwrap();
        assert!(realm.is_closed());
        assert!(world.realm("app").is_err());
        assert!(matches!(
            world.dispose_realm("app"),
            Err(Error::NoSuchRealm(_))
        ));
    }

    #[test]
    fn parent_wiring_goes_through_registry() {
        let world = World::new();
        world.new_realm("parent", Arc::new(SelfFirst)).unwrap();
        world.new_realm("child", Arc::new(SelfFirst)).unwrap();

        world.set_parent("child", "parent").unwrap();
        assert!(matches!(
            world.set_parent("child", "parent"),
            Err(Error::ParentAlreadySet(_))
        ));

        let child = world.realm("child").unwrap();
        assert_eq!(child.parent().unwrap().id(), "parent");
    }
}

//! Realm loading scopes and the resolution engine.
//!
//! A realm is an isolated loading scope: it sees only its private search path, the namespace
//! prefixes it explicitly imports from other realms, and (optionally, gated by an
//! allow-list) its parent realm. Resolution first consults the fixed bootstrap scope, then
//! delegates to the realm's [`Strategy`](crate::strategy::Strategy), which orders the
//! self/import/parent primitives exposed here.
//!
//! # Key Types
//! - [`Realm`] - The stateful loading scope
//! - [`ScopeHandle`] - Ownership-free reference to a realm
//! - [`ImportTable`] / [`NamespaceEntry`] - Namespace routing
//! - [`ResolveContext`] - Per-call cycle guard threaded through delegation
//! - [`AllResources`] - Lazy merged resource enumeration
//!
//! # Concurrency
//! Any number of threads may resolve against the same or different realms concurrently.
//! The only blocking point is the self-load path, and only for two concurrent requests of
//! the *same* name on the *same* realm; see [`LockingMode`] for the conservative whole-scope
//! fallback for hosts without a reentrant loading primitive.

pub mod entry;
pub mod imports;
mod resources;

pub use entry::{NamespaceEntry, NAMESPACE_SEPARATOR};
pub use imports::ImportTable;
pub use resources::AllResources;

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, Weak};

use dashmap::DashMap;

use crate::bootstrap::BootstrapScope;
use crate::location::SearchLocation;
use crate::strategy::Strategy;
use crate::unit::{Resource, ResourceRc, Unit, UnitRc};
use crate::{Error, Result};

/// A reference to a [`Realm`]
pub type RealmRc = Arc<Realm>;

/// Self-load synchronization granularity, chosen once per world at construction.
///
/// [`LockingMode::PerName`] keys the self-load critical section by `(realm, name)` so
/// unrelated names and unrelated realms never contend. [`LockingMode::WholeScope`] is the
/// conservative fallback for hosts whose underlying loading primitive is not reentrant: one
/// lock per realm serializes that realm's entire resolve path.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LockingMode {
    /// One lock per `(realm, name)` pair; the default.
    #[default]
    PerName,
    /// One lock around the whole resolve path of each realm.
    WholeScope,
}

/// An ownership-free reference to a realm.
///
/// Realms are owned by their [`World`](crate::world::World); handles held in import tables
/// and parent links are weak, so realm graphs may contain cycles without leaking. A handle
/// whose realm has been disposed simply stops upgrading.
#[derive(Clone)]
pub struct ScopeHandle {
    id: String,
    realm: Weak<Realm>,
}

impl ScopeHandle {
    pub(crate) fn new(id: String, realm: Weak<Realm>) -> ScopeHandle {
        ScopeHandle { id, realm }
    }

    /// Handle with no live realm behind it, for table tests.
    #[cfg(test)]
    pub(crate) fn dangling(id: &str) -> ScopeHandle {
        ScopeHandle {
            id: id.to_string(),
            realm: Weak::new(),
        }
    }

    /// Id of the referenced realm.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The referenced realm, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<RealmRc> {
        self.realm.upgrade()
    }
}

impl fmt::Debug for ScopeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeHandle({})", self.id)
    }
}

/// Per-call state threaded through recursive import and parent delegation.
///
/// Records every `(realm, name)` pair visited by one top-level resolution so that cyclic
/// import graphs (A imports from B, B imports from A) terminate: revisiting a pair
/// short-circuits to a miss instead of recursing.
pub struct ResolveContext {
    visited: HashSet<(String, String)>,
}

impl ResolveContext {
    pub(crate) fn new() -> ResolveContext {
        ResolveContext {
            visited: HashSet::new(),
        }
    }

    /// Marks `(realm, name)` as visited; `false` if it already was.
    pub(crate) fn enter(&mut self, realm: &str, name: &str) -> bool {
        self.visited.insert((realm.to_string(), name.to_string()))
    }
}

/// Namespace key a name is matched under: resource paths are mapped onto the dotted
/// namespace form so `META-INF/app.xml` is covered by the prefix `META-INF`.
pub(crate) fn routing_key(name: &str) -> String {
    name.replace('/', ".")
}

fn lock_ignore_poison(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    // The guarded data is (), poisoning cannot leave it inconsistent.
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// An isolated, namespace-scoped loading scope.
///
/// A realm owns a private search path, a table of foreign imports, an optional
/// parent-visibility allow-list and a parent link, plus the cache of units it has defined.
/// The public `resolve_*` entry points always consult the bootstrap scope first and then
/// delegate ordering to the realm's strategy.
///
/// # Usage contract
/// The setup mutators ([`Realm::add_import`], [`Realm::add_parent_visibility`],
/// [`Realm::append_location`]) are meant to run during a realm's setup phase, before
/// steady-state concurrent resolution; they are not synchronized against in-flight
/// resolution on the same realm.
pub struct Realm {
    id: String,
    strategy: Arc<dyn Strategy>,
    bootstrap: Arc<dyn BootstrapScope>,
    locations: boxcar::Vec<Arc<dyn SearchLocation>>,
    foreign_imports: ImportTable,
    parent_visibility: ImportTable,
    parent: OnceLock<ScopeHandle>,
    units: DashMap<String, UnitRc>,
    load_locks: DashMap<String, Arc<Mutex<()>>>,
    scope_lock: Mutex<()>,
    locking: LockingMode,
    closed: AtomicBool,
}

impl Realm {
    pub(crate) fn new(
        id: &str,
        strategy: Arc<dyn Strategy>,
        bootstrap: Arc<dyn BootstrapScope>,
        locking: LockingMode,
    ) -> RealmRc {
        Arc::new(Realm {
            id: id.to_string(),
            strategy,
            bootstrap,
            locations: boxcar::Vec::new(),
            foreign_imports: ImportTable::new(),
            parent_visibility: ImportTable::new(),
            parent: OnceLock::new(),
            units: DashMap::new(),
            load_locks: DashMap::new(),
            scope_lock: Mutex::new(()),
            locking,
            closed: AtomicBool::new(false),
        })
    }

    /// Id of this realm.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The delegation strategy this realm resolves with.
    #[must_use]
    pub fn strategy(&self) -> &Arc<dyn Strategy> {
        &self.strategy
    }

    /// `true` once the realm has been disposed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// The parent link, if one has been set.
    #[must_use]
    pub fn parent(&self) -> Option<&ScopeHandle> {
        self.parent.get()
    }

    /// The table of foreign imports.
    #[must_use]
    pub fn foreign_imports(&self) -> &ImportTable {
        &self.foreign_imports
    }

    /// The parent-visibility allow-list. Empty means unrestricted fallthrough.
    #[must_use]
    pub fn parent_visibility(&self) -> &ImportTable {
        &self.parent_visibility
    }

    /// Ids of the search-path locations, in search order.
    #[must_use]
    pub fn location_ids(&self) -> Vec<String> {
        self.locations
            .iter()
            .map(|(_, l)| l.id().to_string())
            .collect()
    }

    /// A weak handle to this realm, suitable for import tables of other realms.
    #[must_use]
    pub fn handle(self: &Arc<Self>) -> ScopeHandle {
        ScopeHandle::new(self.id.clone(), Arc::downgrade(self))
    }

    pub(crate) fn set_parent(&self, parent: ScopeHandle) -> Result<()> {
        self.parent
            .set(parent)
            .map_err(|_| Error::ParentAlreadySet(self.id.clone()))
    }

    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.units.clear();
        self.load_locks.clear();
    }

    // ---------------------------------------------------------------------------------
    // Setup mutators
    // ---------------------------------------------------------------------------------

    /// Append a content location to the private search path.
    ///
    /// The search path only ever grows; locations are tried in registration order.
    pub fn append_location(&self, location: Arc<dyn SearchLocation>) {
        self.locations.push(location);
    }

    /// Route the namespace `prefix` to the foreign realm behind `target`.
    ///
    /// # Errors
    /// Returns [`Error::DuplicatePrefix`] if the prefix is already routed elsewhere.
    pub fn add_import(&self, prefix: &str, target: ScopeHandle) -> Result<()> {
        self.foreign_imports.add(prefix, Some(target))
    }

    /// Route the namespace `prefix` to whatever parent this realm has.
    ///
    /// # Errors
    /// Returns [`Error::DuplicatePrefix`] if the prefix is already routed elsewhere.
    pub fn add_parent_import(&self, prefix: &str) -> Result<()> {
        self.foreign_imports.add(prefix, None)
    }

    /// Allow-list the namespace `prefix` for parent fallthrough.
    ///
    /// Before the first call every name may fall through to the parent; from the first
    /// entry on, only allow-listed prefixes are visible through the parent.
    ///
    /// # Errors
    /// Returns [`Error::DuplicatePrefix`] if the prefix is already listed with a
    /// conflicting entry.
    pub fn add_parent_visibility(&self, prefix: &str) -> Result<()> {
        self.parent_visibility.add(prefix, None)
    }

    /// Whether `name` may fall through to the parent realm.
    ///
    /// `true` while the allow-list is empty (unrestricted default) or when some listed
    /// prefix covers the name.
    #[must_use]
    pub fn is_visible_through_parent(&self, name: &str) -> bool {
        self.parent_visibility.is_empty()
            || self
                .parent_visibility
                .matched(&routing_key(name))
                .is_some()
    }

    // ---------------------------------------------------------------------------------
    // Public resolution entry points
    // ---------------------------------------------------------------------------------

    /// Resolve the unit `name` through bootstrap, then strategy-ordered sources.
    ///
    /// Repeated calls for the same name return the identical handle (`Arc` pointer
    /// identity): self-defined units are cached, imports and parent delegation return the
    /// defining realm's cached handle.
    ///
    /// # Errors
    /// - [`Error::ScopeClosed`] if the realm has been disposed
    /// - [`Error::NotFound`] if no source supplies the name
    pub fn resolve_unit(&self, name: &str) -> Result<UnitRc> {
        if self.is_closed() {
            return Err(Error::ScopeClosed(self.id.clone()));
        }

        let mut ctx = ResolveContext::new();
        self.resolve_unit_with(name, &mut ctx)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Resolve the resource `name`; a miss is `Ok(None)`, not an error.
    ///
    /// # Errors
    /// Returns [`Error::ScopeClosed`] if the realm has been disposed.
    pub fn resolve_resource(&self, name: &str) -> Result<Option<ResourceRc>> {
        if self.is_closed() {
            return Err(Error::ScopeClosed(self.id.clone()));
        }

        let mut ctx = ResolveContext::new();
        Ok(self.resolve_resource_with(name, &mut ctx))
    }

    /// Enumerate every distinct resource named `name` visible to this realm.
    ///
    /// Merges bootstrap, every search-path location, every covering import and the parent
    /// (when visible) into one lazy, finite sequence, deduplicated by resource identity.
    /// Enumeration order between sources is unspecified. Calling this method again yields
    /// a fresh, restartable sequence.
    ///
    /// # Errors
    /// Returns [`Error::ScopeClosed`] if the realm has been disposed.
    pub fn resolve_all_resources(self: &Arc<Self>, name: &str) -> Result<AllResources> {
        if self.is_closed() {
            return Err(Error::ScopeClosed(self.id.clone()));
        }

        Ok(AllResources::new(self.clone(), name))
    }

    // ---------------------------------------------------------------------------------
    // Internal delegation targets
    // ---------------------------------------------------------------------------------

    pub(crate) fn resolve_unit_with(
        &self,
        name: &str,
        ctx: &mut ResolveContext,
    ) -> Option<UnitRc> {
        if self.is_closed() || !ctx.enter(&self.id, name) {
            return None;
        }

        let _scope_guard = self.scope_guard();

        if let Some(unit) = self.bootstrap.lookup_unit(name) {
            return Some(unit);
        }

        self.strategy.find_unit(self, ctx, name)
    }

    pub(crate) fn resolve_resource_with(
        &self,
        name: &str,
        ctx: &mut ResolveContext,
    ) -> Option<ResourceRc> {
        if self.is_closed() || !ctx.enter(&self.id, name) {
            return None;
        }

        let _scope_guard = self.scope_guard();

        if let Some(resource) = self.bootstrap.lookup_resource(name) {
            return Some(resource);
        }

        self.strategy.find_resource(self, ctx, name)
    }

    /// Eagerly collects every resource visible for `name` into `out`, honoring the
    /// per-call cycle guard. Deduplication happens at the consuming iterator.
    pub(crate) fn collect_resources_into(
        &self,
        name: &str,
        ctx: &mut ResolveContext,
        out: &mut std::collections::VecDeque<ResourceRc>,
    ) {
        if self.is_closed() || !ctx.enter(&self.id, name) {
            return;
        }

        if let Some(resource) = self.bootstrap.lookup_resource(name) {
            out.push_back(resource);
        }

        for (_, location) in self.locations.iter() {
            if let Some(data) = location.search_resource(name) {
                out.push_back(Arc::new(Resource::new(name, &self.id, location.id(), data)));
            }
        }

        for entry in self.foreign_imports.all_matching(&routing_key(name)) {
            if let Some(target) = self.import_target(&entry) {
                target.collect_resources_into(name, ctx, out);
            }
        }

        if self.is_visible_through_parent(name) {
            if let Some(parent) = self.parent.get().and_then(ScopeHandle::upgrade) {
                parent.collect_resources_into(name, ctx, out);
            }
        }
    }

    fn import_target(&self, entry: &NamespaceEntry) -> Option<RealmRc> {
        match entry.target() {
            Some(handle) => handle.upgrade(),
            // Parent-inheritance entry: the import is served by whatever parent is wired.
            None => self.parent.get().and_then(ScopeHandle::upgrade),
        }
    }

    fn scope_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match self.locking {
            LockingMode::PerName => None,
            LockingMode::WholeScope => Some(lock_ignore_poison(&self.scope_lock)),
        }
    }

    // ---------------------------------------------------------------------------------
    // Search primitives ordered by strategies
    // ---------------------------------------------------------------------------------

    /// Define or look up the unit `name` from this realm's private search path.
    ///
    /// The only primitive that can define a *new* unit. Holds the per-name lock while it
    /// checks the cache and, on a miss, searches the locations in order and defines the
    /// unit from the first match. At most one definition per name ever happens, no matter
    /// how many threads race here.
    #[must_use]
    pub fn load_from_self(&self, name: &str) -> Option<UnitRc> {
        let name_lock = match self.locking {
            LockingMode::PerName => Some(
                self.load_locks
                    .entry(name.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone(),
            ),
            // The whole-scope lock is already held by the resolve path.
            LockingMode::WholeScope => None,
        };
        let _name_guard = name_lock.as_ref().map(|m| lock_ignore_poison(m));

        if let Some(unit) = self.units.get(name) {
            return Some(unit.clone());
        }

        for (_, location) in self.locations.iter() {
            if let Some(data) = location.search_unit(name) {
                let unit = Arc::new(Unit::new(name, &self.id, location.id(), data));
                self.units.insert(name.to_string(), unit.clone());
                return Some(unit);
            }
        }

        None
    }

    /// Resolve `name` through the most specific covering foreign import, if any.
    ///
    /// Delegates the *entire* resolution to the target realm; the target's miss or
    /// failure is reported as `None`, never as an error.
    #[must_use]
    pub fn load_from_import(&self, name: &str, ctx: &mut ResolveContext) -> Option<UnitRc> {
        let entry = self.foreign_imports.matched(&routing_key(name))?;
        let target = self.import_target(&entry)?;
        target.resolve_unit_with(name, ctx)
    }

    /// Resolve `name` through the parent realm, when one is wired and visibility permits.
    ///
    /// A miss or failure from the parent is reported as `None`, never as an error.
    #[must_use]
    pub fn load_from_parent(&self, name: &str, ctx: &mut ResolveContext) -> Option<UnitRc> {
        if !self.is_visible_through_parent(name) {
            return None;
        }

        let parent = self.parent.get()?.upgrade()?;
        parent.resolve_unit_with(name, ctx)
    }

    /// First resource named `name` on this realm's private search path.
    #[must_use]
    pub fn find_resource_from_self(&self, name: &str) -> Option<ResourceRc> {
        for (_, location) in self.locations.iter() {
            if let Some(data) = location.search_resource(name) {
                return Some(Arc::new(Resource::new(name, &self.id, location.id(), data)));
            }
        }

        None
    }

    /// Resource `name` through the most specific covering foreign import, if any.
    #[must_use]
    pub fn find_resource_from_import(
        &self,
        name: &str,
        ctx: &mut ResolveContext,
    ) -> Option<ResourceRc> {
        let entry = self.foreign_imports.matched(&routing_key(name))?;
        let target = self.import_target(&entry)?;
        target.resolve_resource_with(name, ctx)
    }

    /// Resource `name` through the parent realm, when wired and visible.
    #[must_use]
    pub fn find_resource_from_parent(
        &self,
        name: &str,
        ctx: &mut ResolveContext,
    ) -> Option<ResourceRc> {
        if !self.is_visible_through_parent(name) {
            return None;
        }

        let parent = self.parent.get()?.upgrade()?;
        parent.resolve_resource_with(name, ctx)
    }
}

impl fmt::Debug for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Realm[{}, parent: {}]",
            self.id,
            self.parent.get().map_or("<none>", ScopeHandle::id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::EmptyBootstrap;
    use crate::location::MemoryLocation;
    use crate::strategy::SelfFirst;

    fn realm(id: &str) -> RealmRc {
        Realm::new(
            id,
            Arc::new(SelfFirst),
            Arc::new(EmptyBootstrap),
            LockingMode::PerName,
        )
    }

    fn with_unit(id: &str, unit: &str, data: Vec<u8>) -> RealmRc {
        let r = realm(id);
        let mut location = MemoryLocation::new("mem");
        location.insert_unit(unit, data);
        r.append_location(Arc::new(location));
        r
    }

    #[test]
    fn self_load_defines_once_and_caches() {
        let r = with_unit("app", "com.acme.Widget", vec![0x01]);

        let first = r.load_from_self("com.acme.Widget").unwrap();
        let second = r.load_from_self("com.acme.Widget").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.origin_realm(), "app");
        assert_eq!(first.origin_location(), "mem");

        assert!(r.load_from_self("com.acme.Missing").is_none());
    }

    #[test]
    fn closed_realm_rejects_resolution() {
        let r = with_unit("app", "com.acme.Widget", vec![0x01]);
        r.close();

        assert!(r.is_closed());
        assert!(matches!(
            r.resolve_unit("com.acme.Widget"),
            Err(Error::ScopeClosed(ref id)) if id == "app"
        ));
        assert!(matches!(
            r.resolve_resource("cfg/app.xml"),
            Err(Error::ScopeClosed(_))
        ));
        assert!(matches!(
            r.resolve_all_resources("cfg/app.xml"),
            Err(Error::ScopeClosed(_))
        ));
    }

    #[test]
    fn parent_is_set_at_most_once() {
        let child = realm("child");
        let p1 = realm("p1");
        let p2 = realm("p2");

        child.set_parent(p1.handle()).unwrap();
        assert!(matches!(
            child.set_parent(p2.handle()),
            Err(Error::ParentAlreadySet(ref id)) if id == "child"
        ));
        assert_eq!(child.parent().unwrap().id(), "p1");
    }

    #[test]
    fn resource_routing_key_matches_dotted_prefixes() {
        let r = realm("app");
        r.add_parent_visibility("META-INF").unwrap();

        assert!(r.is_visible_through_parent("META-INF/app.xml"));
        assert!(!r.is_visible_through_parent("cfg/app.xml"));
    }

    #[test]
    fn dropped_import_target_is_a_miss() {
        let r = realm("app");
        {
            let gone = with_unit("gone", "com.acme.Widget", vec![0x01]);
            r.add_import("com.acme", gone.handle()).unwrap();
        }

        let mut ctx = ResolveContext::new();
        assert!(r.load_from_import("com.acme.Widget", &mut ctx).is_none());
        assert!(matches!(
            r.resolve_unit("com.acme.Widget"),
            Err(Error::NotFound(_))
        ));
    }
}

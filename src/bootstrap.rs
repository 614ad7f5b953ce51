//! The fixed system scope consulted before any realm-specific logic.
//!
//! Every resolution first asks the bootstrap scope, unconditionally and outside the control
//! of the realm's delegation strategy. A strategy orders the self/import/parent sources but
//! can never bypass this lookup.
//!
//! # Key Types
//! - [`BootstrapScope`] - Contract of the system scope
//! - [`EmptyBootstrap`] - System scope that never supplies anything
//! - [`MapBootstrap`] - In-memory system scope with stable handles

use std::sync::Arc;

use dashmap::DashMap;

use crate::unit::{Resource, ResourceRc, Unit, UnitData, UnitRc};

/// The always-available system scope tried before any strategy logic runs.
///
/// Implementations must be cheap to query, must never block indefinitely, and must hand out
/// stable handles: looking up the same name twice yields the identical `Arc`, matching the
/// identity guarantee of realm resolution.
pub trait BootstrapScope: Send + Sync {
    /// The unit `name`, if the system scope supplies it.
    fn lookup_unit(&self, name: &str) -> Option<UnitRc>;

    /// The resource `name`, if the system scope supplies it.
    fn lookup_resource(&self, name: &str) -> Option<ResourceRc>;
}

/// A bootstrap scope that supplies nothing.
///
/// The default for worlds whose host has no fixed system scope.
#[derive(Debug, Default)]
pub struct EmptyBootstrap;

impl BootstrapScope for EmptyBootstrap {
    fn lookup_unit(&self, _name: &str) -> Option<UnitRc> {
        None
    }

    fn lookup_resource(&self, _name: &str) -> Option<ResourceRc> {
        None
    }
}

/// Realm id reported as the origin of bootstrap-supplied handles.
pub const BOOTSTRAP_SCOPE_ID: &str = "<bootstrap>";

/// A bootstrap scope backed by in-memory tables.
///
/// Handles are created once at registration, so repeated lookups return the identical
/// `Arc`. Registration happens during host setup, before realms start resolving.
#[derive(Default)]
pub struct MapBootstrap {
    units: DashMap<String, UnitRc>,
    resources: DashMap<String, ResourceRc>,
}

impl MapBootstrap {
    /// Create an empty bootstrap scope.
    #[must_use]
    pub fn new() -> MapBootstrap {
        MapBootstrap {
            units: DashMap::new(),
            resources: DashMap::new(),
        }
    }

    /// Register the bytes defining unit `name`.
    pub fn insert_unit(&self, name: &str, data: Vec<u8>) {
        let unit = Arc::new(Unit::new(
            name,
            BOOTSTRAP_SCOPE_ID,
            BOOTSTRAP_SCOPE_ID,
            UnitData::Owned(data),
        ));
        self.units.insert(name.to_string(), unit);
    }

    /// Register the bytes of resource `name`.
    pub fn insert_resource(&self, name: &str, data: Vec<u8>) {
        let resource = Arc::new(Resource::new(
            name,
            BOOTSTRAP_SCOPE_ID,
            BOOTSTRAP_SCOPE_ID,
            UnitData::Owned(data),
        ));
        self.resources.insert(name.to_string(), resource);
    }
}

impl BootstrapScope for MapBootstrap {
    fn lookup_unit(&self, name: &str) -> Option<UnitRc> {
        self.units.get(name).map(|u| u.clone())
    }

    fn lookup_resource(&self, name: &str) -> Option<ResourceRc> {
        self.resources.get(name).map(|r| r.clone())
    }
}

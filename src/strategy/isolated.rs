use super::Strategy;
use crate::realm::{Realm, ResolveContext};
use crate::unit::{ResourceRc, UnitRc};

/// Isolation policy: self, then imports; the parent is never consulted.
///
/// For realms that must only see what they were explicitly given, regardless of any parent
/// wiring. The bootstrap scope is still consulted by the realm before this policy runs.
#[derive(Debug, Default)]
pub struct Isolated;

impl Strategy for Isolated {
    fn name(&self) -> &'static str {
        "isolated"
    }

    fn find_unit(&self, realm: &Realm, ctx: &mut ResolveContext, name: &str) -> Option<UnitRc> {
        if let Some(unit) = realm.load_from_self(name) {
            return Some(unit);
        }

        realm.load_from_import(name, ctx)
    }

    fn find_resource(
        &self,
        realm: &Realm,
        ctx: &mut ResolveContext,
        name: &str,
    ) -> Option<ResourceRc> {
        if let Some(resource) = realm.find_resource_from_self(name) {
            return Some(resource);
        }

        realm.find_resource_from_import(name, ctx)
    }
}

use super::Strategy;
use crate::realm::{Realm, ResolveContext};
use crate::unit::{ResourceRc, UnitRc};

/// The reference realm-first policy: self, then imports, then parent.
///
/// A realm resolving with this strategy prefers its own definitions over anything imported
/// or inherited, which is the ordering realm hierarchies are usually built around.
#[derive(Debug, Default)]
pub struct SelfFirst;

impl Strategy for SelfFirst {
    fn name(&self) -> &'static str {
        "self-first"
    }

    fn find_unit(&self, realm: &Realm, ctx: &mut ResolveContext, name: &str) -> Option<UnitRc> {
        if let Some(unit) = realm.load_from_self(name) {
            return Some(unit);
        }

        if let Some(unit) = realm.load_from_import(name, ctx) {
            return Some(unit);
        }

        realm.load_from_parent(name, ctx)
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

        if let Some(resource) = realm.find_resource_from_import(name, ctx) {
            return Some(resource);
        }

        realm.find_resource_from_parent(name, ctx)
    }
}

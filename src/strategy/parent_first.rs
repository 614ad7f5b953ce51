use super::Strategy;
use crate::realm::{Realm, ResolveContext};
use crate::unit::{ResourceRc, UnitRc};

/// Parent-first policy: parent, then self, then imports.
///
/// Mirrors classic hierarchical delegation where inherited definitions shadow local ones.
/// Parent visibility gating still applies to the parent step.
#[derive(Debug, Default)]
pub struct ParentFirst;

impl Strategy for ParentFirst {
    fn name(&self) -> &'static str {
        "parent-first"
    }

    fn find_unit(&self, realm: &Realm, ctx: &mut ResolveContext, name: &str) -> Option<UnitRc> {
        if let Some(unit) = realm.load_from_parent(name, ctx) {
            return Some(unit);
        }

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
        if let Some(resource) = realm.find_resource_from_parent(name, ctx) {
            return Some(resource);
        }

        if let Some(resource) = realm.find_resource_from_self(name) {
            return Some(resource);
        }

        realm.find_resource_from_import(name, ctx)
    }
}

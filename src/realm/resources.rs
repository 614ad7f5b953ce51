//! Lazy merged enumeration of every resource visible to a realm.

use std::collections::{HashSet, VecDeque};
use std::mem;
use std::sync::Arc;

use crate::realm::entry::NamespaceEntry;
use crate::realm::{routing_key, RealmRc, ResolveContext, ScopeHandle};
use crate::unit::{Resource, ResourceId, ResourceRc};

/// The merged, deduplicated sequence produced by
/// [`Realm::resolve_all_resources`](crate::realm::Realm::resolve_all_resources).
///
/// Sources are visited lazily, one stage per advance: bootstrap, then each search-path
/// location, then each covering import, then the parent when visible. Every distinct
/// resource (by [`ResourceId`], not content) appears exactly once; the sequence is finite,
/// bounded by the number of sources. A fresh, restarted sequence is obtained by calling the
/// resolve method again.
pub struct AllResources {
    realm: RealmRc,
    name: String,
    stage: Stage,
    pending: VecDeque<ResourceRc>,
    seen: HashSet<ResourceId>,
    ctx: ResolveContext,
}

enum Stage {
    Start,
    Locations(usize),
    Imports(std::vec::IntoIter<NamespaceEntry>),
    Parent,
    Done,
}

impl AllResources {
    pub(crate) fn new(realm: RealmRc, name: &str) -> AllResources {
        AllResources {
            realm,
            name: name.to_string(),
            stage: Stage::Start,
            pending: VecDeque::new(),
            seen: HashSet::new(),
            ctx: ResolveContext::new(),
        }
    }

    /// Runs the next stage, filling `pending`. Returns `false` once exhausted.
    fn advance(&mut self) -> bool {
        let stage = mem::replace(&mut self.stage, Stage::Done);

        match stage {
            Stage::Start => {
                if !self.ctx.enter(self.realm.id(), &self.name) {
                    return false;
                }

                if let Some(resource) = self.realm.bootstrap.lookup_resource(&self.name) {
                    self.pending.push_back(resource);
                }

                self.stage = Stage::Locations(0);
                true
            }
            Stage::Locations(index) => {
                match self.realm.locations.get(index) {
                    Some(location) => {
                        if let Some(data) = location.search_resource(&self.name) {
                            self.pending.push_back(Arc::new(Resource::new(
                                &self.name,
                                self.realm.id(),
                                location.id(),
                                data,
                            )));
                        }
                        self.stage = Stage::Locations(index + 1);
                    }
                    None => {
                        let entries = self
                            .realm
                            .foreign_imports()
                            .all_matching(&routing_key(&self.name));
                        self.stage = Stage::Imports(entries.into_iter());
                    }
                }
                true
            }
            Stage::Imports(mut entries) => {
                match entries.next() {
                    Some(entry) => {
                        let target = match entry.target() {
                            Some(handle) => handle.upgrade(),
                            None => self.realm.parent().and_then(ScopeHandle::upgrade),
                        };
                        if let Some(target) = target {
                            target.collect_resources_into(
                                &self.name,
                                &mut self.ctx,
                                &mut self.pending,
                            );
                        }
                        self.stage = Stage::Imports(entries);
                    }
                    None => self.stage = Stage::Parent,
                }
                true
            }
            Stage::Parent => {
                if self.realm.is_visible_through_parent(&self.name) {
                    if let Some(parent) = self.realm.parent().and_then(ScopeHandle::upgrade) {
                        parent.collect_resources_into(
                            &self.name,
                            &mut self.ctx,
                            &mut self.pending,
                        );
                    }
                }
                true
            }
            Stage::Done => false,
        }
    }
}

impl Iterator for AllResources {
    type Item = ResourceRc;

    fn next(&mut self) -> Option<ResourceRc> {
        loop {
            if let Some(resource) = self.pending.pop_front() {
                if self.seen.insert(resource.identity()) {
                    return Some(resource);
                }
                continue;
            }

            if !self.advance() {
                return None;
            }
        }
    }
}

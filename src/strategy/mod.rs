//! Pluggable delegation strategies ordering a realm's search primitives.
//!
//! A strategy decides the order in which the self, import and parent sources of a realm are
//! tried; the unconditional bootstrap lookup always happens before the strategy runs and
//! cannot be bypassed. Strategies are stateless and reentrant: one instance may serve any
//! number of realms and threads concurrently, which is why realms hold them as
//! `Arc<dyn Strategy>`.
//!
//! # Shipped policies
//! - [`SelfFirst`] - self → imports → parent (the reference ordering)
//! - [`ParentFirst`] - parent → self → imports
//! - [`Isolated`] - self → imports, the parent is never consulted
//!
//! Collaborator-supplied strategies implement the same trait and are swappable per realm
//! without changing any other realm behavior.

mod isolated;
mod parent_first;
mod self_first;

pub use isolated::Isolated;
pub use parent_first::ParentFirst;
pub use self_first::SelfFirst;

use crate::realm::{Realm, ResolveContext};
use crate::unit::{ResourceRc, UnitRc};

/// Policy ordering the candidate sources of one realm.
///
/// Implementations must be pure with respect to the arguments: no state may be kept between
/// invocations, and a successful primitive result ends the search (later primitives must not
/// be attempted).
pub trait Strategy: Send + Sync {
    /// Stable identifier of the policy, reported by diagnostics.
    fn name(&self) -> &'static str;

    /// Find the unit `name` by invoking the realm's search primitives in policy order.
    fn find_unit(&self, realm: &Realm, ctx: &mut ResolveContext, name: &str) -> Option<UnitRc>;

    /// Find the resource `name` by invoking the realm's resource primitives in policy
    /// order.
    fn find_resource(
        &self,
        realm: &Realm,
        ctx: &mut ResolveContext,
        name: &str,
    ) -> Option<ResourceRc>;
}

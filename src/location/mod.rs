//! Content locations searched by a realm's self-load path.
//!
//! A realm's private search path is an append-only list of [`SearchLocation`] values tried in
//! registration order. Locations are a thin byte-supplying abstraction: they either yield the
//! bytes for a name or they do not, and they must swallow their own failures — a malformed or
//! unreadable entry simply never matches.
//!
//! # Key Types
//! - [`SearchLocation`] - Contract every location implements
//! - [`MemoryLocation`] - In-memory location for tests and embedding
//! - [`DirectoryLocation`] - Filesystem-backed location using memory-mapped reads

mod directory;
mod memory;

pub use directory::DirectoryLocation;
pub use memory::MemoryLocation;

use crate::unit::UnitData;

/// A single entry of a realm's private search path.
///
/// Implementations are consulted in search-path order until one yields bytes. A location
/// must never block indefinitely and must report any internal failure as a miss (`None`);
/// timeout policy for slow backends belongs to the implementation, not to the resolution
/// core.
pub trait SearchLocation: Send + Sync {
    /// Stable identifier of this location, used for unit/resource provenance and
    /// diagnostics.
    fn id(&self) -> &str;

    /// Bytes defining the unit `name`, or `None` if this location does not carry it.
    fn search_unit(&self, name: &str) -> Option<UnitData>;

    /// Bytes of the resource `name`, or `None` if this location does not carry it.
    fn search_resource(&self, name: &str) -> Option<UnitData>;
}

//! Handles for resolved units and resources.
//!
//! A [`Unit`] is a named, individually loadable piece of executable code; a [`Resource`] is a
//! named byte-bearing artifact resolved through the same namespace mechanism. Both are handed
//! out as reference-counted handles whose *identity* matters: a realm hands out the same
//! [`UnitRc`] for repeated resolutions of the same name, and resource enumeration deduplicates
//! by [`ResourceId`], never by content.
//!
//! # Key Types
//! - [`Unit`] / [`UnitRc`] - A defined code unit and its shared handle
//! - [`Resource`] / [`ResourceRc`] - A located resource and its shared handle
//! - [`ResourceId`] - Identity key for resource deduplication
//! - [`UnitData`] - Backing bytes, either owned or memory-mapped

use std::fmt;
use std::sync::Arc;

use memmap2::Mmap;

/// A reference to a [`Unit`]
pub type UnitRc = Arc<Unit>;

/// A reference to a [`Resource`]
pub type ResourceRc = Arc<Resource>;

/// The bytes backing a unit or resource.
///
/// Search locations either hand over an owned buffer (in-memory locations, small files) or
/// keep the file mapped and lend the mapping to the handle (directory locations). Consumers
/// only ever see a `&[u8]` via [`UnitData::bytes`].
pub enum UnitData {
    /// Bytes held in an owned buffer
    Owned(Vec<u8>),
    /// Bytes backed by a memory-mapped file
    Mapped(Mmap),
}

impl UnitData {
    /// Access the raw bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self {
            UnitData::Owned(data) => data.as_slice(),
            UnitData::Mapped(map) => &map[..],
        }
    }

    /// Number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    /// `true` if there are no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

impl fmt::Debug for UnitData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitData::Owned(data) => write!(f, "UnitData::Owned({} bytes)", data.len()),
            UnitData::Mapped(map) => write!(f, "UnitData::Mapped({} bytes)", map.len()),
        }
    }
}

/// A named, individually loadable piece of executable code.
///
/// Units are defined exactly once per realm: the defining realm caches the handle and every
/// later resolution of the same name observes the identical `Arc` (compare with
/// [`Arc::ptr_eq`]). The unit records which realm defined it and which search location
/// supplied its bytes.
#[derive(Debug)]
pub struct Unit {
    name: String,
    origin_realm: String,
    origin_location: String,
    data: UnitData,
}

impl Unit {
    /// Create a new unit handle.
    ///
    /// ## Arguments
    /// * 'name' - The fully qualified unit name
    /// * 'origin_realm' - Id of the realm that defined the unit
    /// * 'origin_location' - Id of the search location that supplied the bytes
    /// * 'data' - The defining bytes
    #[must_use]
    pub fn new(name: &str, origin_realm: &str, origin_location: &str, data: UnitData) -> Unit {
        Unit {
            name: name.to_string(),
            origin_realm: origin_realm.to_string(),
            origin_location: origin_location.to_string(),
            data,
        }
    }

    /// The fully qualified unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the realm that defined this unit.
    #[must_use]
    pub fn origin_realm(&self) -> &str {
        &self.origin_realm
    }

    /// Id of the search location that supplied the bytes.
    #[must_use]
    pub fn origin_location(&self) -> &str {
        &self.origin_location
    }

    /// The defining bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.bytes()
    }
}

/// Identity of a [`Resource`], used to deduplicate enumeration results.
///
/// Two resources are the same iff they come from the same location of the same realm under
/// the same name. Content is never compared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Id of the realm the resource was found through
    pub realm: String,
    /// Id of the search location that supplied the resource
    pub location: String,
    /// The resource name
    pub name: String,
}

/// A named byte-bearing artifact located through the realm namespace mechanism.
#[derive(Debug)]
pub struct Resource {
    name: String,
    origin_realm: String,
    origin_location: String,
    data: UnitData,
}

impl Resource {
    /// Create a new resource handle.
    ///
    /// ## Arguments
    /// * 'name' - The resource name (a relative path)
    /// * 'origin_realm' - Id of the realm the resource was found through
    /// * 'origin_location' - Id of the search location that supplied it
    /// * 'data' - The resource bytes
    #[must_use]
    pub fn new(name: &str, origin_realm: &str, origin_location: &str, data: UnitData) -> Resource {
        Resource {
            name: name.to_string(),
            origin_realm: origin_realm.to_string(),
            origin_location: origin_location.to_string(),
            data,
        }
    }

    /// The resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the realm the resource was found through.
    #[must_use]
    pub fn origin_realm(&self) -> &str {
        &self.origin_realm
    }

    /// Id of the search location that supplied the resource.
    #[must_use]
    pub fn origin_location(&self) -> &str {
        &self.origin_location
    }

    /// The resource bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.bytes()
    }

    /// The identity key used for deduplication.
    #[must_use]
    pub fn identity(&self) -> ResourceId {
        ResourceId {
            realm: self.origin_realm.clone(),
            location: self.origin_location.clone(),
            name: self.name.clone(),
        }
    }
}

use std::collections::HashMap;

use super::SearchLocation;
use crate::unit::UnitData;

/// Search location backed by in-memory tables.
///
/// Populated during setup, immutable afterwards. Mainly used by tests and by hosts that
/// embed unit bytes directly.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    id: String,
    units: HashMap<String, Vec<u8>>,
    resources: HashMap<String, Vec<u8>>,
}

impl MemoryLocation {
    /// Create an empty in-memory location.
    ///
    /// ## Arguments
    /// * 'id' - Stable identifier reported for provenance and diagnostics
    #[must_use]
    pub fn new(id: &str) -> MemoryLocation {
        MemoryLocation {
            id: id.to_string(),
            units: HashMap::new(),
            resources: HashMap::new(),
        }
    }

    /// Register the bytes defining unit `name`.
    pub fn insert_unit(&mut self, name: &str, data: Vec<u8>) {
        self.units.insert(name.to_string(), data);
    }

    /// Register the bytes of resource `name`.
    pub fn insert_resource(&mut self, name: &str, data: Vec<u8>) {
        self.resources.insert(name.to_string(), data);
    }
}

impl SearchLocation for MemoryLocation {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_unit(&self, name: &str) -> Option<UnitData> {
        self.units.get(name).map(|d| UnitData::Owned(d.clone()))
    }

    fn search_resource(&self, name: &str) -> Option<UnitData> {
        self.resources.get(name).map(|d| UnitData::Owned(d.clone()))
    }
}

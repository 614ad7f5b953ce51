use std::fs;
use std::path::{Component, Path, PathBuf};

use memmap2::Mmap;

use super::SearchLocation;
use crate::realm::NAMESPACE_SEPARATOR;
use crate::unit::UnitData;

/// File extension of unit files below a [`DirectoryLocation`].
pub const UNIT_EXTENSION: &str = "unit";

/// Search location backed by a directory tree.
///
/// Unit names map onto the tree by namespace segment: `com.acme.Widget` is looked up at
/// `<base>/com/acme/Widget.unit`. Resource names are taken as relative paths below the base
/// directory. File contents are memory-mapped; empty files are returned as empty owned
/// buffers since they cannot be mapped on all platforms.
///
/// Any I/O failure, as well as a name that would escape the base directory, is treated as a
/// miss.
#[derive(Debug)]
pub struct DirectoryLocation {
    id: String,
    base: PathBuf,
}

impl DirectoryLocation {
    /// Create a location rooted at `base`.
    #[must_use]
    pub fn new(base: &Path) -> DirectoryLocation {
        DirectoryLocation {
            id: base.display().to_string(),
            base: base.to_path_buf(),
        }
    }

    /// Filesystem path a unit name maps to.
    fn unit_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return None;
        }

        let mut path = self.base.clone();
        for segment in name.split(NAMESPACE_SEPARATOR) {
            if segment.is_empty() || segment == "." || segment == ".." {
                return None;
            }
            path.push(segment);
        }

        path.set_extension(UNIT_EXTENSION);
        Some(path)
    }

    /// Filesystem path a resource name maps to.
    fn resource_path(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        if relative.is_absolute() {
            return None;
        }

        // Reject anything that could climb out of the base directory.
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => return None,
            }
        }

        Some(self.base.join(relative))
    }

    fn read(path: &Path) -> Option<UnitData> {
        let file = fs::File::open(path).ok()?;
        let meta = file.metadata().ok()?;

        if !meta.is_file() {
            return None;
        }

        if meta.len() == 0 {
            return Some(UnitData::Owned(Vec::new()));
        }

        // Safety: the mapping is read-only and the handle lives as long as the map.
        // Concurrent truncation of the backing file is outside this library's control,
        // matching the contract of memory-mapped input files.
        let map = unsafe { Mmap::map(&file) }.ok()?;
        Some(UnitData::Mapped(map))
    }
}

impl SearchLocation for DirectoryLocation {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_unit(&self, name: &str) -> Option<UnitData> {
        Self::read(&self.unit_path(name)?)
    }

    fn search_resource(&self, name: &str) -> Option<UnitData> {
        Self::read(&self.resource_path(name)?)
    }
}

//! Read-only icon lookup built from the merged geometry table.

use std::path::Path;

use crate::artifacts::{SvgEntry, SvgTable};
use crate::store::{read_json, StoreError};

/// Errors that can occur loading an icon library.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Failed to load icon library: {0}")]
    Load(#[from] StoreError),
}

/// Immutable icon lookup table.
///
/// Built once from `icons-svg.json` and shared by reference; it is never
/// mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct IconLibrary {
    icons: SvgTable,
}

impl IconLibrary {
    /// Build a library from an in-memory table.
    pub fn from_table(icons: SvgTable) -> Self {
        Self { icons }
    }

    /// Load a library from a merged geometry table file.
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        if !path.exists() {
            return Err(StoreError::Missing(path.display().to_string()).into());
        }
        let icons: SvgTable = read_json(path)?;
        Ok(Self { icons })
    }

    /// Look up an icon by key.
    pub fn get(&self, key: &str) -> Option<&SvgEntry> {
        self.icons.get(key)
    }

    /// Whether an icon exists.
    pub fn contains(&self, key: &str) -> bool {
        self.icons.contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.icons.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

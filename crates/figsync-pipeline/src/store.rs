//! On-disk layout of pipeline artifacts.
//!
//! ```text
//! <out_dir>/
//! ├── manifest.json          # Node Lister output
//! ├── batches/
//! │   ├── batch-001.json     # Batch Image Fetcher output, one per batch
//! │   └── ...
//! ├── icons.json             # merged metadata
//! ├── icons-svg.json         # merged geometry table
//! └── icons.ts               # optional TypeScript module
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use walkdir::WalkDir;

use crate::artifacts::{BatchFile, Manifest, MergedMetadata, SvgTable};

const MANIFEST_FILE: &str = "manifest.json";
const BATCHES_DIR: &str = "batches";
const METADATA_FILE: &str = "icons.json";
const SVG_TABLE_FILE: &str = "icons-svg.json";
const TYPESCRIPT_FILE: &str = "icons.ts";

/// Errors that can occur reading or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid JSON in {path}: {message}")]
    Json { path: String, message: String },

    #[error("Artifact not found: {0}")]
    Missing(String),
}

impl StoreError {
    fn io(path: &Path, e: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    }

    fn json(path: &Path, e: impl std::fmt::Display) -> Self {
        Self::Json {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    }
}

/// Artifact directory of one export.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `root`. Nothing is created until written.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn batches_dir(&self) -> PathBuf {
        self.root.join(BATCHES_DIR)
    }

    pub fn batch_path(&self, batch: usize) -> PathBuf {
        self.batches_dir().join(format!("batch-{:03}.json", batch))
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }

    pub fn svg_table_path(&self) -> PathBuf {
        self.root.join(SVG_TABLE_FILE)
    }

    pub fn typescript_path(&self) -> PathBuf {
        self.root.join(TYPESCRIPT_FILE)
    }

    /// Write the manifest.
    pub fn write_manifest(&self, manifest: &Manifest) -> Result<PathBuf, StoreError> {
        let path = self.manifest_path();
        write_json(&path, manifest)?;
        Ok(path)
    }

    /// Read the manifest, failing if it does not exist.
    pub fn read_manifest(&self) -> Result<Manifest, StoreError> {
        self.try_read_manifest()?
            .ok_or_else(|| StoreError::Missing(self.manifest_path().display().to_string()))
    }

    /// Read the manifest if one has been written.
    pub fn try_read_manifest(&self) -> Result<Option<Manifest>, StoreError> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    /// Write one batch file.
    ///
    /// The file only appears under its final name once fully written.
    pub fn write_batch(&self, batch: &BatchFile) -> Result<PathBuf, StoreError> {
        let path = self.batch_path(batch.batch);
        write_json(&path, batch)?;
        Ok(path)
    }

    /// Read every batch file, sorted by batch index.
    pub fn read_batches(&self) -> Result<Vec<BatchFile>, StoreError> {
        let dir = self.batches_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut batches = Vec::new();
        for path in batch_files(&dir) {
            let batch: BatchFile = read_json(&path)?;
            batches.push(batch);
        }

        batches.sort_by_key(|b| b.batch);
        Ok(batches)
    }

    /// Delete every batch file, returning how many were removed.
    pub fn clear_batches(&self) -> Result<usize, StoreError> {
        let dir = self.batches_dir();
        if !dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for path in batch_files(&dir) {
            fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Write both merged artifacts.
    pub fn write_merged(
        &self,
        metadata: &MergedMetadata,
        table: &SvgTable,
    ) -> Result<(), StoreError> {
        write_json(&self.metadata_path(), metadata)?;
        write_json(&self.svg_table_path(), table)
    }

    /// Write the generated TypeScript module.
    pub fn write_typescript(&self, source: &str) -> Result<PathBuf, StoreError> {
        let path = self.typescript_path();
        write_atomic(&path, source.as_bytes())?;
        Ok(path)
    }
}

/// Paths of the `batch-*.json` files directly under `dir`.
fn batch_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| {
            let name = entry.file_name().to_str().unwrap_or("");
            entry.file_type().is_file() && name.starts_with("batch-") && name.ends_with(".json")
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| StoreError::json(path, e))?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

/// Write to a sibling temp file, then rename over the target.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{BatchEntry, Source};
    use crate::testing::{icon, id};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn batch(k: usize) -> BatchFile {
        BatchFile {
            batch: k,
            total_batches: 12,
            icons: vec![BatchEntry::failed(icon(&format!("1:{}", k), "x"), "nope")],
        }
    }

    #[test]
    fn writes_and_reads_manifest() {
        let temp = tempdir().unwrap();
        let store = ArtifactStore::new(temp.path().join("out"));
        let manifest = Manifest::new(
            Source {
                file_id: "file".to_string(),
                root_node_id: id("1:1"),
                depth: 3,
            },
            vec![icon("1:2", "Star")],
        );

        assert!(store.try_read_manifest().unwrap().is_none());
        store.write_manifest(&manifest).unwrap();

        assert_eq!(store.read_manifest().unwrap(), manifest);
    }

    #[test]
    fn reads_batches_in_index_order() {
        let temp = tempdir().unwrap();
        let store = ArtifactStore::new(temp.path());

        for k in [10, 2, 1] {
            store.write_batch(&batch(k)).unwrap();
        }
        fs::write(store.batches_dir().join("notes.txt"), "ignored").unwrap();

        let batches = store.read_batches().unwrap();

        let order: Vec<usize> = batches.iter().map(|b| b.batch).collect();
        assert_eq!(order, vec![1, 2, 10]);
    }

    #[test]
    fn leaves_no_temp_files() {
        let temp = tempdir().unwrap();
        let store = ArtifactStore::new(temp.path());

        let path = store.write_batch(&batch(1)).unwrap();

        assert!(path.ends_with("batches/batch-001.json"));
        let names: Vec<_> = fs::read_dir(store.batches_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn clears_only_batch_files() {
        let temp = tempdir().unwrap();
        let store = ArtifactStore::new(temp.path());

        assert_eq!(store.clear_batches().unwrap(), 0);
        for k in [1, 2] {
            store.write_batch(&batch(k)).unwrap();
        }
        fs::write(store.batches_dir().join("notes.txt"), "kept").unwrap();

        assert_eq!(store.clear_batches().unwrap(), 2);
        assert!(store.read_batches().unwrap().is_empty());
        assert!(store.batches_dir().join("notes.txt").exists());
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let temp = tempdir().unwrap();
        let store = ArtifactStore::new(temp.path());

        assert!(matches!(store.read_manifest(), Err(StoreError::Missing(_))));
    }

    #[test]
    fn malformed_batch_is_reported() {
        let temp = tempdir().unwrap();
        let store = ArtifactStore::new(temp.path());
        fs::create_dir_all(store.batches_dir()).unwrap();
        fs::write(store.batch_path(1), "{ not json").unwrap();

        assert!(matches!(
            store.read_batches(),
            Err(StoreError::Json { .. })
        ));
    }
}

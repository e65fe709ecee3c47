//! Merge command: assemble existing batch files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use figsync_pipeline::{merge_artifacts, ArtifactStore, BatchPlan};

use crate::config::ConfigFile;

/// Expected batch count for a batch size, from the stored manifest.
fn expected_batches(store: &ArtifactStore, batch: Option<usize>) -> Result<Option<usize>> {
    let Some(size) = batch else {
        return Ok(None);
    };

    let manifest = store.read_manifest()?;
    let plan = BatchPlan::new(size, manifest.icons.len()).context("Invalid batch size")?;
    Ok(Some(plan.total_batches()))
}

/// Run the merge command.
pub async fn run(
    config: ConfigFile,
    out_dir: Option<PathBuf>,
    batch: Option<usize>,
    generate_ts: bool,
) -> Result<()> {
    let out_dir = out_dir.unwrap_or(config.sync.out_dir);
    let store = ArtifactStore::new(&out_dir);

    tracing::info!("Merging batches in {}", out_dir.display());

    let expected = expected_batches(&store, batch)?;
    let outcome = merge_artifacts(&store, expected, generate_ts || config.sync.generate_ts)?;

    let report = &outcome.report;
    tracing::info!(
        "Merged {} icons ({} non-icon, {} empty, {} overwritten)",
        report.merged,
        report.skipped_kind,
        report.skipped_empty,
        report.overwritten
    );
    if report.foreign_batches > 0 {
        tracing::warn!("Ignored {} batch files from another run", report.foreign_batches);
    }
    tracing::info!("Metadata: {}", outcome.metadata_path.display());
    tracing::info!("Geometry: {}", outcome.svg_table_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figsync_api::{NodeId, NodeKind};
    use figsync_pipeline::{IconNode, Manifest, Source};
    use tempfile::tempdir;

    fn store_with_icons(n: usize) -> (tempfile::TempDir, ArtifactStore) {
        let temp = tempdir().unwrap();
        let store = ArtifactStore::new(temp.path());
        let icons = (0..n)
            .map(|i| IconNode {
                id: NodeId::parse(&format!("1:{}", i)).unwrap(),
                name: format!("icon-{}", i),
                key: format!("icon-{}", i),
                kind: NodeKind::Component,
                category: "icons".to_string(),
            })
            .collect();
        let manifest = Manifest::new(
            Source {
                file_id: "file".to_string(),
                root_node_id: NodeId::parse("0:1").unwrap(),
                depth: 10,
            },
            icons,
        );
        store.write_manifest(&manifest).unwrap();
        (temp, store)
    }

    #[test]
    fn batch_size_sets_expected_count() {
        let (_temp, store) = store_with_icons(120);

        assert_eq!(expected_batches(&store, Some(50)).unwrap(), Some(3));
        assert_eq!(expected_batches(&store, None).unwrap(), None);
    }

    #[tokio::test]
    async fn merge_without_manifest_fails() {
        let temp = tempdir().unwrap();

        let result = run(
            ConfigFile::default(),
            Some(temp.path().to_path_buf()),
            None,
            false,
        )
        .await;

        assert!(result.is_err());
    }
}

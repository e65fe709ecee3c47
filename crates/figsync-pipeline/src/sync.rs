//! End-to-end sync: list, fetch batches, merge.

use std::path::PathBuf;
use std::time::Duration;

use figsync_api::{ApiError, FigmaApi, NodeId};

use crate::artifacts::{BatchFile, EntryOutcome, Manifest, Source};
use crate::assembler::{assemble, MergeReport};
use crate::batch::{BatchPlan, BatchRangeError};
use crate::fetcher::BatchFetcher;
use crate::lister::{NodeLister, DEFAULT_DEPTH};
use crate::store::{ArtifactStore, StoreError};
use crate::typescript::render_typescript;

/// Options for one sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Figma file key
    pub file_key: String,

    /// Node whose subtree holds the icons
    pub root: NodeId,

    /// Listing depth
    pub depth: u32,

    /// Icons per image request
    pub batch_size: usize,

    /// Pause between batches
    pub delay: Duration,

    /// Stop after writing the manifest
    pub manifest_only: bool,

    /// Emit `icons.ts` after merging
    pub generate_ts: bool,

    /// First batch to fetch (1-based, inclusive)
    pub from_batch: Option<usize>,

    /// Last batch to fetch (inclusive)
    pub to_batch: Option<usize>,
}

impl SyncOptions {
    /// Options with default depth, batch size and delay.
    pub fn new(file_key: impl Into<String>, root: NodeId) -> Self {
        Self {
            file_key: file_key.into(),
            root,
            depth: DEFAULT_DEPTH,
            batch_size: 50,
            delay: Duration::from_millis(500),
            manifest_only: false,
            generate_ts: false,
            from_batch: None,
            to_batch: None,
        }
    }

    fn source(&self) -> Source {
        Source {
            file_id: self.file_key.clone(),
            root_node_id: self.root.clone(),
            depth: self.depth,
        }
    }
}

/// Per-entry outcome tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub with_geometry: usize,
    pub empty: usize,
    pub errors: usize,
}

impl OutcomeCounts {
    /// Add every entry of a batch.
    pub fn record(&mut self, batch: &BatchFile) {
        for entry in &batch.icons {
            match entry.outcome() {
                EntryOutcome::Geometry => self.with_geometry += 1,
                EntryOutcome::Empty => self.empty += 1,
                EntryOutcome::Failed => self.errors += 1,
            }
        }
    }
}

/// Result of a sync run.
#[derive(Debug)]
pub struct SyncReport {
    pub manifest_path: PathBuf,

    /// Icons in the manifest
    pub icons: usize,

    pub total_batches: usize,

    /// Batches fetched by this run
    pub batches_fetched: Vec<usize>,

    pub counts: OutcomeCounts,

    /// Set unless the run stopped after listing
    pub merge: Option<MergeOutcome>,
}

/// Result of merging an artifact directory.
#[derive(Debug)]
pub struct MergeOutcome {
    pub report: MergeReport,
    pub metadata_path: PathBuf,
    pub svg_table_path: PathBuf,
    pub typescript_path: Option<PathBuf>,
}

/// Errors that abort a sync.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Failed to list icons: {0}")]
    Listing(#[from] ApiError),

    #[error("Invalid batch selection: {0}")]
    BatchRange(#[from] BatchRangeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to render TypeScript: {0}")]
    Template(String),
}

/// Runs the pipeline against one artifact directory.
pub struct Syncer<'a, A: FigmaApi + ?Sized> {
    api: &'a A,
    store: &'a ArtifactStore,
}

impl<'a, A: FigmaApi + ?Sized> Syncer<'a, A> {
    /// Create a syncer writing into `store`.
    pub fn new(api: &'a A, store: &'a ArtifactStore) -> Self {
        Self { api, store }
    }

    /// Run the sync.
    ///
    /// Batches are fetched strictly one after another; each batch file is on
    /// disk before the next batch starts.
    pub async fn run(&self, options: &SyncOptions) -> Result<SyncReport, SyncError> {
        let manifest = self.manifest_for(options).await?;

        let plan = BatchPlan::new(options.batch_size, manifest.icons.len())?;
        let total_batches = plan.total_batches();

        let mut report = SyncReport {
            manifest_path: self.store.manifest_path(),
            icons: manifest.icons.len(),
            total_batches,
            batches_fetched: Vec::new(),
            counts: OutcomeCounts::default(),
            merge: None,
        };

        if options.manifest_only {
            return Ok(report);
        }

        let selection = plan.select(options.from_batch, options.to_batch)?;
        let fetcher = BatchFetcher::new(self.api, &options.file_key);

        for k in selection {
            if !report.batches_fetched.is_empty() && !options.delay.is_zero() {
                tokio::time::sleep(options.delay).await;
            }

            let range = plan.range(k);
            tracing::info!(
                "Fetching batch {}/{} ({} icons)",
                k,
                total_batches,
                range.len()
            );

            let batch = fetcher.fetch(k, total_batches, &manifest.icons[range]).await;
            report.counts.record(&batch);
            self.store.write_batch(&batch)?;
            report.batches_fetched.push(k);
        }

        tracing::info!(
            "Fetched {} batches: {} with geometry, {} empty, {} errors",
            report.batches_fetched.len(),
            report.counts.with_geometry,
            report.counts.empty,
            report.counts.errors
        );

        report.merge = Some(merge_artifacts(
            self.store,
            Some(total_batches),
            options.generate_ts,
        )?);

        Ok(report)
    }

    /// Reuse the stored manifest when resuming the same source, else list.
    async fn manifest_for(&self, options: &SyncOptions) -> Result<Manifest, SyncError> {
        let resuming = options.from_batch.is_some_and(|k| k > 1);

        if resuming {
            match self.store.try_read_manifest()? {
                Some(existing) if existing.source == options.source() => {
                    tracing::info!(
                        "Resuming with existing manifest ({} icons)",
                        existing.icons.len()
                    );
                    return Ok(existing);
                }
                Some(_) => {
                    tracing::warn!("Existing manifest is for a different source, listing again")
                }
                None => tracing::warn!("No manifest to resume from, listing again"),
            }
        }

        let manifest = NodeLister::new(self.api)
            .list(&options.file_key, &options.root, options.depth)
            .await?;

        // Batches of an earlier listing are partitioned against a different manifest.
        let cleared = self.store.clear_batches()?;
        if cleared > 0 {
            tracing::info!("Removed {} batch files from a previous run", cleared);
        }

        let path = self.store.write_manifest(&manifest)?;
        tracing::info!("Wrote manifest to {}", path.display());

        Ok(manifest)
    }
}

/// Merge every batch file in `store` and write the final artifacts.
pub fn merge_artifacts(
    store: &ArtifactStore,
    expected_batches: Option<usize>,
    generate_ts: bool,
) -> Result<MergeOutcome, SyncError> {
    let manifest = store.read_manifest()?;
    let batches = store.read_batches()?;

    let assembled = assemble(&manifest, batches, expected_batches);
    store.write_merged(&assembled.metadata, &assembled.table)?;

    tracing::info!(
        "Merged {} icons in {} categories from {} batches",
        assembled.report.merged,
        assembled.metadata.categories.len(),
        assembled.report.batches
    );

    let typescript_path = if generate_ts {
        let source = render_typescript(&assembled.metadata, &assembled.table)
            .map_err(|e| SyncError::Template(e.to_string()))?;
        let path = store.write_typescript(&source)?;
        tracing::info!("Wrote {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(MergeOutcome {
        report: assembled.report,
        metadata_path: store.metadata_path(),
        svg_table_path: store.svg_table_path(),
        typescript_path,
    })
}

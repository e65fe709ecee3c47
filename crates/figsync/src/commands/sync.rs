//! Sync command: list, fetch and merge.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use figsync_api::{NodeId, TOKEN_ENV};
use figsync_pipeline::{ArtifactStore, SyncOptions, Syncer};

use crate::config::ConfigFile;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Node whose subtree holds the icons (e.g. 1:2 or 1-2)
    pub root: String,

    /// Figma file key (defaults to config)
    #[arg(long)]
    pub file_key: Option<String>,

    /// Listing depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Icons per image request
    #[arg(long)]
    pub batch: Option<usize>,

    /// Pause between batches, in milliseconds
    #[arg(long)]
    pub delay: Option<u64>,

    /// Artifact directory
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Stop after writing manifest.json
    #[arg(long)]
    pub manifest_only: bool,

    /// Also emit icons.ts
    #[arg(long)]
    pub generate_ts: bool,

    /// First batch to fetch (1-based)
    #[arg(long)]
    pub from_batch: Option<usize>,

    /// Last batch to fetch
    #[arg(long)]
    pub to_batch: Option<usize>,
}

/// Merge CLI arguments over the config file.
fn sync_options(config: &ConfigFile, args: &SyncArgs) -> Result<SyncOptions> {
    let root = NodeId::parse(&args.root)
        .with_context(|| format!("Invalid root node id {:?}", args.root))?;

    let Some(file_key) = args
        .file_key
        .clone()
        .or_else(|| config.figma.file_key.clone())
        .filter(|k| !k.trim().is_empty())
    else {
        bail!("No file key: pass --file-key or set [figma].file_key");
    };

    Ok(SyncOptions {
        depth: args.depth.unwrap_or(config.figma.depth),
        batch_size: args.batch.unwrap_or(config.sync.batch),
        delay: Duration::from_millis(args.delay.unwrap_or(config.sync.delay_ms)),
        manifest_only: args.manifest_only,
        generate_ts: args.generate_ts || config.sync.generate_ts,
        from_batch: args.from_batch,
        to_batch: args.to_batch,
        ..SyncOptions::new(file_key, root)
    })
}

/// Run the sync command.
pub async fn run(config: ConfigFile, args: SyncArgs) -> Result<()> {
    let options = sync_options(&config, &args)?;

    let client = super::figma_client(&config.figma)?;
    if !client.is_authenticated() {
        bail!("{} is not set", TOKEN_ENV);
    }

    let out_dir = args.out_dir.unwrap_or(config.sync.out_dir);
    let store = ArtifactStore::new(&out_dir);

    tracing::info!(
        "Syncing icons under {} in file {} into {}",
        options.root,
        options.file_key,
        out_dir.display()
    );

    let report = Syncer::new(&client, &store).run(&options).await?;

    tracing::info!(
        "Manifest: {} icons in {} batches ({})",
        report.icons,
        report.total_batches,
        report.manifest_path.display()
    );

    if let Some(merge) = report.merge {
        tracing::info!("Metadata: {}", merge.metadata_path.display());
        tracing::info!("Geometry: {}", merge.svg_table_path.display());
        if let Some(path) = merge.typescript_path {
            tracing::info!("TypeScript: {}", path.display());
        }
    }

    Ok(())
}

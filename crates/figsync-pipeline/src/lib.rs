//! Figma icon sync pipeline.
//!
//! Lists the icons under a design-file node, fetches their rendered SVGs in
//! fixed-size batches, and assembles the batch results into the lookup
//! tables consumed by the documentation site. Every stage hands off through
//! files in an [`ArtifactStore`], which is also the resume boundary.

pub mod artifacts;
pub mod assembler;
pub mod batch;
pub mod fetcher;
pub mod library;
pub mod lister;
pub mod slug;
pub mod store;
pub mod sync;
pub mod typescript;

#[cfg(test)]
pub(crate) mod testing;

pub use artifacts::{
    BatchEntry, BatchFile, EntryOutcome, IconNode, Manifest, MergedIcon, MergedMetadata, SvgEntry,
    SvgTable, Source,
};
pub use assembler::{assemble, Assembled, MergeReport};
pub use batch::{BatchPlan, BatchRangeError};
pub use fetcher::BatchFetcher;
pub use library::{IconLibrary, LibraryError};
pub use lister::{collect_icons, NodeLister, DEFAULT_DEPTH};
pub use slug::{slugify, KeyAllocator, DEFAULT_CATEGORY};
pub use store::{ArtifactStore, StoreError};
pub use sync::{
    merge_artifacts, MergeOutcome, OutcomeCounts, SyncError, SyncOptions, SyncReport, Syncer,
};
pub use typescript::render_typescript;

//! Artifact types written between pipeline stages.
//!
//! The JSON shapes here are consumed by the documentation site, so field
//! names and casing are part of the contract.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use figsync_api::{NodeId, NodeKind};
use figsync_svg::PathData;

/// Error recorded for a node Figma returned no render for.
pub const NO_IMAGE_URL: &str = "No image URL";

/// One exportable icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconNode {
    /// Figma node id
    pub id: NodeId,

    /// Name as authored in the design file
    pub name: String,

    /// Unique slug used as the lookup key
    pub key: String,

    /// Node kind (always a leaf kind in manifests)
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Slug of the nearest container ancestor
    pub category: String,
}

/// Where a manifest was listed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub file_id: String,
    pub root_node_id: NodeId,
    pub depth: u32,
}

/// Flattened icon list plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub source: Source,
    pub exported_at: DateTime<Utc>,
    pub total: usize,
    pub icons: Vec<IconNode>,
}

impl Manifest {
    /// Create a manifest stamped with the current time.
    pub fn new(source: Source, icons: Vec<IconNode>) -> Self {
        Self {
            source,
            exported_at: Utc::now(),
            total: icons.len(),
            icons,
        }
    }
}

/// How a single icon fared in its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// At least one path was extracted
    Geometry,
    /// The SVG downloaded fine but had nothing drawable
    Empty,
    /// The render or download failed
    Failed,
}

/// Result for one icon in a batch file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    #[serde(flatten)]
    pub icon: IconNode,

    /// First extracted path
    pub svg_path: Option<String>,

    /// Every extracted path, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_data_all: Vec<String>,

    pub error: Option<String>,
}

impl BatchEntry {
    /// Entry for an icon whose SVG was downloaded and parsed.
    pub fn extracted(icon: IconNode, paths: PathData) -> Self {
        let (svg_path, path_data_all) = paths.into_parts();
        Self {
            icon,
            svg_path,
            path_data_all,
            error: None,
        }
    }

    /// Entry for an icon that could not be fetched.
    pub fn failed(icon: IconNode, error: impl Into<String>) -> Self {
        Self {
            icon,
            svg_path: None,
            path_data_all: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Classify this entry.
    pub fn outcome(&self) -> EntryOutcome {
        if self.error.is_some() {
            EntryOutcome::Failed
        } else if self.svg_path.is_some() || !self.path_data_all.is_empty() {
            EntryOutcome::Geometry
        } else {
            EntryOutcome::Empty
        }
    }

    /// All paths, falling back to the primary path for files that predate
    /// `pathDataAll`.
    pub fn paths(&self) -> Vec<String> {
        if !self.path_data_all.is_empty() {
            self.path_data_all.clone()
        } else {
            self.svg_path.iter().cloned().collect()
        }
    }
}

/// One batch of fetched icons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFile {
    /// 1-based batch index
    pub batch: usize,
    pub total_batches: usize,
    pub icons: Vec<BatchEntry>,
}

/// Icon listed in the merged metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedIcon {
    pub id: NodeId,
    pub name: String,
    pub key: String,
    pub category: String,
}

/// Category and provenance summary of a merged run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedMetadata {
    pub source: Source,
    pub exported_at: DateTime<Utc>,
    pub total: usize,
    /// Sorted, without duplicates
    pub categories: Vec<String>,
    pub icons: Vec<MergedIcon>,
}

/// Geometry and markup of one merged icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgEntry {
    pub path_data: String,
    pub path_data_all: Vec<String>,
    pub svg_code: String,
}

/// Merged geometry keyed by icon key.
pub type SvgTable = BTreeMap<String, SvgEntry>;

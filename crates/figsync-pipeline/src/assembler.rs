//! Merge batch results into the final lookup tables.

use std::collections::{BTreeSet, HashMap};

use figsync_svg::render_icon;

use crate::artifacts::{BatchFile, Manifest, MergedIcon, MergedMetadata, SvgEntry, SvgTable};

/// Counters describing a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Batch files merged
    pub batches: usize,

    /// Entries in the final table
    pub merged: usize,

    /// Entries dropped for not being an icon kind
    pub skipped_kind: usize,

    /// Entries dropped for having no geometry
    pub skipped_empty: usize,

    /// Entries that replaced an earlier entry with the same key
    pub overwritten: usize,

    /// Batch indices of the run with no batch file
    pub missing_batches: Vec<usize>,

    /// Batch files ignored because they belong to a different run
    pub foreign_batches: usize,
}

/// Output of [`assemble`].
#[derive(Debug, Clone)]
pub struct Assembled {
    pub metadata: MergedMetadata,
    pub table: SvgTable,
    pub report: MergeReport,
}

/// Merge batch files into metadata and the keyed geometry table.
///
/// Only batches whose `totalBatches` equals `expected_batches` are merged
/// (when not given, the largest `totalBatches` seen is assumed). Batches are
/// merged in index order and a repeated key keeps the last entry seen, at
/// the position where the key first appeared.
pub fn assemble(
    manifest: &Manifest,
    mut batches: Vec<BatchFile>,
    expected_batches: Option<usize>,
) -> Assembled {
    let mut report = MergeReport::default();

    let expected = expected_batches
        .or_else(|| batches.iter().map(|b| b.total_batches).max())
        .unwrap_or(0);

    batches.retain(|b| {
        let ours = b.total_batches == expected;
        if !ours {
            tracing::warn!(
                "Skipping batch {} from another run ({} batches, expected {})",
                b.batch,
                b.total_batches,
                expected
            );
            report.foreign_batches += 1;
        }
        ours
    });
    batches.sort_by_key(|b| b.batch);

    let present: BTreeSet<usize> = batches.iter().map(|b| b.batch).collect();
    report.missing_batches = (1..=expected).filter(|k| !present.contains(k)).collect();
    if !report.missing_batches.is_empty() {
        tracing::warn!("Missing batches: {:?}", report.missing_batches);
    }
    report.batches = batches.len();

    let mut icons: Vec<MergedIcon> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut table = SvgTable::new();

    for batch in &batches {
        for entry in &batch.icons {
            if !entry.icon.kind.is_icon() {
                report.skipped_kind += 1;
                continue;
            }

            let paths = entry.paths();
            let Some(primary) = paths.first().cloned() else {
                report.skipped_empty += 1;
                continue;
            };

            let icon = MergedIcon {
                id: entry.icon.id.clone(),
                name: entry.icon.name.clone(),
                key: entry.icon.key.clone(),
                category: entry.icon.category.clone(),
            };
            table.insert(
                icon.key.clone(),
                SvgEntry {
                    path_data: primary,
                    svg_code: render_icon(&paths),
                    path_data_all: paths,
                },
            );

            match positions.get(&icon.key) {
                Some(&at) => {
                    tracing::warn!(
                        "Key '{}' from batch {} replaces node {}",
                        icon.key,
                        batch.batch,
                        icons[at].id
                    );
                    report.overwritten += 1;
                    icons[at] = icon;
                }
                None => {
                    positions.insert(icon.key.clone(), icons.len());
                    icons.push(icon);
                }
            }
        }
    }

    let categories: Vec<String> = icons
        .iter()
        .map(|icon| icon.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    report.merged = table.len();

    Assembled {
        metadata: MergedMetadata {
            source: manifest.source.clone(),
            exported_at: manifest.exported_at,
            total: icons.len(),
            categories,
            icons,
        },
        table,
        report,
    }
}

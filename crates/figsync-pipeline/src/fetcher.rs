//! Batch image fetching.

use figsync_api::{FigmaApi, ImageRequest, NodeId};
use figsync_svg::extract_paths;

use crate::artifacts::{BatchEntry, BatchFile, IconNode, NO_IMAGE_URL};

/// Fetches rendered SVGs for one batch of icons at a time.
///
/// All requests are issued sequentially, in list order.
pub struct BatchFetcher<'a, A: FigmaApi + ?Sized> {
    api: &'a A,
    file_key: &'a str,
}

impl<'a, A: FigmaApi + ?Sized> BatchFetcher<'a, A> {
    /// Create a fetcher for icons of `file_key`.
    pub fn new(api: &'a A, file_key: &'a str) -> Self {
        Self { api, file_key }
    }

    /// Fetch one batch.
    ///
    /// Failures never escape: a failed image-URL request marks every icon of
    /// the batch with the same error, and per-icon failures only mark that
    /// icon.
    pub async fn fetch(
        &self,
        batch: usize,
        total_batches: usize,
        icons: &[IconNode],
    ) -> BatchFile {
        let ids: Vec<NodeId> = icons.iter().map(|i| i.id.clone()).collect();

        let entries = match self
            .api
            .image_urls(self.file_key, &ids, ImageRequest::svg())
            .await
        {
            Ok(urls) => {
                let mut entries = Vec::with_capacity(icons.len());
                for icon in icons {
                    let entry = match urls.get(&icon.id) {
                        Some(url) => self.fetch_icon(icon, url).await,
                        None => {
                            tracing::debug!("No image URL for {} ({})", icon.name, icon.id);
                            BatchEntry::failed(icon.clone(), NO_IMAGE_URL)
                        }
                    };
                    entries.push(entry);
                }
                entries
            }
            Err(e) => {
                tracing::warn!("Batch {}/{} image request failed: {}", batch, total_batches, e);
                let message = format!("Batch request failed: {}", e);
                icons
                    .iter()
                    .map(|icon| BatchEntry::failed(icon.clone(), message.clone()))
                    .collect()
            }
        };

        BatchFile {
            batch,
            total_batches,
            icons: entries,
        }
    }

    async fn fetch_icon(&self, icon: &IconNode, url: &str) -> BatchEntry {
        match self.api.download_text(url).await {
            Ok(svg) => {
                let paths = extract_paths(&svg);
                if paths.is_empty() {
                    tracing::debug!("No drawable paths in {} ({})", icon.name, icon.id);
                }
                BatchEntry::extracted(icon.clone(), paths)
            }
            Err(e) => {
                tracing::warn!("Failed to download SVG for {}: {}", icon.name, e);
                BatchEntry::failed(icon.clone(), format!("SVG download failed: {}", e))
            }
        }
    }
}

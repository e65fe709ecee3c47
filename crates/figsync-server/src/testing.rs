//! Stub Figma API for handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use figsync_api::{ApiError, FigmaApi, ImageRequest, ImageUrls, Node, NodeId};

#[derive(Debug, Default)]
pub(crate) struct StubApi {
    tree: Option<Node>,
    images: HashMap<NodeId, String>,
    listings: AtomicUsize,
}

impl StubApi {
    pub(crate) fn with_tree(tree: Node) -> Self {
        Self {
            tree: Some(tree),
            ..Default::default()
        }
    }

    /// Render `node` as `body`.
    pub(crate) fn image(mut self, node: &str, body: &str) -> Self {
        self.images.insert(id(node), body.to_string());
        self
    }

    pub(crate) fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FigmaApi for StubApi {
    async fn file_nodes(
        &self,
        _file_key: &str,
        node_id: &NodeId,
        _depth: Option<u32>,
    ) -> Result<Node, ApiError> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        self.tree
            .as_ref()
            .filter(|tree| &tree.id == node_id)
            .cloned()
            .ok_or_else(|| ApiError::NodeNotFound(node_id.to_string()))
    }

    async fn image_urls(
        &self,
        _file_key: &str,
        ids: &[NodeId],
        request: ImageRequest,
    ) -> Result<ImageUrls, ApiError> {
        Ok(ids
            .iter()
            .filter(|id| self.images.contains_key(*id))
            .map(|id| (id.clone(), format!("stub://{}/{}", request.format.as_str(), id)))
            .collect())
    }

    async fn download_text(&self, url: &str) -> Result<String, ApiError> {
        let node = url
            .rsplit('/')
            .next()
            .and_then(|raw| NodeId::parse(raw).ok());
        node.and_then(|node| self.images.get(&node).cloned())
            .ok_or_else(|| ApiError::Status {
                status: 404,
                url: url.to_string(),
            })
    }

    async fn download_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.download_text(url).await.map(String::into_bytes)
    }
}

pub(crate) fn id(raw: &str) -> NodeId {
    NodeId::parse(raw).unwrap()
}

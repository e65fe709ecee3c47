//! In-memory Figma API for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use figsync_api::{ApiError, FigmaApi, ImageRequest, ImageUrls, Node, NodeId, NodeKind};

use crate::artifacts::IconNode;
use crate::slug::slugify;

/// What the fake returns when an icon's SVG is downloaded.
#[derive(Debug, Clone)]
pub(crate) enum FakeSvg {
    Markup(String),
    DownloadError(ApiError),
}

#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    tree: Option<Node>,
    svgs: HashMap<NodeId, FakeSvg>,
    failing: HashSet<NodeId>,
    image_calls: AtomicUsize,
    downloads: AtomicUsize,
}

impl FakeApi {
    pub(crate) fn with_tree(tree: Node) -> Self {
        Self {
            tree: Some(tree),
            ..Default::default()
        }
    }

    /// A frame of `n` components, each rendering to a single path.
    pub(crate) fn with_icons(n: usize) -> Self {
        let children = (1..=n)
            .map(|i| {
                Node::leaf(
                    id(&format!("1:{}", i)),
                    format!("icon-{}", i),
                    NodeKind::Component,
                )
            })
            .collect();
        let frame = Node::leaf(id("0:1"), "Icons", NodeKind::Frame).with_children(children);
        let mut api = Self::with_tree(frame);
        for i in 1..=n {
            api.svg(
                &format!("1:{}", i),
                FakeSvg::Markup(svg_with_paths(&[&format!("M{} 0h1", i)])),
            );
        }
        api
    }

    pub(crate) fn svg(&mut self, node: &str, svg: FakeSvg) {
        self.svgs.insert(id(node), svg);
    }

    /// Fail any image request that includes `node`.
    pub(crate) fn fail_images_containing(&mut self, node: NodeId) {
        self.failing.insert(node);
    }

    pub(crate) fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FigmaApi for FakeApi {
    async fn file_nodes(
        &self,
        _file_key: &str,
        node_id: &NodeId,
        _depth: Option<u32>,
    ) -> Result<Node, ApiError> {
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
        _request: ImageRequest,
    ) -> Result<ImageUrls, ApiError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);

        if ids.iter().any(|id| self.failing.contains(id)) {
            return Err(ApiError::Status {
                status: 429,
                url: "fake://images".to_string(),
            });
        }

        Ok(ids
            .iter()
            .filter(|id| self.svgs.contains_key(*id))
            .map(|id| (id.clone(), format!("fake://{}", id)))
            .collect())
    }

    async fn download_text(&self, url: &str) -> Result<String, ApiError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);

        let node = url
            .strip_prefix("fake://")
            .and_then(|raw| NodeId::parse(raw).ok());
        match node.and_then(|node| self.svgs.get(&node)) {
            Some(FakeSvg::Markup(svg)) => Ok(svg.clone()),
            Some(FakeSvg::DownloadError(e)) => Err(e.clone()),
            None => Err(ApiError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }

    async fn download_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.download_text(url).await.map(String::into_bytes)
    }
}

pub(crate) fn id(raw: &str) -> NodeId {
    NodeId::parse(raw).unwrap()
}

pub(crate) fn icon(raw_id: &str, name: &str) -> IconNode {
    IconNode {
        id: id(raw_id),
        name: name.to_string(),
        key: slugify(name),
        kind: NodeKind::Component,
        category: "icons".to_string(),
    }
}

/// An SVG as Figma renders it, with one `<path>` per geometry.
pub(crate) fn svg_with_paths(paths: &[&str]) -> String {
    let mut svg = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- exported -->\n<svg width=\"24\" height=\"24\" viewBox=\"0 0 24 24\" fill=\"none\" xmlns=\"http://www.w3.org/2000/svg\">\n",
    );
    for d in paths {
        svg.push_str(&format!("<path d=\"{}\" fill=\"#111111\"/>\n", d));
    }
    svg.push_str("</svg>\n");
    svg
}

//! Trait definitions for Figma API access.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::node_id::NodeId;
use crate::types::Node;

/// Output format of rendered images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    /// Value of the `format` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    /// MIME type of rendered images in this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
        }
    }

    /// Parse a format name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Parameters for an image render request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageRequest {
    pub format: ImageFormat,

    /// Scale factor, only meaningful for raster formats
    pub scale: Option<f32>,
}

impl ImageRequest {
    /// An SVG render request.
    pub fn svg() -> Self {
        Self::default()
    }
}

/// Rendered image URLs by node id.
///
/// Nodes Figma could not render are absent.
pub type ImageUrls = HashMap<NodeId, String>;

/// Errors that can occur when talking to the Figma API.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Figma API error: {0}")]
    Remote(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),
}

/// Access to the parts of the Figma API the pipeline uses.
#[async_trait]
pub trait FigmaApi: Send + Sync {
    /// Fetch the subtree rooted at `node_id`, truncated at `depth` levels.
    async fn file_nodes(
        &self,
        file_key: &str,
        node_id: &NodeId,
        depth: Option<u32>,
    ) -> Result<Node, ApiError>;

    /// Request rendered image URLs for a set of nodes in one call.
    async fn image_urls(
        &self,
        file_key: &str,
        ids: &[NodeId],
        request: ImageRequest,
    ) -> Result<ImageUrls, ApiError>;

    /// Download a rendered image as text (SVG markup).
    async fn download_text(&self, url: &str) -> Result<String, ApiError>;

    /// Download a rendered image as raw bytes.
    async fn download_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

//! HTTP implementation of [`FigmaApi`].

use std::time::Duration;

use async_trait::async_trait;

use crate::node_id::NodeId;
use crate::traits::{ApiError, FigmaApi, ImageRequest, ImageUrls};
use crate::types::{FileNodesResponse, ImagesResponse, Node};

/// Public Figma API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.figma.com";

/// Environment variable holding the personal access token.
pub const TOKEN_ENV: &str = "FIGMA_ACCESS_TOKEN";

const TOKEN_HEADER: &str = "X-Figma-Token";

/// Configuration for [`FigmaClient`].
#[derive(Debug, Clone)]
pub struct FigmaClientConfig {
    /// Personal access token; requests go out unauthenticated without one
    pub token: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Per-request timeout; the HTTP client's default when unset
    pub timeout: Option<Duration>,
}

impl Default for FigmaClientConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl FigmaClientConfig {
    /// Default configuration with the token read from [`TOKEN_ENV`].
    pub fn from_env() -> Self {
        Self {
            token: std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty()),
            ..Default::default()
        }
    }
}

/// Figma REST client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl FigmaClient {
    /// Create a new client.
    pub fn new(config: FigmaClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("figsync/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            token: config.token,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Whether requests carry an access token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn api_get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl FigmaApi for FigmaClient {
    async fn file_nodes(
        &self,
        file_key: &str,
        node_id: &NodeId,
        depth: Option<u32>,
    ) -> Result<Node, ApiError> {
        let mut request = self
            .api_get(&format!("/v1/files/{}/nodes", file_key))
            .query(&[("ids", node_id.as_str())]);
        if let Some(depth) = depth {
            request = request.query(&[("depth", depth)]);
        }

        tracing::debug!("Listing node {} in file {}", node_id, file_key);

        let body: FileNodesResponse = Self::send(request)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        select_node(body, node_id)
    }

    async fn image_urls(
        &self,
        file_key: &str,
        ids: &[NodeId],
        request: ImageRequest,
    ) -> Result<ImageUrls, ApiError> {
        let joined = ids
            .iter()
            .map(NodeId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let mut builder = self
            .api_get(&format!("/v1/images/{}", file_key))
            .query(&[("ids", joined.as_str()), ("format", request.format.as_str())]);
        if let Some(scale) = request.scale {
            builder = builder.query(&[("scale", scale)]);
        }

        tracing::debug!("Requesting {} image URLs from file {}", ids.len(), file_key);

        let body: ImagesResponse = Self::send(builder)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        collect_urls(body)
    }

    async fn download_text(&self, url: &str) -> Result<String, ApiError> {
        Self::send(self.http.get(url))
            .await?
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn download_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let bytes = Self::send(self.http.get(url))
            .await?
            .bytes()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Pick the requested node out of a nodes response.
fn select_node(mut body: FileNodesResponse, node_id: &NodeId) -> Result<Node, ApiError> {
    if let Some(entry) = body.nodes.remove(node_id.as_str()) {
        return entry
            .map(|doc| doc.document)
            .ok_or_else(|| ApiError::NodeNotFound(node_id.to_string()));
    }

    // Figma echoes ids in API form, but tolerate a single differently-keyed entry
    if body.nodes.len() == 1 {
        if let Some(Some(doc)) = body.nodes.into_values().next() {
            return Ok(doc.document);
        }
    }

    Err(ApiError::NodeNotFound(node_id.to_string()))
}

/// Turn an images response into a URL map, dropping unrendered nodes.
fn collect_urls(body: ImagesResponse) -> Result<ImageUrls, ApiError> {
    if let Some(err) = body.err {
        return Err(ApiError::Remote(err));
    }

    let mut urls = ImageUrls::new();
    for (id, url) in body.images {
        let Some(url) = url else { continue };
        match NodeId::parse(&id) {
            Ok(id) => {
                urls.insert(id, url);
            }
            Err(e) => tracing::warn!("Ignoring image for malformed node id {:?}: {}", id, e),
        }
    }

    Ok(urls)
}

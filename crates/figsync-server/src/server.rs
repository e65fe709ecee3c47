//! Asset server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::Method,
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use figsync_api::{ApiError, FigmaApi, ImageFormat, ImageRequest, NodeId, NodeIdError};
use figsync_pipeline::IconLibrary;

use crate::placeholder::{asset_response, placeholder_response};
use crate::resolver::AssetResolver;

/// Configuration for the asset server.
#[derive(Debug, Clone)]
pub struct AssetServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// File key used when a request does not name one
    pub file_key: Option<String>,
}

impl Default for AssetServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4100,
            file_key: None,
        }
    }
}

/// Errors that can occur serving assets.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid node id: {0}")]
    InvalidNodeId(#[from] NodeIdError),

    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("No file key in request or server config")]
    MissingFileKey,

    #[error("No asset named {name:?} in container {container}")]
    UnknownAsset { name: String, container: String },

    #[error("Figma returned no image for node {0}")]
    NoImage(String),

    #[error("Unsupported image format: {0}")]
    UnknownFormat(String),

    #[error("Unknown icon: {0}")]
    UnknownIcon(String),
}

/// Shared handler state.
pub(crate) struct AppState {
    api: Arc<dyn FigmaApi>,
    file_key: Option<String>,
    resolver: AssetResolver,
    library: Arc<IconLibrary>,
}

impl AppState {
    pub(crate) fn new(
        api: Arc<dyn FigmaApi>,
        file_key: Option<String>,
        library: Arc<IconLibrary>,
    ) -> Self {
        Self {
            api,
            file_key,
            resolver: AssetResolver::new(),
            library,
        }
    }

    fn file_key<'a>(&'a self, requested: &'a Option<String>) -> Result<&'a str, ServerError> {
        requested
            .as_deref()
            .or(self.file_key.as_deref())
            .filter(|k| !k.is_empty())
            .ok_or(ServerError::MissingFileKey)
    }

    /// Render one node and download the result.
    async fn render(
        &self,
        file_key: &str,
        node: &NodeId,
        request: ImageRequest,
    ) -> Result<Vec<u8>, ServerError> {
        let urls = self
            .api
            .image_urls(file_key, std::slice::from_ref(node), request)
            .await?;
        let url = urls
            .get(node)
            .ok_or_else(|| ServerError::NoImage(node.to_string()))?;

        match request.format {
            ImageFormat::Svg => Ok(self.api.download_text(url).await?.into_bytes()),
            ImageFormat::Png => Ok(self.api.download_bytes(url).await?),
        }
    }
}

/// Query of `/api/figma-icon`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IconQuery {
    node_id: Option<String>,
    file_key: Option<String>,
}

/// Query of `/api/figma-asset`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssetQuery {
    node_id: Option<String>,
    name: Option<String>,
    container_id: Option<String>,
    file_key: Option<String>,
    format: Option<String>,
    scale: Option<f32>,
}

/// Asset server.
pub struct AssetServer {
    config: AssetServerConfig,
    state: Arc<AppState>,
}

impl AssetServer {
    /// Create a new asset server.
    pub fn new(config: AssetServerConfig, api: Arc<dyn FigmaApi>, library: IconLibrary) -> Self {
        let state = Arc::new(AppState::new(
            api,
            config.file_key.clone(),
            Arc::new(library),
        ));
        Self { config, state }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET]);

        Router::new()
            .route("/api/figma-icon", get(icon_handler))
            .route("/api/figma-asset", get(asset_handler))
            .route("/icons/{key}", get(library_handler))
            .layer(cors)
            .with_state(Arc::clone(&self.state))
    }

    /// Start serving.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress(e.to_string()))?;

        let app = self.router();

        tracing::info!("Serving assets at http://{}", addr);
        tracing::info!("Icon library: {} icons", self.state.library.len());

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Handler for `/api/figma-icon`: rendered SVG of a node.
pub(crate) async fn icon_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IconQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query.inspect_err(|e| tracing::warn!("Bad icon query: {}", e)) else {
        return placeholder_response();
    };

    match serve_icon(&state, &query).await {
        Ok(svg) => asset_response(ImageFormat::Svg.content_type(), svg),
        Err(e) => {
            tracing::warn!("Icon request failed: {}", e);
            placeholder_response()
        }
    }
}

async fn serve_icon(state: &AppState, query: &IconQuery) -> Result<Vec<u8>, ServerError> {
    let raw = query
        .node_id
        .as_deref()
        .ok_or(ServerError::MissingParameter("nodeId"))?;
    let node = NodeId::parse(raw)?;
    let file_key = state.file_key(&query.file_key)?;

    state.render(file_key, &node, ImageRequest::svg()).await
}

/// Handler for `/api/figma-asset`: rendered asset by node id or by name.
pub(crate) async fn asset_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AssetQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query.inspect_err(|e| tracing::warn!("Bad asset query: {}", e)) else {
        return placeholder_response();
    };

    match serve_asset(&state, &query).await {
        Ok((format, body)) => asset_response(format.content_type(), body),
        Err(e) => {
            tracing::warn!("Asset request failed: {}", e);
            placeholder_response()
        }
    }
}

async fn serve_asset(
    state: &AppState,
    query: &AssetQuery,
) -> Result<(ImageFormat, Vec<u8>), ServerError> {
    let file_key = state.file_key(&query.file_key)?;

    let format = match query.format.as_deref() {
        Some(name) => ImageFormat::from_name(name)
            .ok_or_else(|| ServerError::UnknownFormat(name.to_string()))?,
        None => ImageFormat::Svg,
    };

    let node = match (&query.node_id, &query.name) {
        (Some(raw), _) => NodeId::parse(raw)?,
        (None, Some(name)) => {
            let container = query
                .container_id
                .as_deref()
                .ok_or(ServerError::MissingParameter("containerId"))?;
            let container = NodeId::parse(container)?;
            state
                .resolver
                .resolve(state.api.as_ref(), file_key, &container, name)
                .await?
        }
        (None, None) => return Err(ServerError::MissingParameter("nodeId or name")),
    };

    let request = ImageRequest {
        format,
        scale: query.scale,
    };
    let body = state.render(file_key, &node, request).await?;

    Ok((format, body))
}

/// Handler for `/icons/{key}`: icon markup from the merged library.
pub(crate) async fn library_handler(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Response {
    let key = key.strip_suffix(".svg").unwrap_or(&key);

    match state.library.get(key) {
        Some(entry) => asset_response(
            ImageFormat::Svg.content_type(),
            entry.svg_code.clone().into_bytes(),
        ),
        None => {
            tracing::warn!("{}", ServerError::UnknownIcon(key.to_string()));
            placeholder_response()
        }
    }
}

//! Minimal Figma REST client.
//!
//! Covers the three calls the sync pipeline and asset server need: listing a
//! node subtree, requesting rendered image URLs for a set of nodes, and
//! downloading the rendered images.

pub mod client;
pub mod node_id;
pub mod traits;
pub mod types;

pub use client::{FigmaClient, FigmaClientConfig, DEFAULT_BASE_URL, TOKEN_ENV};
pub use node_id::{NodeId, NodeIdError};
pub use traits::{ApiError, FigmaApi, ImageFormat, ImageRequest, ImageUrls};
pub use types::{Node, NodeKind};

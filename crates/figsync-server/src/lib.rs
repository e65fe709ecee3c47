//! Asset server for Figma-rendered icons and logos.
//!
//! Serves rendered SVG/PNG assets straight from the Figma API, plus icons
//! from a merged icon library. Every failure degrades to a placeholder
//! graphic so consuming pages never render a broken image.

pub mod placeholder;
pub mod resolver;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;

pub use placeholder::{placeholder_response, PLACEHOLDER_SVG};
pub use resolver::AssetResolver;
pub use server::{AssetServer, AssetServerConfig, ServerError};

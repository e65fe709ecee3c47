//! Fallback graphic served when an asset cannot be produced.

use axum::http::header;
use axum::response::{IntoResponse, Response};

/// Neutral placeholder icon.
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none"><rect x="2" y="2" width="20" height="20" rx="4" fill="#E5E7EB"/><path d="M8 12h8M12 8v8" stroke="#9CA3AF" stroke-width="2" stroke-linecap="round"/></svg>"##;

/// Cache policy for real assets.
pub(crate) const ASSET_CACHE_CONTROL: &str = "public, max-age=86400, stale-while-revalidate=604800";

/// Cache policy for the placeholder, kept short so a recovered asset shows up.
pub(crate) const PLACEHOLDER_CACHE_CONTROL: &str = "public, max-age=60";

/// Respond with the placeholder graphic.
pub fn placeholder_response() -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, PLACEHOLDER_CACHE_CONTROL),
        ],
        PLACEHOLDER_SVG,
    )
        .into_response()
}

/// Respond with a rendered asset.
pub(crate) fn asset_response(content_type: &'static str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, ASSET_CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}

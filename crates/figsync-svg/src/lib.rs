//! SVG path extraction and icon markup synthesis.
//!
//! This crate pulls drawable path geometry out of rendered SVG documents and
//! rebuilds minimal, recolorable icon markup from that geometry.

pub mod extract;
pub mod render;

pub use extract::{extract_paths, strip_metadata, PathData};
pub use render::{render_icon, ICON_SIZE};

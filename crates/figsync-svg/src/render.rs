//! Icon markup synthesis.

/// Canvas size of synthesized icons, in user units.
pub const ICON_SIZE: u32 = 24;

/// Build a self-contained SVG document from ordered path geometry.
///
/// Each geometry string becomes its own `<path>` element, in order, filled
/// with `currentColor` so consumers can recolor the icon through CSS.
pub fn render_icon<S: AsRef<str>>(paths: &[S]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}" fill="none">"#,
        size = ICON_SIZE
    );

    for d in paths {
        svg.push_str(r#"<path d=""#);
        svg.push_str(&escape_attribute(d.as_ref()));
        svg.push_str(r#"" fill="currentColor"/>"#);
    }

    svg.push_str("</svg>");
    svg
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

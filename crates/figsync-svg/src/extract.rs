//! Path geometry extraction from rendered SVG documents.

use std::sync::LazyLock;

use regex::Regex;

/// Ordered path geometry extracted from one SVG document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathData {
    /// Every `d` attribute, in document order
    pub all: Vec<String>,
}

impl PathData {
    /// First path in the document.
    ///
    /// Kept for consumers that only understand single-path icons; prefer
    /// [`PathData::all`] when rebuilding markup.
    pub fn primary(&self) -> Option<&str> {
        self.all.first().map(String::as_str)
    }

    /// Whether the document had no drawable geometry.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Consume into `(primary, all)`.
    pub fn into_parts(self) -> (Option<String>, Vec<String>) {
        let primary = self.all.first().cloned();
        (primary, self.all)
    }
}

static PROCESSING_INSTRUCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<\?.*?\?>").expect("Invalid processing instruction regex"));

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex"));

static PATH_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<path\b([^>]*)>").expect("Invalid path element regex"));

static D_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)d\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid d attribute regex")
});

/// Remove XML processing instructions and comments.
pub fn strip_metadata(svg: &str) -> String {
    let without_pi = PROCESSING_INSTRUCTION.replace_all(svg, "");
    COMMENT.replace_all(&without_pi, "").into_owned()
}

/// Extract the geometry of every `<path>` element in document order.
///
/// Paths with an empty `d` are skipped. An SVG with no paths yields an
/// empty [`PathData`], which is a valid result rather than an error.
pub fn extract_paths(svg: &str) -> PathData {
    let cleaned = strip_metadata(svg);

    let all = PATH_ELEMENT
        .captures_iter(&cleaned)
        .filter_map(|caps| {
            let attrs = caps.get(1)?.as_str();
            let d = D_ATTRIBUTE.captures(attrs)?;
            let value = d.get(1).or_else(|| d.get(2))?.as_str();
            (!value.trim().is_empty()).then(|| unescape_attribute(value))
        })
        .collect();

    PathData { all }
}

/// Decode the predefined XML entities of an attribute value.
fn unescape_attribute(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

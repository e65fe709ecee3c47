//! Node identifier normalization.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A Figma node identifier in API form (`12:345`).
///
/// Figma shows ids in two textual forms: `12:345` in API payloads and
/// `12-345` in share URLs (sometimes percent-encoded as `12%3A345`). Every
/// form parses to the same `NodeId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

/// Errors that can occur when parsing a node id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NodeIdError {
    #[error("Node id is empty")]
    Empty,

    #[error("Node id contains whitespace: {0:?}")]
    Whitespace(String),
}

impl NodeId {
    /// Parse and normalize a node id from any of its textual forms.
    pub fn parse(raw: &str) -> Result<Self, NodeIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NodeIdError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(NodeIdError::Whitespace(trimmed.to_string()));
        }

        let decoded = trimmed
            .replace("%3A", ":")
            .replace("%3a", ":")
            .replace("%3B", ";")
            .replace("%3b", ";");

        Ok(Self(decoded.replace('-', ":")))
    }

    /// The API form of the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The URL form of the id (`12-345`).
    pub fn to_url_form(&self) -> String {
        self.0.replace(':', "-")
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

//! Wire types for the Figma REST API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::node_id::NodeId;

/// Kind of a node in the design tree.
///
/// Only the kinds the pipeline cares about are named; everything else
/// deserializes as [`NodeKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Vector,
    BooleanOperation,
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Leaf kinds exported as icons.
    pub fn is_icon(&self) -> bool {
        matches!(self, Self::Component | Self::Instance)
    }

    /// Kinds whose name becomes the category of their descendants.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Frame | Self::Group | Self::Section)
    }
}

/// A node in the design tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Node {
    pub id: NodeId,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: NodeKind,

    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node without children.
    pub fn leaf(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// Attach children to this node.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

/// Response of `GET /v1/files/:key/nodes`.
#[derive(Debug, Deserialize)]
pub(crate) struct FileNodesResponse {
    #[serde(default)]
    pub nodes: HashMap<String, Option<NodeDocument>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeDocument {
    pub document: Node,
}

/// Response of `GET /v1/images/:key`.
#[derive(Debug, Deserialize)]
pub(crate) struct ImagesResponse {
    #[serde(default)]
    pub err: Option<String>,

    #[serde(default)]
    pub images: HashMap<String, Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_node_tree() {
        let json = r#"{
            "id": "1:2",
            "name": "Icons",
            "type": "FRAME",
            "children": [
                { "id": "1:3", "name": "arrow-left", "type": "COMPONENT" },
                { "id": "1:4", "name": "Sticker", "type": "STICKY" }
            ]
        }"#;

        let node: Node = serde_json::from_str(json).unwrap();

        assert_eq!(node.kind, NodeKind::Frame);
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].kind, NodeKind::Component);
        assert_eq!(node.children[1].kind, NodeKind::Other);
    }

    #[test]
    fn classifies_kinds() {
        assert!(NodeKind::Component.is_icon());
        assert!(NodeKind::Instance.is_icon());
        assert!(!NodeKind::Frame.is_icon());

        assert!(NodeKind::Group.is_container());
        assert!(NodeKind::Section.is_container());
        assert!(!NodeKind::ComponentSet.is_container());
    }

    #[test]
    fn serializes_kind_in_api_casing() {
        let json = serde_json::to_string(&NodeKind::Instance).unwrap();
        assert_eq!(json, "\"INSTANCE\"");
    }

    #[test]
    fn deserializes_images_with_null_urls() {
        let json = r#"{"err":null,"images":{"1:2":"https://x/1.svg","1:3":null}}"#;

        let response: ImagesResponse = serde_json::from_str(json).unwrap();

        assert!(response.err.is_none());
        assert_eq!(response.images.len(), 2);
        assert!(response.images["1:3"].is_none());
    }
}

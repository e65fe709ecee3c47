//! Node listing: flatten a design subtree into icons.

use figsync_api::{ApiError, FigmaApi, Node, NodeId};

use crate::artifacts::{IconNode, Manifest, Source};
use crate::slug::{slugify, KeyAllocator, DEFAULT_CATEGORY};

/// Traversal depth used when none is configured.
pub const DEFAULT_DEPTH: u32 = 10;

/// Collect the icons under `node`, depth-first.
///
/// `category` is the category inherited from the caller. Container nodes
/// replace it for their own descendants only; icons are not descended into.
/// Keys are plain slugs here and may collide; [`NodeLister`] makes them
/// unique.
pub fn collect_icons(node: &Node, category: &str) -> Vec<IconNode> {
    if node.kind.is_icon() {
        return vec![IconNode {
            id: node.id.clone(),
            name: node.name.clone(),
            key: slugify(&node.name),
            kind: node.kind,
            category: category.to_string(),
        }];
    }

    let category = if node.kind.is_container() {
        slugify(&node.name)
    } else {
        category.to_string()
    };

    node.children
        .iter()
        .flat_map(|child| collect_icons(child, &category))
        .collect()
}

/// Lists the icons under a root node and builds the manifest.
pub struct NodeLister<'a, A: FigmaApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: FigmaApi + ?Sized> NodeLister<'a, A> {
    /// Create a lister over the given API.
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Fetch the subtree and flatten it into a manifest.
    ///
    /// Any failure aborts the listing; no partial manifest is produced.
    pub async fn list(
        &self,
        file_key: &str,
        root: &NodeId,
        depth: u32,
    ) -> Result<Manifest, ApiError> {
        tracing::info!(
            "Listing icons under node {} of file {} (depth {})",
            root,
            file_key,
            depth
        );

        let tree = self.api.file_nodes(file_key, root, Some(depth)).await?;

        let mut keys = KeyAllocator::new();
        let icons: Vec<IconNode> = collect_icons(&tree, DEFAULT_CATEGORY)
            .into_iter()
            .map(|mut icon| {
                icon.key = keys.allocate(&icon.name);
                icon
            })
            .collect();

        tracing::info!("Found {} icons", icons.len());

        Ok(Manifest::new(
            Source {
                file_id: file_key.to_string(),
                root_node_id: root.clone(),
                depth,
            },
            icons,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{id, FakeApi};
    use figsync_api::NodeKind;
    use pretty_assertions::assert_eq;

    fn frame(id_: &str, name: &str, children: Vec<Node>) -> Node {
        Node::leaf(id(id_), name, NodeKind::Frame).with_children(children)
    }

    fn component(id_: &str, name: &str) -> Node {
        Node::leaf(id(id_), name, NodeKind::Component)
    }

    #[test]
    fn uses_nearest_container_as_category() {
        let tree = frame(
            "1:1",
            "nav",
            vec![frame("1:2", "layout", vec![component("1:3", "grid-01")])],
        );

        let icons = collect_icons(&tree, DEFAULT_CATEGORY);

        assert_eq!(icons.len(), 1);
        assert_eq!(icons[0].name, "grid-01");
        assert_eq!(icons[0].category, "layout");
    }

    #[test]
    fn category_does_not_leak_to_siblings() {
        let tree = frame(
            "1:1",
            "Icons",
            vec![
                frame("1:2", "Arrows", vec![component("1:3", "Arrow Up")]),
                component("1:4", "Close"),
            ],
        );

        let icons = collect_icons(&tree, DEFAULT_CATEGORY);

        assert_eq!(icons[0].category, "arrows");
        assert_eq!(icons[1].category, "icons");
    }

    #[test]
    fn non_container_nodes_pass_category_through() {
        let tree = Node::leaf(id("0:1"), "Page 1", NodeKind::Canvas).with_children(vec![
            Node::leaf(id("0:2"), "Set", NodeKind::ComponentSet)
                .with_children(vec![component("0:3", "Size=16")]),
        ]);

        let icons = collect_icons(&tree, DEFAULT_CATEGORY);

        assert_eq!(icons[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn does_not_descend_into_icons() {
        let tree = frame(
            "1:1",
            "Icons",
            vec![component("1:2", "Star").with_children(vec![Node::leaf(
                id("1:3"),
                "inner",
                NodeKind::Instance,
            )])],
        );

        let icons = collect_icons(&tree, DEFAULT_CATEGORY);

        assert_eq!(icons.len(), 1);
        assert!(icons.iter().all(|i| i.kind.is_icon()));
    }

    #[tokio::test]
    async fn lists_manifest_with_unique_keys() {
        let tree = frame(
            "1:1",
            "Icons",
            vec![component("1:2", "Close"), component("1:3", "close")],
        );
        let api = FakeApi::with_tree(tree);

        let manifest = NodeLister::new(&api)
            .list("file", &id("1-1"), DEFAULT_DEPTH)
            .await
            .unwrap();

        assert_eq!(manifest.total, 2);
        assert_eq!(manifest.source.root_node_id, id("1:1"));
        assert_eq!(manifest.source.depth, DEFAULT_DEPTH);
        let keys: Vec<&str> = manifest.icons.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["close", "close-2"]);
    }

    #[tokio::test]
    async fn listing_failure_is_fatal() {
        let api = FakeApi::default();

        let result = NodeLister::new(&api).list("file", &id("1:1"), 4).await;

        assert!(matches!(result, Err(ApiError::NodeNotFound(_))));
    }
}

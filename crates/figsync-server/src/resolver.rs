//! Logical asset name resolution.
//!
//! Assets such as crypto logos are requested by name (`btc`) within a
//! container node. The container is listed once and its name-to-id map is
//! cached for the life of the process.

use std::collections::HashMap;

use tokio::sync::RwLock;

use figsync_api::{FigmaApi, Node, NodeId};

use crate::server::ServerError;

/// Depth used when listing a container for name lookup.
const CONTAINER_DEPTH: u32 = 3;

/// Resolves asset names to node ids, caching one map per container.
#[derive(Debug, Default)]
pub struct AssetResolver {
    cache: RwLock<HashMap<NodeId, HashMap<String, NodeId>>>,
}

impl AssetResolver {
    /// Create a resolver with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name` (case-insensitive) among the descendants of `container`.
    pub async fn resolve(
        &self,
        api: &dyn FigmaApi,
        file_key: &str,
        container: &NodeId,
        name: &str,
    ) -> Result<NodeId, ServerError> {
        let wanted = normalize(name);

        if let Some(names) = self.cache.read().await.get(container) {
            return lookup(names, &wanted, name, container);
        }

        let tree = api
            .file_nodes(file_key, container, Some(CONTAINER_DEPTH))
            .await?;
        let mut names = HashMap::new();
        index_names(&tree, &mut names);
        tracing::debug!("Cached {} asset names for container {}", names.len(), container);

        let result = lookup(&names, &wanted, name, container);
        self.cache.write().await.insert(container.clone(), names);
        result
    }

    /// Number of cached containers.
    pub async fn cached_containers(&self) -> usize {
        self.cache.read().await.len()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Index every descendant by name; the first node with a name wins.
fn index_names(node: &Node, names: &mut HashMap<String, NodeId>) {
    for child in &node.children {
        names
            .entry(normalize(&child.name))
            .or_insert_with(|| child.id.clone());
        index_names(child, names);
    }
}

fn lookup(
    names: &HashMap<String, NodeId>,
    wanted: &str,
    name: &str,
    container: &NodeId,
) -> Result<NodeId, ServerError> {
    names
        .get(wanted)
        .cloned()
        .ok_or_else(|| ServerError::UnknownAsset {
            name: name.to_string(),
            container: container.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{id, StubApi};
    use figsync_api::NodeKind;
    use pretty_assertions::assert_eq;

    fn logos() -> Node {
        Node::leaf(id("5:1"), "Logos", NodeKind::Frame).with_children(vec![
            Node::leaf(id("5:2"), "BTC", NodeKind::Component),
            Node::leaf(id("5:3"), "Stablecoins", NodeKind::Group)
                .with_children(vec![Node::leaf(id("5:4"), "USDC", NodeKind::Component)]),
        ])
    }

    #[tokio::test]
    async fn resolves_names_case_insensitively() {
        let api = StubApi::with_tree(logos());
        let resolver = AssetResolver::new();

        let btc = resolver
            .resolve(&api, "file", &id("5:1"), "btc")
            .await
            .unwrap();
        let usdc = resolver
            .resolve(&api, "file", &id("5-1"), " Usdc ")
            .await
            .unwrap();

        assert_eq!(btc, id("5:2"));
        assert_eq!(usdc, id("5:4"));
    }

    #[tokio::test]
    async fn lists_each_container_once() {
        let api = StubApi::with_tree(logos());
        let resolver = AssetResolver::new();

        for name in ["btc", "usdc", "missing"] {
            let _ = resolver.resolve(&api, "file", &id("5:1"), name).await;
        }

        assert_eq!(api.listings(), 1);
        assert_eq!(resolver.cached_containers().await, 1);
    }

    #[tokio::test]
    async fn unknown_name_is_an_error() {
        let api = StubApi::with_tree(logos());
        let resolver = AssetResolver::new();

        let result = resolver.resolve(&api, "file", &id("5:1"), "doge").await;

        assert!(matches!(result, Err(ServerError::UnknownAsset { .. })));
    }

    #[tokio::test]
    async fn listing_failures_are_not_cached() {
        let api = StubApi::default();
        let resolver = AssetResolver::new();

        let result = resolver.resolve(&api, "file", &id("5:1"), "btc").await;

        assert!(matches!(result, Err(ServerError::Api(_))));
        assert_eq!(resolver.cached_containers().await, 0);
    }
}

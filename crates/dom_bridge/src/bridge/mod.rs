//! The call surface: one method per operation, each taking handles and plain
//! values and returning handles, plain values or a sentinel.
//!
//! Every method follows the same shape. Resolve the handles it was given with
//! the capability it needs, hand the node ids to the engine, then wrap whatever
//! comes back in fresh handles. A handle that does not resolve produces the
//! method's sentinel: [`INVALID_HANDLE`] for handle results, `None` for
//! strings and `false` for predicates.

mod attributes;
mod content;
mod navigation;
mod nodes;
mod parsing;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::Error;
use css_selectors::SelectorCache;
use html::{DOM, NodeId, NodeKind, OutputSettings};

use crate::config::BridgeConfig;
use crate::registry::{Capability, Entry, Handle, HandleRegistry, INVALID_HANDLE};

/// A bridge shared between threads. Callers lock it for each call.
pub type SharedBridge = Arc<Mutex<Bridge>>;

/// Owns every parsed tree and every handle pointing into them.
#[derive(Debug)]
pub struct Bridge {
    registry: HandleRegistry,
    dom: DOM,
    selectors: SelectorCache,
    config: BridgeConfig,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        Self {
            registry: HandleRegistry::new(config.max_handles),
            dom: DOM::new(),
            selectors: SelectorCache::default(),
            config,
        }
    }

    /// A bridge configured from `DOM_BRIDGE_*` environment variables.
    pub fn from_env() -> Self {
        Self::with_config(BridgeConfig::from_env())
    }

    pub fn into_shared(self) -> SharedBridge {
        Arc::new(Mutex::new(self))
    }

    pub const fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Read access to the underlying trees.
    pub const fn dom(&self) -> &DOM {
        &self.dom
    }

    pub fn live_handles(&self) -> usize {
        self.registry.len()
    }

    /// Releases one handle. Once no live handle reaches into a tree, the
    /// tree is dropped from the arena.
    pub fn free(&mut self, handle: Handle) {
        if let Some(entry) = self.registry.free(handle) {
            self.sweep(entry.nodes());
        }
    }

    /// Releases every handle, drops every tree and restarts numbering at 1.
    pub fn release_all(&mut self) {
        self.registry.reset_all();
        self.dom.clear();
        self.selectors.clear();
    }

    /// Drops the trees holding `nodes` that no live handle reaches any more.
    fn sweep(&mut self, nodes: &[NodeId]) {
        let candidates: HashSet<NodeId> = nodes
            .iter()
            .filter_map(|node| self.dom.root(*node))
            .collect();
        if candidates.is_empty() {
            return;
        }
        let reachable: HashSet<NodeId> = self
            .registry
            .nodes()
            .filter_map(|node| self.dom.root(node))
            .collect();
        for root in candidates.difference(&reachable) {
            self.dom.remove_tree(*root);
        }
    }

    fn resolve(&self, handle: Handle, capability: Capability) -> Option<NodeId> {
        self.registry.resolve_node(handle, capability)
    }

    fn element(&self, handle: Handle) -> Option<NodeId> {
        self.resolve(handle, Capability::Element)
    }

    fn node(&self, handle: Handle) -> Option<NodeId> {
        self.resolve(handle, Capability::Node)
    }

    fn text_node(&self, handle: Handle) -> Option<NodeId> {
        self.resolve(handle, Capability::TextNode)
    }

    fn collection(&self, handle: Handle) -> Option<&[NodeId]> {
        self.registry.resolve_collection(handle)
    }

    /// Allocates a handle tagged after the kind of node `id` is.
    fn wrap(&mut self, id: NodeId) -> Handle {
        let entry = match self.dom.kind(id) {
            Some(NodeKind::Document) => Entry::Document(id),
            Some(NodeKind::Element { .. }) => Entry::Element(id),
            Some(NodeKind::Text { .. }) => Entry::TextNode(id),
            Some(_) => Entry::Node(id),
            None => return INVALID_HANDLE,
        };
        self.registry.allocate(entry)
    }

    fn wrap_optional(&mut self, id: Option<NodeId>) -> Handle {
        id.map_or(INVALID_HANDLE, |node| self.wrap(node))
    }

    fn wrap_collection(&mut self, nodes: Vec<NodeId>) -> Handle {
        self.registry.allocate(Entry::Collection(nodes))
    }

    fn output(&self) -> OutputSettings {
        self.config.output_settings()
    }
}

/// Logs an engine failure and turns it into `None`.
fn settle<T>(operation: &str, result: Result<T, Error>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::debug!("{operation} failed: {err:#}");
            None
        }
    }
}

/// Index into a sequence from a signed caller index.
fn at<T: Copy>(items: &[T], index: i32) -> Option<T> {
    usize::try_from(index)
        .ok()
        .and_then(|position| items.get(position).copied())
}

fn count(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_index_lookup() {
        let items = [10, 20, 30];
        assert_eq!(at(&items, 0), Some(10));
        assert_eq!(at(&items, 2), Some(30));
        assert_eq!(at(&items, 3), None);
        assert_eq!(at(&items, -1), None);
    }

    #[test]
    fn release_all_clears_trees_and_handles() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<p>x</p>", "");
        assert!(doc > 0);
        assert!(!bridge.dom().is_empty());
        bridge.release_all();
        bridge.release_all();
        assert_eq!(bridge.live_handles(), 0);
        assert!(bridge.dom().is_empty());
        assert_eq!(bridge.text(doc), None);
        assert_eq!(bridge.parse("<p>y</p>", ""), 1);
    }

    #[test]
    fn freeing_the_last_handle_drops_the_tree() {
        let mut bridge = Bridge::new();
        for _ in 0..50 {
            let doc = bridge.parse("<ul><li>a</li><li>b</li></ul>", "");
            bridge.free(doc);
        }
        assert_eq!(bridge.live_handles(), 0);
        assert!(bridge.dom().is_empty());
        assert!(bridge.dom().documents().is_empty());
    }

    #[test]
    fn aliases_keep_a_tree_alive() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<p>a</p><p>b</p>", "");
        let paragraphs = bridge.select(doc, "p");
        let size = bridge.dom().len();
        bridge.free(doc);
        assert_eq!(bridge.dom().len(), size);
        let second = bridge.get_at(paragraphs, 1);
        assert_eq!(bridge.text(second).as_deref(), Some("b"));
        bridge.free(paragraphs);
        assert_eq!(bridge.dom().len(), size);
        let body = bridge.parent(second);
        assert_eq!(bridge.tag_name(body).as_deref(), Some("body"));
        bridge.free(second);
        assert_eq!(bridge.dom().len(), size);
        bridge.free(body);
        assert!(bridge.dom().is_empty());
    }

    #[test]
    fn detached_nodes_go_with_their_handle() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<div><b>x</b></div>", "");
        let size = bridge.dom().len();
        let bold = bridge.select_first(doc, "b");
        bridge.remove_element(bold);
        assert_eq!(bridge.dom().len(), size);
        bridge.free(bold);
        assert_eq!(bridge.dom().len(), size - 2);
        let span = bridge.create_element("span");
        bridge.free(span);
        assert_eq!(bridge.dom().len(), size - 2);
    }

    #[test]
    fn wrap_tags_entries_by_node_kind() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<!-- c --><p>t</p>", "");
        let comment = bridge.child_node(doc, 0);
        assert_eq!(bridge.node_name(comment).as_deref(), Some("#comment"));
        assert!(bridge.registry.resolve(doc, Capability::Document).is_some());
        assert!(bridge.registry.resolve(comment, Capability::Node).is_some());
        assert!(bridge.registry.resolve(comment, Capability::Element).is_none());
        assert!(bridge.registry.resolve(comment, Capability::TextNode).is_none());
    }
}

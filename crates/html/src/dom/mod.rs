//! Arena-backed storage for every parsed document.
//!
//! All trees live in one [`Arena`]. Editing a tree only detaches nodes, so a
//! [`NodeId`] keeps pointing at the same node until its whole tree is dropped
//! with [`DOM::remove_tree`] or the arena is dropped with [`DOM::clear`].

pub mod printing;
pub mod text;
pub mod updating;
pub mod url;

use anyhow::{Error, anyhow};
use indextree::{Arena, Node};
use smallvec::SmallVec;

pub use indextree::NodeId;

/// Attributes of an element in source order.
pub type Attributes = SmallVec<(String, String), 4>;

/// Elements whose character content is stored as data nodes.
const DATA_ELEMENTS: [&str; 2] = ["script", "style"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Document,
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
    /// Raw payload of a `script` or `style` element.
    Data {
        data: String,
    },
    Comment {
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DOMNode {
    pub kind: NodeKind,
    pub attrs: Attributes,
    /// Base URI recorded on this node. Descendants inherit it.
    pub base_uri: Option<String>,
}

impl DOMNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: Attributes::new(),
            base_uri: None,
        }
    }

    pub fn node_name(&self) -> &str {
        match &self.kind {
            NodeKind::Document => "#document",
            NodeKind::Doctype { .. } => "#doctype",
            NodeKind::Element { tag } => tag,
            NodeKind::Text { .. } => "#text",
            NodeKind::Data { .. } => "#data",
            NodeKind::Comment { .. } => "#comment",
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    pub const fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub const fn is_document(&self) -> bool {
        matches!(self.kind, NodeKind::Document)
    }

    pub const fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// Attribute lookup, ignoring ASCII case of the key.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Default)]
pub struct DOM {
    dom: Arena<DOMNode>,
    documents: Vec<NodeId>,
}

impl DOM {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every tree. All previously issued ids become meaningless.
    pub fn clear(&mut self) {
        log::debug!(
            "Dropping {} nodes across {} documents",
            self.dom.live_count(),
            self.documents.len()
        );
        self.dom = Arena::new();
        self.documents.clear();
    }

    /// Number of nodes currently held in the arena.
    pub fn len(&self) -> usize {
        self.dom.live_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes the tree rooted at `root` from the arena. Every id inside it
    /// stops resolving.
    pub fn remove_tree(&mut self, root: NodeId) {
        if !self.contains(root) {
            return;
        }
        self.documents.retain(|document| *document != root);
        root.remove_subtree(&mut self.dom);
        log::trace!("Removed tree {root:?}, {} nodes left", self.len());
    }

    /// Document roots in creation order.
    pub fn documents(&self) -> &[NodeId] {
        &self.documents
    }

    pub fn get(&self, id: NodeId) -> Option<&DOMNode> {
        self.dom
            .get(id)
            .filter(|node| !node.is_removed())
            .map(Node::get)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut DOMNode> {
        self.dom
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(Node::get_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(DOMNode::node_name)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(DOMNode::tag)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(DOMNode::is_element)
    }

    pub fn is_document(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(DOMNode::is_document)
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(DOMNode::is_text)
    }

    /// True when the element stores its character content as data nodes.
    pub fn holds_data(&self, id: NodeId) -> bool {
        self.tag_name(id)
            .is_some_and(|tag| DATA_ELEMENTS.contains(&tag))
    }

    pub fn create_node(&mut self, node: DOMNode) -> NodeId {
        self.dom.new_node(node)
    }

    /// Creates an empty document root carrying `base_uri`.
    pub fn create_document(&mut self, base_uri: &str) -> NodeId {
        let id = self.dom.new_node(DOMNode {
            base_uri: Some(base_uri.to_owned()),
            ..DOMNode::default()
        });
        self.documents.push(id);
        id
    }

    /// Creates a detached element.
    ///
    /// # Errors
    /// Returns an error if `tag` is empty or is not a valid tag name.
    pub fn create_element(&mut self, tag: &str) -> Result<NodeId, Error> {
        let tag = normalize_tag(tag)?;
        Ok(self.create_node(DOMNode::new(NodeKind::Element { tag })))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create_node(DOMNode::new(NodeKind::Text {
            text: text.to_owned(),
        }))
    }

    pub fn create_data(&mut self, data: &str) -> NodeId {
        self.create_node(DOMNode::new(NodeKind::Data {
            data: data.to_owned(),
        }))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.create_node(DOMNode::new(NodeKind::Comment {
            text: text.to_owned(),
        }))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.dom
            .get(id)
            .filter(|node| !node.is_removed())
            .and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        id.children(&self.dom).collect()
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        id.children(&self.dom).count()
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        id.children(&self.dom).nth(index)
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .into_iter()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        id.following_siblings(&self.dom)
            .skip(1)
            .find(|sibling| self.is_element(*sibling))
    }

    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        id.preceding_siblings(&self.dom)
            .skip(1)
            .find(|sibling| self.is_element(*sibling))
    }

    /// Element siblings of `id`, excluding `id` itself.
    pub fn element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        self.element_children(parent)
            .into_iter()
            .filter(|sibling| *sibling != id)
            .collect()
    }

    /// `id` followed by all of its descendants in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        id.descendants(&self.dom).collect()
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        id.ancestors(&self.dom).collect()
    }

    /// Topmost ancestor of `id`: a document, or the head of a detached tree.
    pub fn root(&self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        id.ancestors(&self.dom).last()
    }

    /// First element named `tag` inside `scope`, in document order.
    pub fn find_element(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        if !self.contains(scope) {
            return None;
        }
        scope
            .descendants(&self.dom)
            .find(|node| self.tag_name(*node) == Some(tag))
    }
}

/// Trims and lowercases a tag name, rejecting names no parser would produce.
///
/// # Errors
/// Returns an error if the name is empty or contains markup characters.
pub fn normalize_tag(tag: &str) -> Result<String, Error> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Tag name must not be empty"));
    }
    if let Some(bad) = trimmed.chars().find(|&ch| {
        ch.is_whitespace() || ch.is_control() || matches!(ch, '<' | '>' | '/' | '=' | '"' | '\'')
    }) {
        return Err(anyhow!("Invalid character {bad:?} in tag name {trimmed:?}"));
    }
    Ok(trimmed.to_ascii_lowercase())
}

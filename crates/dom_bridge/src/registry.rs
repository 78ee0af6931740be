//! Integer handles for engine objects.
//!
//! The registry is the only place a handle is turned back into a node id or a
//! node collection. Handles are minted from a monotonic counter and are never
//! recycled, so a freed handle stays dead until [`HandleRegistry::reset_all`]
//! rewinds the numbering.

use core::slice;
use std::collections::HashMap;

use html::NodeId;

/// Opaque reference handed across the boundary.
pub type Handle = i64;

/// Returned wherever an operation has no handle to give back.
pub const INVALID_HANDLE: Handle = -1;

const FIRST_HANDLE: Handle = 1;

/// Object stored behind a handle, tagged with what it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Document(NodeId),
    Element(NodeId),
    TextNode(NodeId),
    /// Any other node kind: comments, doctypes, script data.
    Node(NodeId),
    /// Ordered element references.
    Collection(Vec<NodeId>),
}

/// What a caller needs the resolved object to be able to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Node,
    Element,
    TextNode,
    Document,
    NodeCollection,
}

impl Entry {
    pub const fn node(&self) -> Option<NodeId> {
        match self {
            Self::Document(id) | Self::Element(id) | Self::TextNode(id) | Self::Node(id) => {
                Some(*id)
            }
            Self::Collection(_) => None,
        }
    }

    /// Every node the entry refers to.
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            Self::Document(id) | Self::Element(id) | Self::TextNode(id) | Self::Node(id) => {
                slice::from_ref(id)
            }
            Self::Collection(nodes) => nodes,
        }
    }

    /// A document can stand in for an element; a text node never can.
    pub const fn satisfies(&self, capability: Capability) -> bool {
        match capability {
            Capability::Node => !matches!(self, Self::Collection(_)),
            Capability::Element => matches!(self, Self::Element(_) | Self::Document(_)),
            Capability::TextNode => matches!(self, Self::TextNode(_)),
            Capability::Document => matches!(self, Self::Document(_)),
            Capability::NodeCollection => matches!(self, Self::Collection(_)),
        }
    }
}

#[derive(Debug)]
pub struct HandleRegistry {
    entries: HashMap<Handle, Entry>,
    next: Handle,
    /// Live handle count above which allocation starts warning.
    soft_limit: Option<usize>,
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HandleRegistry {
    pub fn new(soft_limit: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            next: FIRST_HANDLE,
            soft_limit,
        }
    }

    /// Stores `entry` under a fresh handle.
    ///
    /// Returns [`INVALID_HANDLE`] only once the counter has run out, in which
    /// case nothing is stored.
    pub fn allocate(&mut self, entry: Entry) -> Handle {
        let handle = self.next;
        let Some(next) = handle.checked_add(1) else {
            log::error!("Handle space exhausted; call release_all to start over");
            return INVALID_HANDLE;
        };
        self.next = next;
        if let Some(limit) = self.soft_limit.filter(|limit| self.entries.len() >= *limit) {
            log::warn!(
                "{} live handles exceed the configured limit of {limit}",
                self.entries.len() + 1
            );
        }
        log::trace!("Allocated handle {handle} for {entry:?}");
        self.entries.insert(handle, entry);
        handle
    }

    /// The entry behind `handle` if it satisfies `capability`.
    pub fn resolve(&self, handle: Handle, capability: Capability) -> Option<&Entry> {
        let found = self
            .entries
            .get(&handle)
            .filter(|entry| entry.satisfies(capability));
        if found.is_none() {
            log::debug!("Handle {handle} does not resolve as {capability:?}");
        }
        found
    }

    pub fn resolve_node(&self, handle: Handle, capability: Capability) -> Option<NodeId> {
        self.resolve(handle, capability).and_then(Entry::node)
    }

    pub fn resolve_collection(&self, handle: Handle) -> Option<&[NodeId]> {
        match self.resolve(handle, Capability::NodeCollection)? {
            Entry::Collection(nodes) => Some(nodes),
            _ => None,
        }
    }

    /// Drops one entry and hands it back. Unknown handles are ignored.
    pub fn free(&mut self, handle: Handle) -> Option<Entry> {
        let entry = self.entries.remove(&handle)?;
        log::trace!("Freed handle {handle}");
        Some(entry)
    }

    /// Every node some live handle refers to, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries
            .values()
            .flat_map(|entry| entry.nodes().iter().copied())
    }

    /// Drops every entry and starts numbering again at 1.
    pub fn reset_all(&mut self) {
        log::debug!("Releasing {} live handles", self.entries.len());
        self.entries.clear();
        self.next = FIRST_HANDLE;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Element-level navigation and collection access.

use super::{Bridge, at, count};
use crate::registry::{Handle, INVALID_HANDLE};

impl Bridge {
    /// Parent element, or the document for a root element.
    pub fn parent(&mut self, handle: Handle) -> Handle {
        let parent = self.element(handle).and_then(|id| self.dom.parent(id));
        self.wrap_optional(parent)
    }

    /// Collection of the element children.
    pub fn children(&mut self, handle: Handle) -> Handle {
        let Some(id) = self.element(handle) else {
            return INVALID_HANDLE;
        };
        let children = self.dom.element_children(id);
        self.wrap_collection(children)
    }

    pub fn next_sibling(&mut self, handle: Handle) -> Handle {
        let sibling = self
            .element(handle)
            .and_then(|id| self.dom.next_element_sibling(id));
        self.wrap_optional(sibling)
    }

    pub fn prev_sibling(&mut self, handle: Handle) -> Handle {
        let sibling = self
            .element(handle)
            .and_then(|id| self.dom.prev_element_sibling(id));
        self.wrap_optional(sibling)
    }

    /// Collection of the other elements sharing this element's parent.
    pub fn siblings(&mut self, handle: Handle) -> Handle {
        let Some(id) = self.element(handle) else {
            return INVALID_HANDLE;
        };
        let siblings = self.dom.element_siblings(id);
        self.wrap_collection(siblings)
    }

    /// Number of elements in a collection, or -1 if `handle` is not one.
    pub fn size(&self, handle: Handle) -> i32 {
        self.collection(handle)
            .map_or(-1, |nodes| count(nodes.len()))
    }

    pub fn get_at(&mut self, handle: Handle, index: i32) -> Handle {
        let node = self.collection(handle).and_then(|nodes| at(nodes, index));
        self.wrap_optional(node)
    }

    pub fn first(&mut self, handle: Handle) -> Handle {
        let node = self
            .collection(handle)
            .and_then(|nodes| nodes.first().copied());
        self.wrap_optional(node)
    }

    pub fn last(&mut self, handle: Handle) -> Handle {
        let node = self
            .collection(handle)
            .and_then(|nodes| nodes.last().copied());
        self.wrap_optional(node)
    }
}

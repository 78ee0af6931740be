//! Attributes, identity, classes and base URIs.

use super::{Bridge, settle};
use crate::registry::Handle;

/// Tag name reported for a document.
const ROOT_TAG: &str = "#root";

impl Bridge {
    /// Attribute value. `abs:key` reads the absolute URL held in `key`.
    ///
    /// A present but empty attribute gives `Some("")`; only a missing one gives `None`.
    pub fn attr(&self, handle: Handle, key: &str) -> Option<String> {
        let id = self.element(handle)?;
        self.dom.attr_resolved(id, key)
    }

    pub fn has_attr(&self, handle: Handle, key: &str) -> bool {
        self.element(handle)
            .is_some_and(|id| self.dom.has_attr_resolved(id, key))
    }

    pub fn set_attr(&mut self, handle: Handle, key: &str, value: &str) {
        if let Some(id) = self.element(handle) {
            settle("set_attr", self.dom.set_attr(id, key, value));
        }
    }

    pub fn remove_attr(&mut self, handle: Handle, key: &str) {
        if let Some(id) = self.element(handle) {
            self.dom.remove_attr(id, key);
        }
    }

    pub fn tag_name(&self, handle: Handle) -> Option<String> {
        let id = self.element(handle)?;
        if self.dom.is_document(id) {
            return Some(ROOT_TAG.to_owned());
        }
        self.dom.tag_name(id).map(str::to_owned)
    }

    /// The `id` attribute. An empty id counts as none.
    pub fn element_id(&self, handle: Handle) -> Option<String> {
        let id = self.element(handle)?;
        self.dom
            .attr(id, "id")
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    }

    /// The raw `class` attribute, empty when the element has none.
    pub fn class_name(&self, handle: Handle) -> Option<String> {
        let id = self.element(handle)?;
        Some(self.dom.attr(id, "class").unwrap_or_default().to_owned())
    }

    pub fn has_class(&self, handle: Handle, name: &str) -> bool {
        self.element(handle)
            .is_some_and(|id| self.dom.has_class(id, name))
    }

    /// Adds each whitespace separated name in `name` that the class list lacks.
    pub fn add_class(&mut self, handle: Handle, name: &str) {
        if let Some(id) = self.element(handle) {
            settle("add_class", self.dom.add_class(id, name));
        }
    }

    /// Removes `name` from the class list if present.
    pub fn remove_class(&mut self, handle: Handle, name: &str) {
        if let Some(id) = self.element(handle) {
            settle("remove_class", self.dom.remove_class(id, name));
        }
    }

    /// Base URI in effect for the node.
    pub fn node_base_uri(&self, handle: Handle) -> Option<String> {
        let id = self.node(handle)?;
        Some(self.dom.base_uri(id))
    }

    /// Records a base URI on an element or document. Other node kinds ignore it.
    pub fn set_node_base_uri(&mut self, handle: Handle, base_uri: &str) {
        let Some(id) = self.node(handle) else {
            return;
        };
        if !self.dom.set_base_uri(id, base_uri) {
            log::debug!("Node {id:?} cannot carry a base URI");
        }
    }

    /// Absolute URL held in attribute `key`, or an empty string.
    pub fn node_abs_url(&self, handle: Handle, key: &str) -> String {
        self.node(handle)
            .map(|id| self.dom.abs_url(id, key))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::INVALID_HANDLE;

    fn link(bridge: &mut Bridge) -> Handle {
        let doc = bridge.parse(
            "<a id='' class='Nav main' href='page.html' title=''>x</a>",
            "http://example.com/dir/",
        );
        bridge.select_first(doc, "a")
    }

    #[test]
    fn empty_attribute_differs_from_missing() {
        let mut bridge = Bridge::new();
        let anchor = link(&mut bridge);
        assert_eq!(bridge.attr(anchor, "title").as_deref(), Some(""));
        assert_eq!(bridge.attr(anchor, "rel"), None);
        assert!(bridge.has_attr(anchor, "TITLE"));
        assert_eq!(
            bridge.attr(anchor, "abs:href").as_deref(),
            Some("http://example.com/dir/page.html")
        );
    }

    #[test]
    fn set_and_remove_attributes() {
        let mut bridge = Bridge::new();
        let anchor = link(&mut bridge);
        bridge.set_attr(anchor, "Data-X", "1");
        assert_eq!(bridge.attr(anchor, "data-x").as_deref(), Some("1"));
        bridge.remove_attr(anchor, "DATA-X");
        assert!(!bridge.has_attr(anchor, "data-x"));
        bridge.set_attr(anchor, "", "ignored");
        assert!(!bridge.has_attr(anchor, ""));
    }

    #[test]
    fn identity_reads() {
        let mut bridge = Bridge::new();
        let anchor = link(&mut bridge);
        assert_eq!(bridge.tag_name(anchor).as_deref(), Some("a"));
        assert_eq!(bridge.element_id(anchor), None);
        assert_eq!(bridge.class_name(anchor).as_deref(), Some("Nav main"));
        assert!(bridge.has_class(anchor, "nav"));
        assert_eq!(bridge.tag_name(INVALID_HANDLE), None);
        assert_eq!(bridge.class_name(INVALID_HANDLE), None);
    }

    #[test]
    fn class_mutation_is_idempotent() {
        let mut bridge = Bridge::new();
        let anchor = link(&mut bridge);
        bridge.add_class(anchor, "extra");
        bridge.add_class(anchor, "extra");
        assert_eq!(bridge.class_name(anchor).as_deref(), Some("Nav main extra"));
        bridge.remove_class(anchor, "missing");
        assert_eq!(bridge.class_name(anchor).as_deref(), Some("Nav main extra"));
        for name in ["Nav", "main", "extra"] {
            bridge.remove_class(anchor, name);
        }
        assert!(!bridge.has_attr(anchor, "class"));
        assert_eq!(bridge.class_name(anchor).as_deref(), Some(""));
    }

    #[test]
    fn multi_token_add_class_is_idempotent() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<p>x</p>", "");
        let para = bridge.select_first(doc, "p");
        for _ in 0..3 {
            bridge.add_class(para, "a b");
        }
        assert_eq!(bridge.class_name(para).as_deref(), Some("a b"));
        bridge.add_class(para, "b c");
        assert_eq!(bridge.class_name(para).as_deref(), Some("a b c"));
        assert!(bridge.has_class(para, "c"));
    }

    #[test]
    fn base_uri_round_trip() {
        let mut bridge = Bridge::new();
        let anchor = link(&mut bridge);
        assert_eq!(
            bridge.node_base_uri(anchor).as_deref(),
            Some("http://example.com/dir/")
        );
        bridge.set_node_base_uri(anchor, "http://other.test/");
        assert_eq!(bridge.node_abs_url(anchor, "href"), "http://other.test/page.html");
        assert_eq!(bridge.node_abs_url(anchor, "src"), "");
        assert_eq!(bridge.node_abs_url(INVALID_HANDLE, "href"), "");
        assert_eq!(bridge.node_base_uri(INVALID_HANDLE), None);
    }
}

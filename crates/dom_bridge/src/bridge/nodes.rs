//! Node creation, raw node-tree walking and text nodes.
//!
//! Unlike the element-level navigation these operations see every node kind,
//! comments and script data included.

use html::dom::text::is_blank;

use super::{Bridge, at, count, settle};
use crate::registry::{Entry, Handle, INVALID_HANDLE};

impl Bridge {
    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> Handle {
        match settle("create_element", self.dom.create_element(tag)) {
            Some(id) => self.registry.allocate(Entry::Element(id)),
            None => INVALID_HANDLE,
        }
    }

    /// Creates a detached text node.
    pub fn create_text_node(&mut self, text: &str) -> Handle {
        let id = self.dom.create_text(text);
        self.registry.allocate(Entry::TextNode(id))
    }

    /// Gathers elements into a new collection, skipping handles that are not
    /// elements. A document counts as an element.
    pub fn create_elements(&mut self, handles: &[Handle]) -> Handle {
        let nodes: Vec<_> = handles
            .iter()
            .filter_map(|handle| self.element(*handle))
            .collect();
        if nodes.len() < handles.len() {
            log::debug!(
                "create_elements skipped {} of {} handles",
                handles.len() - nodes.len(),
                handles.len()
            );
        }
        self.wrap_collection(nodes)
    }

    /// `#document`, `#text`, `#comment`, `#data`, `#doctype` or the tag name.
    pub fn node_name(&self, handle: Handle) -> Option<String> {
        let id = self.node(handle)?;
        self.dom.node_name(id).map(str::to_owned)
    }

    pub fn child_node_size(&self, handle: Handle) -> i32 {
        self.node(handle)
            .map_or(0, |id| count(self.dom.child_count(id)))
    }

    pub fn child_node(&mut self, handle: Handle, index: i32) -> Handle {
        let child = self.node(handle).and_then(|id| {
            usize::try_from(index)
                .ok()
                .and_then(|position| self.dom.child_at(id, position))
        });
        self.wrap_optional(child)
    }

    /// One new handle per child node, minted on every call.
    pub fn child_node_handles(&mut self, handle: Handle) -> Vec<Handle> {
        let Some(id) = self.node(handle) else {
            return Vec::new();
        };
        self.dom
            .children(id)
            .into_iter()
            .map(|child| self.wrap(child))
            .collect()
    }

    pub fn is_text_node(&self, handle: Handle) -> bool {
        self.text_node(handle).is_some()
    }

    /// Parent of any node kind.
    pub fn parent_node(&mut self, handle: Handle) -> Handle {
        let parent = self.node(handle).and_then(|id| self.dom.parent(id));
        self.wrap_optional(parent)
    }

    pub fn node_outer_html(&self, handle: Handle) -> Option<String> {
        let id = self.node(handle)?;
        Some(self.dom.outer_html(id, self.output()))
    }

    /// Handles for the element's direct text children.
    pub fn text_node_handles(&mut self, handle: Handle) -> Vec<Handle> {
        let Some(id) = self.element(handle) else {
            return Vec::new();
        };
        self.dom
            .text_nodes(id)
            .into_iter()
            .map(|text| self.registry.allocate(Entry::TextNode(text)))
            .collect()
    }

    /// Text with whitespace runs collapsed. Leading and trailing space is kept.
    pub fn text_node_text(&self, handle: Handle) -> Option<String> {
        let id = self.text_node(handle)?;
        self.dom.text_node_text(id)
    }

    pub fn set_text_node_text(&mut self, handle: Handle, text: &str) {
        if let Some(id) = self.text_node(handle) {
            settle("set_text_node_text", self.dom.set_text_node_text(id, text));
        }
    }

    /// Text exactly as stored.
    pub fn text_node_whole_text(&self, handle: Handle) -> Option<String> {
        let id = self.text_node(handle)?;
        self.dom.text_node_whole_text(id).map(str::to_owned)
    }

    /// True for whitespace-only text, and for anything that is not a text node.
    pub fn text_node_is_blank(&self, handle: Handle) -> bool {
        self.text_node(handle)
            .and_then(|id| self.dom.text_node_whole_text(id))
            .is_none_or(is_blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_bad_tags() {
        let mut bridge = Bridge::new();
        let div = bridge.create_element("DIV");
        assert_eq!(bridge.tag_name(div).as_deref(), Some("div"));
        assert_eq!(bridge.parent(div), INVALID_HANDLE);
        assert_eq!(bridge.create_element(""), INVALID_HANDLE);
        assert_eq!(bridge.create_element("a b"), INVALID_HANDLE);
    }

    #[test]
    fn create_elements_skips_non_elements() {
        let mut bridge = Bridge::new();
        let div = bridge.create_element("div");
        let text = bridge.create_text_node("t");
        let span = bridge.create_element("span");
        let doc = bridge.parse("", "");
        let list = bridge.create_elements(&[div, text, 4_242, span, doc]);
        assert_eq!(bridge.size(list), 3);
        let middle = bridge.get_at(list, 1);
        assert_eq!(bridge.tag_name(middle).as_deref(), Some("span"));
        let last = bridge.last(list);
        assert_eq!(bridge.tag_name(last).as_deref(), Some("#root"));
        let none = bridge.create_elements(&[]);
        assert_eq!(bridge.size(none), 0);
    }

    #[test]
    fn walks_every_node_kind() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<p>a<!--b--><br>c</p>", "");
        let para = bridge.select_first(doc, "p");
        assert_eq!(bridge.child_node_size(para), 4);
        let names: Vec<_> = bridge
            .child_node_handles(para)
            .into_iter()
            .filter_map(|child| bridge.node_name(child))
            .collect();
        assert_eq!(names, ["#text", "#comment", "br", "#text"]);
        let comment = bridge.child_node(para, 1);
        assert!(!bridge.is_text_node(comment));
        assert_eq!(bridge.node_outer_html(comment).as_deref(), Some("<!--b-->"));
        let parent = bridge.parent_node(comment);
        assert_eq!(bridge.node_name(parent).as_deref(), Some("p"));
        assert_eq!(bridge.child_node(para, 4), INVALID_HANDLE);
        assert_eq!(bridge.child_node(para, -1), INVALID_HANDLE);
        assert_eq!(bridge.child_node_size(INVALID_HANDLE), 0);
        assert!(bridge.child_node_handles(INVALID_HANDLE).is_empty());
    }

    #[test]
    fn child_handles_are_fresh_each_call() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<p>a<b>b</b></p>", "");
        let para = bridge.select_first(doc, "p");
        let once = bridge.child_node_handles(para);
        let twice = bridge.child_node_handles(para);
        assert_eq!(once.len(), 2);
        assert!(once.iter().all(|handle| !twice.contains(handle)));
    }

    #[test]
    fn text_node_views() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<p>  one   two <b>x</b>   </p>", "");
        let para = bridge.select_first(doc, "p");
        let texts = bridge.text_node_handles(para);
        assert_eq!(texts.len(), 2);
        assert!(texts.iter().all(|text| bridge.is_text_node(*text)));
        assert_eq!(bridge.text_node_text(texts[0]).as_deref(), Some(" one two "));
        assert_eq!(
            bridge.text_node_whole_text(texts[0]).as_deref(),
            Some("  one   two ")
        );
        assert!(!bridge.text_node_is_blank(texts[0]));
        assert!(bridge.text_node_is_blank(texts[1]));
        assert!(bridge.text_node_is_blank(para));

        bridge.set_text_node_text(texts[1], "!");
        assert_eq!(bridge.own_text(para).as_deref(), Some("one two !"));
        assert_eq!(bridge.text_node_text(para), None);
    }

    #[test]
    fn no_break_space_is_not_blank() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<p>&nbsp;</p><p> \t\n</p>", "");
        let paragraphs = bridge.select(doc, "p");
        let filled = bridge.get_at(paragraphs, 0);
        let spaced = bridge.get_at(paragraphs, 1);
        let filled_text = bridge.text_node_handles(filled);
        let spaced_text = bridge.text_node_handles(spaced);
        assert!(!bridge.text_node_is_blank(filled_text[0]));
        assert!(bridge.text_node_is_blank(spaced_text[0]));
    }

    #[test]
    fn script_payload_is_not_a_text_node() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<script>let x = 1;</script>", "");
        let script = bridge.select_first(doc, "script");
        assert!(bridge.text_node_handles(script).is_empty());
        let payload = bridge.child_node(script, 0);
        assert_eq!(bridge.node_name(payload).as_deref(), Some("#data"));
        assert!(!bridge.is_text_node(payload));
    }
}

//! In-place tree mutation: structure, attributes, classes and text.

use anyhow::{Error, anyhow};
use indextree::NodeId;

use super::{DOM, NodeKind};
use crate::parser;

impl DOM {
    fn ensure_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(anyhow!("Cannot insert {child:?} into {parent:?}: unknown node"));
        }
        if self.is_document(child) {
            return Err(anyhow!("A document cannot become a child node"));
        }
        Ok(())
    }

    /// Moves `child` to the end of `parent`'s children.
    ///
    /// # Errors
    /// Returns an error if either node is unknown or the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        self.ensure_insertable(parent, child)?;
        parent
            .checked_append(child, &mut self.dom)
            .map_err(|err| anyhow!("Failed to append {child:?} to {parent:?}: {err:?}"))
    }

    /// Moves `child` to the front of `parent`'s children.
    ///
    /// # Errors
    /// Returns an error if either node is unknown or the move would create a cycle.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        self.ensure_insertable(parent, child)?;
        parent
            .checked_prepend(child, &mut self.dom)
            .map_err(|err| anyhow!("Failed to prepend {child:?} to {parent:?}: {err:?}"))
    }

    /// Inserts `nodes` as the first children of `parent`, keeping their order.
    ///
    /// # Errors
    /// Returns an error if any insertion fails.
    pub fn prepend_children(&mut self, parent: NodeId, nodes: &[NodeId]) -> Result<(), Error> {
        for node in nodes.iter().rev() {
            self.prepend_child(parent, *node)?;
        }
        Ok(())
    }

    /// Unlinks `id` from its parent and siblings. The subtree stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        if self.contains(id) {
            id.detach(&mut self.dom);
        }
    }

    /// Detaches every child of `id` and returns them as loose trees.
    pub fn clear_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = self.children(id);
        for child in &children {
            child.detach(&mut self.dom);
        }
        children
    }

    /// Sets an attribute, replacing any existing value whose key matches
    /// ignoring case. New keys are stored lowercase.
    ///
    /// # Errors
    /// Returns an error if `id` is not an element or the key is empty.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), Error> {
        let key = name.trim();
        if key.is_empty() {
            return Err(anyhow!("Attribute name must not be empty"));
        }
        let node = self
            .get_mut(id)
            .filter(|node| node.is_element())
            .ok_or_else(|| anyhow!("Cannot set attribute on non-element {id:?}"))?;
        if let Some(slot) = node
            .attrs
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
        {
            value.clone_into(&mut slot.1);
        } else {
            node.attrs.push((key.to_ascii_lowercase(), value.to_owned()));
        }
        Ok(())
    }

    /// Removes every attribute whose key matches `name` ignoring case.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        while let Some(index) = node
            .attrs
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            node.attrs.remove(index);
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.attr(name)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Whitespace separated entries of the `class` attribute.
    pub fn class_names(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|classes| classes.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, name: &str) -> bool {
        let wanted = name.trim();
        !wanted.is_empty()
            && self
                .class_names(id)
                .iter()
                .any(|class| class.eq_ignore_ascii_case(wanted))
    }

    /// The class list with repeated entries dropped, first spelling kept.
    fn class_set(&self, id: NodeId) -> Vec<String> {
        let mut classes: Vec<String> = Vec::new();
        for class in self.class_names(id) {
            insert_class(&mut classes, class);
        }
        classes
    }

    fn write_classes(&mut self, id: NodeId, classes: &[String]) -> Result<(), Error> {
        let joined = classes.join(" ");
        if self.attr(id, "class").unwrap_or_default() == joined {
            return Ok(());
        }
        if classes.is_empty() {
            self.remove_attr(id, "class");
            return Ok(());
        }
        self.set_attr(id, "class", &joined)
    }

    /// Adds every whitespace separated name in `names` that the class list
    /// does not already hold.
    ///
    /// # Errors
    /// Returns an error if `id` is not an element.
    pub fn add_class(&mut self, id: NodeId, names: &str) -> Result<(), Error> {
        let mut classes = self.class_set(id);
        for class in names.split_whitespace() {
            insert_class(&mut classes, class);
        }
        self.write_classes(id, &classes)
    }

    /// Removes `name` from the class list. Does nothing if it is absent.
    ///
    /// # Errors
    /// Returns an error if `id` is not an element.
    pub fn remove_class(&mut self, id: NodeId, name: &str) -> Result<(), Error> {
        let class = name.trim();
        if class.is_empty() || !self.has_class(id, class) {
            return Ok(());
        }
        let mut classes = self.class_set(id);
        classes.retain(|existing| !existing.eq_ignore_ascii_case(class));
        self.write_classes(id, &classes)
    }

    /// Replaces the children of an element with a single text node, or a data
    /// node for `script` and `style`. On a document the body receives the text.
    /// Returns the children that were displaced.
    ///
    /// # Errors
    /// Returns an error if `id` is neither an element nor a document.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<Vec<NodeId>, Error> {
        let target = if self.is_document(id) {
            self.find_element(id, "body")
                .ok_or_else(|| anyhow!("Document {id:?} has no body"))?
        } else if self.is_element(id) {
            id
        } else {
            return Err(anyhow!("Cannot set text on {id:?}"));
        };
        let displaced = self.clear_children(target);
        let child = if self.holds_data(target) {
            self.create_data(text)
        } else {
            self.create_text(text)
        };
        self.append_child(target, child)?;
        Ok(displaced)
    }

    /// Overwrites the content of a text node.
    ///
    /// # Errors
    /// Returns an error if `id` is not a text node.
    pub fn set_text_node_text(&mut self, id: NodeId, value: &str) -> Result<(), Error> {
        match self.get_mut(id).map(|node| &mut node.kind) {
            Some(NodeKind::Text { text }) => {
                value.clone_into(text);
                Ok(())
            }
            _ => Err(anyhow!("{id:?} is not a text node")),
        }
    }

    /// Replaces the children of `id` with `html` parsed in its context and
    /// returns the children that were displaced.
    ///
    /// # Errors
    /// Returns an error if `id` is not an element or the markup cannot be parsed.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<Vec<NodeId>, Error> {
        let nodes = self.parse_in_context(id, html)?;
        let displaced = self.clear_children(id);
        for node in nodes {
            self.append_child(id, node)?;
        }
        Ok(displaced)
    }

    /// Parses `html` in the context of `id` and appends the result.
    ///
    /// # Errors
    /// Returns an error if `id` is not an element or the markup cannot be parsed.
    pub fn append_html(&mut self, id: NodeId, html: &str) -> Result<(), Error> {
        for node in self.parse_in_context(id, html)? {
            self.append_child(id, node)?;
        }
        Ok(())
    }

    /// Parses `html` in the context of `id` and inserts the result before the
    /// existing children.
    ///
    /// # Errors
    /// Returns an error if `id` is not an element or the markup cannot be parsed.
    pub fn prepend_html(&mut self, id: NodeId, html: &str) -> Result<(), Error> {
        let nodes = self.parse_in_context(id, html)?;
        self.prepend_children(id, &nodes)
    }

    fn parse_in_context(&mut self, id: NodeId, html: &str) -> Result<Vec<NodeId>, Error> {
        let context = match self.get(id).map(|node| &node.kind) {
            Some(NodeKind::Element { tag }) => tag.clone(),
            Some(NodeKind::Document) => String::from("body"),
            _ => return Err(anyhow!("Cannot insert markup into {id:?}")),
        };
        parser::parse_fragment_nodes(self, html, &context)
    }
}

/// Appends `class` unless an entry equal to it ignoring ASCII case is present.
fn insert_class(classes: &mut Vec<String>, class: &str) {
    if !classes
        .iter()
        .any(|existing| existing.eq_ignore_ascii_case(class))
    {
        classes.push(class.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(dom: &mut DOM, tag: &str) -> NodeId {
        dom.create_element(tag).unwrap()
    }

    #[test]
    fn attribute_keys_ignore_case() {
        let mut dom = DOM::new();
        let link = element(&mut dom, "a");
        dom.set_attr(link, "HREF", "/one").unwrap();
        assert_eq!(dom.attr(link, "href"), Some("/one"));
        dom.set_attr(link, "Href", "/two").unwrap();
        assert_eq!(dom.get(link).unwrap().attrs.len(), 1);
        assert_eq!(dom.attr(link, "HREF"), Some("/two"));
        dom.remove_attr(link, "hReF");
        assert!(!dom.has_attr(link, "href"));
    }

    #[test]
    fn empty_attribute_value_is_present() {
        let mut dom = DOM::new();
        let input = element(&mut dom, "input");
        dom.set_attr(input, "disabled", "").unwrap();
        assert_eq!(dom.attr(input, "disabled"), Some(""));
    }

    #[test]
    fn set_attr_rejects_text_nodes() {
        let mut dom = DOM::new();
        let text = dom.create_text("x");
        assert!(dom.set_attr(text, "id", "a").is_err());
    }

    #[test]
    fn class_mutation_is_idempotent() {
        let mut dom = DOM::new();
        let div = element(&mut dom, "div");
        dom.set_attr(div, "class", "one  two").unwrap();

        dom.add_class(div, "three").unwrap();
        dom.add_class(div, "three").unwrap();
        assert_eq!(dom.attr(div, "class"), Some("one two three"));

        dom.remove_class(div, "missing").unwrap();
        assert_eq!(dom.attr(div, "class"), Some("one two three"));

        assert!(dom.has_class(div, "TWO"));
        dom.remove_class(div, "two").unwrap();
        assert_eq!(dom.attr(div, "class"), Some("one three"));
    }

    #[test]
    fn add_class_splits_names_and_collapses_repeats() {
        let mut dom = DOM::new();
        let div = element(&mut dom, "div");
        dom.set_attr(div, "class", "a A b a").unwrap();
        for _ in 0..3 {
            dom.add_class(div, " b  c ").unwrap();
        }
        assert_eq!(dom.attr(div, "class"), Some("a b c"));
        dom.add_class(div, "   ").unwrap();
        assert_eq!(dom.attr(div, "class"), Some("a b c"));
    }

    #[test]
    fn class_edits_reject_text_nodes() {
        let mut dom = DOM::new();
        let text = dom.create_text("x");
        assert!(dom.add_class(text, "a").is_err());
    }

    #[test]
    fn removing_last_class_drops_attribute() {
        let mut dom = DOM::new();
        let div = element(&mut dom, "div");
        dom.add_class(div, "solo").unwrap();
        dom.remove_class(div, "solo").unwrap();
        assert!(!dom.has_attr(div, "class"));
    }

    #[test]
    fn set_text_on_script_writes_data() {
        let mut dom = DOM::new();
        let script = element(&mut dom, "script");
        dom.set_text(script, "let a = 1 < 2;").unwrap();
        let child = dom.child_at(script, 0).unwrap();
        assert_eq!(dom.node_name(child), Some("#data"));
        assert!(!dom.is_text(child));
    }

    #[test]
    fn append_rejects_cycles() {
        let mut dom = DOM::new();
        let outer = element(&mut dom, "div");
        let inner = element(&mut dom, "span");
        dom.append_child(outer, inner).unwrap();
        assert!(dom.append_child(inner, outer).is_err());
        assert!(dom.append_child(outer, outer).is_err());
    }

    #[test]
    fn detach_keeps_node_alive() {
        let mut dom = DOM::new();
        let outer = element(&mut dom, "div");
        let inner = element(&mut dom, "span");
        dom.append_child(outer, inner).unwrap();
        dom.detach(inner);
        assert_eq!(dom.parent(inner), None);
        assert!(dom.contains(inner));
        assert_eq!(dom.child_count(outer), 0);
    }
}

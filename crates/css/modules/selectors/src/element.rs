//! Wrapper that implements the selectors crate's Element trait for our DOM.

use core::fmt;

use html::dom::text::{is_blank, normalize_whitespace};
use html::{DOM, NodeId, NodeKind};
use selectors::OpaqueElement;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{ElementSelectorFlags, MatchingContext};

use crate::parser::{AttrString, DomSelectorImpl, NamespaceUrl, PseudoClass, PseudoElement};

/// Search text of `:contains` style pseudo-classes is compared on normalized
/// lowercase text.
fn normalized_lower(text: &str) -> String {
    normalize_whitespace(text.trim()).to_lowercase()
}

/// An element node in the arena, viewed through the selectors crate.
#[derive(Clone, Copy)]
pub struct ElementWrapper<'dom> {
    pub node: NodeId,
    pub dom: &'dom DOM,
}

impl fmt::Debug for ElementWrapper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementWrapper")
            .field("node", &self.node)
            .field("tag", &self.tag())
            .finish_non_exhaustive()
    }
}

impl<'dom> ElementWrapper<'dom> {
    pub fn new(node: NodeId, dom: &'dom DOM) -> Self {
        Self { node, dom }
    }

    fn wrap(&self, node: NodeId) -> Self {
        Self::new(node, self.dom)
    }

    fn tag(&self) -> Option<&'dom str> {
        self.dom.tag_name(self.node)
    }

    fn attr(&self, name: &str) -> Option<&'dom str> {
        self.dom.attr(self.node, name)
    }

    fn matches_search(&self, pseudo: &PseudoClass) -> bool {
        match pseudo {
            PseudoClass::Contains(search) => {
                normalized_lower(&self.dom.text(self.node)).contains(&normalized_lower(search))
            }
            PseudoClass::ContainsOwn(search) => {
                normalized_lower(&self.dom.own_text(self.node)).contains(&normalized_lower(search))
            }
            PseudoClass::ContainsWholeText(search) => {
                self.dom.whole_text(self.node).contains(search.as_str())
            }
            PseudoClass::ContainsWholeOwnText(search) => {
                self.dom.whole_own_text(self.node).contains(search.as_str())
            }
            PseudoClass::ContainsData(search) => self
                .dom
                .data(self.node)
                .to_lowercase()
                .contains(&search.to_lowercase()),
        }
    }
}

impl selectors::Element for ElementWrapper<'_> {
    type Impl = DomSelectorImpl;

    fn opaque(&self) -> OpaqueElement {
        match self.dom.get(self.node) {
            Some(node) => OpaqueElement::new(node),
            None => OpaqueElement::new(self.dom),
        }
    }

    fn parent_element(&self) -> Option<Self> {
        self.dom
            .parent(self.node)
            .filter(|parent| self.dom.is_element(*parent))
            .map(|parent| self.wrap(parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.dom
            .prev_element_sibling(self.node)
            .map(|sibling| self.wrap(sibling))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.dom
            .next_element_sibling(self.node)
            .map(|sibling| self.wrap(sibling))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.dom
            .element_children(self.node)
            .first()
            .map(|child| self.wrap(*child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.tag().is_some_and(|tag| tag == local_name)
    }

    fn has_namespace(&self, _ns: &NamespaceUrl) -> bool {
        true
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }

    fn attr_matches(
        &self,
        _ns: &NamespaceConstraint<&NamespaceUrl>,
        local_name: &AttrString,
        operation: &AttrSelectorOperation<&AttrString>,
    ) -> bool {
        self.attr(&local_name.0)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &PseudoClass,
        _context: &mut MatchingContext<'_, DomSelectorImpl>,
    ) -> bool {
        self.matches_search(pc)
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, DomSelectorImpl>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {
        // Flags drive style invalidation, which never happens here.
    }

    fn is_link(&self) -> bool {
        self.tag()
            .is_some_and(|tag| matches!(tag, "a" | "area" | "link"))
            && self.attr("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.tag() == Some("slot")
    }

    fn has_id(&self, id: &AttrString, case_sensitivity: CaseSensitivity) -> bool {
        self.attr("id")
            .is_some_and(|value| case_sensitivity.eq(value.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &AttrString, case_sensitivity: CaseSensitivity) -> bool {
        self.attr("class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|class| case_sensitivity.eq(class.as_bytes(), name.0.as_bytes()))
        })
    }

    fn imported_part(&self, _name: &AttrString) -> Option<AttrString> {
        None
    }

    fn is_part(&self, _name: &AttrString) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.dom.children(self.node).into_iter().all(|child| {
            match self.dom.kind(child) {
                Some(NodeKind::Text { text }) => is_blank(text),
                Some(NodeKind::Data { data }) => data.is_empty(),
                Some(NodeKind::Element { .. }) => false,
                _ => true,
            }
        })
    }

    fn is_root(&self) -> bool {
        self.dom
            .parent(self.node)
            .is_none_or(|parent| self.dom.is_document(parent))
    }
}

//! Reading and replacing text and markup, and detaching nodes.

use super::{Bridge, settle};
use crate::registry::Handle;

impl Bridge {
    /// Normalized text of the element and everything below it.
    pub fn text(&self, handle: Handle) -> Option<String> {
        self.element(handle).map(|id| self.dom.text(id))
    }

    /// Normalized text of the element's own text children.
    pub fn own_text(&self, handle: Handle) -> Option<String> {
        self.element(handle).map(|id| self.dom.own_text(id))
    }

    /// Script, style and comment content below the element.
    pub fn data(&self, handle: Handle) -> Option<String> {
        self.element(handle).map(|id| self.dom.data(id))
    }

    pub fn inner_html(&self, handle: Handle) -> Option<String> {
        let id = self.element(handle)?;
        Some(self.dom.inner_html(id, self.output()))
    }

    pub fn outer_html(&self, handle: Handle) -> Option<String> {
        let id = self.element(handle)?;
        Some(self.dom.outer_html(id, self.output()))
    }

    /// Replaces the element's children with a single text node.
    pub fn set_text(&mut self, handle: Handle, text: &str) {
        let Some(id) = self.element(handle) else {
            return;
        };
        if let Some(displaced) = settle("set_text", self.dom.set_text(id, text)) {
            self.sweep(&displaced);
        }
    }

    /// Replaces the element's children with parsed `html`.
    pub fn set_html(&mut self, handle: Handle, html: &str) {
        let Some(id) = self.element(handle) else {
            return;
        };
        if let Some(displaced) = settle("set_html", self.dom.set_inner_html(id, html)) {
            self.sweep(&displaced);
        }
    }

    /// Inserts parsed `html` before the element's first child.
    pub fn prepend(&mut self, handle: Handle, html: &str) {
        if let Some(id) = self.element(handle) {
            settle("prepend", self.dom.prepend_html(id, html));
        }
    }

    /// Inserts parsed `html` after the element's last child.
    pub fn append(&mut self, handle: Handle, html: &str) {
        if let Some(id) = self.element(handle) {
            settle("append", self.dom.append_html(id, html));
        }
    }

    /// Detaches an element from its parent. Its handle stays valid.
    pub fn remove_element(&mut self, handle: Handle) {
        if let Some(id) = self.element(handle) {
            self.dom.detach(id);
        }
    }

    /// Detaches any node from its parent. Its handle stays valid.
    pub fn remove_node(&mut self, handle: Handle) {
        if let Some(id) = self.node(handle) {
            self.dom.detach(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::registry::INVALID_HANDLE;

    const PAGE: &str = "<div id='box'><p>One <b>two</b></p><script>var a = 1;</script></div>";

    fn target(bridge: &mut Bridge) -> Handle {
        let doc = bridge.parse(PAGE, "");
        bridge.select_first(doc, "#box")
    }

    #[test]
    fn reads_text_and_markup() {
        let mut bridge = Bridge::new();
        let div = target(&mut bridge);
        assert_eq!(bridge.text(div).as_deref(), Some("One two"));
        assert_eq!(bridge.own_text(div).as_deref(), Some(""));
        assert_eq!(bridge.data(div).as_deref(), Some("var a = 1;"));
        assert_eq!(
            bridge.inner_html(div).as_deref(),
            Some("<p>One <b>two</b></p><script>var a = 1;</script>")
        );
        assert_eq!(
            bridge.outer_html(div).as_deref(),
            Some("<div id=\"box\"><p>One <b>two</b></p><script>var a = 1;</script></div>")
        );
        assert_eq!(bridge.text(INVALID_HANDLE), None);
    }

    #[test]
    fn replaces_and_inserts_markup() {
        let mut bridge = Bridge::new();
        let div = target(&mut bridge);
        bridge.set_html(div, "<i>mid</i>");
        bridge.prepend(div, "<span>first</span>");
        bridge.append(div, "<em>last</em>");
        assert_eq!(
            bridge.inner_html(div).as_deref(),
            Some("<span>first</span><i>mid</i><em>last</em>")
        );
        bridge.set_text(div, "a < b");
        assert_eq!(bridge.inner_html(div).as_deref(), Some("a &lt; b"));
    }

    #[test]
    fn removal_keeps_handles_alive() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse(PAGE, "");
        let bold = bridge.select_first(doc, "b");
        bridge.remove_element(bold);
        assert_eq!(bridge.select_first(doc, "b"), INVALID_HANDLE);
        assert_eq!(bridge.text(bold).as_deref(), Some("two"));
        assert_eq!(bridge.parent(bold), INVALID_HANDLE);
    }

    #[test]
    fn replaced_content_is_reclaimed_unless_held() {
        let mut bridge = Bridge::new();
        let doc = bridge.parse("<div><p>a</p><i>b</i></div>", "");
        let div = bridge.select_first(doc, "div");
        let italic = bridge.select_first(doc, "i");
        let before = bridge.dom().len();
        for _ in 0..20 {
            bridge.set_text(div, "t");
        }
        // The italic subtree stays, held by its handle; the paragraph goes.
        assert_eq!(bridge.dom().len(), before - 2 + 1);
        assert_eq!(bridge.text(italic).as_deref(), Some("b"));
        bridge.set_html(div, "<b>x</b>");
        assert_eq!(bridge.inner_html(div).as_deref(), Some("<b>x</b>"));
        assert_eq!(bridge.dom().len(), before - 2 + 2);
    }

    #[test]
    fn deep_documents_parse_and_serialize() {
        let mut bridge = Bridge::new();
        let depth = 10_000;
        let doc = bridge.parse(&format!("{}x", "<div>".repeat(depth)), "");
        assert!(doc > 0);
        let markup = bridge.outer_html(doc).unwrap_or_default();
        assert_eq!(markup.matches("<div>").count(), depth);
        assert_eq!(markup.matches("</div>").count(), depth);
        assert_eq!(bridge.text(doc).as_deref(), Some("x"));
        let divs = bridge.select(doc, "div");
        assert_eq!(bridge.size(divs), 10_000);
        bridge.free(doc);
    }

    #[test]
    fn pretty_print_follows_config() {
        let mut bridge = Bridge::with_config(BridgeConfig::new(true, 2, None));
        let doc = bridge.parse("<div><p>x</p></div>", "");
        let div = bridge.select_first(doc, "div");
        assert_eq!(
            bridge.outer_html(div).as_deref(),
            Some("<div>\n  <p>x</p>\n</div>")
        );
    }
}

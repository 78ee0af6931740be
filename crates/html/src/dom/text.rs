//! Text extraction with the whitespace rules of rendered HTML.

use indextree::{NodeEdge, NodeId};

use super::{DOM, NodeKind};

/// Elements that render on their own line.
const BLOCK_TAGS: &[&str] = &[
    "html", "head", "body", "frameset", "script", "noscript", "style", "meta", "link", "title",
    "frame", "noframes", "section", "nav", "aside", "hgroup", "header", "footer", "p", "h1", "h2",
    "h3", "h4", "h5", "h6", "ul", "ol", "pre", "div", "blockquote", "hr", "address", "figure",
    "figcaption", "form", "fieldset", "ins", "del", "dl", "dt", "dd", "li", "table", "caption",
    "thead", "tfoot", "tbody", "colgroup", "col", "tr", "th", "td", "video", "audio", "canvas",
    "details", "menu", "plaintext", "template", "article", "main", "svg", "math", "center", "dir",
    "listing",
];

/// Elements whose text keeps its original whitespace.
const PRESERVE_WHITESPACE_TAGS: &[&str] = &["pre", "plaintext", "title", "textarea"];

pub fn is_block(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// Collapses every whitespace run to one space without trimming the ends.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    append_normalized(&mut out, text, false);
    out
}

/// True when `text` holds only HTML whitespace. A no-break space is content.
pub fn is_blank(text: &str) -> bool {
    text.chars()
        .all(|ch| matches!(ch, ' ' | '\t' | '\n' | '\u{c}' | '\r'))
}

fn ends_with_space(accum: &str) -> bool {
    accum.ends_with(' ')
}

fn append_normalized(accum: &mut String, text: &str, strip_leading: bool) {
    let mut last_was_white = false;
    let mut reached_non_white = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if (strip_leading && !reached_non_white) || last_was_white {
                continue;
            }
            accum.push(' ');
            last_was_white = true;
        } else {
            accum.push(ch);
            last_was_white = false;
            reached_non_white = true;
        }
    }
}

impl DOM {
    fn preserves_whitespace(&self, id: NodeId) -> bool {
        self.ancestors(id).into_iter().take(6).any(|ancestor| {
            self.tag_name(ancestor)
                .is_some_and(|tag| PRESERVE_WHITESPACE_TAGS.contains(&tag))
        })
    }

    fn append_text_node(&self, accum: &mut String, id: NodeId, text: &str) {
        let preserve = self.parent(id).is_some_and(|parent| self.preserves_whitespace(parent));
        if preserve {
            accum.push_str(text);
        } else {
            let strip = ends_with_space(accum);
            append_normalized(accum, text, strip);
        }
    }

    fn collect_text(&self, id: NodeId, accum: &mut String) {
        if !self.contains(id) {
            return;
        }
        for edge in id.traverse(&self.dom) {
            match edge {
                NodeEdge::Start(node) => match self.kind(node) {
                    Some(NodeKind::Text { text }) => self.append_text_node(accum, node, text),
                    Some(NodeKind::Element { tag }) => {
                        let breaks = is_block(tag) || tag == "br";
                        if breaks && !accum.is_empty() && !ends_with_space(accum) {
                            accum.push(' ');
                        }
                    }
                    _ => {}
                },
                NodeEdge::End(node) => {
                    let Some(NodeKind::Element { tag }) = self.kind(node) else {
                        continue;
                    };
                    let inline_follows = self
                        .dom
                        .get(node)
                        .and_then(|arena_node| arena_node.next_sibling())
                        .is_some_and(|next| {
                            self.is_text(next)
                                || self.tag_name(next).is_some_and(|name| !is_block(name))
                        });
                    if is_block(tag) && inline_follows && !ends_with_space(accum) {
                        accum.push(' ');
                    }
                }
            }
        }
    }

    /// Combined, normalized and trimmed text of the node and its descendants.
    pub fn text(&self, id: NodeId) -> String {
        let mut accum = String::new();
        self.collect_text(id, &mut accum);
        accum.trim().to_owned()
    }

    /// Text of the direct text children only. `<br>` children count as a space.
    pub fn own_text(&self, id: NodeId) -> String {
        let mut accum = String::new();
        for child in self.children(id) {
            match self.kind(child) {
                Some(NodeKind::Text { text }) => self.append_text_node(&mut accum, child, text),
                Some(NodeKind::Element { tag }) if tag == "br" && !ends_with_space(&accum) => {
                    accum.push(' ');
                }
                _ => {}
            }
        }
        accum.trim().to_owned()
    }

    fn push_whole_text(&self, accum: &mut String, node: NodeId) {
        match self.kind(node) {
            Some(NodeKind::Text { text }) => accum.push_str(text),
            Some(NodeKind::Element { tag }) if tag == "br" => accum.push('\n'),
            _ => {}
        }
    }

    /// Unnormalized text of every descendant text node. `<br>` becomes a newline.
    pub fn whole_text(&self, id: NodeId) -> String {
        let mut accum = String::new();
        if let Some(NodeKind::Text { text }) = self.kind(id) {
            accum.push_str(text);
        } else {
            for node in self.descendants(id).into_iter().skip(1) {
                self.push_whole_text(&mut accum, node);
            }
        }
        accum
    }

    /// Unnormalized text of the direct text children.
    pub fn whole_own_text(&self, id: NodeId) -> String {
        let mut accum = String::new();
        for child in self.children(id) {
            self.push_whole_text(&mut accum, child);
        }
        accum
    }

    /// Script and style payloads plus comment text of the subtree.
    pub fn data(&self, id: NodeId) -> String {
        let mut accum = String::new();
        for node in self.descendants(id).into_iter().skip(1) {
            match self.kind(node) {
                Some(NodeKind::Data { data }) => accum.push_str(data),
                Some(NodeKind::Comment { text }) => accum.push_str(text),
                _ => {}
            }
        }
        accum
    }

    /// Visible text of a text node: whitespace collapsed, ends kept.
    pub fn text_node_text(&self, id: NodeId) -> Option<String> {
        match self.kind(id)? {
            NodeKind::Text { text } => Some(normalize_whitespace(text)),
            _ => None,
        }
    }

    /// Raw content of a text node.
    pub fn text_node_whole_text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Text children of an element, in order.
    pub fn text_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .into_iter()
            .filter(|child| self.is_text(*child))
            .collect()
    }
}

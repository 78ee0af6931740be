use core::fmt;

use super::text::{is_block, normalize_whitespace};
use super::{Attributes, DOM, DOMNode, NodeKind};
use indextree::NodeId;

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr", "basefont", "bgsound", "frame",
];

/// Elements whose text children are written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Attributes written as a bare name when their value is empty or equals the name.
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "checked", "compact", "declare", "default", "defer",
    "disabled", "formnovalidate", "hidden", "inert", "ismap", "itemscope", "multiple", "muted",
    "nohref", "noresize", "noshade", "novalidate", "nowrap", "open", "readonly", "required",
    "reversed", "seamless", "selected", "sortable", "truespeed", "typemustmatch",
];

/// Controls how nodes are written back to markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSettings {
    /// Put block elements on their own indented lines.
    pub pretty_print: bool,
    /// Spaces per nesting level when pretty printing.
    pub indent_amount: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty_print: false,
            indent_amount: 1,
        }
    }
}

fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn write_attrs(out: &mut String, attrs: &Attributes) {
    for (key, value) in attrs.iter() {
        out.push(' ');
        out.push_str(key);
        let collapse = BOOLEAN_ATTRIBUTES.contains(&key.as_str())
            && (value.is_empty() || value.eq_ignore_ascii_case(key));
        if !collapse {
            out.push_str("=\"");
            escape_attr(out, value);
            out.push('"');
        }
    }
}

fn write_doctype(out: &mut String, name: &str, public_id: &str, system_id: &str) {
    out.push_str("<!doctype");
    if !name.is_empty() {
        out.push(' ');
        out.push_str(name);
    }
    if !public_id.is_empty() {
        out.push_str(" PUBLIC \"");
        out.push_str(public_id);
        out.push('"');
        if !system_id.is_empty() {
            out.push_str(" \"");
            out.push_str(system_id);
            out.push('"');
        }
    } else if !system_id.is_empty() {
        out.push_str(" SYSTEM \"");
        out.push_str(system_id);
        out.push('"');
    }
    out.push('>');
}

struct Printer<'dom> {
    dom: &'dom DOM,
    settings: OutputSettings,
    out: String,
}

/// Pending printer work. Open tags are written before the children are
/// queued, close tags after the last child has been written.
enum Step {
    Open {
        id: NodeId,
        depth: usize,
        formatting: bool,
    },
    Close {
        id: NodeId,
        depth: usize,
        block: bool,
    },
}

impl Printer<'_> {
    fn indent(&mut self, depth: usize) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..depth * self.settings.indent_amount {
            self.out.push(' ');
        }
    }

    fn preformatted(&self, id: NodeId) -> bool {
        self.dom.tag_name(id).is_some_and(|tag| {
            tag == "pre" || tag == "textarea" || RAW_TEXT_ELEMENTS.contains(&tag)
        })
    }

    /// Pretty printing leaves preformatted content alone.
    fn formatting(&self, id: NodeId) -> bool {
        self.settings.pretty_print
            && !self
                .dom
                .ancestors(id)
                .into_iter()
                .any(|ancestor| self.preformatted(ancestor))
    }

    fn raw_text_parent(&self, id: NodeId) -> bool {
        self.dom
            .parent(id)
            .and_then(|parent| self.dom.tag_name(parent))
            .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag))
    }

    /// Queues the children of `id` so they are written in order.
    fn queue_children(&self, steps: &mut Vec<Step>, id: NodeId, depth: usize, formatting: bool) {
        for child in self.dom.children(id).into_iter().rev() {
            steps.push(Step::Open {
                id: child,
                depth,
                formatting: formatting && !self.preformatted(child),
            });
        }
    }

    fn run(&mut self, mut steps: Vec<Step>) {
        while let Some(step) = steps.pop() {
            match step {
                Step::Open {
                    id,
                    depth,
                    formatting,
                } => self.open(&mut steps, id, depth, formatting),
                Step::Close { id, depth, block } => self.close(id, depth, block),
            }
        }
    }

    fn open(&mut self, steps: &mut Vec<Step>, id: NodeId, depth: usize, formatting: bool) {
        let dom = self.dom;
        let Some(DOMNode { kind, attrs, .. }) = dom.get(id) else {
            return;
        };
        match kind {
            NodeKind::Document => self.queue_children(steps, id, depth, formatting),
            NodeKind::Doctype {
                name,
                public_id,
                system_id,
            } => {
                if self.settings.pretty_print {
                    self.indent(depth);
                }
                write_doctype(&mut self.out, name, public_id, system_id);
            }
            NodeKind::Element { tag } => {
                let block = formatting && is_block(tag);
                if block {
                    self.indent(depth);
                }
                self.out.push('<');
                self.out.push_str(tag);
                write_attrs(&mut self.out, attrs);
                self.out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                steps.push(Step::Close { id, depth, block });
                self.queue_children(steps, id, depth + 1, formatting);
            }
            NodeKind::Text { text } => {
                if self.raw_text_parent(id) {
                    self.out.push_str(text);
                } else if formatting {
                    let collapsed = normalize_whitespace(text);
                    if !collapsed.trim().is_empty() {
                        escape_text(&mut self.out, &collapsed);
                    }
                } else {
                    escape_text(&mut self.out, text);
                }
            }
            NodeKind::Data { data } => self.out.push_str(data),
            NodeKind::Comment { text } => {
                if formatting {
                    self.indent(depth);
                }
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
        }
    }

    fn close(&mut self, id: NodeId, depth: usize, block: bool) {
        let dom = self.dom;
        let Some(tag) = dom.tag_name(id) else {
            return;
        };
        let has_block_child = dom
            .children(id)
            .into_iter()
            .any(|child| dom.tag_name(child).is_some_and(is_block));
        if block && has_block_child {
            self.indent(depth);
        }
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }
}

impl DOM {
    /// Markup of the node itself and its subtree. A document prints its children.
    pub fn outer_html(&self, id: NodeId, settings: OutputSettings) -> String {
        let mut printer = Printer {
            dom: self,
            settings,
            out: String::new(),
        };
        let formatting = printer.formatting(id);
        printer.run(vec![Step::Open {
            id,
            depth: 0,
            formatting,
        }]);
        printer.out
    }

    /// Markup of the node's children.
    pub fn inner_html(&self, id: NodeId, settings: OutputSettings) -> String {
        let mut printer = Printer {
            dom: self,
            settings,
            out: String::new(),
        };
        let mut steps = Vec::new();
        printer.queue_children(&mut steps, id, 0, printer.formatting(id));
        printer.run(steps);
        printer.out
    }
}

impl fmt::Debug for DOM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DOM ({} nodes)", self.len())?;
        for document in &self.documents {
            let mut pending = vec![(*document, 0_usize)];
            while let Some((id, depth)) = pending.pop() {
                let Some(node) = self.get(id) else {
                    continue;
                };
                for _ in 0..depth {
                    f.write_str("  ")?;
                }
                match &node.kind {
                    NodeKind::Element { tag } => {
                        write!(f, "<{tag}")?;
                        for (key, value) in node.attrs.iter() {
                            write!(f, " {key}={value:?}")?;
                        }
                        writeln!(f, ">")?;
                    }
                    NodeKind::Text { text } => writeln!(f, "{text:?}")?,
                    NodeKind::Data { data } => writeln!(f, "#data {data:?}")?,
                    NodeKind::Comment { text } => writeln!(f, "<!--{text}-->")?,
                    NodeKind::Doctype { name, .. } => writeln!(f, "<!doctype {name}>")?,
                    NodeKind::Document => writeln!(f, "#document")?,
                }
                for child in self.children(id).into_iter().rev() {
                    pending.push((child, depth + 1));
                }
            }
        }
        Ok(())
    }
}

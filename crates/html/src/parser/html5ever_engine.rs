use std::rc::Rc;

use anyhow::{Error, anyhow};
use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{LocalName, Namespace, ParseOpts, QualName, parse_document, parse_fragment};
use indextree::NodeId;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::dom::{DOM, DOMNode, NodeKind};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

fn parse_opts() -> ParseOpts {
    ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    }
}

/// Runs html5ever into an `RcDom` and copies the result into the shared arena.
pub struct Html5everEngine<'dom> {
    dom: &'dom mut DOM,
}

impl<'dom> Html5everEngine<'dom> {
    pub fn new(dom: &'dom mut DOM) -> Self {
        Self { dom }
    }

    /// Parses a complete document.
    ///
    /// # Errors
    /// Returns an error if the input cannot be read or the tree cannot be copied.
    pub fn document(&mut self, html: &str, base_uri: &str) -> Result<NodeId, Error> {
        let parsed = parse_document(RcDom::default(), parse_opts())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        let document = self.dom.create_document(base_uri);
        let mut pending = Vec::new();
        queue_children(&mut pending, &parsed.document, Some(document), false);
        self.copy(pending)?;
        log::debug!(
            "Parsed document {document:?} ({} bytes, {} nodes in arena)",
            html.len(),
            self.dom.len()
        );
        Ok(document)
    }

    /// Parses `html` as the content of a `context` element. The returned nodes
    /// are detached and in source order.
    ///
    /// # Errors
    /// Returns an error if the input cannot be read or the tree cannot be copied.
    pub fn fragment(&mut self, html: &str, context: &str) -> Result<Vec<NodeId>, Error> {
        let context_name = QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from(context),
        );
        let parsed = parse_fragment(RcDom::default(), parse_opts(), context_name, Vec::new(), false)
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        // Fragment content hangs off a synthetic html element.
        let root = parsed
            .document
            .children
            .borrow()
            .first()
            .map(Rc::clone)
            .ok_or_else(|| anyhow!("Fragment parse in <{context}> produced no root"))?;
        let mut pending = Vec::new();
        queue_children(&mut pending, &root, None, matches!(context, "script" | "style"));
        let nodes = self.copy(pending)?;
        log::trace!("Parsed {} fragment nodes in <{context}>", nodes.len());
        Ok(nodes)
    }

    /// Copies queued nodes into the arena with an explicit work stack, so
    /// nesting depth never grows the call stack. Nodes queued without a parent
    /// are returned in source order.
    fn copy(&mut self, mut pending: Vec<Pending>) -> Result<Vec<NodeId>, Error> {
        let mut detached = Vec::new();
        while let Some(Pending {
            handle,
            parent,
            in_data,
        }) = pending.pop()
        {
            let Some(id) = self.create(&handle, in_data) else {
                continue;
            };
            match parent {
                Some(parent) => self.dom.append_child(parent, id)?,
                None => detached.push(id),
            }
            if let NodeData::Element {
                template_contents, ..
            } = &handle.data
            {
                // Template contents follow the element's own children.
                if let Some(contents) = template_contents.borrow().as_ref() {
                    queue_children(&mut pending, contents, Some(id), false);
                }
                queue_children(&mut pending, &handle, Some(id), self.dom.holds_data(id));
            }
        }
        Ok(detached)
    }

    fn create(&mut self, handle: &Handle, in_data: bool) -> Option<NodeId> {
        let node = match &handle.data {
            NodeData::Document | NodeData::ProcessingInstruction { .. } => return None,
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => DOMNode::new(NodeKind::Doctype {
                name: name.to_string(),
                public_id: public_id.to_string(),
                system_id: system_id.to_string(),
            }),
            NodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if in_data {
                    DOMNode::new(NodeKind::Data { data: text })
                } else {
                    DOMNode::new(NodeKind::Text { text })
                }
            }
            NodeData::Comment { contents } => DOMNode::new(NodeKind::Comment {
                text: contents.to_string(),
            }),
            NodeData::Element { name, attrs, .. } => {
                let mut element = DOMNode::new(NodeKind::Element {
                    tag: name.local.to_string(),
                });
                for attr in attrs.borrow().iter() {
                    let key = match &attr.name.prefix {
                        Some(prefix) => format!("{prefix}:{}", attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    element.attrs.push((key, attr.value.to_string()));
                }
                element
            }
        };
        Some(self.dom.create_node(node))
    }
}

/// A parsed node waiting to be copied under `parent`.
struct Pending {
    handle: Handle,
    parent: Option<NodeId>,
    in_data: bool,
}

/// Queues the children of `handle` so they pop off the stack in source order.
fn queue_children(
    pending: &mut Vec<Pending>,
    handle: &Handle,
    parent: Option<NodeId>,
    in_data: bool,
) {
    for child in handle.children.borrow().iter().rev() {
        pending.push(Pending {
            handle: Rc::clone(child),
            parent,
            in_data,
        });
    }
}

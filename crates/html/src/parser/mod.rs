//! HTML parsing into the shared [`DOM`] arena.

mod html5ever_engine;

use anyhow::Error;
use indextree::NodeId;

use crate::dom::DOM;
pub use html5ever_engine::Html5everEngine;

/// Parses a full document and returns its root.
///
/// The first `<base href>` in the document overrides `base_uri`.
///
/// # Errors
/// Returns an error if html5ever output cannot be copied into the arena.
pub fn parse_document(dom: &mut DOM, html: &str, base_uri: &str) -> Result<NodeId, Error> {
    let document = Html5everEngine::new(dom).document(html, base_uri)?;
    apply_base_element(dom, document);
    Ok(document)
}

/// Parses `html` as body content and places it in an `html`/`head`/`body` shell.
///
/// # Errors
/// Returns an error if html5ever output cannot be copied into the arena.
pub fn parse_body_fragment(dom: &mut DOM, html: &str, base_uri: &str) -> Result<NodeId, Error> {
    let nodes = parse_fragment_nodes(dom, html, "body")?;
    let document = dom.create_document(base_uri);
    let root = dom.create_element("html")?;
    let head = dom.create_element("head")?;
    let body = dom.create_element("body")?;
    dom.append_child(document, root)?;
    dom.append_child(root, head)?;
    dom.append_child(root, body)?;
    for node in nodes {
        dom.append_child(body, node)?;
    }
    Ok(document)
}

/// Parses `html` as the content of a `context` element, returning detached nodes.
///
/// # Errors
/// Returns an error if html5ever output cannot be copied into the arena.
pub fn parse_fragment_nodes(dom: &mut DOM, html: &str, context: &str) -> Result<Vec<NodeId>, Error> {
    Html5everEngine::new(dom).fragment(html, context)
}

fn apply_base_element(dom: &mut DOM, document: NodeId) {
    let Some(base) = dom
        .descendants(document)
        .into_iter()
        .find(|node| dom.tag_name(*node) == Some("base") && dom.has_attr(*node, "href"))
    else {
        return;
    };
    let href = dom.abs_url(base, "href");
    if !href.is_empty() {
        log::debug!("Document {document:?} takes base URI {href} from <base>");
        dom.set_base_uri(document, &href);
    }
}

//! Selector compilation and scoped matching.

use anyhow::{Error, anyhow};
use cssparser::{Parser, ParserInput};
use html::{DOM, NodeId};
use selectors::Element as _;
use selectors::NthIndexCache;
use selectors::matching::{
    IgnoreNthChildForInvalidation, MatchingContext, MatchingMode, NeedsSelectorFlags, QuirksMode,
    matches_selector,
};
use selectors::parser::ParseRelative;

use crate::SelectorList;
use crate::element::ElementWrapper;
use crate::parser::{DomSelectorImpl, SelectorParser};

/// Parses a comma-separated selector group.
///
/// # Errors
/// Returns an error if the selector is empty or not valid CSS.
pub fn compile(css: &str) -> Result<SelectorList, Error> {
    let trimmed = css.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Selector must not be empty"));
    }
    let mut input = ParserInput::new(trimmed);
    let mut parser = Parser::new(&mut input);
    SelectorList::parse(&SelectorParser, &mut parser, ParseRelative::No)
        .map_err(|err| anyhow!("Invalid selector {trimmed:?}: {:?}", err.kind))
}

fn any_matches(
    list: &SelectorList,
    element: &ElementWrapper<'_>,
    context: &mut MatchingContext<'_, DomSelectorImpl>,
) -> bool {
    list.0
        .iter()
        .any(|selector| matches_selector(selector, 0, None, element, context))
}

/// Runs `visit` over every element at or below `scope`, in document order,
/// with `:scope` bound to `scope` when it is an element.
fn walk_scope<F>(list: &SelectorList, dom: &DOM, scope: NodeId, mut visit: F)
where
    F: FnMut(NodeId, bool) -> bool,
{
    let mut nth_index_cache = NthIndexCache::default();
    let mut context = MatchingContext::new(
        MatchingMode::Normal,
        None,
        &mut nth_index_cache,
        QuirksMode::NoQuirks,
        NeedsSelectorFlags::No,
        IgnoreNthChildForInvalidation::No,
    );
    if dom.is_element(scope) {
        context.scope_element = Some(ElementWrapper::new(scope, dom).opaque());
    }

    for node in dom.descendants(scope) {
        if !dom.is_element(node) {
            continue;
        }
        let element = ElementWrapper::new(node, dom);
        let matched = any_matches(list, &element, &mut context);
        if !visit(node, matched) {
            break;
        }
    }
}

/// Elements at or below `scope` matching `list`, in document order.
pub fn select(list: &SelectorList, dom: &DOM, scope: NodeId) -> Vec<NodeId> {
    let mut found = Vec::new();
    walk_scope(list, dom, scope, |node, matched| {
        if matched {
            found.push(node);
        }
        true
    });
    log::trace!("Selector matched {} elements under {scope:?}", found.len());
    found
}

/// First element at or below `scope` matching `list`.
pub fn select_first(list: &SelectorList, dom: &DOM, scope: NodeId) -> Option<NodeId> {
    let mut first = None;
    walk_scope(list, dom, scope, |node, matched| {
        if matched {
            first = Some(node);
        }
        !matched
    });
    first
}

/// Whether a single element matches `list`.
pub fn matches(list: &SelectorList, dom: &DOM, node: NodeId) -> bool {
    if !dom.is_element(node) {
        return false;
    }
    let mut nth_index_cache = NthIndexCache::default();
    let mut context = MatchingContext::new(
        MatchingMode::Normal,
        None,
        &mut nth_index_cache,
        QuirksMode::NoQuirks,
        NeedsSelectorFlags::No,
        IgnoreNthChildForInvalidation::No,
    );
    any_matches(list, &ElementWrapper::new(node, dom), &mut context)
}

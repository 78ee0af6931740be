//! Selector matching against parsed documents, including scoped selection and
//! the text-search pseudo-classes.

use css_selectors::{SelectorCache, compile, matches, select, select_first};
use html::parser::parse_document;
use html::{DOM, NodeId};

const PAGE: &str = "<div id='main' class='box'>\
    <p class='a'>One</p>\
    <p>Two <b>Bold</b></p>\
    <script>var Token = 1;</script>\
    </div>";

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn parse(dom: &mut DOM) -> NodeId {
    parse_document(dom, PAGE, "").unwrap()
}

fn run(dom: &DOM, scope: NodeId, css: &str) -> Vec<NodeId> {
    let list = compile(css).unwrap_or_else(|err| panic!("{css} should compile: {err}"));
    select(&list, dom, scope)
}

fn texts(dom: &DOM, nodes: &[NodeId]) -> Vec<String> {
    nodes.iter().map(|node| dom.text(*node)).collect()
}

#[test]
fn selects_in_document_order() {
    init();
    let mut dom = DOM::new();
    let doc = parse(&mut dom);
    let found = run(&dom, doc, "p");
    assert_eq!(texts(&dom, &found), ["One", "Two Bold"]);
}

#[test]
fn scoped_selection_includes_the_scope() {
    init();
    let mut dom = DOM::new();
    let doc = parse(&mut dom);
    let div = dom.find_element(doc, "div").unwrap();
    assert_eq!(run(&dom, div, "div"), vec![div]);
    assert_eq!(run(&dom, div, "#main p").len(), 2, "ancestors outside the scope still count");
}

#[test]
fn scope_pseudo_class_binds_to_context_element() {
    init();
    let mut dom = DOM::new();
    let doc = parse(&mut dom);
    let div = dom.find_element(doc, "div").unwrap();
    assert_eq!(run(&dom, div, ":scope > p").len(), 2);
    assert!(run(&dom, div, ":scope > b").is_empty());
}

#[test]
fn first_match_only() {
    init();
    let mut dom = DOM::new();
    let doc = parse(&mut dom);
    let list = compile("p, b").unwrap();
    let first = select_first(&list, &dom, doc).unwrap();
    assert_eq!(dom.text(first), "One");
    let none = compile("table").unwrap();
    assert_eq!(select_first(&none, &dom, doc), None);
}

#[test]
fn contains_family() {
    init();
    let mut dom = DOM::new();
    let doc = parse(&mut dom);
    assert_eq!(texts(&dom, &run(&dom, doc, "p:contains(TWO bold)")), ["Two Bold"]);
    assert!(run(&dom, doc, "p:containsOwn(bold)").is_empty());
    assert_eq!(run(&dom, doc, "b:containsOwn(\"Bold\")").len(), 1);
    assert_eq!(run(&dom, doc, "p:containsWholeText(Two )").len(), 1);
    assert!(run(&dom, doc, "p:containsWholeText(two)").is_empty());
    assert_eq!(run(&dom, doc, "script:containsData(token)").len(), 1);
}

#[test]
fn attribute_and_structural_selectors() {
    init();
    let mut dom = DOM::new();
    let doc = parse(&mut dom);
    assert_eq!(run(&dom, doc, "[class^=bo]").len(), 1);
    assert_eq!(run(&dom, doc, "[class~=a]").len(), 1);
    assert_eq!(run(&dom, doc, "[ID=main]").len(), 1);
    assert_eq!(texts(&dom, &run(&dom, doc, "p:not(.a)")), ["Two Bold"]);
    assert_eq!(texts(&dom, &run(&dom, doc, "p:nth-child(2)")), ["Two Bold"]);
    assert_eq!(texts(&dom, &run(&dom, doc, "p:first-child")), ["One"]);
    assert_eq!(run(&dom, doc, ":root").len(), 1);
}

#[test]
fn single_element_match() {
    init();
    let mut dom = DOM::new();
    let doc = parse(&mut dom);
    let bold = dom.find_element(doc, "b").unwrap();
    assert!(matches(&compile("p > b").unwrap(), &dom, bold));
    assert!(!matches(&compile("div > b").unwrap(), &dom, bold));
    assert!(!matches(&compile("*").unwrap(), &dom, doc), "documents are not elements");
}

#[test]
fn invalid_selectors_are_rejected() {
    init();
    for css in ["", "   ", "p:unknown(x)", "div >", "p:contains()", "::nope"] {
        assert!(compile(css).is_err(), "{css:?} should not compile");
    }
}

#[test]
fn cache_hands_out_working_lists() {
    init();
    let mut dom = DOM::new();
    let doc = parse(&mut dom);
    let mut cache = SelectorCache::default();
    let list = cache.compile("p.a").unwrap();
    assert_eq!(select(&list, &dom, doc).len(), 1);
    let again = cache.compile("p.a").unwrap();
    assert_eq!(select(&again, &dom, doc).len(), 1);
}

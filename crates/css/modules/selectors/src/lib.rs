//! Selectors Level 4 matching over the [`html::DOM`] arena.
//!
//! Parsing and matching are delegated to the `selectors` crate. This crate
//! supplies the element adapter and the text-search pseudo-classes:
//! - `:contains(text)` and `:containsOwn(text)`, case-insensitive over normalized text
//! - `:containsWholeText(text)` and `:containsWholeOwnText(text)`, case-sensitive over raw text
//! - `:containsData(text)`, over script/style payloads and comments
#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

use selectors::parser::SelectorList as ParsedSelectorList;

mod cache;
mod element;
mod matcher;
mod parser;

pub use cache::SelectorCache;
pub use element::ElementWrapper;
pub use matcher::{compile, matches, select, select_first};
pub use parser::{AttrString, DomSelectorImpl, NamespaceUrl, PseudoClass, PseudoElement, SelectorParser};

/// A parsed, comma-separated selector group.
pub type SelectorList = ParsedSelectorList<DomSelectorImpl>;

//! HTML document engine: an arena of parsed trees plus the primitives the
//! bridge layer needs to read, serialize and mutate them.
#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]
#![allow(
    clippy::min_ident_chars,
    reason = "Short variable names acceptable in parsing context"
)]

pub mod dom;
pub mod parser;

pub use dom::printing::OutputSettings;
pub use dom::{DOM, DOMNode, NodeId, NodeKind};

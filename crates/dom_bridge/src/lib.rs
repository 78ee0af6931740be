//! Handle-based access to parsed HTML documents.
//!
//! Callers on the far side of a language boundary never see a node. They hold
//! integer [`Handle`]s that the [`Bridge`] resolves, type-checks and maps onto
//! the `html` engine's arena. Failures never cross the boundary as errors; each
//! operation answers with its sentinel instead.
#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

mod bridge;
pub mod config;
pub mod registry;

pub use bridge::{Bridge, SharedBridge};
pub use config::BridgeConfig;
pub use registry::{Capability, Entry, Handle, HandleRegistry, INVALID_HANDLE};

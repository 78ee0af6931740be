//! Parsing markup into new documents and running selectors.

use html::parser::{parse_body_fragment, parse_document};

use super::{Bridge, settle};
use crate::registry::{Entry, Handle, INVALID_HANDLE};

impl Bridge {
    /// Parses a full document. Returns a document handle.
    pub fn parse(&mut self, html: &str, base_uri: &str) -> Handle {
        match settle("parse", parse_document(&mut self.dom, html, base_uri)) {
            Some(document) => self.registry.allocate(Entry::Document(document)),
            None => INVALID_HANDLE,
        }
    }

    /// Parses `html` as body content of an otherwise empty document.
    pub fn parse_fragment(&mut self, html: &str, base_uri: &str) -> Handle {
        match settle(
            "parse_fragment",
            parse_body_fragment(&mut self.dom, html, base_uri),
        ) {
            Some(document) => self.registry.allocate(Entry::Document(document)),
            None => INVALID_HANDLE,
        }
    }

    /// Collection of the elements at or below `handle` that match `css`.
    pub fn select(&mut self, handle: Handle, css: &str) -> Handle {
        let Some(scope) = self.element(handle) else {
            return INVALID_HANDLE;
        };
        let Some(list) = settle("select", self.selectors.compile(css)) else {
            return INVALID_HANDLE;
        };
        let found = css_selectors::select(&list, &self.dom, scope);
        self.wrap_collection(found)
    }

    /// First element at or below `handle` matching `css`.
    pub fn select_first(&mut self, handle: Handle, css: &str) -> Handle {
        let Some(scope) = self.element(handle) else {
            return INVALID_HANDLE;
        };
        let Some(list) = settle("select_first", self.selectors.compile(css)) else {
            return INVALID_HANDLE;
        };
        let found = css_selectors::select_first(&list, &self.dom, scope);
        self.wrap_optional(found)
    }
}

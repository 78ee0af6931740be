//! Base URI bookkeeping and absolute URL resolution.

use indextree::NodeId;
use url::Url;

use super::DOM;

/// Prefix that turns an attribute read into an absolute URL read.
const ABS_PREFIX: &str = "abs:";

/// Resolves `relative` against `base`.
///
/// When `base` is empty or not a valid URL, `relative` must itself be absolute.
pub fn resolve(base: &str, relative: &str) -> Option<Url> {
    let relative = relative.trim();
    match Url::parse(base) {
        Ok(base_url) => base_url.join(relative).ok(),
        Err(_) => Url::parse(relative).ok(),
    }
}

fn strip_abs_prefix(key: &str) -> Option<&str> {
    let prefix = key.get(..ABS_PREFIX.len())?;
    prefix
        .eq_ignore_ascii_case(ABS_PREFIX)
        .then(|| &key[ABS_PREFIX.len()..])
}

impl DOM {
    /// Base URI of the nearest node, starting at `id`, that records one.
    pub fn base_uri(&self, id: NodeId) -> String {
        self.ancestors(id)
            .into_iter()
            .find_map(|ancestor| self.get(ancestor).and_then(|node| node.base_uri.clone()))
            .unwrap_or_default()
    }

    /// Records a base URI on an element or document. Other nodes ignore it.
    pub fn set_base_uri(&mut self, id: NodeId, uri: &str) -> bool {
        match self.get_mut(id) {
            Some(node) if node.is_element() || node.is_document() => {
                node.base_uri = Some(uri.to_owned());
                true
            }
            _ => false,
        }
    }

    /// Absolute form of the URL held in attribute `key`, or an empty string if
    /// the attribute is missing or does not resolve.
    pub fn abs_url(&self, id: NodeId, key: &str) -> String {
        let Some(value) = self.attr(id, key) else {
            return String::new();
        };
        resolve(&self.base_uri(id), value).map(String::from).unwrap_or_default()
    }

    /// Attribute read that understands the `abs:` prefix.
    ///
    /// Returns `Some("")` for a present but empty attribute and `None` when the
    /// attribute is missing.
    pub fn attr_resolved(&self, id: NodeId, key: &str) -> Option<String> {
        if let Some(value) = self.attr(id, key).filter(|value| !value.is_empty()) {
            return Some(value.to_owned());
        }
        if let Some(target) = strip_abs_prefix(key) {
            let absolute = self.abs_url(id, target);
            if !absolute.is_empty() {
                return Some(absolute);
            }
        }
        self.has_attr(id, key).then(String::new)
    }

    /// Presence check that understands the `abs:` prefix: `abs:key` is present
    /// when `key` exists and resolves.
    pub fn has_attr_resolved(&self, id: NodeId, key: &str) -> bool {
        let resolves = strip_abs_prefix(key)
            .is_some_and(|target| self.has_attr(id, target) && !self.abs_url(id, target).is_empty());
        resolves || self.has_attr(id, key)
    }
}

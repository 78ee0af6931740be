//! Compiled selector cache.
//!
//! Selector text is parsed once and reused until the cache fills up, at which
//! point it starts over.

use core::fmt;
use std::collections::HashMap;

use anyhow::Error;

use crate::SelectorList;
use crate::matcher::compile;

const DEFAULT_CAPACITY: usize = 256;

pub struct SelectorCache {
    compiled: HashMap<String, SelectorList>,
    capacity: usize,
}

impl fmt::Debug for SelectorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorCache")
            .field("entries", &self.compiled.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SelectorCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            compiled: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Returns the compiled form of `css`, parsing it on first use.
    ///
    /// # Errors
    /// Returns an error if `css` is not a valid selector. Failures are not cached.
    pub fn compile(&mut self, css: &str) -> Result<SelectorList, Error> {
        if let Some(list) = self.compiled.get(css) {
            return Ok(list.clone());
        }
        let list = compile(css)?;
        if self.compiled.len() >= self.capacity {
            log::trace!("Selector cache full ({} entries), clearing", self.compiled.len());
            self.compiled.clear();
        }
        self.compiled.insert(css.to_owned(), list.clone());
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn clear(&mut self) {
        self.compiled.clear();
    }
}

//! Runtime configuration for the bridge.
//!
//! Settings control how markup is written back out and how many live handles
//! a session may hold before the registry starts warning. They can be loaded
//! from environment variables or constructed programmatically.

use std::env;

use html::OutputSettings;

/// Largest indent accepted for pretty printed output.
const MAX_INDENT: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Whether serialized HTML is indented
    pub pretty_print: bool,
    /// Spaces per nesting level when pretty printing
    pub indent_amount: usize,
    /// Optional soft ceiling on live handles
    pub max_handles: Option<usize>,
}

impl BridgeConfig {
    /// Construct a new `BridgeConfig` with explicit values.
    ///
    /// # Arguments
    ///
    /// * `pretty_print` - Whether HTML output is indented
    /// * `indent_amount` - Spaces per indent level (clamped to 8)
    /// * `max_handles` - Live handle count above which allocation logs a warning
    ///
    /// # Returns
    ///
    /// A new `BridgeConfig` instance with the specified settings
    #[inline]
    #[must_use]
    pub const fn new(pretty_print: bool, indent_amount: usize, max_handles: Option<usize>) -> Self {
        let indent = if indent_amount > MAX_INDENT {
            MAX_INDENT
        } else {
            indent_amount
        };
        Self {
            pretty_print,
            indent_amount: indent,
            max_handles,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `DOM_BRIDGE_PRETTY_PRINT`: Set to "1" to indent HTML output (default: disabled)
    /// - `DOM_BRIDGE_INDENT`: Spaces per indent level (default: 1)
    /// - `DOM_BRIDGE_MAX_HANDLES`: Soft ceiling on live handles (default: none)
    ///
    /// # Returns
    ///
    /// A new `BridgeConfig` instance populated from environment variables
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key-value source, using the same keys,
    /// defaults and clamps as [`BridgeConfig::from_env`].
    #[inline]
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pretty_print =
            lookup("DOM_BRIDGE_PRETTY_PRINT").is_some_and(|val| val.trim() == "1");
        let indent_amount = lookup("DOM_BRIDGE_INDENT")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(1);
        let max_handles = lookup("DOM_BRIDGE_MAX_HANDLES")
            .and_then(|val| val.trim().parse::<usize>().ok());
        Self::new(pretty_print, indent_amount, max_handles)
    }

    /// Serializer settings derived from this configuration.
    #[inline]
    #[must_use]
    pub const fn output_settings(&self) -> OutputSettings {
        OutputSettings {
            pretty_print: self.pretty_print,
            indent_amount: self.indent_amount,
        }
    }
}

impl Default for BridgeConfig {
    #[inline]
    fn default() -> Self {
        Self::new(false, 1, None)
    }
}

//! Selector implementation types and the selector parser.

use core::borrow::Borrow;
use core::fmt;

use cssparser::{CowRcStr, ParseError, Parser, SourceLocation, ToCss, serialize_identifier, serialize_string};
use precomputed_hash::PrecomputedHash;
use selectors::SelectorImpl;
use selectors::parser::{
    NonTSPseudoClass, Parser as SelectorParserImpl, PseudoElement as PseudoElementImpl,
    SelectorParseErrorKind,
};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// FNV-1a, used for the selector bloom-filter hashes.
fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0x811c_9dc5_u32, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(0x0100_0193)
    })
}

/// Owned string used for identifiers, local names and attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AttrString(pub String);

impl From<&str> for AttrString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Borrow<str> for AttrString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AttrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PrecomputedHash for AttrString {
    fn precomputed_hash(&self) -> u32 {
        fnv1a(self.0.as_bytes())
    }
}

impl ToCss for AttrString {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        serialize_identifier(&self.0, dest)
    }
}

/// Every element lives in the HTML namespace, so there is only one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NamespaceUrl;

impl From<&str> for NamespaceUrl {
    fn from(_: &str) -> Self {
        Self
    }
}

impl AsRef<str> for NamespaceUrl {
    fn as_ref(&self) -> &str {
        HTML_NAMESPACE
    }
}

impl PrecomputedHash for NamespaceUrl {
    fn precomputed_hash(&self) -> u32 {
        fnv1a(HTML_NAMESPACE.as_bytes())
    }
}

impl ToCss for NamespaceUrl {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        serialize_string(HTML_NAMESPACE, dest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomSelectorImpl;

impl SelectorImpl for DomSelectorImpl {
    type ExtraMatchingData<'a> = ();
    type AttrValue = AttrString;
    type Identifier = AttrString;
    type LocalName = AttrString;
    type NamespacePrefix = AttrString;
    type NamespaceUrl = NamespaceUrl;
    type BorrowedLocalName = str;
    type BorrowedNamespaceUrl = NamespaceUrl;
    type NonTSPseudoClass = PseudoClass;
    type PseudoElement = PseudoElement;
}

/// Text-search pseudo-classes. Each carries its search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    Contains(String),
    ContainsOwn(String),
    ContainsWholeText(String),
    ContainsWholeOwnText(String),
    ContainsData(String),
}

impl PseudoClass {
    fn parts(&self) -> (&'static str, &str) {
        match self {
            Self::Contains(text) => ("contains", text),
            Self::ContainsOwn(text) => ("containsOwn", text),
            Self::ContainsWholeText(text) => ("containsWholeText", text),
            Self::ContainsWholeOwnText(text) => ("containsWholeOwnText", text),
            Self::ContainsData(text) => ("containsData", text),
        }
    }
}

impl NonTSPseudoClass for PseudoClass {
    type Impl = DomSelectorImpl;

    fn is_active_or_hover(&self) -> bool {
        false
    }

    fn is_user_action_state(&self) -> bool {
        false
    }
}

impl ToCss for PseudoClass {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let (name, text) = self.parts();
        dest.write_char(':')?;
        dest.write_str(name)?;
        dest.write_char('(')?;
        serialize_string(text, dest)?;
        dest.write_char(')')
    }
}

/// No pseudo-elements are supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoElement {}

impl PseudoElementImpl for PseudoElement {
    type Impl = DomSelectorImpl;
}

impl ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

/// Strips one pair of matching quotes.
fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}

/// Reads the raw argument of a functional pseudo-class up to its closing parenthesis.
fn read_search_text<'i>(
    parser: &mut Parser<'i, '_>,
) -> Result<String, ParseError<'i, SelectorParseErrorKind<'i>>> {
    let start = parser.position();
    while parser.next_including_whitespace().is_ok() {}
    let text = unquote(parser.slice_from(start).trim());
    if text.is_empty() {
        return Err(parser.new_custom_error(SelectorParseErrorKind::EmptySelector));
    }
    Ok(text.to_owned())
}

/// Parser for CSS selectors.
pub struct SelectorParser;

impl<'i> SelectorParserImpl<'i> for SelectorParser {
    type Impl = DomSelectorImpl;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_non_ts_pseudo_class(
        &self,
        location: SourceLocation,
        name: CowRcStr<'i>,
    ) -> Result<PseudoClass, ParseError<'i, SelectorParseErrorKind<'i>>> {
        Err(location.new_custom_error(
            SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name),
        ))
    }

    fn parse_pseudo_element(
        &self,
        location: SourceLocation,
        name: CowRcStr<'i>,
    ) -> Result<PseudoElement, ParseError<'i, SelectorParseErrorKind<'i>>> {
        Err(location.new_custom_error(
            SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name),
        ))
    }

    fn parse_non_ts_functional_pseudo_class<'t>(
        &self,
        name: CowRcStr<'i>,
        parser: &mut Parser<'i, 't>,
    ) -> Result<PseudoClass, ParseError<'i, SelectorParseErrorKind<'i>>> {
        let build: fn(String) -> PseudoClass = match name.to_ascii_lowercase().as_str() {
            "contains" => PseudoClass::Contains,
            "containsown" => PseudoClass::ContainsOwn,
            "containswholetext" => PseudoClass::ContainsWholeText,
            "containswholeowntext" => PseudoClass::ContainsWholeOwnText,
            "containsdata" => PseudoClass::ContainsData,
            _ => {
                return Err(parser.new_custom_error(
                    SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name),
                ));
            }
        };
        read_search_text(parser).map(build)
    }

    fn default_namespace(&self) -> Option<NamespaceUrl> {
        None
    }

    fn namespace_for_prefix(&self, _prefix: &AttrString) -> Option<NamespaceUrl> {
        None
    }
}

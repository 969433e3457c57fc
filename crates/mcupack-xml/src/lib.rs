//! Namespace-tolerant element tree over quick-xml for device-pack documents.
//!
//! Vendor packs mix qualified (`edc:Pin`, `at:extension`) and unqualified forms
//! of the same tag and attribute, and write numbers in either decimal or `0x`
//! hexadecimal. Every lookup here compares local names and every numeric
//! accessor falls back to a default, so extractors never have to care.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml: {0}")]
    Xml(String),
    #[error("invalid UTF-8: {0}")]
    Utf8(String),
    #[error("invalid document: {0}")]
    Invalid(String),
}

/// Parsed document holding the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse an XML text buffer into an owned element tree.
    ///
    /// Fails only when the buffer is not well-formed XML.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    stack.push(element_from_start(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let element = element_from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| XmlError::Invalid("unexpected closing tag".into()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|err| XmlError::Xml(err.to_string()))?;
                    push_text(&mut stack, &text);
                }
                Ok(Event::CData(c)) => {
                    let raw = c.into_inner();
                    push_text(&mut stack, &String::from_utf8_lossy(&raw));
                }
                Ok(Event::Eof) => break,
                Err(err) => return Err(XmlError::Xml(err.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::Invalid(format!(
                "unclosed element <{}>",
                open.name
            )));
        }
        let root = root.ok_or_else(|| XmlError::Invalid("document has no root element".into()))?;
        trace!(root = %root.name, "parsed document");
        Ok(Document { root })
    }

    /// Parse a raw byte buffer, rejecting non UTF-8 input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XmlError> {
        let text = std::str::from_utf8(bytes).map_err(|err| XmlError::Utf8(err.to_string()))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self::parse(text)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(XmlError::Invalid(format!(
            "multiple root elements (second is <{}>)",
            element.name
        )))
    }
}

fn push_text(stack: &mut [Element], text: &str) {
    if let Some(current) = stack.last_mut() {
        if !current.text.is_empty() {
            current.text.push(' ');
        }
        current.text.push_str(text.trim());
    }
}

fn element_from_start(event: &BytesStart<'_>) -> Result<Element, XmlError> {
    let name = String::from_utf8_lossy(event.name().as_ref()).to_string();
    let mut attributes = Vec::new();
    for attr in event.attributes() {
        let attr = attr.map_err(|err| XmlError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Xml(err.to_string()))?;
        attributes.push((key, value.trim().to_string()));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

/// Strip a namespace prefix (`edc:Pin` -> `Pin`).
pub fn local_name(name: &str) -> &str {
    match name.rsplit_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

/// Parse decimal or `0x`-prefixed hexadecimal text.
pub fn parse_number(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).ok()
    } else {
        trimmed.parse().ok()
    }
}

/// Signed variant of [`parse_number`] accepting a leading `-` or `+`.
pub fn parse_signed(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('-') {
        parse_number(rest).and_then(|v| i64::try_from(v).ok()).map(|v| -v)
    } else {
        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
        parse_number(rest).and_then(|v| i64::try_from(v).ok())
    }
}

/// Owned XML element with namespace-tolerant accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Qualified tag name as written in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Whether this element is `tag`, ignoring namespace prefixes on either side.
    pub fn is(&self, tag: &str) -> bool {
        self.local_name() == local_name(tag)
    }

    /// Concatenated text content of this element (not of its descendants).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Attribute lookup trying the exact key first, then the local name.
    ///
    /// Empty values are treated as absent.
    pub fn attr(&self, name: &str) -> Option<&str> {
        let exact = self
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .or_else(|| {
                let wanted = local_name(name);
                self.attributes
                    .iter()
                    .find(|(key, _)| !key.starts_with("xmlns") && local_name(key) == wanted)
            });
        exact
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn attr_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attr(name).unwrap_or(default)
    }

    /// Owned attribute value, `default` when absent.
    pub fn attr_string(&self, name: &str, default: &str) -> String {
        self.attr_or(name, default).to_string()
    }

    /// Base-16 attribute (optional `0x` prefix); 0 on absence or parse failure.
    pub fn attr_hex(&self, name: &str) -> u64 {
        self.attr(name)
            .and_then(|value| {
                let value = value.trim();
                let digits = value
                    .strip_prefix("0x")
                    .or_else(|| value.strip_prefix("0X"))
                    .unwrap_or(value);
                u64::from_str_radix(digits, 16).ok()
            })
            .unwrap_or(0)
    }

    /// Attribute parsed in the given radix; 0 on absence or parse failure.
    pub fn attr_int(&self, name: &str, radix: u32) -> i64 {
        self.attr(name)
            .and_then(|value| {
                let value = value.trim();
                let value = if radix == 16 {
                    value
                        .strip_prefix("0x")
                        .or_else(|| value.strip_prefix("0X"))
                        .unwrap_or(value)
                } else {
                    value
                };
                i64::from_str_radix(value, radix).ok()
            })
            .unwrap_or(0)
    }

    /// Decimal or `0x` hexadecimal attribute.
    pub fn attr_num(&self, name: &str) -> Option<u64> {
        self.attr(name).and_then(parse_number)
    }

    pub fn attr_signed(&self, name: &str) -> Option<i64> {
        self.attr(name).and_then(parse_signed)
    }

    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attr(name).and_then(|value| value.trim().parse().ok())
    }

    /// All child elements in document order.
    pub fn elements(&self) -> std::slice::Iter<'_, Element> {
        self.children.iter()
    }

    /// First direct child matching `tag`.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.is(tag))
    }

    /// Direct children matching `tag`.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.is(tag))
    }

    /// Text of the first child matching `tag`, if non-empty.
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag)
            .map(Element::text)
            .filter(|text| !text.is_empty())
    }

    /// First descendant (excluding `self`) matching `tag`, in document order.
    pub fn descendant(&self, tag: &str) -> Option<&Element> {
        Descendants::new(self).find(|element| element.is(tag))
    }

    /// Every descendant (excluding `self`) matching `tag`, in document order.
    pub fn descendants<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        Descendants::new(self).filter(move |element| element.is(tag))
    }

    /// Descend through a chain of tags, taking the first match at each level.
    pub fn path(&self, tags: &[&str]) -> Option<&Element> {
        tags.iter()
            .try_fold(self, |current, tag| current.child(tag))
    }
}

/// Pre-order walk over an element's descendants.
struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Descendants<'a> {
    fn new(element: &'a Element) -> Self {
        Descendants {
            stack: element.children.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

//! Minimal owned XML tree for editing WordprocessingML parts
//!
//! Elements are matched by qualified name (`w:p`, `wp:extent`). Parts written
//! by Word, LibreOffice and the common libraries always bind the conventional
//! prefixes, and matching on them keeps `m:r` (math) apart from `w:r`.
//! Comments and processing instructions are not preserved.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("{0}")]
pub struct XmlError(String);

impl XmlError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    fn from_display(err: impl Display) -> Self {
        Self(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

// =============================================================================
// Parsing and Serialization
// =============================================================================

/// Parse a complete XML part into its root element
pub fn parse(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(XmlError::from_display)? {
            Event::Start(start) => stack.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::new("unbalanced end tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                // Whitespace outside the root element is dropped
                if let Some(parent) = stack.last_mut() {
                    let text = text.unescape().map_err(XmlError::from_display)?;
                    parent.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let data = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    parent.children.push(Node::CData(data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::new(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| XmlError::new("no root element"))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(XmlError::new("multiple root elements"))
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(XmlError::from_display);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(XmlError::from_display)?;
    for child in &element.children {
        match child {
            Node::Element(el) => write_element(writer, el)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(XmlError::from_display)?,
            Node::CData(data) => writer
                .write_event(Event::CData(BytesCData::new(data.as_str())))
                .map_err(XmlError::from_display)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(XmlError::from_display)
}

// =============================================================================
// Element Access
// =============================================================================

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(XmlError::from_display)?
            .to_string();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(XmlError::from_display)?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(XmlError::from_display)?
                .to_string();
            let value = attr.unescape_value().map_err(XmlError::from_display)?;
            attributes.push((key, value.into_owned()));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Serialize this element as a standalone part, with XML declaration
    pub fn to_xml(&self) -> Result<Vec<u8>, XmlError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(XmlError::from_display)?;
        write_element(&mut writer, self)?;
        Ok(writer.into_inner())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Integer attribute; measurements with unit suffixes read as `None`
    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attr(name).and_then(|value| value.trim().parse().ok())
    }

    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(key, _)| key != name);
    }

    /// Direct child elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    /// Remove direct child elements named `name`, returning how many went
    pub fn remove_children(&mut self, name: &str) -> usize {
        self.retain_elements(|el| el.name != name)
    }

    /// Keep only the direct child elements matching `keep`; text is untouched
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&Element) -> bool) -> usize {
        let before = self.children.len();
        self.children.retain(|node| match node {
            Node::Element(el) => keep(el),
            _ => true,
        });
        before - self.children.len()
    }

    /// Get or create the child `name`, inserting it according to `order`
    ///
    /// `order` lists sibling names in schema sequence. A new child goes
    /// before the first existing sibling that the sequence places after it;
    /// siblings missing from `order` are skipped, so with an empty `order`
    /// the child is appended.
    pub fn ensure_child(&mut self, name: &str, order: &[&str]) -> &mut Element {
        let existing = self.children.iter().position(|node| {
            matches!(node, Node::Element(el) if el.name == name)
        });

        let index = match existing {
            Some(index) => index,
            None => {
                let rank = order.iter().position(|n| *n == name);
                let at = rank
                    .and_then(|rank| {
                        self.children.iter().position(|node| match node {
                            Node::Element(el) => order
                                .iter()
                                .position(|n| *n == el.name)
                                .is_some_and(|other| other > rank),
                            _ => false,
                        })
                    })
                    .unwrap_or(self.children.len());
                self.children.insert(at, Node::Element(Element::new(name)));
                at
            }
        };

        match &mut self.children[index] {
            Node::Element(el) => el,
            Node::Text(_) | Node::CData(_) => unreachable!("index points at an element"),
        }
    }

    /// Get or create the child `name` as the first child (`w:pPr`, `w:rPr`)
    pub fn ensure_first_child(&mut self, name: &str) -> &mut Element {
        let existing = self.children.iter().position(|node| {
            matches!(node, Node::Element(el) if el.name == name)
        });

        let index = match existing {
            Some(index) => index,
            None => {
                self.children.insert(0, Node::Element(Element::new(name)));
                0
            }
        };

        match &mut self.children[index] {
            Node::Element(el) => el,
            Node::Text(_) | Node::CData(_) => unreachable!("index points at an element"),
        }
    }

    /// Whether any descendant element is named `name`
    pub fn contains(&self, name: &str) -> bool {
        self.elements()
            .any(|el| el.name == name || el.contains(name))
    }

    /// Concatenated text of every descendant element named `name`
    pub fn text_of(&self, name: &str) -> String {
        let mut out = String::new();
        self.collect_text(name, false, &mut out);
        out
    }

    fn collect_text(&self, name: &str, inside: bool, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Element(el) => el.collect_text(name, inside || el.name == name, out),
                Node::Text(text) | Node::CData(text) if inside => out.push_str(text),
                _ => {}
            }
        }
    }

    /// Descendants named `name`, without looking inside a match
    pub fn find_outermost<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for el in self.elements() {
            if el.name == name {
                found.push(el);
            } else {
                el.find_outermost(name, found);
            }
        }
    }

    /// Visit every descendant named `name`, pre-order, including matches
    /// nested inside other matches
    pub fn for_each_mut<F: FnMut(&mut Element)>(&mut self, name: &str, f: &mut F) {
        for node in &mut self.children {
            if let Node::Element(el) = node {
                if el.name == name {
                    f(el);
                }
                el.for_each_mut(name, f);
            }
        }
    }

    /// Visit descendants named `name`, without descending into a match
    pub fn for_each_outermost_mut<F: FnMut(&mut Element)>(&mut self, name: &str, f: &mut F) {
        for node in &mut self.children {
            if let Node::Element(el) = node {
                if el.name == name {
                    f(el);
                } else {
                    el.for_each_outermost_mut(name, f);
                }
            }
        }
    }
}

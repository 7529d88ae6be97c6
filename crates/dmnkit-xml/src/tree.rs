//! Generic XML element tree with source spans.
//!
//! The reader first turns the document into this tree with `quick-xml`, then
//! maps the tree onto the DMN model. Keeping the two steps apart lets the
//! mapping look ahead (children, attributes) without juggling reader state.

use std::borrow::Cow;

use quick_xml::{Reader, events::Event};

use dmnkit_core::dmn::{RawElement, RawNode};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    span::Span,
};

#[derive(Debug, Clone)]
pub(crate) enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its qualified name and the span of its start tag.
#[derive(Debug, Clone)]
pub(crate) struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub span: Span,
}

impl XmlElement {
    fn new(name: String, attributes: Vec<(String, String)>, span: Span) -> Self {
        Self {
            name,
            attributes,
            children: Vec::new(),
            span,
        }
    }

    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// The prefix of the tag name, `""` when unprefixed.
    pub fn prefix(&self) -> &str {
        self.name.split_once(':').map_or("", |(prefix, _)| prefix)
    }

    /// Looks up a non-namespace attribute by its unprefixed name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .filter(|(key, _)| key != "xmlns" && !key.starts_with("xmlns:"))
            .find(|(key, _)| local_part(key) == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.child_elements()
            .filter(move |element| element.local_name() == local)
    }

    pub fn child<'a>(&'a self, local: &'a str) -> Option<&'a XmlElement> {
        self.children_named(local).next()
    }

    /// Concatenated text of the direct children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                XmlNode::Text(text) => Some(text.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// Text of the named child element, if present.
    pub fn child_text(&self, local: &str) -> Option<String> {
        self.child(local).map(XmlElement::text)
    }

    /// Converts this element into an opaque [`RawElement`].
    pub fn to_raw(&self) -> RawElement {
        RawElement {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            children: self
                .children
                .iter()
                .map(|child| match child {
                    XmlNode::Element(element) => RawNode::Element(element.to_raw()),
                    XmlNode::Text(text) => RawNode::Text(text.clone()),
                })
                .collect(),
        }
    }
}

/// Returns the part of a qualified name after the prefix.
pub(crate) fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn malformed(err: impl std::fmt::Display, position: usize) -> Diagnostic {
    Diagnostic::error(format!("malformed XML: {err}"))
        .with_code(ErrorCode::E001)
        .with_label(Span::new(position..position), "reader stopped here")
}

/// Parses the document into an element tree, returning the root element.
pub(crate) fn parse_tree(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|err| malformed(err, reader.buffer_position() as usize))?;
        let end = reader.buffer_position() as usize;
        let span = Span::new(start..end);

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attributes = read_attributes(&e, span)?;
                stack.push(XmlElement::new(name, attributes, span));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attributes = read_attributes(&e, span)?;
                let element = XmlElement::new(name, attributes, span);
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(malformed("closing tag without opening tag", start));
                };
                attach(&mut stack, &mut root, element);
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|err| malformed(err, start))?;
                push_text(&mut stack, text);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                push_text(&mut stack, Cow::Owned(text));
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes carry no model content.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Diagnostic::error(format!(
            "document ended while `{}` is still open",
            open.name
        ))
        .with_code(ErrorCode::E002)
        .with_label(open.span, "element opened here"));
    }

    root.ok_or_else(|| {
        Diagnostic::error("document has no root element")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..xml.len().min(1)), "empty document")
            .with_help("DMN files start with a `definitions` element")
    })
}

fn read_attributes(
    element: &quick_xml::events::BytesStart<'_>,
    span: Span,
) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|err| malformed(err, span.start()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| malformed(err, span.start()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Whitespace-only text between elements is layout, not content.
fn push_text(stack: &mut [XmlElement], text: Cow<'_, str>) {
    if text.trim().is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Text(text.into_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_nested() {
        let root = parse_tree(r#"<a:root x="1"><b>hi</b><c/></a:root>"#).unwrap();

        assert_eq!(root.name, "a:root");
        assert_eq!(root.local_name(), "root");
        assert_eq!(root.prefix(), "a");
        assert_eq!(root.attr("x"), Some("1"));
        assert_eq!(root.child_elements().count(), 2);
        assert_eq!(root.child_text("b").as_deref(), Some("hi"));
        assert!(root.child("c").is_some());
    }

    #[test]
    fn test_parse_tree_skips_whitespace_text() {
        let root = parse_tree("<root>\n  <child/>\n</root>").unwrap();
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_parse_tree_unescapes() {
        let root = parse_tree(r#"<t v="a &amp; b">x &lt; 1</t>"#).unwrap();
        assert_eq!(root.attr("v"), Some("a & b"));
        assert_eq!(root.text(), "x < 1");
    }

    #[test]
    fn test_parse_tree_cdata() {
        let root = parse_tree("<t><![CDATA[a < b]]></t>").unwrap();
        assert_eq!(root.text(), "a < b");
    }

    #[test]
    fn test_attr_ignores_namespace_declarations() {
        let root = parse_tree(r#"<root xmlns:id="urn:x" id="_1"/>"#).unwrap();
        assert_eq!(root.attr("id"), Some("_1"));
    }

    #[test]
    fn test_parse_tree_span_covers_start_tag() {
        let xml = r#"<root><child id="x"/></root>"#;
        let root = parse_tree(xml).unwrap();
        let child = root.child("child").unwrap();

        assert_eq!(&xml[child.span.start()..child.span.end()], r#"<child id="x"/>"#);
    }

    #[test]
    fn test_parse_tree_mismatched_tags() {
        let err = parse_tree("<a><b></a>").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E001));
    }

    #[test]
    fn test_parse_tree_unclosed() {
        let err = parse_tree("<a><b>").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E002));
    }

    #[test]
    fn test_parse_tree_empty() {
        let err = parse_tree("   ").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_to_raw_keeps_structure() {
        let root = parse_tree(r#"<dmn:context id="_c"><dmn:text>1</dmn:text></dmn:context>"#)
            .unwrap();
        let raw = root.to_raw();

        assert_eq!(raw.name, "dmn:context");
        assert_eq!(raw.contained_ids(), vec!["_c"]);
        assert_eq!(raw.child_elements().next().map(|e| e.text()), Some("1".to_string()));
    }
}

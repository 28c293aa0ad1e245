//! Raw XML tree support for project files
//!
//! Project files are parsed into an owned [`Element`] tree before any
//! entity model is built. The tree is mutable so that format updates can
//! rewrite old files in place, and it preserves attribute order as read.

pub mod diagnostics;
pub mod writer;

pub use diagnostics::{XmlError, XmlSyntaxError};
pub use writer::XmlWriter;

use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;

/// A single element in a raw XML tree.
///
/// Attributes keep their document order; repeated parses of the same file
/// produce identical trees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// The element tag name.
    pub tag: String,

    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,

    /// Child elements in document order.
    pub children: Vec<Element>,

    /// Accumulated character data.
    pub text: String,
}

impl Element {
    /// Create an empty element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value and otherwise
    /// appending it.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Remove an attribute, returning its value if it was present.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Iterate over child elements with the given tag.
    pub fn children_with_tag<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Find the first child element with the given tag.
    pub fn find_child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }
}

/// Parse a UTF-8 XML document into an [`Element`] tree.
///
/// `filename` is only used to label diagnostics.
pub fn parse(source: &str, filename: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(source);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let offset = reader.buffer_position() as usize;

        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let mut element =
                    Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                for attribute in start.attributes() {
                    let attribute = attribute.map_err(|e| {
                        XmlSyntaxError::at_offset(e.to_string(), source, filename, offset)
                    })?;
                    let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
                    let value = attribute
                        .unescape_value()
                        .map_err(|e| {
                            XmlSyntaxError::at_offset(e.to_string(), source, filename, offset)
                        })?
                        .into_owned();
                    element.attributes.push((name, value));
                }
                stack.push(element);
            }
            Ok(Event::Empty(empty)) => {
                let mut element =
                    Element::new(String::from_utf8_lossy(empty.name().as_ref()).into_owned());
                for attribute in empty.attributes() {
                    let attribute = attribute.map_err(|e| {
                        XmlSyntaxError::at_offset(e.to_string(), source, filename, offset)
                    })?;
                    let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
                    let value = attribute
                        .unescape_value()
                        .map_err(|e| {
                            XmlSyntaxError::at_offset(e.to_string(), source, filename, offset)
                        })?
                        .into_owned();
                    element.attributes.push((name, value));
                }
                attach(&mut stack, &mut root, element, source, filename, offset)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlSyntaxError::at_offset(
                        "unexpected closing tag".to_string(),
                        source,
                        filename,
                        offset,
                    )
                })?;
                attach(&mut stack, &mut root, element, source, filename, offset)?;
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().map_err(|e| {
                    XmlSyntaxError::at_offset(e.to_string(), source, filename, offset)
                })?;
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions and doctypes
            // carry nothing the project model needs.
            Ok(_) => {}
            Err(e) => {
                return Err(
                    XmlSyntaxError::at_offset(e.to_string(), source, filename, offset).into(),
                );
            }
        }
    }

    if !stack.is_empty() {
        return Err(XmlSyntaxError::at_offset(
            "unclosed element".to_string(),
            source,
            filename,
            source.len().saturating_sub(1),
        )
        .into());
    }

    root.ok_or_else(|| {
        XmlSyntaxError::at_offset("document has no root element".to_string(), source, filename, 0)
            .into()
    })
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
    source: &str,
    filename: &str,
    offset: usize,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(XmlSyntaxError::at_offset(
                "document has more than one root element".to_string(),
                source,
                filename,
                offset,
            )
            .into());
        }
    }
    Ok(())
}

/// XML-escape a string for output.
///
/// The legacy serializer escapes `"` in addition to the mandatory `&`,
/// `<` and `>`, in both attribute values and text, so the same escape is
/// applied everywhere.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_tree_in_document_order() {
        let root = parse(
            r#"<Project version="15" features="A B"><Module name="m"/><Module name="n"/></Project>"#,
            "test.msp",
        )
        .unwrap();

        assert_eq!(root.tag, "Project");
        assert_eq!(root.attr("version"), Some("15"));
        assert_eq!(root.attr("features"), Some("A B"));
        let names: Vec<_> = root
            .children_with_tag("Module")
            .map(|m| m.attr("name").unwrap())
            .collect();
        assert_eq!(names, ["m", "n"]);
    }

    #[test]
    fn test_parse_collects_text() {
        let root = parse(
            "<Project version=\"15\"><Literal type=\"sipcomments\">\nSome text\n</Literal></Project>",
            "test.msp",
        )
        .unwrap();

        let literal = root.find_child("Literal").unwrap();
        assert_eq!(literal.text.trim(), "Some text");
    }

    #[test]
    fn test_parse_unescapes_attributes() {
        let root = parse(r#"<Project name="a &quot;b&quot; &amp; c"/>"#, "test.msp").unwrap();
        assert_eq!(root.attr("name"), Some("a \"b\" & c"));
    }

    #[test]
    fn test_parse_rejects_malformed_document() {
        assert!(parse("<Project><Module></Project>", "test.msp").is_err());
        assert!(parse("", "test.msp").is_err());
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut element = Element::new("Module");
        element.set_attr("name", "a");
        element.set_attr("version", "1");
        element.set_attr("name", "b");

        assert_eq!(element.attr("name"), Some("b"));
        assert_eq!(element.attributes[0], ("name".to_string(), "b".to_string()));
    }

    #[test]
    fn test_escape_quotes_beyond_minimum() {
        assert_eq!(escape(r#"a < "b" & c"#), "a &lt; &quot;b&quot; &amp; c");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }
}

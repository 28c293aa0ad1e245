//! Canonical project-file serializer
//!
//! The writer reproduces the legacy on-disk layout exactly: one element
//! per line, one space of indentation per nesting level, attributes in
//! the order the adapters emit them and `<Literal>` text written verbatim
//! between unindented lines. Saving an unmodified project must reproduce
//! the input byte for byte, so nothing here is configurable.

use super::escape;

/// Streaming writer for the canonical XML form.
pub struct XmlWriter {
    buf: String,
    depth: usize,
}

impl XmlWriter {
    /// Create a writer holding the XML declaration.
    pub fn new() -> Self {
        Self {
            buf: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
            depth: 0,
        }
    }

    /// Begin a start tag: `<Tag` at the current indentation.
    pub fn open(&mut self, tag: &str) {
        self.indent();
        self.buf.push('<');
        self.buf.push_str(tag);
    }

    /// Write an attribute into the currently open start tag.
    pub fn attribute(&mut self, name: &str, value: &str) {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        self.buf.push_str(&escape(value));
        self.buf.push('"');
    }

    /// Close the start tag and descend one level.
    pub fn finish_open(&mut self) {
        self.buf.push_str(">\n");
        self.depth += 1;
    }

    /// Close the start tag as an empty element.
    pub fn finish_empty(&mut self) {
        self.buf.push_str("/>\n");
    }

    /// Ascend one level and write the end tag.
    pub fn close(&mut self, tag: &str) {
        self.depth -= 1;
        self.indent();
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push_str(">\n");
    }

    /// Write a `<Literal type="NAME">` block.
    ///
    /// The text is written verbatim (escaped, never indented) so that
    /// code snippets keep their own layout.
    pub fn literal(&mut self, name: &str, text: &str) {
        self.indent();
        self.buf.push_str("<Literal type=\"");
        self.buf.push_str(name);
        self.buf.push_str("\">\n");
        self.buf.push_str(&escape(text));
        self.buf.push('\n');
        self.indent();
        self.buf.push_str("</Literal>\n");
    }

    /// Consume the writer, returning the document.
    pub fn into_string(self) -> String {
        self.buf
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buf.push(' ');
        }
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

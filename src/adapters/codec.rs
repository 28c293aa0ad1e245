//! The attribute codec
//!
//! Every adapter reads and writes its element through the four attribute
//! shapes of the file format: booleans (`"0"`/`"1"`), plain strings,
//! whitespace-separated string lists and `<Literal>` child elements for
//! free-form text. Absent always means the default, and defaults are
//! omitted on save, so a round trip of canonical input is byte-stable.
//!
//! On the save side the primitives are called explicitly, in each
//! adapter's fixed order - the order is part of the on-disk format.

use tracing::warn;

use crate::xml::{Element, XmlWriter};

/// Load a boolean attribute: `"1"` is true, absent or `"0"` is false.
pub(crate) fn bool_attr(element: &Element, name: &str) -> bool {
    match element.attr(name).unwrap_or("0") {
        "1" => true,
        "0" => false,
        other => {
            warn!(tag = %element.tag, attribute = name, value = other, "invalid boolean attribute");
            false
        }
    }
}

/// Load a string attribute, absent means empty.
pub(crate) fn str_attr(element: &Element, name: &str) -> String {
    element.attr(name).unwrap_or("").to_string()
}

/// Load a whitespace-separated list attribute.
pub(crate) fn str_list_attr(element: &Element, name: &str) -> Vec<String> {
    element
        .attr(name)
        .unwrap_or("")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Load the text of a `<Literal type="NAME">` child, absent means empty.
pub(crate) fn literal_text(element: &Element, name: &str) -> String {
    element
        .children
        .iter()
        .find(|c| c.tag == "Literal" && c.attr("type") == Some(name))
        .map(|c| c.text.trim().to_string())
        .unwrap_or_default()
}

/// Save an attribute unconditionally.
pub(crate) fn save_attribute(w: &mut XmlWriter, name: &str, value: &str) {
    w.attribute(name, value);
}

/// Save a boolean attribute, omitted when false.
pub(crate) fn save_bool(w: &mut XmlWriter, name: &str, value: bool) {
    if value {
        w.attribute(name, "1");
    }
}

/// Save a string attribute, omitted when empty.
pub(crate) fn save_str(w: &mut XmlWriter, name: &str, value: &str) {
    if !value.is_empty() {
        w.attribute(name, value);
    }
}

/// Save a list attribute space-joined, omitted when empty.
pub(crate) fn save_str_list(w: &mut XmlWriter, name: &str, values: &[String]) {
    if !values.is_empty() {
        w.attribute(name, &values.join(" "));
    }
}

/// Save a literal text sub-element, omitted when empty.
pub(crate) fn save_literal(w: &mut XmlWriter, name: &str, text: &str) {
    if !text.is_empty() {
        w.literal(name, text);
    }
}

//! Stateless facet adapters
//!
//! Each capability facet has a load/save pair operating on an
//! `(element, facet)` pair. Entity adapters compose these with their own
//! attributes; the attribute order within a start tag is always code
//! facet, annotations, access, then the entity's own attributes.

use tracing::warn;

use crate::adapters::codec;
use crate::entities::facets::{Access, Annos, Code, ExtendedAccess, Status, VersionRange};
use crate::xml::{Element, XmlWriter};

/// Load the tag/status facet from an element.
pub(crate) fn load_code(element: &Element) -> Code {
    let status = match codec::str_attr(element, "status").parse::<Status>() {
        Ok(status) => status,
        Err(message) => {
            warn!(tag = %element.tag, %message, "ignoring unknown status");
            Status::Unchanged
        }
    };

    let versions = match element.attr("versions") {
        Some(value) => match value.parse::<VersionRange>() {
            Ok(range) => Some(range),
            Err(message) => {
                warn!(tag = %element.tag, %message, "ignoring malformed version range");
                None
            }
        },
        None => None,
    };

    Code {
        status,
        versions,
        platforms: codec::str_list_attr(element, "platforms"),
        features: codec::str_list_attr(element, "features"),
    }
}

/// Save the tag/status facet attributes.
pub(crate) fn save_code_attributes(w: &mut XmlWriter, code: &Code) {
    codec::save_str(w, "status", code.status.as_str());
    if let Some(range) = &code.versions {
        codec::save_attribute(w, "versions", &range.to_string());
    }
    codec::save_str_list(w, "platforms", &code.platforms);
    codec::save_str_list(w, "features", &code.features);
}

/// Load the annotation list from the `annos` attribute.
pub(crate) fn load_annos(element: &Element) -> Annos {
    match codec::str_attr(element, "annos").parse::<Annos>() {
        Ok(annos) => annos,
        Err(message) => {
            warn!(tag = %element.tag, %message, "ignoring malformed annotations");
            Annos::default()
        }
    }
}

/// Save the annotation list, omitted when empty.
pub(crate) fn save_annos(w: &mut XmlWriter, annos: &Annos) {
    if !annos.is_empty() {
        codec::save_attribute(w, "annos", &annos.to_string());
    }
}

/// Load the access specifier, absent means public.
pub(crate) fn load_access(element: &Element) -> Access {
    match codec::str_attr(element, "access").parse::<Access>() {
        Ok(access) => access,
        Err(message) => {
            warn!(tag = %element.tag, %message, "ignoring unknown access specifier");
            Access::Public
        }
    }
}

/// Save the access specifier, omitted when public.
pub(crate) fn save_access(w: &mut XmlWriter, access: Access) {
    codec::save_str(w, "access", access.as_str());
}

/// Load the extended access specifier, absent means public.
pub(crate) fn load_extended_access(element: &Element) -> ExtendedAccess {
    match codec::str_attr(element, "access").parse::<ExtendedAccess>() {
        Ok(access) => access,
        Err(message) => {
            warn!(tag = %element.tag, %message, "ignoring unknown access specifier");
            ExtendedAccess::Public
        }
    }
}

/// Save the extended access specifier, omitted when public.
pub(crate) fn save_extended_access(w: &mut XmlWriter, access: ExtendedAccess) {
    codec::save_str(w, "access", access.as_str());
}

/// Load the docstring sub-element.
pub(crate) fn load_docstring(element: &Element) -> String {
    codec::literal_text(element, "docstring")
}

/// Save the docstring sub-element, omitted when empty.
pub(crate) fn save_docstring(w: &mut XmlWriter, docstring: &str) {
    codec::save_literal(w, "docstring", docstring);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_facet_roundtrip_attributes() {
        let mut element = Element::new("Function");
        element.set_attr("status", "removed");
        element.set_attr("versions", "v5-v6");
        element.set_attr("platforms", "linux !win32");
        element.set_attr("features", "PyQt_SSL");

        let code = load_code(&element);
        assert_eq!(code.status, Status::Removed);
        assert_eq!(code.versions.as_ref().unwrap().to_string(), "v5-v6");
        assert_eq!(code.platforms, ["linux", "!win32"]);
        assert_eq!(code.features, ["PyQt_SSL"]);

        let mut w = XmlWriter::new();
        w.open("Function");
        save_code_attributes(&mut w, &code);
        w.finish_empty();
        assert!(w.into_string().contains(
            "<Function status=\"removed\" versions=\"v5-v6\" platforms=\"linux !win32\" features=\"PyQt_SSL\"/>"
        ));
    }

    #[test]
    fn test_unknown_status_falls_back_to_default() {
        let mut element = Element::new("Function");
        element.set_attr("status", "exploded");
        assert_eq!(load_code(&element).status, Status::Unchanged);
    }

    #[test]
    fn test_access_defaults_and_saves() {
        let element = Element::new("Method");
        assert_eq!(load_access(&element), Access::Public);

        let mut w = XmlWriter::new();
        w.open("Method");
        save_access(&mut w, Access::Public);
        save_access(&mut w, Access::Private);
        w.finish_empty();
        assert!(w.into_string().contains("<Method access=\"private\"/>"));
    }
}

//! The built-in format update steps
//!
//! One struct per version bump, oldest first. Steps rewrite the raw
//! tree; the entity model never sees an old format.

use crate::updates::{FormatUpdate, InputRequest, UpdateError};
use crate::xml::Element;

fn module_names(root: &Element) -> Vec<String> {
    root.children_with_tag("Module")
        .map(|m| m.attr("name").unwrap_or("").to_string())
        .collect()
}

/// v11: per-module release tags move to the project level.
///
/// The v10 format let every `<Module>` carry its own `versions` list;
/// v11 keeps a single project-wide timeline.
pub struct UpdateV11;

impl FormatUpdate for UpdateV11 {
    fn updates_to(&self) -> u32 {
        11
    }

    fn plan(&self, _root: &Element) -> Option<InputRequest> {
        None
    }

    fn apply(&self, root: &mut Element, _input: Option<&str>) -> Result<(), UpdateError> {
        let mut versions: Vec<String> = Vec::new();

        for child in &mut root.children {
            if child.tag != "Module" {
                continue;
            }
            if let Some(list) = child.remove_attr("versions") {
                for version in list.split_whitespace() {
                    if !versions.iter().any(|v| v == version) {
                        versions.push(version.to_string());
                    }
                }
            }
        }

        if !versions.is_empty() {
            root.set_attr("versions", versions.join(" "));
        }

        root.set_attr("version", self.updates_to().to_string());
        Ok(())
    }
}

/// v12: `inputdirpattern` splits into `inputdirsuffix` + `filefilter`.
pub struct UpdateV12;

impl FormatUpdate for UpdateV12 {
    fn updates_to(&self) -> u32 {
        12
    }

    fn plan(&self, _root: &Element) -> Option<InputRequest> {
        None
    }

    fn apply(&self, root: &mut Element, _input: Option<&str>) -> Result<(), UpdateError> {
        for child in &mut root.children {
            if child.tag != "HeaderDirectory" {
                continue;
            }
            if let Some(pattern) = child.remove_attr("inputdirpattern") {
                match pattern.rsplit_once('/') {
                    Some((suffix, filter)) => {
                        if !suffix.is_empty() {
                            child.set_attr("inputdirsuffix", suffix);
                        }
                        child.set_attr("filefilter", filter);
                    }
                    None => child.set_attr("filefilter", pattern),
                }
            }
        }

        root.set_attr("version", self.updates_to().to_string());
        Ok(())
    }
}

/// v13: the project gains a root module.
///
/// With more than one module the choice cannot be inferred, so this is
/// the one step in the chain that needs user input.
pub struct UpdateV13;

impl FormatUpdate for UpdateV13 {
    fn updates_to(&self) -> u32 {
        13
    }

    fn plan(&self, root: &Element) -> Option<InputRequest> {
        if root.attr("rootmodule").is_some() {
            return None;
        }

        let names = module_names(root);
        if names.len() < 2 {
            return None;
        }

        Some(InputRequest {
            prompt: "Select the module that imports all the others".to_string(),
            options: names,
        })
    }

    fn apply(&self, root: &mut Element, input: Option<&str>) -> Result<(), UpdateError> {
        if root.attr("rootmodule").is_none() {
            let names = module_names(root);
            match names.len() {
                0 => {}
                1 => root.set_attr("rootmodule", names[0].clone()),
                _ => {
                    let chosen = input.ok_or(UpdateError::MissingInput(self.updates_to()))?;
                    root.set_attr("rootmodule", chosen);
                }
            }
        }

        root.set_attr("version", self.updates_to().to_string());
        Ok(())
    }
}

/// v14: legacy `yes`/`no` boolean attributes become `1`/`0`.
pub struct UpdateV14;

/// The boolean attributes of the pre-v14 formats.
const FLAG_ATTRIBUTES: &[&str] = &[
    "abstract",
    "const",
    "enumclass",
    "explicit",
    "final",
    "ignored",
    "parse",
    "pyssizetclean",
    "static",
    "struct",
    "unnamed",
    "uselimitedapi",
    "virtual",
];

fn normalize_flags(element: &mut Element) {
    for (name, value) in &mut element.attributes {
        if FLAG_ATTRIBUTES.contains(&name.as_str()) {
            if value == "yes" {
                *value = "1".to_string();
            } else if value == "no" {
                *value = "0".to_string();
            }
        }
    }

    for child in &mut element.children {
        normalize_flags(child);
    }
}

impl FormatUpdate for UpdateV14 {
    fn updates_to(&self) -> u32 {
        14
    }

    fn plan(&self, _root: &Element) -> Option<InputRequest> {
        None
    }

    fn apply(&self, root: &mut Element, _input: Option<&str>) -> Result<(), UpdateError> {
        normalize_flags(root);
        root.set_attr("version", self.updates_to().to_string());
        Ok(())
    }
}

/// v15: the `<Module>` `version` attribute is gone and `removed` is a
/// valid status value. Nothing in the tree itself changes, but the step
/// still runs so the version number records the new semantics.
pub struct UpdateV15;

impl FormatUpdate for UpdateV15 {
    fn updates_to(&self) -> u32 {
        15
    }

    fn plan(&self, _root: &Element) -> Option<InputRequest> {
        None
    }

    fn apply(&self, root: &mut Element, _input: Option<&str>) -> Result<(), UpdateError> {
        root.set_attr("version", self.updates_to().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    fn parse(source: &str) -> Element {
        xml::parse(source, "test.msp").unwrap()
    }

    #[test]
    fn test_v11_hoists_module_versions() {
        let mut root = parse(
            r#"<Project version="10"><Module name="a" versions="v1 v2"/><Module name="b" versions="v2 v3"/></Project>"#,
        );

        UpdateV11.apply(&mut root, None).unwrap();

        assert_eq!(root.attr("versions"), Some("v1 v2 v3"));
        assert_eq!(root.attr("version"), Some("11"));
        assert!(root.children[0].attr("versions").is_none());
    }

    #[test]
    fn test_v12_splits_input_dir_pattern() {
        let mut root = parse(
            r#"<Project version="11"><HeaderDirectory name="QtCore" inputdirpattern="QtCore/*.h"/><HeaderDirectory name="flat" inputdirpattern="*.h"/></Project>"#,
        );

        UpdateV12.apply(&mut root, None).unwrap();

        let qt = &root.children[0];
        assert_eq!(qt.attr("inputdirsuffix"), Some("QtCore"));
        assert_eq!(qt.attr("filefilter"), Some("*.h"));
        assert!(qt.attr("inputdirpattern").is_none());

        let flat = &root.children[1];
        assert!(flat.attr("inputdirsuffix").is_none());
        assert_eq!(flat.attr("filefilter"), Some("*.h"));
    }

    #[test]
    fn test_v13_asks_only_when_ambiguous() {
        let single = parse(r#"<Project version="12"><Module name="only"/></Project>"#);
        assert!(UpdateV13.plan(&single).is_none());

        let multi = parse(r#"<Project version="12"><Module name="a"/><Module name="b"/></Project>"#);
        let request = UpdateV13.plan(&multi).unwrap();
        assert_eq!(request.options, ["a", "b"]);

        let decided =
            parse(r#"<Project version="12" rootmodule="a"><Module name="a"/><Module name="b"/></Project>"#);
        assert!(UpdateV13.plan(&decided).is_none());
    }

    #[test]
    fn test_v13_applies_the_answer() {
        let mut root = parse(r#"<Project version="12"><Module name="a"/><Module name="b"/></Project>"#);

        assert!(matches!(
            UpdateV13.apply(&mut root, None),
            Err(UpdateError::MissingInput(13))
        ));
        assert_eq!(root.attr("version"), Some("12"));

        UpdateV13.apply(&mut root, Some("b")).unwrap();
        assert_eq!(root.attr("rootmodule"), Some("b"));
        assert_eq!(root.attr("version"), Some("13"));
    }

    #[test]
    fn test_v13_single_module_is_automatic() {
        let mut root = parse(r#"<Project version="12"><Module name="only"/></Project>"#);
        UpdateV13.apply(&mut root, None).unwrap();
        assert_eq!(root.attr("rootmodule"), Some("only"));
    }

    #[test]
    fn test_v14_normalizes_flag_spellings() {
        let mut root = parse(
            r#"<Project version="13"><Module name="m"><SipFile name="f"><Class name="C" struct="yes"><Method name="m" const="no" virtual="yes"/></Class></SipFile></Module></Project>"#,
        );

        UpdateV14.apply(&mut root, None).unwrap();

        let class = &root.children[0].children[0].children[0];
        assert_eq!(class.attr("struct"), Some("1"));
        let method = &class.children[0];
        assert_eq!(method.attr("const"), Some("0"));
        assert_eq!(method.attr("virtual"), Some("1"));
    }

    #[test]
    fn test_v14_leaves_other_attributes_alone() {
        let mut root =
            parse(r#"<Project version="13"><Module name="yes" callsuperinit="no"/></Project>"#);

        UpdateV14.apply(&mut root, None).unwrap();

        // `callsuperinit` is a tri-state, not a flag, and names are text.
        assert_eq!(root.children[0].attr("name"), Some("yes"));
        assert_eq!(root.children[0].attr("callsuperinit"), Some("no"));
    }

    #[test]
    fn test_v15_only_bumps_the_version() {
        let mut root = parse(r#"<Project version="14"><Module name="m"/></Project>"#);
        let before = root.children.clone();

        UpdateV15.apply(&mut root, None).unwrap();

        assert_eq!(root.attr("version"), Some("15"));
        assert_eq!(root.children, before);
    }
}

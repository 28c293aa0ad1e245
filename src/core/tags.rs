//! Feature and platform tag maintenance
//!
//! A project declares its tag universe (features, external features,
//! platforms); API items reference tags by name, optionally inverted
//! with a leading `!`. Creating, renaming and deleting a tag must keep
//! every reference in the project consistent with the declared universe.

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

use crate::core::traverse;
use crate::entities::code::{CodeItem, EnumValue};
use crate::entities::project::Project;

/// The two kinds of conditional tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Feature,
    Platform,
}

impl TagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Feature => "feature",
            TagKind::Platform => "platform",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised by tag operations
#[derive(Debug, Error, Diagnostic)]
pub enum TagError {
    #[error("a {0} name is required")]
    #[diagnostic(code(spt::tags::name_required))]
    NameRequired(TagKind),

    #[error(
        "a {0} name can only contain underscores, ASCII letters and digits and cannot start with a digit"
    )]
    #[diagnostic(code(spt::tags::invalid_identifier))]
    InvalidIdentifier(TagKind),

    #[error("a {kind} has already been defined with the same name: '{name}'")]
    #[diagnostic(code(spt::tags::duplicate))]
    DuplicateName { kind: TagKind, name: String },

    #[error("an external {kind} has already been defined with the same name: '{name}'")]
    #[diagnostic(code(spt::tags::duplicate_external))]
    DuplicateExternalName { kind: TagKind, name: String },

    #[error("no {kind} named '{name}' is defined by the project")]
    #[diagnostic(code(spt::tags::unknown))]
    UnknownTag { kind: TagKind, name: String },
}

/// Check that a name is a well-formed tag identifier.
///
/// Identifiers are non-empty, use only underscores, ASCII letters and
/// digits, and do not start with a digit.
pub fn validate_identifier(name: &str, kind: TagKind) -> Result<(), TagError> {
    if name.is_empty() {
        return Err(TagError::NameRequired(kind));
    }

    let well_formed = name.chars().all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !name.starts_with(|c: char| c.is_ascii_digit());

    if !well_formed {
        return Err(TagError::InvalidIdentifier(kind));
    }

    Ok(())
}

/// Define a new tag after validating its name.
pub fn new_tag(project: &mut Project, kind: TagKind, name: &str) -> Result<(), TagError> {
    validate_identifier(name, kind)?;
    check_unique(project, kind, name)?;

    match kind {
        TagKind::Feature => project.features.push(name.to_string()),
        TagKind::Platform => project.platforms.push(name.to_string()),
    }

    Ok(())
}

/// Rename a tag, rewriting every reference to it.
///
/// The new name is validated before anything is touched, so a failure
/// leaves the project unmodified. References preserve their inversion
/// marker: `!old` becomes `!new`.
pub fn rename_tag(
    project: &mut Project,
    kind: TagKind,
    old_name: &str,
    new_name: &str,
) -> Result<(), TagError> {
    validate_identifier(new_name, kind)?;
    check_unique(project, kind, new_name)?;

    // Locate the declaration up front; failing late would leave some
    // items already rewritten.
    let declaration = declaration_slot(project, kind, old_name)?;

    traverse::visit_code_mut(project, &mut |code| {
        let refs = match kind {
            TagKind::Feature => &mut code.features,
            TagKind::Platform => &mut code.platforms,
        };

        for tag_ref in refs.iter_mut() {
            if let Some(inverted) = tag_ref.strip_prefix('!') {
                if inverted == old_name {
                    *tag_ref = format!("!{}", new_name);
                }
            } else if tag_ref == old_name {
                *tag_ref = new_name.to_string();
            }
        }
    });

    *declaration_slot_mut(project, kind, declaration) = new_name.to_string();

    Ok(())
}

/// Delete a tag, cleaning up every reference to it.
///
/// Per item: a reference that is not the item's only one of this kind
/// is simply dropped. When it is the only one, the item itself is
/// removed from its container if the reference is plain and `discard`
/// is requested, or if the reference is inverted and `discard` is not -
/// discarding means dropping everything that is compiled out without
/// the tag. Repeated references on one item are all processed.
pub fn delete_tag(
    project: &mut Project,
    kind: TagKind,
    name: &str,
    discard: bool,
) -> Result<(), TagError> {
    let declaration = declaration_slot(project, kind, name)?;

    for module in &mut project.modules {
        for sip_file in &mut module.content {
            delete_in_items(&mut sip_file.content, kind, name, discard);
        }
    }

    remove_declaration(project, kind, declaration);

    Ok(())
}

/// Uniqueness against the local and external tag lists of a kind.
fn check_unique(project: &Project, kind: TagKind, name: &str) -> Result<(), TagError> {
    let duplicate = match kind {
        TagKind::Feature => project.features.iter().any(|f| f == name),
        TagKind::Platform => project.platforms.iter().any(|p| p == name),
    };
    if duplicate {
        return Err(TagError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }

    if kind == TagKind::Feature && project.externalfeatures.iter().any(|f| f == name) {
        return Err(TagError::DuplicateExternalName {
            kind,
            name: name.to_string(),
        });
    }

    Ok(())
}

/// Where a tag is declared: which list, and at which index.
#[derive(Debug, Clone, Copy)]
enum DeclarationSlot {
    Local(usize),
    External(usize),
}

fn declaration_slot(
    project: &Project,
    kind: TagKind,
    name: &str,
) -> Result<DeclarationSlot, TagError> {
    let local = match kind {
        TagKind::Feature => &project.features,
        TagKind::Platform => &project.platforms,
    };
    if let Some(index) = local.iter().position(|t| t == name) {
        return Ok(DeclarationSlot::Local(index));
    }

    if kind == TagKind::Feature {
        if let Some(index) = project.externalfeatures.iter().position(|t| t == name) {
            return Ok(DeclarationSlot::External(index));
        }
    }

    Err(TagError::UnknownTag {
        kind,
        name: name.to_string(),
    })
}

fn declaration_slot_mut(
    project: &mut Project,
    kind: TagKind,
    slot: DeclarationSlot,
) -> &mut String {
    match (slot, kind) {
        (DeclarationSlot::Local(i), TagKind::Feature) => &mut project.features[i],
        (DeclarationSlot::Local(i), TagKind::Platform) => &mut project.platforms[i],
        (DeclarationSlot::External(i), _) => &mut project.externalfeatures[i],
    }
}

fn remove_declaration(project: &mut Project, kind: TagKind, slot: DeclarationSlot) {
    match (slot, kind) {
        (DeclarationSlot::Local(i), TagKind::Feature) => {
            project.features.remove(i);
        }
        (DeclarationSlot::Local(i), TagKind::Platform) => {
            project.platforms.remove(i);
        }
        (DeclarationSlot::External(i), _) => {
            project.externalfeatures.remove(i);
        }
    }
}

fn delete_in_items(items: &mut Vec<CodeItem>, kind: TagKind, name: &str, discard: bool) {
    let mut index = 0;
    while index < items.len() {
        // Children first, so that surviving containers are already clean.
        match &mut items[index] {
            CodeItem::Enum(e) => delete_in_enum_values(&mut e.content, kind, name, discard),
            item => {
                if let Some(content) = item.content_mut() {
                    delete_in_items(content, kind, name, discard);
                }
            }
        }

        let refs = match kind {
            TagKind::Feature => &mut items[index].code_mut().features,
            TagKind::Platform => &mut items[index].code_mut().platforms,
        };

        if apply_delete(refs, name, discard) {
            items.remove(index);
        } else {
            index += 1;
        }
    }
}

fn delete_in_enum_values(values: &mut Vec<EnumValue>, kind: TagKind, name: &str, discard: bool) {
    let mut index = 0;
    while index < values.len() {
        let refs = match kind {
            TagKind::Feature => &mut values[index].code.features,
            TagKind::Platform => &mut values[index].code.platforms,
        };

        if apply_delete(refs, name, discard) {
            values.remove(index);
        } else {
            index += 1;
        }
    }
}

/// Apply the per-item delete rule; returns true when the whole item has
/// to go.
fn apply_delete(refs: &mut Vec<String>, name: &str, discard: bool) -> bool {
    let mut doomed = Vec::new();

    for tag_ref in refs.iter() {
        if let Some(inverted) = tag_ref.strip_prefix('!') {
            if inverted == name {
                // Keep the item unless this inverted reference is all
                // that kept it in and nothing is being discarded.
                if refs.len() > 1 || discard {
                    doomed.push(tag_ref.clone());
                } else {
                    return true;
                }
            }
        } else if tag_ref == name {
            if refs.len() > 1 || !discard {
                doomed.push(tag_ref.clone());
            } else {
                return true;
            }
        }
    }

    refs.retain(|tag_ref| !doomed.contains(tag_ref));
    false
}

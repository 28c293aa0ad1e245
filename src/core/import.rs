//! Importing one project into another
//!
//! Importing merges the source project's tag universe, modules and
//! header directories into the target. Everything is validated before
//! the first mutation, so a failed merge leaves the target untouched.

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

use crate::entities::project::Project;

/// What clashed during a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeNameKind {
    Feature,
    Module,
    HeaderDirectory,
}

impl fmt::Display for MergeNameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeNameKind::Feature => write!(f, "feature"),
            MergeNameKind::Module => write!(f, "module"),
            MergeNameKind::HeaderDirectory => write!(f, "header directory"),
        }
    }
}

/// Errors raised while merging projects
#[derive(Debug, Error, Diagnostic)]
pub enum MergeError {
    /// Multiple timelines cannot be merged.
    #[error("'{source_name}' defines one or more versions")]
    #[diagnostic(code(spt::import::versions))]
    UnsupportedVersions { source_name: String },

    #[error("both '{target}' and '{source_name}' define a '{name}' {kind}")]
    #[diagnostic(code(spt::import::duplicate))]
    DuplicateName {
        target: String,
        source_name: String,
        kind: MergeNameKind,
        name: String,
    },
}

/// Merge `source` into `target`.
///
/// External features and modules of either side that the other defines
/// locally are reconciled, platforms and ignored namespaces are
/// unioned, and the source's features, modules and header directories
/// are added to the target. Name clashes between two locally-defined
/// sets are unresolvable and abort the merge before any mutation.
pub fn merge(target: &mut Project, source: &Project) -> Result<(), MergeError> {
    let target_name = target.display_name().to_string();
    let source_name = source.display_name().to_string();

    // Validate everything first so the target is never left half-merged.
    if !source.versions.is_empty() {
        return Err(MergeError::UnsupportedVersions {
            source_name: source_name.clone(),
        });
    }

    for feature in &source.features {
        if target.features.contains(feature) {
            return Err(MergeError::DuplicateName {
                target: target_name,
                source_name: source_name.clone(),
                kind: MergeNameKind::Feature,
                name: feature.clone(),
            });
        }
    }

    for module in &source.modules {
        if target.modules.iter().any(|m| m.name == module.name) {
            return Err(MergeError::DuplicateName {
                target: target_name,
                source_name: source_name.clone(),
                kind: MergeNameKind::Module,
                name: module.name.clone(),
            });
        }
    }

    for header in &source.headers {
        if target.headers.iter().any(|h| h.name == header.name) {
            return Err(MergeError::DuplicateName {
                target: target_name,
                source_name: source_name.clone(),
                kind: MergeNameKind::HeaderDirectory,
                name: header.name.clone(),
            });
        }
    }

    // External features the source defines locally are now satisfied.
    target
        .externalfeatures
        .retain(|feature| !source.features.contains(feature));

    for feature in &source.externalfeatures {
        if !target.features.contains(feature) && !target.externalfeatures.contains(feature) {
            target.externalfeatures.push(feature.clone());
        }
    }

    for feature in &source.features {
        target.features.push(feature.clone());
    }

    // The same reconciliation for externally-referenced modules.
    target
        .externalmodules
        .retain(|name| !source.modules.iter().any(|m| &m.name == name));

    for name in &source.externalmodules {
        if !target.externalmodules.contains(name)
            && !target.modules.iter().any(|m| &m.name == name)
        {
            target.externalmodules.push(name.clone());
        }
    }

    for platform in &source.platforms {
        if !target.platforms.contains(platform) {
            target.platforms.push(platform.clone());
        }
    }

    for namespace in &source.ignorednamespaces {
        if !target.ignorednamespaces.contains(namespace) {
            target.ignorednamespaces.push(namespace.clone());
        }
    }

    for module in &source.modules {
        target.modules.push(module.clone());
    }

    for header in &source.headers {
        target.headers.push(header.clone());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::project::{HeaderDirectory, Module};

    fn named_project(name: &str) -> Project {
        Project::new(format!("{}.msp", name))
    }

    fn with_module(mut project: Project, name: &str) -> Project {
        project.modules.push(Module {
            name: name.to_string(),
            ..Default::default()
        });
        project
    }

    #[test]
    fn test_merge_rejects_versioned_source() {
        let mut target = named_project("target");
        let mut source = named_project("source");
        source.versions.push("v1".to_string());
        source.platforms.push("linux".to_string());

        let err = merge(&mut target, &source).unwrap_err();
        assert!(matches!(err, MergeError::UnsupportedVersions { .. }));
        assert!(target.platforms.is_empty());
    }

    #[test]
    fn test_merge_rejects_module_collision_without_mutation() {
        let mut target = with_module(named_project("target"), "core");
        target.externalfeatures.push("EXT".to_string());
        let mut source = with_module(named_project("source"), "core");
        source.features.push("EXT".to_string());

        let err = merge(&mut target, &source).unwrap_err();
        assert!(matches!(
            err,
            MergeError::DuplicateName {
                kind: MergeNameKind::Module,
                ..
            }
        ));

        // Nothing happened, not even the earlier reconciliation steps.
        assert_eq!(target.externalfeatures, ["EXT"]);
        assert_eq!(target.modules.len(), 1);
    }

    #[test]
    fn test_merge_rejects_local_feature_collision() {
        let mut target = named_project("target");
        target.features.push("F".to_string());
        let mut source = named_project("source");
        source.features.push("F".to_string());

        let err = merge(&mut target, &source).unwrap_err();
        assert!(matches!(
            err,
            MergeError::DuplicateName {
                kind: MergeNameKind::Feature,
                ..
            }
        ));
    }

    #[test]
    fn test_merge_reconciles_external_features() {
        let mut target = named_project("target");
        target.externalfeatures = vec!["A".to_string(), "B".to_string()];
        target.features = vec!["LOCAL".to_string()];

        let mut source = named_project("source");
        source.features = vec!["A".to_string()];
        source.externalfeatures = vec!["LOCAL".to_string(), "C".to_string()];

        merge(&mut target, &source).unwrap();

        // "A" is now satisfied locally, "LOCAL" already was, "C" is new.
        assert_eq!(target.features, ["LOCAL", "A"]);
        assert_eq!(target.externalfeatures, ["B", "C"]);
    }

    #[test]
    fn test_merge_reconciles_external_modules() {
        let mut target = with_module(named_project("target"), "base");
        target.externalmodules = vec!["gui".to_string()];

        let mut source = with_module(named_project("source"), "gui");
        source.externalmodules = vec!["base".to_string(), "network".to_string()];

        merge(&mut target, &source).unwrap();

        let names: Vec<_> = target.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["base", "gui"]);
        // "gui" is now defined locally; "base" already was; "network" is
        // a genuinely external reference.
        assert_eq!(target.externalmodules, ["network"]);
    }

    #[test]
    fn test_merge_unions_platforms_and_namespaces() {
        let mut target = named_project("target");
        target.platforms = vec!["linux".to_string()];
        target.ignorednamespaces = vec!["std".to_string()];

        let mut source = named_project("source");
        source.platforms = vec!["linux".to_string(), "win32".to_string()];
        source.ignorednamespaces = vec!["detail".to_string()];
        source.headers.push(HeaderDirectory {
            name: "include".to_string(),
            ..Default::default()
        });

        merge(&mut target, &source).unwrap();

        assert_eq!(target.platforms, ["linux", "win32"]);
        assert_eq!(target.ignorednamespaces, ["std", "detail"]);
        assert_eq!(target.headers.len(), 1);
    }
}

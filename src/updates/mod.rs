//! Format updates for old project files
//!
//! A project file records its format version on the root element. Old
//! files are brought up to date by an ordered chain of per-version
//! update steps operating on the raw XML tree, before the entity model
//! is built.
//!
//! Each step is two-phase so the shell owns all blocking UI: `plan`
//! inspects the tree and says what to ask the user (if anything), then
//! `apply` mutates the tree given the answer. A step only advances the
//! version attribute inside a successful `apply`, so a cancelled run
//! never leaves a partial version bump behind.

pub mod steps;

use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

use crate::xml::{Element, XmlError};

/// The format version written by this release.
pub const FORMAT_VERSION: u32 = 15;

/// The oldest format version the update chain can still read.
pub const MIN_FORMAT_VERSION: u32 = 10;

/// Read the format version from a raw tree's root element.
pub fn format_version(root: &Element) -> Result<u32, XmlError> {
    let value = root.attr("version").ok_or_else(|| {
        XmlError::SchemaValidation("missing version attribute".to_string())
    })?;

    value.parse().map_err(|_| {
        XmlError::SchemaValidation(format!("unparseable version attribute: '{}'", value))
    })
}

/// A question an update step needs answered before it can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRequest {
    /// What to ask the user.
    pub prompt: String,

    /// The values to choose between.
    pub options: Vec<String>,
}

/// One step of the format update chain.
pub trait FormatUpdate {
    /// The version this step updates to, from the immediately previous
    /// format.
    fn updates_to(&self) -> u32;

    /// Inspect the tree and return the input required from the user, or
    /// `None` when the step can run unattended.
    fn plan(&self, root: &Element) -> Option<InputRequest>;

    /// Update the tree in place, including the version attribute.
    fn apply(&self, root: &mut Element, input: Option<&str>) -> Result<(), UpdateError>;
}

/// Errors raised by the update chain
#[derive(Debug, Error, Diagnostic)]
pub enum UpdateError {
    /// The user declined to answer a step's question; the whole run is
    /// abandoned and nothing is written.
    #[error("the update to format version {0} was cancelled")]
    #[diagnostic(code(spt::updates::cancelled))]
    Cancelled(u32),

    #[error("the update to format version {0} requires an answer that was not supplied")]
    #[diagnostic(code(spt::updates::missing_input))]
    MissingInput(u32),

    #[error("cannot update from format version {from} to {to}")]
    #[diagnostic(code(spt::updates::unknown_version))]
    UnknownVersion { from: u32, to: u32 },

    #[error("{0}")]
    #[diagnostic(code(spt::updates::invalid_version))]
    InvalidVersion(String),
}

/// The ordered registry of format update steps.
pub struct UpdateManager {
    updates: Vec<Box<dyn FormatUpdate>>,
}

impl UpdateManager {
    /// A manager holding the built-in update chain.
    pub fn new() -> Self {
        Self {
            updates: vec![
                Box::new(steps::UpdateV11),
                Box::new(steps::UpdateV12),
                Box::new(steps::UpdateV13),
                Box::new(steps::UpdateV14),
                Box::new(steps::UpdateV15),
            ],
        }
    }

    /// The steps needed to bring `root` up to `update_to`, in the order
    /// they must run.
    pub fn pending(
        &self,
        root: &Element,
        update_to: u32,
    ) -> Result<&[Box<dyn FormatUpdate>], UpdateError> {
        let from = format_version(root).map_err(|e| UpdateError::InvalidVersion(e.to_string()))?;

        if update_to > FORMAT_VERSION || update_to < from || from < MIN_FORMAT_VERSION {
            return Err(UpdateError::UnknownVersion {
                from,
                to: update_to,
            });
        }

        let start = self
            .updates
            .iter()
            .position(|u| u.updates_to() > from)
            .unwrap_or(self.updates.len());
        let end = self
            .updates
            .iter()
            .position(|u| u.updates_to() > update_to)
            .unwrap_or(self.updates.len());

        Ok(&self.updates[start..end])
    }

    /// Run every pending step up to `update_to`.
    ///
    /// `prompter` is called for each step that needs input; returning
    /// `None` cancels the whole run. The tree may have been partially
    /// updated on cancellation - the caller discards it instead of
    /// writing it out.
    pub fn update(
        &self,
        root: &mut Element,
        update_to: u32,
        prompter: &mut dyn FnMut(&InputRequest) -> Option<String>,
    ) -> Result<(), UpdateError> {
        for step in self.pending(root, update_to)? {
            let input = match step.plan(root) {
                Some(request) => match prompter(&request) {
                    Some(answer) => Some(answer),
                    None => return Err(UpdateError::Cancelled(step.updates_to())),
                },
                None => None,
            };

            step.apply(root, input.as_deref())?;
            info!(version = step.updates_to(), "applied format update");
        }

        Ok(())
    }
}

impl Default for UpdateManager {
    fn default() -> Self {
        Self::new()
    }
}

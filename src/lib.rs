//! SPT: SIP Project Toolkit
//!
//! The project-model core for editors of SIP binding-generator project
//! files: a typed entity graph loaded from the versioned XML project
//! format, consistency maintenance for feature/platform tags, project
//! import/merge and the format update chain.
//!
//! The GUI shell is an external collaborator: it owns dialogs, menus and
//! dirty tracking, and calls in through [`load_project`] /
//! [`save_project`], the tag operations in [`core::tags`], [`core::merge`]
//! and the [`updates::UpdateManager`].

pub mod adapters;
pub mod core;
pub mod entities;
pub mod updates;
pub mod xml;

pub use adapters::{load_project, render_project, save_project, ProjectDocument};
pub use updates::{UpdateManager, FORMAT_VERSION, MIN_FORMAT_VERSION};

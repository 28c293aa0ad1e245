//! Loading and saving the entity model
//!
//! One adapter per entity kind, each composing the attribute codec with
//! the shared facet adapters and the child-element dispatch tables. The
//! output side reproduces the legacy on-disk layout exactly: for a file
//! already in canonical form, `save(load(file))` is byte-identical.

pub mod code;
pub mod codec;
pub mod facets;
pub mod project;

pub use project::{load_project, render_project, save_project, ProjectDocument};

//! Core module - consistency maintenance over the project tree

pub mod import;
pub mod tags;
pub mod traverse;

pub use import::{merge, MergeError, MergeNameKind};
pub use tags::{delete_tag, new_tag, rename_tag, validate_identifier, TagError, TagKind};
pub use traverse::{tagged_items, ContainerRef, TaggedItemRef, TaggedItems};

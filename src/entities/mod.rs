//! Entity type definitions
//!
//! The in-memory mirror of a project file:
//!
//! **Project structure:**
//! - [`Project`] - the root entity: tag universe, modules, headers
//! - [`Module`] / [`SipFile`] - generated binding modules and their files
//! - [`HeaderDirectory`] / [`HeaderFile`] / [`HeaderFileVersion`] - the
//!   scanned C++ headers
//!
//! **API items:**
//! - [`CodeItem`] - closed enum over every construct a `.sip` file holds
//!   ([`Class`], [`Enum`], [`Function`], [`Method`], ...)
//!
//! **Capability facets:**
//! - [`Code`] - status, feature/platform tag references, version range
//! - [`Access`] / [`ExtendedAccess`] - C++ access specifiers
//! - [`Annos`] - opaque annotation list

pub mod code;
pub mod facets;
pub mod project;

pub use code::{
    Argument, Class, CodeItem, Constructor, Destructor, Enum, EnumValue, Function, ManualCode,
    Method, Namespace, OpaqueClass, OperatorCast, OperatorFunction, OperatorMethod, Typedef,
    Variable,
};
pub use facets::{Access, Anno, Annos, Code, ExtendedAccess, Status, VersionRange};
pub use project::{HeaderDirectory, HeaderFile, HeaderFileVersion, Module, Project, SipFile};

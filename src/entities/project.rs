//! Project structure entity types
//!
//! The project tree above the API items: the root [`Project`], its
//! [`Module`]s and their `.sip` files, and the scanned header
//! directories.

use crate::entities::code::CodeItem;

/// The root of a project tree
#[derive(Debug, Clone, Default)]
pub struct Project {
    /// Path of the project file.
    pub name: String,

    /// The name of the module that imports all the others.
    pub rootmodule: String,

    /// Ordered release tags. Empty means a single timeline.
    pub versions: Vec<String>,

    /// Platform tag names.
    pub platforms: Vec<String>,

    /// Feature tag names defined by this project.
    pub features: Vec<String>,

    /// Module names expected to be defined by an importing project.
    pub externalmodules: Vec<String>,

    /// Feature tag names expected to be defined by an importing project.
    pub externalfeatures: Vec<String>,

    /// Namespaces hidden from the generated bindings.
    pub ignorednamespaces: Vec<String>,

    /// Comments placed at the top of every generated `.sip` file.
    pub sipcomments: String,

    pub modules: Vec<Module>,
    pub headers: Vec<HeaderDirectory>,
}

impl Project {
    /// Create an empty project for the given file path.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The project name used in user-facing messages: the file basename
    /// without its extension.
    pub fn display_name(&self) -> &str {
        let basename = self
            .name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.name.as_str());
        basename.rsplit_once('.').map_or(basename, |(stem, _)| stem)
    }
}

/// A Python extension module
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub name: String,

    /// Suffix appended to the generated-code output directory.
    pub outputdirsuffix: String,

    /// The module's `%VirtualErrorHandler` name.
    pub virtualerrorhandler: String,

    /// Generate bindings restricted to the Python limited API.
    pub uselimitedapi: bool,

    /// The module is `Py_ssize_t` clean.
    pub pyssizetclean: bool,

    /// Whether `__init__` calls `super().__init__()`: empty (undefined),
    /// `no` or `yes`.
    pub callsuperinit: String,

    /// Names of modules this one `%Import`s.
    pub imports: Vec<String>,

    /// Additional module-level SIP directives.
    pub directives: String,

    pub content: Vec<SipFile>,
}

/// A directory of C++ headers assigned to the project
#[derive(Debug, Clone, Default)]
pub struct HeaderDirectory {
    pub name: String,

    /// Glob selecting the header files to scan.
    pub filefilter: String,

    /// Suffix appended to the scanner's input directory.
    pub inputdirsuffix: String,

    /// Extra arguments passed to the parser.
    pub parserargs: String,

    pub content: Vec<HeaderFile>,
}

/// A single C++ header file
#[derive(Debug, Clone, Default)]
pub struct HeaderFile {
    /// The basename of the header file.
    pub name: String,

    /// The module the header file is assigned to, if any.
    pub module: String,

    /// The header file is never assigned to a module.
    pub ignored: bool,

    /// Per-release snapshots. These are unordered: the scanner sorts
    /// them against the project's release tags when it needs to.
    pub versions: Vec<HeaderFileVersion>,
}

/// One release's snapshot of a header file
#[derive(Debug, Clone, Default)]
pub struct HeaderFileVersion {
    /// Checksum of the header contents at this release.
    pub md5: String,

    /// The release tag this snapshot belongs to.
    pub version: String,

    /// The snapshot still needs to be parsed by the scanner.
    pub parse: bool,
}

/// A generated `.sip` source file and its API content
#[derive(Debug, Clone, Default)]
pub struct SipFile {
    pub name: String,

    pub exportedheadercode: String,
    pub moduleheadercode: String,
    pub modulecode: String,
    pub preinitcode: String,
    pub initcode: String,
    pub postinitcode: String,
    pub exportedtypehintcode: String,
    pub typehintcode: String,

    pub content: Vec<CodeItem>,
}

//! Adapters for the project structure entities
//!
//! The public load/save contract lives here: [`load_project`] /
//! [`save_project`] for files already at the current format version, and
//! [`ProjectDocument`] for callers that need to run format updates on
//! the raw tree first.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::adapters::code::{load_namespace_item, save_code_item};
use crate::adapters::codec;
use crate::core::traverse::tagged_items;
use crate::entities::project::{
    HeaderDirectory, HeaderFile, HeaderFileVersion, Module, Project, SipFile,
};
use crate::updates::{format_version, FORMAT_VERSION, MIN_FORMAT_VERSION};
use crate::xml::{self, Element, XmlError, XmlWriter};

/// Load a project from a file at the current format version.
///
/// Fails with a schema error if the document is not a project file, its
/// version attribute is unparseable, or the file needs format updates
/// (use [`ProjectDocument`] and the update manager for those).
pub fn load_project(path: impl AsRef<Path>) -> Result<Project, XmlError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading project");

    let source = fs::read_to_string(path)?;
    let name = path.display().to_string();
    let root = xml::parse(&source, &name)?;

    let version = format_version(&root)?;
    if version != FORMAT_VERSION {
        return Err(XmlError::SchemaValidation(format!(
            "'{}' is at format version {} but version {} is required",
            name, version, FORMAT_VERSION
        )));
    }

    project_from_root(&root, name)
}

/// Save a project in the canonical form.
pub fn save_project(project: &Project, path: impl AsRef<Path>) -> Result<(), XmlError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "saving project");

    fs::write(path, render_project(project))?;
    Ok(())
}

/// Render a project to the canonical XML form.
pub fn render_project(project: &Project) -> String {
    let mut w = XmlWriter::new();

    w.open("Project");
    codec::save_attribute(&mut w, "version", &FORMAT_VERSION.to_string());
    codec::save_str(&mut w, "rootmodule", &project.rootmodule);
    codec::save_str_list(&mut w, "versions", &project.versions);
    codec::save_str_list(&mut w, "platforms", &project.platforms);
    codec::save_str_list(&mut w, "features", &project.features);
    codec::save_str_list(&mut w, "externalmodules", &project.externalmodules);
    codec::save_str_list(&mut w, "externalfeatures", &project.externalfeatures);
    codec::save_str_list(&mut w, "ignorednamespaces", &project.ignorednamespaces);

    if project.sipcomments.is_empty() && project.headers.is_empty() && project.modules.is_empty() {
        w.finish_empty();
        return w.into_string();
    }

    w.finish_open();
    codec::save_literal(&mut w, "sipcomments", &project.sipcomments);
    for header in &project.headers {
        save_header_directory(&mut w, header);
    }
    for module in &project.modules {
        save_module(&mut w, module);
    }
    w.close("Project");

    w.into_string()
}

/// A raw project document, read but not yet modeled.
///
/// This is the handle the shell uses while old files are brought up to
/// the current format version: read the tree, run the pending updates
/// against `root_mut()`, then build the entity model.
pub struct ProjectDocument {
    name: String,
    root: Element,
}

impl ProjectDocument {
    /// Read a project file of any supported format version.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, XmlError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let name = path.display().to_string();
        let root = xml::parse(&source, &name)?;

        if root.tag != "Project" {
            return Err(XmlError::SchemaValidation(format!(
                "'{}' is not a project file (root element is <{}>)",
                name, root.tag
            )));
        }

        let version = format_version(&root)?;
        if version < MIN_FORMAT_VERSION || version > FORMAT_VERSION {
            return Err(XmlError::SchemaValidation(format!(
                "'{}' is at format version {}; supported versions are {} to {}",
                name, version, MIN_FORMAT_VERSION, FORMAT_VERSION
            )));
        }

        Ok(Self { name, root })
    }

    /// The current format version of the raw tree.
    pub fn version(&self) -> u32 {
        self.root
            .attr("version")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Build the entity model; the tree must be at the current version.
    pub fn into_project(self) -> Result<Project, XmlError> {
        let version = format_version(&self.root)?;
        if version != FORMAT_VERSION {
            return Err(XmlError::SchemaValidation(format!(
                "'{}' is still at format version {}; apply the pending updates first",
                self.name, version
            )));
        }

        project_from_root(&self.root, self.name)
    }
}

/// Build the entity model from a raw tree at the current version.
fn project_from_root(root: &Element, name: String) -> Result<Project, XmlError> {
    if root.tag != "Project" {
        return Err(XmlError::SchemaValidation(format!(
            "'{}' is not a project file (root element is <{}>)",
            name, root.tag
        )));
    }

    let mut project = Project::new(name);
    project.rootmodule = codec::str_attr(root, "rootmodule");
    project.versions = codec::str_list_attr(root, "versions");
    project.platforms = codec::str_list_attr(root, "platforms");
    project.features = codec::str_list_attr(root, "features");
    project.externalmodules = codec::str_list_attr(root, "externalmodules");
    project.externalfeatures = codec::str_list_attr(root, "externalfeatures");
    project.ignorednamespaces = codec::str_list_attr(root, "ignorednamespaces");
    project.sipcomments = codec::literal_text(root, "sipcomments");

    for child in &root.children {
        match child.tag.as_str() {
            "HeaderDirectory" => project.headers.push(load_header_directory(child)),
            "Module" => project.modules.push(load_module(child)),
            "Literal" => {}
            other => warn!(tag = other, "skipping unknown project-level element"),
        }
    }

    check_unique_names(&project)?;
    check_tag_references(&project);

    Ok(project)
}

/// Module and header-directory names are unique within a project.
fn check_unique_names(project: &Project) -> Result<(), XmlError> {
    for (i, module) in project.modules.iter().enumerate() {
        if project.modules[..i].iter().any(|m| m.name == module.name) {
            return Err(XmlError::SchemaValidation(format!(
                "duplicate module '{}'",
                module.name
            )));
        }
    }

    for (i, header) in project.headers.iter().enumerate() {
        if project.headers[..i].iter().any(|h| h.name == header.name) {
            return Err(XmlError::SchemaValidation(format!(
                "duplicate header directory '{}'",
                header.name
            )));
        }
    }

    Ok(())
}

/// Report tag references that are outside the project's declared tag
/// universe. They are preserved as-is: stripping them would corrupt a
/// file maintained by a newer version of the tools.
fn check_tag_references(project: &Project) {
    for (item, _) in tagged_items(project) {
        let code = item.code();

        for feature in &code.features {
            let name = feature.strip_prefix('!').unwrap_or(feature);
            if !project.features.iter().any(|f| f == name)
                && !project.externalfeatures.iter().any(|f| f == name)
            {
                warn!(feature = name, "reference to undefined feature");
            }
        }

        for platform in &code.platforms {
            let name = platform.strip_prefix('!').unwrap_or(platform);
            if !project.platforms.iter().any(|p| p == name) {
                warn!(platform = name, "reference to undefined platform");
            }
        }
    }
}

fn load_module(element: &Element) -> Module {
    Module {
        name: codec::str_attr(element, "name"),
        outputdirsuffix: codec::str_attr(element, "outputdirsuffix"),
        virtualerrorhandler: codec::str_attr(element, "virtualerrorhandler"),
        uselimitedapi: codec::bool_attr(element, "uselimitedapi"),
        pyssizetclean: codec::bool_attr(element, "pyssizetclean"),
        callsuperinit: codec::str_attr(element, "callsuperinit"),
        imports: codec::str_list_attr(element, "imports"),
        directives: codec::literal_text(element, "directives"),
        content: element.children_with_tag("SipFile").map(load_sip_file).collect(),
    }
}

fn save_module(w: &mut XmlWriter, module: &Module) {
    w.open("Module");
    codec::save_attribute(w, "name", &module.name);
    codec::save_str(w, "outputdirsuffix", &module.outputdirsuffix);
    codec::save_str(w, "virtualerrorhandler", &module.virtualerrorhandler);
    codec::save_bool(w, "uselimitedapi", module.uselimitedapi);
    codec::save_bool(w, "pyssizetclean", module.pyssizetclean);
    codec::save_str(w, "callsuperinit", &module.callsuperinit);
    codec::save_str_list(w, "imports", &module.imports);

    if module.directives.is_empty() && module.content.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    codec::save_literal(w, "directives", &module.directives);
    for sip_file in &module.content {
        save_sip_file(w, sip_file);
    }
    w.close("Module");
}

fn load_sip_file(element: &Element) -> SipFile {
    SipFile {
        name: codec::str_attr(element, "name"),
        exportedheadercode: codec::literal_text(element, "exportedheadercode"),
        moduleheadercode: codec::literal_text(element, "moduleheadercode"),
        modulecode: codec::literal_text(element, "modulecode"),
        preinitcode: codec::literal_text(element, "preinitcode"),
        initcode: codec::literal_text(element, "initcode"),
        postinitcode: codec::literal_text(element, "postinitcode"),
        exportedtypehintcode: codec::literal_text(element, "exportedtypehintcode"),
        typehintcode: codec::literal_text(element, "typehintcode"),
        content: element
            .children
            .iter()
            .filter_map(load_namespace_item)
            .collect(),
    }
}

fn save_sip_file(w: &mut XmlWriter, sip_file: &SipFile) {
    w.open("SipFile");
    codec::save_attribute(w, "name", &sip_file.name);

    // The literal order matches older versions of the format.
    let literals = [
        ("exportedheadercode", &sip_file.exportedheadercode),
        ("moduleheadercode", &sip_file.moduleheadercode),
        ("modulecode", &sip_file.modulecode),
        ("preinitcode", &sip_file.preinitcode),
        ("initcode", &sip_file.initcode),
        ("postinitcode", &sip_file.postinitcode),
        ("exportedtypehintcode", &sip_file.exportedtypehintcode),
        ("typehintcode", &sip_file.typehintcode),
    ];

    let has_literals = literals.iter().any(|(_, text)| !text.is_empty());
    if !has_literals && sip_file.content.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    for (name, text) in literals {
        codec::save_literal(w, name, text);
    }
    for item in &sip_file.content {
        save_code_item(w, item);
    }
    w.close("SipFile");
}

fn load_header_directory(element: &Element) -> HeaderDirectory {
    HeaderDirectory {
        name: codec::str_attr(element, "name"),
        filefilter: codec::str_attr(element, "filefilter"),
        inputdirsuffix: codec::str_attr(element, "inputdirsuffix"),
        parserargs: codec::str_attr(element, "parserargs"),
        content: element
            .children_with_tag("HeaderFile")
            .map(load_header_file)
            .collect(),
    }
}

fn save_header_directory(w: &mut XmlWriter, header: &HeaderDirectory) {
    w.open("HeaderDirectory");
    codec::save_attribute(w, "name", &header.name);
    codec::save_str(w, "parserargs", &header.parserargs);
    codec::save_str(w, "inputdirsuffix", &header.inputdirsuffix);
    codec::save_str(w, "filefilter", &header.filefilter);

    if header.content.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    for file in &header.content {
        save_header_file(w, file);
    }
    w.close("HeaderDirectory");
}

fn load_header_file(element: &Element) -> HeaderFile {
    HeaderFile {
        name: codec::str_attr(element, "name"),
        module: codec::str_attr(element, "module"),
        ignored: codec::bool_attr(element, "ignored"),
        versions: element
            .children_with_tag("HeaderFileVersion")
            .map(|child| HeaderFileVersion {
                md5: codec::str_attr(child, "md5"),
                version: codec::str_attr(child, "version"),
                parse: codec::bool_attr(child, "parse"),
            })
            .collect(),
    }
}

fn save_header_file(w: &mut XmlWriter, file: &HeaderFile) {
    w.open("HeaderFile");
    codec::save_attribute(w, "name", &file.name);
    codec::save_str(w, "module", &file.module);
    codec::save_bool(w, "ignored", file.ignored);

    if file.versions.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    // Versions are unordered; they are written exactly as stored.
    for version in &file.versions {
        w.open("HeaderFileVersion");
        codec::save_attribute(w, "md5", &version.md5);
        codec::save_attribute(w, "version", &version.version);
        codec::save_bool(w, "parse", version.parse);
        w.finish_empty();
    }
    w.close("HeaderFile");
}

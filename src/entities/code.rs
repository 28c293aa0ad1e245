//! API item entity types
//!
//! Every C++ construct that can appear inside a `.sip` source file is a
//! variant of the closed [`CodeItem`] enum. The structs are plain data
//! holders; loading, saving and consistency maintenance live elsewhere.

use std::fmt;

use crate::entities::facets::{Access, Annos, Code, ExtendedAccess};

/// A C++ class or struct
#[derive(Debug, Clone, Default)]
pub struct Class {
    pub code: Code,
    pub annos: Annos,
    pub access: Access,
    pub docstring: String,

    pub name: String,
    /// Comma-separated C++ base class list.
    pub bases: String,
    /// Python base classes overriding the C++ ones.
    pub pybases: String,
    /// Declared with `struct` rather than `class`.
    pub is_struct: bool,

    pub typehintcode: String,
    pub typeheadercode: String,
    pub typecode: String,
    pub finalisationcode: String,
    pub subclasscode: String,
    pub convtotypecode: String,
    pub convfromtypecode: String,
    pub gctraversecode: String,
    pub gcclearcode: String,
    pub bigetbufcode: String,
    pub birelbufcode: String,
    pub bireadbufcode: String,
    pub biwritebufcode: String,
    pub bisegcountcode: String,
    pub bicharbufcode: String,
    pub picklecode: String,

    pub content: Vec<CodeItem>,
}

impl fmt::Display for Class {
    /// The one-line signature shown in the API tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_struct { "struct" } else { "class" })?;

        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }

        if !self.bases.is_empty() {
            write!(f, " : {}", self.bases)?;
        }

        if !self.annos.is_empty() {
            write!(f, " /{}/", self.annos)?;
        }

        Ok(())
    }
}

/// A C++ namespace
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    pub code: Code,
    pub annos: Annos,
    pub name: String,
    pub typeheadercode: String,
    pub content: Vec<CodeItem>,
}

/// A class handled as an opaque type
#[derive(Debug, Clone, Default)]
pub struct OpaqueClass {
    pub code: Code,
    pub annos: Annos,
    pub access: Access,
    pub name: String,
}

/// A C++ enum
#[derive(Debug, Clone, Default)]
pub struct Enum {
    pub code: Code,
    pub annos: Annos,
    pub access: Access,
    pub name: String,
    /// Declared as a scoped `enum class`.
    pub is_enum_class: bool,
    pub content: Vec<EnumValue>,
}

/// A single enum member
///
/// Not a [`CodeItem`]: enum values only ever live inside an [`Enum`],
/// but they carry the full tag facet and take part in traversal.
#[derive(Debug, Clone, Default)]
pub struct EnumValue {
    pub code: Code,
    pub annos: Annos,
    pub name: String,
}

/// A function argument
#[derive(Debug, Clone, Default)]
pub struct Argument {
    pub annos: Annos,
    /// The C++ type.
    pub ty: String,
    pub name: String,
    /// The argument was unnamed in the header.
    pub unnamed: bool,
    /// C++ default value expression.
    pub default: String,
    pub pytype: String,
    pub pydefault: String,
}

/// A free function
#[derive(Debug, Clone, Default)]
pub struct Function {
    pub code: Code,
    pub annos: Annos,
    pub docstring: String,
    pub name: String,
    /// The C++ return type.
    pub rtype: String,
    pub pytype: String,
    pub pyargs: String,
    pub args: Vec<Argument>,
    pub methcode: String,
}

/// A class method
#[derive(Debug, Clone, Default)]
pub struct Method {
    pub code: Code,
    pub annos: Annos,
    pub access: Access,
    pub docstring: String,
    pub name: String,
    pub rtype: String,
    pub pytype: String,
    pub pyargs: String,
    pub args: Vec<Argument>,
    pub is_abstract: bool,
    pub is_const: bool,
    pub is_final: bool,
    pub is_static: bool,
    pub is_virtual: bool,
    pub methcode: String,
    pub virtcode: String,
}

/// A class constructor
#[derive(Debug, Clone, Default)]
pub struct Constructor {
    pub code: Code,
    pub annos: Annos,
    pub access: Access,
    pub docstring: String,
    pub name: String,
    pub pyargs: String,
    pub args: Vec<Argument>,
    pub is_explicit: bool,
    pub methcode: String,
}

/// A class destructor
#[derive(Debug, Clone, Default)]
pub struct Destructor {
    pub code: Code,
    pub annos: Annos,
    pub access: Access,
    pub name: String,
    pub is_virtual: bool,
    pub methcode: String,
    pub virtcode: String,
}

/// A class operator
#[derive(Debug, Clone, Default)]
pub struct OperatorMethod {
    pub code: Code,
    pub annos: Annos,
    pub access: Access,
    pub name: String,
    pub rtype: String,
    pub pytype: String,
    pub pyargs: String,
    pub args: Vec<Argument>,
    pub is_abstract: bool,
    pub is_const: bool,
    pub is_virtual: bool,
    pub methcode: String,
    pub virtcode: String,
}

/// A global operator
#[derive(Debug, Clone, Default)]
pub struct OperatorFunction {
    pub code: Code,
    pub annos: Annos,
    pub name: String,
    pub rtype: String,
    pub pytype: String,
    pub pyargs: String,
    pub args: Vec<Argument>,
    pub methcode: String,
}

/// A class cast operator
#[derive(Debug, Clone, Default)]
pub struct OperatorCast {
    pub code: Code,
    pub annos: Annos,
    pub access: Access,
    pub name: String,
    pub args: Vec<Argument>,
    pub is_const: bool,
    pub methcode: String,
}

/// A global or member variable
#[derive(Debug, Clone, Default)]
pub struct Variable {
    pub code: Code,
    pub annos: Annos,
    pub access: Access,
    pub name: String,
    /// The C++ type.
    pub ty: String,
    pub is_static: bool,
    pub accesscode: String,
    pub getcode: String,
    pub setcode: String,
}

/// A typedef
#[derive(Debug, Clone, Default)]
pub struct Typedef {
    pub code: Code,
    pub annos: Annos,
    pub name: String,
    /// The C++ type being aliased.
    pub ty: String,
}

/// Hand-written code inserted into the generated bindings
#[derive(Debug, Clone, Default)]
pub struct ManualCode {
    pub code: Code,
    pub access: ExtendedAccess,
    pub docstring: String,
    /// One-line summary shown in the API tree.
    pub precis: String,
    /// The code itself, when it is more than the precis.
    pub body: String,
    pub methcode: String,
}

/// Any API item that can appear in a container's content list
#[derive(Debug, Clone)]
pub enum CodeItem {
    Class(Class),
    Constructor(Constructor),
    Destructor(Destructor),
    Enum(Enum),
    Function(Function),
    ManualCode(ManualCode),
    Method(Method),
    Namespace(Namespace),
    OpaqueClass(OpaqueClass),
    OperatorCast(OperatorCast),
    OperatorFunction(OperatorFunction),
    OperatorMethod(OperatorMethod),
    Typedef(Typedef),
    Variable(Variable),
}

impl CodeItem {
    /// The XML element tag for this kind.
    pub fn xml_tag(&self) -> &'static str {
        match self {
            CodeItem::Class(_) => "Class",
            CodeItem::Constructor(_) => "Constructor",
            CodeItem::Destructor(_) => "Destructor",
            CodeItem::Enum(_) => "Enum",
            CodeItem::Function(_) => "Function",
            CodeItem::ManualCode(_) => "ManualCode",
            CodeItem::Method(_) => "Method",
            CodeItem::Namespace(_) => "Namespace",
            CodeItem::OpaqueClass(_) => "OpaqueClass",
            CodeItem::OperatorCast(_) => "OperatorCast",
            CodeItem::OperatorFunction(_) => "OperatorFunction",
            CodeItem::OperatorMethod(_) => "OperatorMethod",
            CodeItem::Typedef(_) => "Typedef",
            CodeItem::Variable(_) => "Variable",
        }
    }

    /// The shared tag/status facet.
    pub fn code(&self) -> &Code {
        match self {
            CodeItem::Class(i) => &i.code,
            CodeItem::Constructor(i) => &i.code,
            CodeItem::Destructor(i) => &i.code,
            CodeItem::Enum(i) => &i.code,
            CodeItem::Function(i) => &i.code,
            CodeItem::ManualCode(i) => &i.code,
            CodeItem::Method(i) => &i.code,
            CodeItem::Namespace(i) => &i.code,
            CodeItem::OpaqueClass(i) => &i.code,
            CodeItem::OperatorCast(i) => &i.code,
            CodeItem::OperatorFunction(i) => &i.code,
            CodeItem::OperatorMethod(i) => &i.code,
            CodeItem::Typedef(i) => &i.code,
            CodeItem::Variable(i) => &i.code,
        }
    }

    /// The shared tag/status facet, mutably.
    pub fn code_mut(&mut self) -> &mut Code {
        match self {
            CodeItem::Class(i) => &mut i.code,
            CodeItem::Constructor(i) => &mut i.code,
            CodeItem::Destructor(i) => &mut i.code,
            CodeItem::Enum(i) => &mut i.code,
            CodeItem::Function(i) => &mut i.code,
            CodeItem::ManualCode(i) => &mut i.code,
            CodeItem::Method(i) => &mut i.code,
            CodeItem::Namespace(i) => &mut i.code,
            CodeItem::OpaqueClass(i) => &mut i.code,
            CodeItem::OperatorCast(i) => &mut i.code,
            CodeItem::OperatorFunction(i) => &mut i.code,
            CodeItem::OperatorMethod(i) => &mut i.code,
            CodeItem::Typedef(i) => &mut i.code,
            CodeItem::Variable(i) => &mut i.code,
        }
    }

    /// Nested content for the container kinds.
    pub fn content(&self) -> Option<&Vec<CodeItem>> {
        match self {
            CodeItem::Class(i) => Some(&i.content),
            CodeItem::Namespace(i) => Some(&i.content),
            _ => None,
        }
    }

    /// Nested content for the container kinds, mutably.
    pub fn content_mut(&mut self) -> Option<&mut Vec<CodeItem>> {
        match self {
            CodeItem::Class(i) => Some(&mut i.content),
            CodeItem::Namespace(i) => Some(&mut i.content),
            _ => None,
        }
    }
}

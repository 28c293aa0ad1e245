//! Adapters for the API item entities
//!
//! One load/save pair per [`CodeItem`] kind. Loading is order-tolerant
//! (attributes and sub-elements are looked up by name); saving emits a
//! fixed order per kind, which together with the canonical writer makes
//! `save(load(file))` byte-stable for canonical input.

use tracing::warn;

use crate::adapters::codec;
use crate::adapters::facets;
use crate::entities::code::{
    Argument, Class, CodeItem, Constructor, Destructor, Enum, EnumValue, Function, ManualCode,
    Method, Namespace, OpaqueClass, OperatorCast, OperatorFunction, OperatorMethod, Typedef,
    Variable,
};
use crate::xml::{Element, XmlWriter};

/// Load a child of a `SipFile` or `Namespace` content list.
///
/// The accepted tags are the namespace-level constructor map; `Literal`
/// children belong to the container itself and are skipped silently.
pub(crate) fn load_namespace_item(child: &Element) -> Option<CodeItem> {
    match child.tag.as_str() {
        "Class" => Some(CodeItem::Class(load_class(child))),
        "Enum" => Some(CodeItem::Enum(load_enum(child))),
        "Function" => Some(CodeItem::Function(load_function(child))),
        "ManualCode" => Some(CodeItem::ManualCode(load_manual_code(child))),
        "Namespace" => Some(CodeItem::Namespace(load_namespace(child))),
        "OpaqueClass" => Some(CodeItem::OpaqueClass(load_opaque_class(child))),
        "OperatorFunction" => Some(CodeItem::OperatorFunction(load_operator_function(child))),
        "Typedef" => Some(CodeItem::Typedef(load_typedef(child))),
        "Variable" => Some(CodeItem::Variable(load_variable(child))),
        "Literal" => None,
        other => {
            warn!(tag = other, "skipping unknown namespace-level element");
            None
        }
    }
}

/// Load a child of a `Class` content list.
pub(crate) fn load_class_item(child: &Element) -> Option<CodeItem> {
    match child.tag.as_str() {
        "Class" => Some(CodeItem::Class(load_class(child))),
        "Constructor" => Some(CodeItem::Constructor(load_constructor(child))),
        "Destructor" => Some(CodeItem::Destructor(load_destructor(child))),
        "Enum" => Some(CodeItem::Enum(load_enum(child))),
        "ManualCode" => Some(CodeItem::ManualCode(load_manual_code(child))),
        "Method" => Some(CodeItem::Method(load_method(child))),
        "Namespace" => Some(CodeItem::Namespace(load_namespace(child))),
        "OpaqueClass" => Some(CodeItem::OpaqueClass(load_opaque_class(child))),
        "OperatorCast" => Some(CodeItem::OperatorCast(load_operator_cast(child))),
        "OperatorMethod" => Some(CodeItem::OperatorMethod(load_operator_method(child))),
        "Typedef" => Some(CodeItem::Typedef(load_typedef(child))),
        "Variable" => Some(CodeItem::Variable(load_variable(child))),
        "Literal" => None,
        other => {
            warn!(tag = other, "skipping unknown class-level element");
            None
        }
    }
}

/// Save any API item under its own tag.
pub(crate) fn save_code_item(w: &mut XmlWriter, item: &CodeItem) {
    match item {
        CodeItem::Class(i) => save_class(w, i),
        CodeItem::Constructor(i) => save_constructor(w, i),
        CodeItem::Destructor(i) => save_destructor(w, i),
        CodeItem::Enum(i) => save_enum(w, i),
        CodeItem::Function(i) => save_function(w, i),
        CodeItem::ManualCode(i) => save_manual_code(w, i),
        CodeItem::Method(i) => save_method(w, i),
        CodeItem::Namespace(i) => save_namespace(w, i),
        CodeItem::OpaqueClass(i) => save_opaque_class(w, i),
        CodeItem::OperatorCast(i) => save_operator_cast(w, i),
        CodeItem::OperatorFunction(i) => save_operator_function(w, i),
        CodeItem::OperatorMethod(i) => save_operator_method(w, i),
        CodeItem::Typedef(i) => save_typedef(w, i),
        CodeItem::Variable(i) => save_variable(w, i),
    }
}

fn load_arguments(element: &Element) -> Vec<Argument> {
    element
        .children_with_tag("Argument")
        .map(|child| Argument {
            annos: facets::load_annos(child),
            ty: codec::str_attr(child, "type"),
            name: codec::str_attr(child, "name"),
            unnamed: codec::bool_attr(child, "unnamed"),
            default: codec::str_attr(child, "default"),
            pytype: codec::str_attr(child, "pytype"),
            pydefault: codec::str_attr(child, "pydefault"),
        })
        .collect()
}

fn save_arguments(w: &mut XmlWriter, args: &[Argument]) {
    for arg in args {
        w.open("Argument");
        facets::save_annos(w, &arg.annos);
        codec::save_attribute(w, "type", &arg.ty);
        codec::save_str(w, "name", &arg.name);
        codec::save_bool(w, "unnamed", arg.unnamed);
        codec::save_str(w, "default", &arg.default);
        codec::save_str(w, "pytype", &arg.pytype);
        codec::save_str(w, "pydefault", &arg.pydefault);
        w.finish_empty();
    }
}

fn load_class(element: &Element) -> Class {
    Class {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        access: facets::load_access(element),
        docstring: facets::load_docstring(element),
        name: codec::str_attr(element, "name"),
        bases: codec::str_attr(element, "bases"),
        pybases: codec::str_attr(element, "pybases"),
        is_struct: codec::bool_attr(element, "struct"),
        typehintcode: codec::literal_text(element, "typehintcode"),
        typeheadercode: codec::literal_text(element, "typeheadercode"),
        typecode: codec::literal_text(element, "typecode"),
        finalisationcode: codec::literal_text(element, "finalisationcode"),
        subclasscode: codec::literal_text(element, "subclasscode"),
        convtotypecode: codec::literal_text(element, "convtotypecode"),
        convfromtypecode: codec::literal_text(element, "convfromtypecode"),
        gctraversecode: codec::literal_text(element, "gctraversecode"),
        gcclearcode: codec::literal_text(element, "gcclearcode"),
        bigetbufcode: codec::literal_text(element, "bigetbufcode"),
        birelbufcode: codec::literal_text(element, "birelbufcode"),
        bireadbufcode: codec::literal_text(element, "bireadbufcode"),
        biwritebufcode: codec::literal_text(element, "biwritebufcode"),
        bisegcountcode: codec::literal_text(element, "bisegcountcode"),
        bicharbufcode: codec::literal_text(element, "bicharbufcode"),
        picklecode: codec::literal_text(element, "picklecode"),
        content: element.children.iter().filter_map(load_class_item).collect(),
    }
}

fn save_class(w: &mut XmlWriter, class: &Class) {
    w.open("Class");
    facets::save_code_attributes(w, &class.code);
    facets::save_annos(w, &class.annos);
    facets::save_access(w, class.access);
    codec::save_attribute(w, "name", &class.name);
    codec::save_str(w, "bases", &class.bases);
    codec::save_str(w, "pybases", &class.pybases);
    codec::save_bool(w, "struct", class.is_struct);

    let literals = [
        ("typehintcode", &class.typehintcode),
        ("typeheadercode", &class.typeheadercode),
        ("typecode", &class.typecode),
        ("finalisationcode", &class.finalisationcode),
        ("subclasscode", &class.subclasscode),
        ("convtotypecode", &class.convtotypecode),
        ("convfromtypecode", &class.convfromtypecode),
        ("gctraversecode", &class.gctraversecode),
        ("gcclearcode", &class.gcclearcode),
        ("bigetbufcode", &class.bigetbufcode),
        ("birelbufcode", &class.birelbufcode),
        ("bireadbufcode", &class.bireadbufcode),
        ("biwritebufcode", &class.biwritebufcode),
        ("bisegcountcode", &class.bisegcountcode),
        ("bicharbufcode", &class.bicharbufcode),
        ("picklecode", &class.picklecode),
    ];

    let has_literals = literals.iter().any(|(_, text)| !text.is_empty());
    if class.docstring.is_empty() && !has_literals && class.content.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    facets::save_docstring(w, &class.docstring);
    // The literal order matches older versions of the format.
    for (name, text) in literals {
        codec::save_literal(w, name, text);
    }
    for item in &class.content {
        save_code_item(w, item);
    }
    w.close("Class");
}

fn load_namespace(element: &Element) -> Namespace {
    Namespace {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        name: codec::str_attr(element, "name"),
        typeheadercode: codec::literal_text(element, "typeheadercode"),
        content: element
            .children
            .iter()
            .filter_map(load_namespace_item)
            .collect(),
    }
}

fn save_namespace(w: &mut XmlWriter, namespace: &Namespace) {
    w.open("Namespace");
    facets::save_code_attributes(w, &namespace.code);
    facets::save_annos(w, &namespace.annos);
    codec::save_attribute(w, "name", &namespace.name);

    if namespace.typeheadercode.is_empty() && namespace.content.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    codec::save_literal(w, "typeheadercode", &namespace.typeheadercode);
    for item in &namespace.content {
        save_code_item(w, item);
    }
    w.close("Namespace");
}

fn load_opaque_class(element: &Element) -> OpaqueClass {
    OpaqueClass {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        access: facets::load_access(element),
        name: codec::str_attr(element, "name"),
    }
}

fn save_opaque_class(w: &mut XmlWriter, opaque: &OpaqueClass) {
    w.open("OpaqueClass");
    facets::save_code_attributes(w, &opaque.code);
    facets::save_annos(w, &opaque.annos);
    facets::save_access(w, opaque.access);
    codec::save_attribute(w, "name", &opaque.name);
    w.finish_empty();
}

fn load_enum(element: &Element) -> Enum {
    Enum {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        access: facets::load_access(element),
        name: codec::str_attr(element, "name"),
        is_enum_class: codec::bool_attr(element, "enumclass"),
        content: element
            .children_with_tag("EnumValue")
            .map(|child| EnumValue {
                code: facets::load_code(child),
                annos: facets::load_annos(child),
                name: codec::str_attr(child, "name"),
            })
            .collect(),
    }
}

fn save_enum(w: &mut XmlWriter, item: &Enum) {
    w.open("Enum");
    facets::save_code_attributes(w, &item.code);
    facets::save_annos(w, &item.annos);
    facets::save_access(w, item.access);
    codec::save_attribute(w, "name", &item.name);
    codec::save_bool(w, "enumclass", item.is_enum_class);

    if item.content.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    for value in &item.content {
        w.open("EnumValue");
        facets::save_code_attributes(w, &value.code);
        facets::save_annos(w, &value.annos);
        codec::save_attribute(w, "name", &value.name);
        w.finish_empty();
    }
    w.close("Enum");
}

fn load_function(element: &Element) -> Function {
    Function {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        docstring: facets::load_docstring(element),
        name: codec::str_attr(element, "name"),
        rtype: codec::str_attr(element, "rtype"),
        pytype: codec::str_attr(element, "pytype"),
        pyargs: codec::str_attr(element, "pyargs"),
        args: load_arguments(element),
        methcode: codec::literal_text(element, "methcode"),
    }
}

fn save_function(w: &mut XmlWriter, function: &Function) {
    w.open("Function");
    facets::save_code_attributes(w, &function.code);
    facets::save_annos(w, &function.annos);
    codec::save_attribute(w, "name", &function.name);
    codec::save_str(w, "rtype", &function.rtype);
    codec::save_str(w, "pytype", &function.pytype);
    codec::save_str(w, "pyargs", &function.pyargs);

    if function.docstring.is_empty() && function.args.is_empty() && function.methcode.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    facets::save_docstring(w, &function.docstring);
    save_arguments(w, &function.args);
    codec::save_literal(w, "methcode", &function.methcode);
    w.close("Function");
}

fn load_method(element: &Element) -> Method {
    Method {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        access: facets::load_access(element),
        docstring: facets::load_docstring(element),
        name: codec::str_attr(element, "name"),
        rtype: codec::str_attr(element, "rtype"),
        pytype: codec::str_attr(element, "pytype"),
        pyargs: codec::str_attr(element, "pyargs"),
        args: load_arguments(element),
        is_abstract: codec::bool_attr(element, "abstract"),
        is_const: codec::bool_attr(element, "const"),
        is_final: codec::bool_attr(element, "final"),
        is_static: codec::bool_attr(element, "static"),
        is_virtual: codec::bool_attr(element, "virtual"),
        methcode: codec::literal_text(element, "methcode"),
        virtcode: codec::literal_text(element, "virtcode"),
    }
}

fn save_method(w: &mut XmlWriter, method: &Method) {
    w.open("Method");
    facets::save_code_attributes(w, &method.code);
    facets::save_annos(w, &method.annos);
    facets::save_access(w, method.access);
    codec::save_attribute(w, "name", &method.name);
    codec::save_str(w, "rtype", &method.rtype);
    codec::save_str(w, "pytype", &method.pytype);
    codec::save_str(w, "pyargs", &method.pyargs);
    codec::save_bool(w, "abstract", method.is_abstract);
    codec::save_bool(w, "const", method.is_const);
    codec::save_bool(w, "final", method.is_final);
    codec::save_bool(w, "static", method.is_static);
    codec::save_bool(w, "virtual", method.is_virtual);

    if method.docstring.is_empty()
        && method.args.is_empty()
        && method.methcode.is_empty()
        && method.virtcode.is_empty()
    {
        w.finish_empty();
        return;
    }

    w.finish_open();
    facets::save_docstring(w, &method.docstring);
    save_arguments(w, &method.args);
    codec::save_literal(w, "methcode", &method.methcode);
    codec::save_literal(w, "virtcode", &method.virtcode);
    w.close("Method");
}

fn load_constructor(element: &Element) -> Constructor {
    Constructor {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        access: facets::load_access(element),
        docstring: facets::load_docstring(element),
        name: codec::str_attr(element, "name"),
        pyargs: codec::str_attr(element, "pyargs"),
        args: load_arguments(element),
        is_explicit: codec::bool_attr(element, "explicit"),
        methcode: codec::literal_text(element, "methcode"),
    }
}

fn save_constructor(w: &mut XmlWriter, ctor: &Constructor) {
    w.open("Constructor");
    facets::save_code_attributes(w, &ctor.code);
    facets::save_annos(w, &ctor.annos);
    facets::save_access(w, ctor.access);
    codec::save_attribute(w, "name", &ctor.name);
    codec::save_str(w, "pyargs", &ctor.pyargs);
    codec::save_bool(w, "explicit", ctor.is_explicit);

    if ctor.docstring.is_empty() && ctor.args.is_empty() && ctor.methcode.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    facets::save_docstring(w, &ctor.docstring);
    save_arguments(w, &ctor.args);
    codec::save_literal(w, "methcode", &ctor.methcode);
    w.close("Constructor");
}

fn load_destructor(element: &Element) -> Destructor {
    Destructor {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        access: facets::load_access(element),
        name: codec::str_attr(element, "name"),
        is_virtual: codec::bool_attr(element, "virtual"),
        methcode: codec::literal_text(element, "methcode"),
        virtcode: codec::literal_text(element, "virtcode"),
    }
}

fn save_destructor(w: &mut XmlWriter, dtor: &Destructor) {
    w.open("Destructor");
    facets::save_code_attributes(w, &dtor.code);
    facets::save_annos(w, &dtor.annos);
    facets::save_access(w, dtor.access);
    codec::save_attribute(w, "name", &dtor.name);
    codec::save_bool(w, "virtual", dtor.is_virtual);

    if dtor.methcode.is_empty() && dtor.virtcode.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    codec::save_literal(w, "methcode", &dtor.methcode);
    codec::save_literal(w, "virtcode", &dtor.virtcode);
    w.close("Destructor");
}

fn load_operator_method(element: &Element) -> OperatorMethod {
    OperatorMethod {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        access: facets::load_access(element),
        name: codec::str_attr(element, "name"),
        rtype: codec::str_attr(element, "rtype"),
        pytype: codec::str_attr(element, "pytype"),
        pyargs: codec::str_attr(element, "pyargs"),
        args: load_arguments(element),
        is_abstract: codec::bool_attr(element, "abstract"),
        is_const: codec::bool_attr(element, "const"),
        is_virtual: codec::bool_attr(element, "virtual"),
        methcode: codec::literal_text(element, "methcode"),
        virtcode: codec::literal_text(element, "virtcode"),
    }
}

fn save_operator_method(w: &mut XmlWriter, op: &OperatorMethod) {
    w.open("OperatorMethod");
    facets::save_code_attributes(w, &op.code);
    facets::save_annos(w, &op.annos);
    facets::save_access(w, op.access);
    codec::save_attribute(w, "name", &op.name);
    codec::save_str(w, "rtype", &op.rtype);
    codec::save_str(w, "pytype", &op.pytype);
    codec::save_str(w, "pyargs", &op.pyargs);
    codec::save_bool(w, "abstract", op.is_abstract);
    codec::save_bool(w, "const", op.is_const);
    codec::save_bool(w, "virtual", op.is_virtual);

    if op.args.is_empty() && op.methcode.is_empty() && op.virtcode.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    save_arguments(w, &op.args);
    codec::save_literal(w, "methcode", &op.methcode);
    codec::save_literal(w, "virtcode", &op.virtcode);
    w.close("OperatorMethod");
}

fn load_operator_function(element: &Element) -> OperatorFunction {
    OperatorFunction {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        name: codec::str_attr(element, "name"),
        rtype: codec::str_attr(element, "rtype"),
        pytype: codec::str_attr(element, "pytype"),
        pyargs: codec::str_attr(element, "pyargs"),
        args: load_arguments(element),
        methcode: codec::literal_text(element, "methcode"),
    }
}

fn save_operator_function(w: &mut XmlWriter, op: &OperatorFunction) {
    w.open("OperatorFunction");
    facets::save_code_attributes(w, &op.code);
    facets::save_annos(w, &op.annos);
    codec::save_attribute(w, "name", &op.name);
    codec::save_str(w, "rtype", &op.rtype);
    codec::save_str(w, "pytype", &op.pytype);
    codec::save_str(w, "pyargs", &op.pyargs);

    if op.args.is_empty() && op.methcode.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    save_arguments(w, &op.args);
    codec::save_literal(w, "methcode", &op.methcode);
    w.close("OperatorFunction");
}

fn load_operator_cast(element: &Element) -> OperatorCast {
    OperatorCast {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        access: facets::load_access(element),
        name: codec::str_attr(element, "name"),
        args: load_arguments(element),
        is_const: codec::bool_attr(element, "const"),
        methcode: codec::literal_text(element, "methcode"),
    }
}

fn save_operator_cast(w: &mut XmlWriter, op: &OperatorCast) {
    w.open("OperatorCast");
    facets::save_code_attributes(w, &op.code);
    facets::save_annos(w, &op.annos);
    facets::save_access(w, op.access);
    codec::save_attribute(w, "name", &op.name);
    codec::save_bool(w, "const", op.is_const);

    if op.args.is_empty() && op.methcode.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    save_arguments(w, &op.args);
    codec::save_literal(w, "methcode", &op.methcode);
    w.close("OperatorCast");
}

fn load_variable(element: &Element) -> Variable {
    Variable {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        access: facets::load_access(element),
        name: codec::str_attr(element, "name"),
        ty: codec::str_attr(element, "type"),
        is_static: codec::bool_attr(element, "static"),
        accesscode: codec::literal_text(element, "accesscode"),
        getcode: codec::literal_text(element, "getcode"),
        setcode: codec::literal_text(element, "setcode"),
    }
}

fn save_variable(w: &mut XmlWriter, variable: &Variable) {
    w.open("Variable");
    facets::save_code_attributes(w, &variable.code);
    facets::save_annos(w, &variable.annos);
    facets::save_access(w, variable.access);
    codec::save_attribute(w, "name", &variable.name);
    codec::save_str(w, "type", &variable.ty);
    codec::save_bool(w, "static", variable.is_static);

    if variable.accesscode.is_empty() && variable.getcode.is_empty() && variable.setcode.is_empty()
    {
        w.finish_empty();
        return;
    }

    w.finish_open();
    codec::save_literal(w, "accesscode", &variable.accesscode);
    codec::save_literal(w, "getcode", &variable.getcode);
    codec::save_literal(w, "setcode", &variable.setcode);
    w.close("Variable");
}

fn load_typedef(element: &Element) -> Typedef {
    Typedef {
        code: facets::load_code(element),
        annos: facets::load_annos(element),
        name: codec::str_attr(element, "name"),
        ty: codec::str_attr(element, "type"),
    }
}

fn save_typedef(w: &mut XmlWriter, typedef: &Typedef) {
    w.open("Typedef");
    facets::save_code_attributes(w, &typedef.code);
    facets::save_annos(w, &typedef.annos);
    codec::save_attribute(w, "name", &typedef.name);
    codec::save_str(w, "type", &typedef.ty);
    w.finish_empty();
}

fn load_manual_code(element: &Element) -> ManualCode {
    ManualCode {
        code: facets::load_code(element),
        access: facets::load_extended_access(element),
        docstring: facets::load_docstring(element),
        precis: codec::str_attr(element, "precis"),
        body: codec::literal_text(element, "body"),
        methcode: codec::literal_text(element, "methcode"),
    }
}

fn save_manual_code(w: &mut XmlWriter, manual: &ManualCode) {
    w.open("ManualCode");
    facets::save_code_attributes(w, &manual.code);
    facets::save_extended_access(w, manual.access);
    codec::save_attribute(w, "precis", &manual.precis);

    if manual.docstring.is_empty() && manual.body.is_empty() && manual.methcode.is_empty() {
        w.finish_empty();
        return;
    }

    w.finish_open();
    facets::save_docstring(w, &manual.docstring);
    codec::save_literal(w, "body", &manual.body);
    codec::save_literal(w, "methcode", &manual.methcode);
    w.close("ManualCode");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::facets::Access;
    use crate::xml;

    fn parse(source: &str) -> Element {
        xml::parse(source, "test.msp").unwrap()
    }

    #[test]
    fn test_load_class_with_nested_content() {
        let element = parse(
            r#"<Class name="QTimer" bases="QObject" features="PyQt_Timer">
 <Literal type="typeheadercode">
#include &lt;QTimer&gt;
 </Literal>
 <Constructor name="QTimer" access="protected">
  <Argument type="QObject *" name="parent" default="nullptr"/>
 </Constructor>
 <Enum name="TimerType">
  <EnumValue name="PreciseTimer"/>
 </Enum>
</Class>"#,
        );

        let class = load_class(&element);
        assert_eq!(class.name, "QTimer");
        assert_eq!(class.bases, "QObject");
        assert_eq!(class.code.features, ["PyQt_Timer"]);
        assert_eq!(class.typeheadercode, "#include <QTimer>");
        assert_eq!(class.content.len(), 2);

        match &class.content[0] {
            CodeItem::Constructor(ctor) => {
                assert_eq!(ctor.access, Access::Protected);
                assert_eq!(ctor.args.len(), 1);
                assert_eq!(ctor.args[0].ty, "QObject *");
                assert_eq!(ctor.args[0].default, "nullptr");
            }
            other => panic!("expected a constructor, got {}", other.xml_tag()),
        }

        match &class.content[1] {
            CodeItem::Enum(item) => {
                assert_eq!(item.content.len(), 1);
                assert_eq!(item.content[0].name, "PreciseTimer");
            }
            other => panic!("expected an enum, got {}", other.xml_tag()),
        }
    }

    #[test]
    fn test_save_method_attribute_order() {
        let method = Method {
            name: "exec".to_string(),
            rtype: "int".to_string(),
            is_const: true,
            is_virtual: true,
            access: Access::Protected,
            ..Default::default()
        };

        let mut w = XmlWriter::new();
        save_method(&mut w, &method);
        assert_eq!(
            w.into_string(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Method access=\"protected\" name=\"exec\" rtype=\"int\" const=\"1\" virtual=\"1\"/>\n"
        );
    }

    #[test]
    fn test_unknown_child_elements_are_skipped() {
        let element = parse(r#"<Class name="C"><Gadget name="g"/><Variable name="v" type="int"/></Class>"#);
        let class = load_class(&element);
        assert_eq!(class.content.len(), 1);
        assert_eq!(class.content[0].xml_tag(), "Variable");
    }

    #[test]
    fn test_item_without_children_saves_as_empty_element() {
        let typedef = Typedef {
            name: "handle".to_string(),
            ty: "void *".to_string(),
            ..Default::default()
        };

        let mut w = XmlWriter::new();
        save_typedef(&mut w, &typedef);
        assert!(w
            .into_string()
            .contains("<Typedef name=\"handle\" type=\"void *\"/>"));
    }
}

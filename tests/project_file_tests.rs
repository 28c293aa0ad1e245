//! Integration tests for the project file core
//!
//! These tests exercise the public surface end to end: loading and
//! saving real files, tag maintenance, project merging and the format
//! update chain.

use std::fs;
use tempfile::TempDir;

use spt::core::{delete_tag, merge, new_tag, rename_tag, validate_identifier, TagError, TagKind};
use spt::entities::{CodeItem, Project};
use spt::updates::UpdateError;
use spt::xml::XmlError;
use spt::{
    load_project, render_project, save_project, ProjectDocument, UpdateManager, FORMAT_VERSION,
};

/// Write `contents` to a file named `name` in a fresh temp dir.
fn write_project_file(tmp: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// A project file covering every entity kind and attribute shape.
fn rich_project_source() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<Project version="15" rootmodule="QtCore" versions="v1 v2" platforms="linux win32" features="F1 F2" externalfeatures="EXT" ignorednamespaces="std">
 <Literal type="sipcomments">
// Generated bindings.
 </Literal>
 <HeaderDirectory name="QtCore" parserargs="-DQT_CORE_LIB" inputdirsuffix="QtCore" filefilter="*.h">
  <HeaderFile name="qtimer.h" module="QtCore">
   <HeaderFileVersion md5="d41d8cd9" version="v1"/>
   <HeaderFileVersion md5="8f14e45f" version="v2" parse="1"/>
  </HeaderFile>
  <HeaderFile name="qglobal.h" ignored="1"/>
 </HeaderDirectory>
 <Module name="QtCore" outputdirsuffix="QtCore" uselimitedapi="1" imports="sip">
  <Literal type="directives">
%Timeline {v1 v2}
 </Literal>
  <SipFile name="qtimer.sip">
   <Literal type="moduleheadercode">
#include &lt;QTimer&gt;
 </Literal>
   <Namespace name="Qt">
    <Typedef name="HANDLE" type="void *" annos="PyName=Handle"/>
   </Namespace>
   <Class status="added" platforms="linux" annos="PyName=Timer" name="QTimer" bases="QObject">
    <Literal type="typeheadercode">
#include &lt;QTimer&gt;
 </Literal>
    <Constructor access="protected" name="QTimer" explicit="1">
     <Literal type="docstring">
QTimer(parent: QObject = None)
 </Literal>
     <Argument annos="TransferThis" type="QObject *" name="parent" default="nullptr"/>
    </Constructor>
    <Destructor access="protected" name="QTimer" virtual="1"/>
    <Method features="F1" name="start" rtype="void" virtual="1">
     <Argument type="int" name="msec" unnamed="1"/>
     <Literal type="methcode">
sipCpp-&gt;start(a0);
 </Literal>
    </Method>
    <OperatorMethod name="operator==" rtype="bool" const="1">
     <Argument type="const QTimer &amp;"/>
    </OperatorMethod>
    <OperatorCast access="private" name="operator int" const="1"/>
    <Enum features="!F2" name="TimerType">
     <EnumValue name="PreciseTimer"/>
     <EnumValue status="removed" name="CoarseTimer" annos="PyName=Coarse"/>
    </Enum>
    <ManualCode access="signals" precis="void timeout()"/>
    <Variable access="private" name="interval" type="int" static="1">
     <Literal type="getcode">
return sipCpp-&gt;interval();
 </Literal>
    </Variable>
   </Class>
   <OpaqueClass versions="v1-v2" name="QTimerPrivate"/>
   <Function name="qVersion" rtype="const char *"/>
   <OperatorFunction name="operator|" rtype="QFlags"/>
  </SipFile>
 </Module>
</Project>
"#
}

/// Load a project straight from a source string.
fn load_from_source(source: &str) -> Project {
    let tmp = TempDir::new().unwrap();
    let path = write_project_file(&tmp, "project.msp", source);
    load_project(&path).unwrap()
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_save_load_roundtrip_is_byte_stable() {
    let project = load_from_source(rich_project_source());

    let canonical = render_project(&project);
    let reloaded = load_from_source(&canonical);

    assert_eq!(render_project(&reloaded), canonical);
}

#[test]
fn test_save_project_writes_canonical_bytes() {
    let tmp = TempDir::new().unwrap();
    let project = load_from_source(rich_project_source());

    let path = tmp.path().join("saved.msp");
    save_project(&project, &path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), render_project(&project));
}

#[test]
fn test_canonical_layout_is_pinned() {
    let tmp = TempDir::new().unwrap();
    let path = write_project_file(
        &tmp,
        "small.msp",
        r#"<Project version="15" platforms="linux win32" features="F1">
 <Module name="core">
  <SipFile name="core.sip">
   <Class name="Widget" bases="Base">
    <Constructor name="Widget" access="protected"/>
   </Class>
  </SipFile>
 </Module>
</Project>"#,
    );

    let project = load_project(&path).unwrap();

    assert_eq!(
        render_project(&project),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Project version=\"15\" platforms=\"linux win32\" features=\"F1\">\n \
         <Module name=\"core\">\n  \
         <SipFile name=\"core.sip\">\n   \
         <Class name=\"Widget\" bases=\"Base\">\n    \
         <Constructor access=\"protected\" name=\"Widget\"/>\n   \
         </Class>\n  \
         </SipFile>\n \
         </Module>\n\
         </Project>\n"
    );
}

#[test]
fn test_literal_code_survives_a_roundtrip() {
    let project = load_from_source(rich_project_source());
    let canonical = render_project(&project);
    let reloaded = load_from_source(&canonical);

    let CodeItem::Class(class) = &reloaded.modules[0].content[0].content[1] else {
        panic!("expected the class");
    };
    assert_eq!(class.typeheadercode, "#include <QTimer>");

    let CodeItem::Method(method) = &class.content[2] else {
        panic!("expected the method");
    };
    assert_eq!(method.methcode, "sipCpp->start(a0);");
}

#[test]
fn test_load_rejects_old_and_malformed_files() {
    let tmp = TempDir::new().unwrap();

    let old = write_project_file(&tmp, "old.msp", r#"<Project version="10"/>"#);
    assert!(matches!(
        load_project(&old).unwrap_err(),
        XmlError::SchemaValidation(_)
    ));

    let bad_version = write_project_file(&tmp, "bad.msp", r#"<Project version="two"/>"#);
    assert!(matches!(
        load_project(&bad_version).unwrap_err(),
        XmlError::SchemaValidation(_)
    ));

    let not_project = write_project_file(&tmp, "np.msp", r#"<Widget version="15"/>"#);
    assert!(matches!(
        load_project(&not_project).unwrap_err(),
        XmlError::SchemaValidation(_)
    ));

    let truncated = write_project_file(&tmp, "trunc.msp", r#"<Project version="15">"#);
    assert!(matches!(
        load_project(&truncated).unwrap_err(),
        XmlError::Syntax(_)
    ));
}

// ============================================================================
// Tag Consistency
// ============================================================================

fn tagged_project() -> Project {
    load_from_source(
        r#"<Project version="15" features="A B">
 <Module name="m">
  <SipFile name="f.sip">
   <Variable features="A" name="v1" type="int"/>
   <Variable features="!A B" name="v2" type="int"/>
   <Variable features="B" name="v3" type="int"/>
  </SipFile>
 </Module>
</Project>"#,
    )
}

fn feature_lists(project: &Project) -> Vec<Vec<String>> {
    project.modules[0].content[0]
        .content
        .iter()
        .map(|item| item.code().features.clone())
        .collect()
}

#[test]
fn test_rename_preserves_reference_counts() {
    let mut project = tagged_project();
    let before = feature_lists(&project);

    rename_tag(&mut project, TagKind::Feature, "A", "C").unwrap();

    assert_eq!(project.features, ["C", "B"]);
    let after = feature_lists(&project);
    assert_eq!(
        after,
        [
            vec!["C".to_string()],
            vec!["!C".to_string(), "B".to_string()],
            vec!["B".to_string()],
        ]
    );
    for (b, a) in before.iter().zip(&after) {
        assert_eq!(b.len(), a.len());
    }
}

#[test]
fn test_rename_collision_is_rejected_without_mutation() {
    let mut project = tagged_project();
    let before = render_project(&project);

    let err = rename_tag(&mut project, TagKind::Feature, "A", "B").unwrap_err();
    assert!(matches!(err, TagError::DuplicateName { .. }));
    assert_eq!(render_project(&project), before);
}

#[test]
fn test_delete_feature_without_discard() {
    let mut project = tagged_project();

    delete_tag(&mut project, TagKind::Feature, "A", false).unwrap();

    assert_eq!(project.features, ["B"]);
    // v1's plain only-reference is dropped and v1 survives; v2's
    // inverted reference is one of two, so it is dropped too.
    assert_eq!(
        feature_lists(&project),
        [
            Vec::<String>::new(),
            vec!["B".to_string()],
            vec!["B".to_string()],
        ]
    );

    // No trace of the tag is left in the saved form.
    let rendered = render_project(&project);
    assert!(!rendered.contains('A'));
}

#[test]
fn test_delete_feature_with_discard_removes_exclusive_items() {
    let mut project = tagged_project();

    delete_tag(&mut project, TagKind::Feature, "A", true).unwrap();

    // v1 existed only under A and is discarded with it.
    let names: Vec<_> = project.modules[0].content[0]
        .content
        .iter()
        .filter_map(|item| match item {
            CodeItem::Variable(v) => Some(v.name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["v2", "v3"]);
}

#[test]
fn test_new_tag_validates_and_appends() {
    let mut project = tagged_project();

    assert!(matches!(
        new_tag(&mut project, TagKind::Feature, "3bad"),
        Err(TagError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        new_tag(&mut project, TagKind::Feature, "A"),
        Err(TagError::DuplicateName { .. })
    ));

    new_tag(&mut project, TagKind::Feature, "Good_Name2").unwrap();
    assert_eq!(project.features, ["A", "B", "Good_Name2"]);
}

#[test]
fn test_identifier_grammar() {
    assert!(validate_identifier("Good_Name2", TagKind::Feature).is_ok());
    assert!(validate_identifier("3bad", TagKind::Feature).is_err());
    assert!(validate_identifier("", TagKind::Feature).is_err());
    assert!(validate_identifier("bad name", TagKind::Platform).is_err());
}

// ============================================================================
// Project Import
// ============================================================================

#[test]
fn test_merge_rejects_versioned_source_and_leaves_target_unchanged() {
    let mut target = tagged_project();
    let before = render_project(&target);

    let mut source = Project::new("source.msp");
    source.versions.push("v1".to_string());
    source.platforms.push("linux".to_string());

    assert!(merge(&mut target, &source).is_err());
    assert_eq!(render_project(&target), before);
}

#[test]
fn test_merge_module_collision_leaves_target_unchanged() {
    let mut target = tagged_project();
    let before = render_project(&target);

    let source = load_from_source(
        r#"<Project version="15" platforms="win32">
 <Module name="m">
  <SipFile name="other.sip"/>
 </Module>
</Project>"#,
    );

    assert!(merge(&mut target, &source).is_err());
    assert_eq!(render_project(&target), before);
}

#[test]
fn test_merge_brings_in_modules_and_headers() {
    let mut target = tagged_project();
    let source = load_from_source(
        r#"<Project version="15" features="C" platforms="win32">
 <HeaderDirectory name="inc"/>
 <Module name="extra">
  <SipFile name="extra.sip"/>
 </Module>
</Project>"#,
    );

    merge(&mut target, &source).unwrap();

    assert_eq!(target.features, ["A", "B", "C"]);
    assert_eq!(target.platforms, ["win32"]);
    let names: Vec<_> = target.modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["m", "extra"]);
    assert_eq!(target.headers.len(), 1);
}

// ============================================================================
// Format Updates
// ============================================================================

fn v10_source() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<Project version="10">
 <Module name="QtCore" versions="v1 v2">
  <SipFile name="q.sip">
   <Class name="C" struct="yes"/>
  </SipFile>
 </Module>
 <Module name="QtGui" versions="v2"/>
 <HeaderDirectory name="QtCore" inputdirpattern="QtCore/*.h"/>
</Project>
"#
}

#[test]
fn test_update_chain_reaches_the_current_version_in_order() {
    let tmp = TempDir::new().unwrap();
    let path = write_project_file(&tmp, "old.msp", v10_source());

    let manager = UpdateManager::new();
    let mut doc = ProjectDocument::read(&path).unwrap();
    assert_eq!(doc.version(), 10);

    let mut applied = Vec::new();
    for step in manager.pending(doc.root(), FORMAT_VERSION).unwrap() {
        let input = step.plan(doc.root()).map(|request| request.options[0].clone());
        step.apply(doc.root_mut(), input.as_deref()).unwrap();
        applied.push(step.updates_to());
    }

    assert_eq!(applied, [11, 12, 13, 14, 15]);
    assert!(applied.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(doc.version(), 15);

    let project = doc.into_project().unwrap();
    assert_eq!(project.versions, ["v1", "v2"]);
    assert_eq!(project.rootmodule, "QtCore");
    assert_eq!(project.headers[0].inputdirsuffix, "QtCore");
    assert_eq!(project.headers[0].filefilter, "*.h");

    let CodeItem::Class(class) = &project.modules[0].content[0].content[0] else {
        panic!("expected the class");
    };
    assert!(class.is_struct);
}

#[test]
fn test_cancelled_update_never_writes_output() {
    let tmp = TempDir::new().unwrap();
    let path = write_project_file(&tmp, "old.msp", v10_source());
    let original = fs::read_to_string(&path).unwrap();

    let manager = UpdateManager::new();
    let mut doc = ProjectDocument::read(&path).unwrap();

    let err = manager
        .update(doc.root_mut(), FORMAT_VERSION, &mut |_| None)
        .unwrap_err();
    assert!(matches!(err, UpdateError::Cancelled(13)));

    // The document is discarded; the file itself is untouched.
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_updated_document_loads_and_saves_canonically() {
    let tmp = TempDir::new().unwrap();
    let path = write_project_file(&tmp, "old.msp", v10_source());

    let manager = UpdateManager::new();
    let mut doc = ProjectDocument::read(&path).unwrap();
    manager
        .update(doc.root_mut(), FORMAT_VERSION, &mut |request| {
            Some(request.options[1].clone())
        })
        .unwrap();

    let project = doc.into_project().unwrap();
    assert_eq!(project.rootmodule, "QtGui");

    let canonical = render_project(&project);
    let reloaded = load_from_source(&canonical);
    assert_eq!(render_project(&reloaded), canonical);
}

#[test]
fn test_stale_document_cannot_build_the_model() {
    let tmp = TempDir::new().unwrap();
    let path = write_project_file(&tmp, "old.msp", v10_source());

    let doc = ProjectDocument::read(&path).unwrap();
    assert!(matches!(
        doc.into_project().unwrap_err(),
        XmlError::SchemaValidation(_)
    ));
}

#![allow(non_snake_case)]
#![allow(clippy::unwrap_used)]

use super::*;
use crate::provider::{self, ParseOptions};

fn parse(source: &str, path: &str) -> ParsedUnit {
    provider::parse_source(source, Path::new(path), &ParseOptions::default()).unwrap()
}

fn collect_from(source: &str, path: &str, target: Option<&str>) -> Registry {
    let unit = parse(source, path);
    let mut registry = Registry::new();
    Collector::new(&unit, target.map(Path::new)).collect(&mut registry);
    registry
}

fn field_names(record: &StructureRecord) -> Vec<&str> {
    record.fields.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn Collector___unannotated_member___skipped() {
    let registry = collect_from(
        "struct __attribute__((annotate(\"s\"))) S {\n\
         [[clang::annotate(\"x\")]] int x;\n\
         int hidden;\n\
         };\n",
        "test.h",
        None,
    );

    let record = registry.get("S").unwrap();
    assert_eq!(field_names(record), vec!["x"]);
    assert_eq!(record.annotation.as_deref(), Some("s"));
}

#[test]
fn Collector___member_order___preserved_with_dense_ordinals() {
    let registry = collect_from(
        "struct __attribute__((annotate(\"s\"))) S {\n\
         [[clang::annotate(\"c\")]] int c;\n\
         int skipped;\n\
         [[clang::annotate(\"a\")]] int a;\n\
         [[clang::annotate(\"b\")]] int b;\n\
         };\n",
        "test.h",
        None,
    );

    let record = registry.get("S").unwrap();
    assert_eq!(field_names(record), vec!["c", "a", "b"]);
    let ordinals: Vec<usize> = record.fields.iter().map(|m| m.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2]);
}

#[test]
fn Collector___gather_all_target___records_plain_members() {
    let registry = collect_from(
        "struct Node { int kind; int line; };\n",
        "src/ast/nodes.h",
        Some("ast/nodes.h"),
    );

    let record = registry.get("Node").unwrap();
    assert!(record.gather_all);
    assert_eq!(record.annotation, None);
    assert_eq!(field_names(record), vec!["kind", "line"]);
}

#[test]
fn Collector___gather_all_elsewhere___plain_structure_dropped() {
    let registry = collect_from(
        "struct Node { int kind; };\n",
        "src/other.h",
        Some("ast/nodes.h"),
    );

    assert!(registry.is_empty());
}

#[test]
fn Collector___namespace___qualifies_the_name() {
    let registry = collect_from(
        "namespace geo {\n\
         struct __attribute__((annotate(\"point\"))) Point {\n\
         [[clang::annotate(\"x\")]] float x;\n\
         };\n\
         }\n",
        "test.h",
        None,
    );

    assert_eq!(registry.len(), 1);
    let record = registry.get("geo::Point").unwrap();
    assert_eq!(record.local_name, "Point");
}

#[test]
fn Collector___compound_namespace___pushes_each_segment() {
    let registry = collect_from(
        "namespace a::b {\n\
         struct __attribute__((annotate(\"s\"))) S {\n\
         [[clang::annotate(\"x\")]] int x;\n\
         };\n\
         }\n",
        "test.h",
        None,
    );

    assert!(registry.get("a::b::S").is_some());
}

#[test]
fn Collector___anonymous_namespace___contributes_no_segment() {
    let registry = collect_from(
        "namespace {\n\
         struct __attribute__((annotate(\"s\"))) S {\n\
         [[clang::annotate(\"x\")]] int x;\n\
         };\n\
         }\n",
        "test.h",
        None,
    );

    assert!(registry.get("S").is_some());
}

#[test]
fn Collector___nested_structure___qualified_by_enclosing_record() {
    let registry = collect_from(
        "struct __attribute__((annotate(\"outer\"))) Outer {\n\
         [[clang::annotate(\"x\")]] int x;\n\
         struct __attribute__((annotate(\"inner\"))) Inner {\n\
         [[clang::annotate(\"y\")]] int y;\n\
         };\n\
         };\n",
        "test.h",
        None,
    );

    assert!(registry.get("Outer").is_some());
    let inner = registry.get("Outer::Inner").unwrap();
    assert_eq!(field_names(inner), vec!["y"]);
}

#[test]
fn Collector___annotated_structure_without_members___dropped() {
    let registry = collect_from(
        "struct __attribute__((annotate(\"empty\"))) Empty {};\n",
        "test.h",
        None,
    );

    assert!(registry.is_empty());
}

#[test]
fn Collector___forward_declaration___ignored() {
    let registry = collect_from("struct Fwd;\n", "src/ast/nodes.h", Some("ast/nodes.h"));

    assert!(registry.is_empty());
}

#[test]
fn Collector___pending_annotation___applies_to_next_structure() {
    let unit = parse(
        "struct S { [[clang::annotate(\"x\")]] int x; };\n",
        "test.h",
    );
    let mut collector = Collector::new(&unit, None);
    collector.pending_annotations.push("tagged".to_string());

    let mut registry = Registry::new();
    collector.collect(&mut registry);

    let record = registry.get("S").unwrap();
    assert_eq!(record.annotation.as_deref(), Some("tagged"));
}

#[test]
fn Collector___direct_attribute___overrides_pending_annotation() {
    let unit = parse(
        "struct __attribute__((annotate(\"direct\"))) S {\n\
         [[clang::annotate(\"x\")]] int x;\n\
         };\n",
        "test.h",
    );
    let mut collector = Collector::new(&unit, None);
    collector.pending_annotations.push("pending".to_string());

    let mut registry = Registry::new();
    collector.collect(&mut registry);

    let record = registry.get("S").unwrap();
    assert_eq!(record.annotation.as_deref(), Some("direct"));
}

#[test]
fn Collector___helper_function_before_structure___becomes_custom() {
    let registry = collect_from(
        "void kmeta_annotation(int tag) {}\n\
         struct __attribute__((annotate(\"s\"))) S {\n\
         [[clang::annotate(\"x\")]] int x;\n\
         };\n",
        "test.h",
        None,
    );

    let record = registry.get("S").unwrap();
    let custom = record.custom.as_deref().unwrap();
    assert!(custom.contains(ANNOTATION_HELPER));
}

#[test]
fn Collector___in_class_helper___marks_only_subsequent_members() {
    let registry = collect_from(
        "struct Config {\n\
         int before;\n\
         void kmeta_annotation(int tag);\n\
         int after;\n\
         };\n",
        "src/ast/nodes.h",
        Some("ast/nodes.h"),
    );

    let record = registry.get("Config").unwrap();
    assert_eq!(field_names(record), vec!["before", "after"]);
    assert_eq!(record.fields[0].custom, None);
    assert!(record.fields[1]
        .custom
        .as_deref()
        .unwrap()
        .contains(ANNOTATION_HELPER));
}

#[test]
fn Collector___constructor_and_destructor___not_reflected() {
    let registry = collect_from(
        "struct Widget {\n\
         Widget();\n\
         ~Widget();\n\
         void update();\n\
         int state;\n\
         };\n",
        "src/ast/nodes.h",
        Some("ast/nodes.h"),
    );

    let record = registry.get("Widget").unwrap();
    assert_eq!(field_names(record), vec!["state"]);
    let methods: Vec<&str> = record.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["update"]);
}

#[test]
fn Collector___annotated_method___recorded_separately_from_fields() {
    let registry = collect_from(
        "struct __attribute__((annotate(\"s\"))) S {\n\
         [[clang::annotate(\"x\")]] int x;\n\
         [[clang::annotate(\"run\")]] void run();\n\
         };\n",
        "test.h",
        None,
    );

    let record = registry.get("S").unwrap();
    assert_eq!(field_names(record), vec!["x"]);
    assert_eq!(record.methods.len(), 1);
    assert_eq!(record.methods[0].name, "run");
    assert_eq!(record.methods[0].annotation.as_deref(), Some("run"));
}

#[test]
fn Collector___pointer_and_reference_members___decorated_type_spelling() {
    let registry = collect_from(
        "struct Edges {\n\
         int *next;\n\
         int &owner;\n\
         int plain;\n\
         };\n",
        "src/ast/nodes.h",
        Some("ast/nodes.h"),
    );

    let record = registry.get("Edges").unwrap();
    let types: Vec<&str> = record.fields.iter().map(|m| m.type_name.as_str()).collect();
    assert_eq!(types, vec!["int*", "int&", "int"]);
}

#[test]
fn qualify___empty_scope___local_name_only() {
    assert_eq!(qualify(&[], "Point"), "Point");
    assert_eq!(
        qualify(&["geo".to_string(), "detail".to_string()], "Point"),
        "geo::detail::Point"
    );
}

#[test]
fn suffix_match___relative_target___matches_path_tail() {
    assert!(suffix_match(
        Path::new("/work/src/ast/nodes.h"),
        Path::new("ast/nodes.h")
    ));
    assert!(!suffix_match(
        Path::new("/work/src/ast/other.h"),
        Path::new("ast/nodes.h")
    ));
}

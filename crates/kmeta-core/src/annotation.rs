//! Annotation extraction from attribute nodes.
//!
//! A declaration opts into reflection by carrying an `annotate` payload in
//! one of its immediate attribute children:
//!
//! - `[[clang::annotate("text")]]` (any attribute prefix is accepted)
//! - `__attribute__((annotate("text")))`
//!
//! Attribute children without an `annotate` payload (`[[nodiscard]]`,
//! `[[deprecated]]`, ...) are not reflection annotations and are skipped.

use tree_sitter::Node;

/// Return the annotation text attached to `node`, if any.
///
/// Only the first annotate-carrying attribute child is used; later
/// attribute children are ignored.
pub fn annotation_of(node: Node<'_>, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if is_attribute_node(child) {
            if let Some(text) = annotate_payload(child, source) {
                return Some(text);
            }
        }
    }
    None
}

/// Whether a node is an attribute of either syntax.
pub fn is_attribute_node(node: Node<'_>) -> bool {
    matches!(node.kind(), "attribute_declaration" | "attribute_specifier")
}

/// Extract the string payload of an `annotate(...)` inside an attribute
/// node, if present.
pub fn annotate_payload(attribute: Node<'_>, source: &[u8]) -> Option<String> {
    find_annotate_argument(attribute, source)
}

fn find_annotate_argument(node: Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        // [[prefix::annotate("...")]]: `attribute` node with a name field.
        "attribute" => {
            let name = node.child_by_field_name("name")?;
            if name.utf8_text(source).ok()? != "annotate" {
                return None;
            }
            return first_string_argument(node, source);
        }
        // __attribute__((annotate("..."))): parsed as a call expression.
        "call_expression" => {
            let function = node.child_by_field_name("function")?;
            if function.utf8_text(source).ok()? != "annotate" {
                return None;
            }
            return first_string_argument(node, source);
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(text) = find_annotate_argument(child, source) {
            return Some(text);
        }
    }
    None
}

fn first_string_argument(node: Node<'_>, source: &[u8]) -> Option<String> {
    let arguments = node
        .child_by_field_name("arguments")
        .or_else(|| find_child_of_kind(node, "argument_list"))?;

    let literal = find_child_of_kind(arguments, "string_literal")?;
    let raw = literal.utf8_text(source).ok()?;
    Some(strip_quotes(raw).to_string())
}

fn find_child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

fn strip_quotes(raw: &str) -> &str {
    raw.trim_start_matches('"').trim_end_matches('"')
}

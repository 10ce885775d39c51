//! Structure collector: recursive traversal of parsed declaration trees.
//!
//! Walks each translation unit once, identifies class/struct declarations,
//! classifies their immediate members, and populates the [`Registry`] with
//! normalized records. Qualified names are built from an explicit scope
//! stack of enclosing namespace and record names. Two traversal-scoped
//! stacks carry pending state: structure-level annotations observed just
//! before a structure, and `kmeta_annotation` helper functions observed as
//! sibling declarations. Popping an empty stack yields none, never an error.

use std::path::Path;

use tree_sitter::Node;

use crate::annotation::{annotate_payload, annotation_of, is_attribute_node};
use crate::provider::ParsedUnit;
use crate::record::{MemberRecord, Registry, StructureRecord};

/// Reserved name of the custom-annotation helper function.
pub const ANNOTATION_HELPER: &str = "kmeta_annotation";

/// Closed classification of declaration nodes at scanning scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Namespace,
    Record,
    Function,
    Attribute,
    Other,
}

/// What an immediate child of a record body is, for member classification.
enum Member<'tree> {
    Helper(Node<'tree>),
    Field(Node<'tree>),
    Method(Node<'tree>),
    Nested(Node<'tree>),
    Attribute(Node<'tree>),
    Other(Node<'tree>),
}

/// One collector per translation unit; the pending stacks are never shared
/// across units.
pub struct Collector<'a> {
    unit: &'a ParsedUnit,
    gather_all: bool,
    pending_annotations: Vec<String>,
    pending_custom: Vec<String>,
}

impl<'a> Collector<'a> {
    /// `target_file` designates the single file whose structures gather all
    /// members without per-member annotations (suffix match on the path).
    pub fn new(unit: &'a ParsedUnit, target_file: Option<&Path>) -> Self {
        let gather_all = target_file.is_some_and(|target| suffix_match(&unit.path, target));
        Collector {
            unit,
            gather_all,
            pending_annotations: Vec::new(),
            pending_custom: Vec::new(),
        }
    }

    /// Walk the whole unit, inserting retained structures into `registry`.
    pub fn collect(mut self, registry: &mut Registry) {
        let root = self.unit.root();
        let mut scope = Vec::new();
        self.scan(root, &mut scope, registry);
    }

    fn text(&self, node: Node<'_>) -> &str {
        self.unit.text(node)
    }

    fn source(&self) -> &[u8] {
        self.unit.source.as_bytes()
    }

    /// Scanning state: default while descending.
    fn scan(&mut self, node: Node<'a>, scope: &mut Vec<String>, registry: &mut Registry) {
        match classify(node) {
            DeclKind::Record => self.process_structure(node, scope, registry),
            DeclKind::Namespace => {
                let pushed = self.push_namespace(node, scope);
                if let Some(body) = node.child_by_field_name("body") {
                    self.scan_children(body, scope, registry);
                }
                scope.truncate(scope.len() - pushed);
            }
            DeclKind::Function => {
                if declarator_name(node).map(|n| self.text(n)) == Some(ANNOTATION_HELPER) {
                    // Marker for the next structure; the helper body is
                    // never descended into.
                    let helper = self.text(node).trim().to_string();
                    self.pending_custom.push(helper);
                } else {
                    self.scan_children(node, scope, registry);
                }
            }
            DeclKind::Attribute => {
                if let Some(payload) = annotate_payload(node, self.source()) {
                    self.pending_annotations.push(payload);
                }
            }
            DeclKind::Other => self.scan_children(node, scope, registry),
        }
    }

    fn scan_children(&mut self, node: Node<'a>, scope: &mut Vec<String>, registry: &mut Registry) {
        let mut cursor = node.walk();
        let children: Vec<Node<'a>> = node.named_children(&mut cursor).collect();
        for child in children {
            self.scan(child, scope, registry);
        }
    }

    /// Push each segment of a namespace name (`namespace a::b` pushes two).
    fn push_namespace(&self, node: Node<'a>, scope: &mut Vec<String>) -> usize {
        let Some(name) = node.child_by_field_name("name") else {
            return 0; // anonymous namespace contributes no scope segment
        };
        let mut pushed = 0;
        for segment in self.text(name).split("::") {
            let segment = segment.trim();
            if !segment.is_empty() {
                scope.push(segment.to_string());
                pushed += 1;
            }
        }
        pushed
    }

    /// ProcessingStructure state: invoked once per class/struct node.
    fn process_structure(
        &mut self,
        node: Node<'a>,
        scope: &mut Vec<String>,
        registry: &mut Registry,
    ) {
        let local_name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();

        let mut record = StructureRecord {
            qualified_name: qualify(scope, &local_name),
            local_name: local_name.clone(),
            annotation: self.pending_annotations.pop(),
            custom: self.pending_custom.pop(),
            gather_all: self.gather_all,
            fields: Vec::new(),
            methods: Vec::new(),
        };

        // A direct attribute on the structure itself takes precedence over a
        // pre-pushed pending annotation.
        let mut cursor = node.walk();
        let own_attributes: Vec<Node<'a>> = node
            .named_children(&mut cursor)
            .filter(|child| is_attribute_node(*child))
            .collect();
        for attribute in own_attributes {
            if let Some(payload) = annotate_payload(attribute, self.source()) {
                record.annotation = Some(payload);
            }
        }

        // Custom annotation helper for fields processed after it; child
        // order as yielded by the tree matters and is preserved.
        let mut field_custom: Option<String> = None;

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            let members: Vec<Node<'a>> = body.named_children(&mut cursor).collect();
            for member in members {
                match self.classify_member(member, &local_name) {
                    Member::Helper(helper) => {
                        field_custom = Some(self.text(helper).trim().to_string());
                    }
                    Member::Field(field) => {
                        self.add_member(&mut record.fields, field, &field_custom);
                    }
                    Member::Method(method) => {
                        self.add_member(&mut record.methods, method, &field_custom);
                    }
                    Member::Attribute(attribute) => {
                        if let Some(payload) = annotate_payload(attribute, self.source()) {
                            record.annotation = Some(payload);
                        }
                    }
                    Member::Nested(nested) | Member::Other(nested) => {
                        // Nested types and inner scopes are still
                        // discoverable, qualified by the enclosing record.
                        if local_name.is_empty() {
                            self.scan(nested, scope, registry);
                        } else {
                            scope.push(local_name.clone());
                            self.scan(nested, scope, registry);
                            scope.pop();
                        }
                    }
                }
            }
        }

        if record.is_retained() {
            tracing::debug!(
                "registered `{}` ({} fields, {} methods)",
                record.qualified_name,
                record.fields.len(),
                record.methods.len()
            );
            registry.insert(record);
        }
    }

    /// Member Classifier: record a field or method if it carries an
    /// annotation or the owning structure gathers all members; otherwise it
    /// is silently skipped.
    fn add_member(
        &self,
        members: &mut Vec<MemberRecord>,
        node: Node<'a>,
        field_custom: &Option<String>,
    ) {
        let annotation = annotation_of(node, self.source());
        if annotation.is_none() && !self.gather_all {
            return;
        }
        let Some(name) = declarator_name(node).map(|n| self.text(n).to_string()) else {
            return;
        };

        members.push(MemberRecord {
            ordinal: members.len(),
            name,
            type_name: self.type_spelling(node),
            annotation,
            custom: field_custom.clone(),
        });
    }

    /// Type spelling of a member: the written type plus pointer/reference
    /// decorations from the declarator.
    fn type_spelling(&self, node: Node<'a>) -> String {
        let mut spelling = node
            .child_by_field_name("type")
            .map(|t| self.text(t).to_string())
            .unwrap_or_default();

        let mut declarator = node.child_by_field_name("declarator");
        while let Some(current) = declarator {
            match current.kind() {
                "pointer_declarator" => spelling.push('*'),
                "reference_declarator" => spelling.push('&'),
                _ => break,
            }
            declarator = inner_declarator(current);
        }
        spelling
    }

    fn classify_member(&self, node: Node<'a>, record_name: &str) -> Member<'a> {
        if is_attribute_node(node) {
            return Member::Attribute(node);
        }

        match node.kind() {
            "field_declaration" | "declaration" | "function_definition" => {
                if is_function_declaration(node) {
                    let Some(name) = declarator_name(node).map(|n| self.text(n)) else {
                        return Member::Other(node);
                    };
                    if name == ANNOTATION_HELPER {
                        return Member::Helper(node);
                    }
                    // Constructors and destructors are not reflected members.
                    if name == record_name || name.starts_with('~') {
                        return Member::Other(node);
                    }
                    return Member::Method(node);
                }
                if declarator_name(node).is_some() {
                    return Member::Field(node);
                }
                // `struct Inner { ... };` member: a bodied record with no
                // declarator.
                if let Some(nested) = nested_record(node) {
                    return Member::Nested(nested);
                }
                Member::Other(node)
            }
            "struct_specifier" | "class_specifier" if node.child_by_field_name("body").is_some() => {
                Member::Nested(node)
            }
            _ => Member::Other(node),
        }
    }
}

/// Join enclosing scope names with the local name, `::`-separated.
fn qualify(scope: &[String], local_name: &str) -> String {
    if scope.is_empty() {
        return local_name.to_string();
    }
    let mut qualified = scope.join("::");
    qualified.push_str("::");
    qualified.push_str(local_name);
    qualified
}

/// Suffix match on the file path, per the gather-all contract.
fn suffix_match(path: &Path, target: &Path) -> bool {
    path.to_string_lossy()
        .ends_with(target.to_string_lossy().as_ref())
}

fn classify(node: Node<'_>) -> DeclKind {
    match node.kind() {
        "namespace_definition" => DeclKind::Namespace,
        "struct_specifier" | "class_specifier" => {
            if node.child_by_field_name("body").is_some() {
                DeclKind::Record
            } else {
                // Forward declarations and type usages have no members.
                DeclKind::Other
            }
        }
        "function_definition" => DeclKind::Function,
        "declaration" if is_function_declaration(node) => DeclKind::Function,
        "attribute_declaration" | "attribute_specifier" => DeclKind::Attribute,
        _ => DeclKind::Other,
    }
}

/// Whether a declaration's declarator chain reaches a function declarator.
fn is_function_declaration(node: Node<'_>) -> bool {
    let mut declarator = node.child_by_field_name("declarator");
    while let Some(current) = declarator {
        match current.kind() {
            "function_declarator" => return true,
            "pointer_declarator" | "reference_declarator" | "parenthesized_declarator" => {
                declarator = inner_declarator(current);
            }
            _ => return false,
        }
    }
    false
}

/// The identifier named by a declaration, unwrapping declarator layers.
fn declarator_name<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    let mut declarator = node.child_by_field_name("declarator")?;
    loop {
        match declarator.kind() {
            "identifier" | "field_identifier" | "destructor_name" | "qualified_identifier" => {
                return Some(declarator);
            }
            "function_declarator"
            | "pointer_declarator"
            | "reference_declarator"
            | "array_declarator"
            | "parenthesized_declarator" => {
                declarator = inner_declarator(declarator)?;
            }
            _ => return None,
        }
    }
}

/// Inner declarator of a wrapper declarator node. Reference declarators
/// carry no field name in the grammar, so fall back to the last named child.
fn inner_declarator<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    if let Some(inner) = node.child_by_field_name("declarator") {
        return Some(inner);
    }
    let mut cursor = node.walk();
    node.named_children(&mut cursor).last()
}

/// A bodied record nested directly in a member declaration's type position.
fn nested_record<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    let ty = node.child_by_field_name("type")?;
    if matches!(ty.kind(), "struct_specifier" | "class_specifier")
        && ty.child_by_field_name("body").is_some()
    {
        Some(ty)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "collect/collect_tests.rs"]
mod collect_tests;

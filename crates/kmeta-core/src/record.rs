//! Normalized records produced by the collector and consumed by the emitter.

/// One reflected member (field or method) of a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// 0-based position in first-seen order within the owning structure.
    /// Declaration order in source is significant and preserved verbatim
    /// in emitted output.
    pub ordinal: usize,

    /// Local member name.
    pub name: String,

    /// Type spelling as written in source.
    pub type_name: String,

    /// Annotation payload attached to the member, if any. Members without
    /// one are recorded in gather-all mode but emit no registration.
    pub annotation: Option<String>,

    /// Source text of the `kmeta_annotation` helper in scope when this
    /// member was classified, if any.
    pub custom: Option<String>,
}

/// One collected structure and its reflected members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureRecord {
    /// Scope-qualified name, `::`-joined (e.g. `geo::Point`).
    pub qualified_name: String,

    /// Unqualified name.
    pub local_name: String,

    /// Structure-level annotation, if any. A direct attribute on the
    /// structure overwrites a pending sibling annotation.
    pub annotation: Option<String>,

    /// `kmeta_annotation` helper pending when this structure was reached.
    pub custom: Option<String>,

    /// True when the structure was declared in the designated target file:
    /// every field and method is recorded without per-member annotations.
    pub gather_all: bool,

    pub fields: Vec<MemberRecord>,
    pub methods: Vec<MemberRecord>,
}

impl StructureRecord {
    pub fn has_members(&self) -> bool {
        !self.fields.is_empty() || !self.methods.is_empty()
    }

    /// Retention rule: annotated (or gather-all) structures with at least
    /// one recorded member stay in the registry; everything else is dropped.
    pub fn is_retained(&self) -> bool {
        (self.annotation.is_some() || self.gather_all) && self.has_members()
    }
}

/// Mapping from qualified structure name to its record.
///
/// Insertion-ordered so emission is deterministic; duplicate qualified names
/// are last-write-wins with the original slot retained (qualified names are
/// expected unique per run, a collision is not an error).
#[derive(Debug, Default)]
pub struct Registry {
    records: Vec<StructureRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn insert(&mut self, record: StructureRecord) {
        match self
            .records
            .iter_mut()
            .find(|existing| existing.qualified_name == record.qualified_name)
        {
            Some(existing) => {
                tracing::debug!(
                    "duplicate structure `{}` replaces earlier record",
                    record.qualified_name
                );
                *existing = record;
            }
            None => self.records.push(record),
        }
    }

    pub fn get(&self, qualified_name: &str) -> Option<&StructureRecord> {
        self.records
            .iter()
            .find(|record| record.qualified_name == qualified_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructureRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//! Code emitter: writes the generated registration source file.
//!
//! Output is deterministic: for a fixed registry, the emitted bytes are
//! identical across runs. No timestamps, no reordering: structures appear
//! in registry (collection) order and members in stored ordinal order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MetaError, MetaResult};
use crate::record::{Registry, StructureRecord};

/// Fixed location of the generated file, relative to the scanned root.
pub const GENERATED_RELATIVE_PATH: &str = "ast/meta.generated.cpp";

/// Whether a record produces a registration block: at least one recorded
/// field, and either a structure-level annotation or gather-all mode (a
/// target-file structure emits without its own annotation).
pub fn emits_block(record: &StructureRecord) -> bool {
    !record.fields.is_empty() && (record.annotation.is_some() || record.gather_all)
}

/// Render the full generated file for `registry`.
pub fn generate(registry: &Registry) -> String {
    let mut output = String::new();

    output.push_str("#include \"dtypes.h\"\n");
    output.push_str("#include \"ast/nodes.h\"\n");
    output.push('\n');
    output.push_str("namespace lython {\n");

    for record in registry.iter().filter(|record| emits_block(record)) {
        let typename = &record.qualified_name;
        output.push_str("template <>\n");
        output.push_str(&format!("struct meta::ReflectionTrait<{typename}> {{\n"));
        output.push_str("    static int register_members() {\n");

        // Members without an annotation are present in the record but
        // produce no statement.
        for field in &record.fields {
            if field.annotation.is_some() {
                output.push_str(&format!(
                    "        meta::register_property<&{typename}::{name}>(\"{name}\");\n",
                    name = field.name
                ));
            }
        }

        output.push_str("        return 1;\n");
        output.push_str("    }\n");
        output.push_str("};\n");
    }

    output.push_str("}\n");
    output
}

/// Write the generated file under `root` at its fixed relative path,
/// overwriting any previous run's output.
pub fn write_generated(root: &Path, registry: &Registry) -> MetaResult<PathBuf> {
    write_generated_at(&root.join(GENERATED_RELATIVE_PATH), registry)
}

/// Write the generated file to an explicit path. This is the one fatal
/// failure point of a run: the generated file is the sole deliverable.
pub fn write_generated_at(path: &Path, registry: &Registry) -> MetaResult<PathBuf> {
    let content = generate(registry);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| MetaError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| MetaError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("wrote generated file {}", path.display());
    Ok(path.to_path_buf())
}

//! Project pipeline: discover, parse, collect, emit, one pass per run.

use std::path::{Path, PathBuf};

use crate::collect::Collector;
use crate::emit;
use crate::error::MetaResult;
use crate::provider::{self, Diagnostic, ParseOptions, ParsedUnit};
use crate::record::Registry;

/// A single generation run over a header tree.
///
/// Parsing is best-effort: a file that fails to read or parse is logged and
/// skipped, and the run still emits registrations recovered from the other
/// files. Only writing the generated file can fail the run.
pub struct Project {
    root: PathBuf,
    target_file: Option<PathBuf>,
    options: ParseOptions,
    units: Vec<ParsedUnit>,
    registry: Registry,
}

impl Project {
    /// A project scanning `**/*.h` under `root`. When `target_file` is
    /// given, exactly that file is parsed instead, and structures declared
    /// in it gather all members without per-member annotations.
    pub fn new(root: impl Into<PathBuf>, target_file: Option<PathBuf>) -> Self {
        Project::with_options(root, target_file, ParseOptions::default())
    }

    pub fn with_options(
        root: impl Into<PathBuf>,
        target_file: Option<PathBuf>,
        options: ParseOptions,
    ) -> Self {
        Project {
            root: root.into(),
            target_file,
            options,
            units: Vec::new(),
            registry: Registry::new(),
        }
    }

    /// Parse all inputs and collect annotated structures into the registry.
    pub fn scan(&mut self) -> MetaResult<()> {
        let files = match &self.target_file {
            Some(file) => vec![file.clone()],
            None => provider::discover_headers(&self.root)?,
        };

        for file in files {
            match provider::parse_file(&file, &self.options) {
                Ok(unit) => {
                    tracing::debug!(
                        "parsed {} ({} diagnostics)",
                        unit.path.display(),
                        unit.diagnostics.len()
                    );
                    self.units.push(unit);
                }
                Err(err) => {
                    // Fatal for this file only; later files still process.
                    tracing::error!("skipping: {err}");
                }
            }
        }

        for unit in &self.units {
            Collector::new(unit, self.target_file.as_deref()).collect(&mut self.registry);
        }
        Ok(())
    }

    /// Write the generated file under the root at its fixed relative path.
    /// Call after [`Project::scan`].
    pub fn generate(&self) -> MetaResult<PathBuf> {
        emit::write_generated(&self.root, &self.registry)
    }

    /// Write the generated file to an explicit path instead.
    pub fn generate_at(&self, path: &Path) -> MetaResult<PathBuf> {
        emit::write_generated_at(path, &self.registry)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn units(&self) -> &[ParsedUnit] {
        &self.units
    }

    /// All front-end diagnostics with the unit they came from.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&Path, &Diagnostic)> {
        self.units.iter().flat_map(|unit| {
            unit.diagnostics
                .iter()
                .map(move |diagnostic| (unit.path.as_path(), diagnostic))
        })
    }
}

//! # kmeta-core
//!
//! Annotation-driven reflection generator for C++ headers.
//!
//! Scans a tree of headers, finds structures and members that opt into
//! reflection via `annotate` attributes, and emits one generated C++ source
//! file registering each annotated member with the runtime reflection
//! facility.
//!
//! ## Pipeline
//!
//! ```text
//! headers (**/*.h)
//!     ↓
//! [provider]   tree-sitter C++ parse, diagnostics (best-effort)
//!     ↓
//! [collect]    recursive traversal, annotation gating, scope-qualified names
//!     ↓
//! [record]     insertion-ordered registry of structure records
//!     ↓
//! [emit]       ast/meta.generated.cpp (deterministic bytes)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kmeta_core::Project;
//! use std::path::PathBuf;
//!
//! let mut project = Project::new("src", Some(PathBuf::from("src/ast/nodes.h")));
//! project.scan()?;
//! let generated = project.generate()?;
//! println!("wrote {}", generated.display());
//! # Ok::<(), kmeta_core::MetaError>(())
//! ```
//!
//! ## Annotating headers
//!
//! ```cpp
//! struct [[clang::annotate("reflected")]] Point {
//!     [[clang::annotate("x")]] int x;
//!     [[clang::annotate("y")]] int y;
//!     int scratch; // not annotated: recorded only in gather-all mode
//! };
//! ```
//!
//! Headers can branch on `KMETA_PROCESSING`, which the provider defines
//! while parsing (see [`provider::ParseOptions`]).
//!
//! Diagnostics from headers that fail to parse are logged and never abort a
//! run; only failure to write the generated file is fatal.

pub mod annotation;
pub mod collect;
pub mod emit;
pub mod error;
pub mod project;
pub mod provider;
pub mod record;

pub use collect::{ANNOTATION_HELPER, Collector};
pub use emit::GENERATED_RELATIVE_PATH;
pub use error::{MetaError, MetaResult};
pub use project::Project;
pub use provider::{Diagnostic, PROCESSING_DEFINE, ParseOptions, ParsedUnit, Severity};
pub use record::{MemberRecord, Registry, StructureRecord};

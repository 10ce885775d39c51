//! Error types for reflection generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for reflection generation operations.
pub type MetaResult<T> = Result<T, MetaError>;

/// Errors that can occur while scanning headers or emitting generated code.
#[derive(Debug, Error)]
pub enum MetaError {
    /// A header file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header discovery pattern was invalid.
    #[error("invalid header search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The front end produced no tree for a file.
    #[error("front end produced no parse tree for {path}")]
    Parse { path: PathBuf },

    /// The generated output file could not be written.
    ///
    /// This is the only error that aborts a run: the generated file is the
    /// sole deliverable, so a failed write must surface to the caller.
    #[error("failed to write generated file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Simulator error types.
//!
//! All fallible operations in this crate are file-system facing: reading the
//! initial images, writing the result dumps, and parsing the file-set
//! arguments. Inside the simulated machine itself nothing returns an error:
//! illegal opcodes retire as no-ops and out-of-range memory accesses read
//! zero or are discarded.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while setting up or finishing a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// An input could not be read or an output could not be written.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The positional file list had an unsupported length.
    #[error("expected 0, 5, or 27 file arguments, got {0}")]
    InvalidArgs(usize),

    /// A file-set description failed to parse.
    #[error("invalid file set: {0}")]
    Config(String),
}

impl SimError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimError>;

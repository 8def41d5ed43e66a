//! Error types for integer set processing
//!
//! Only two failures end a run: a missing input directory and an output
//! directory that cannot be created. Everything else is scoped to one file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, ProcessError>;

#[derive(Error, Debug)]
pub enum ProcessError {
    /// The input directory does not exist or is not a directory
    #[error("Input directory does not exist: {}", .0.display())]
    InputDirectoryMissing(PathBuf),

    /// An input file vanished or was never present
    #[error("Input file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    /// Whether this error stops the whole run rather than a single file
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InputDirectoryMissing(_) | Self::CreateDir { .. })
    }
}

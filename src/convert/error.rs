//! Conversion errors.

use std::path::PathBuf;

/// Errors that can occur while converting a source file into a record.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    /// Extension is not one of `md`, `json`, `txt`
    #[error("Unsupported file format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Source file could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Source `.json` file is not valid JSON
    #[error("Failed to parse JSON in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Record could not be serialized
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Destination file could not be written
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Source path has no parent directory to mirror in the output tree
    #[error("No parent directory for '{}'", path.display())]
    NoParentDirectory { path: PathBuf },

    /// Title would place the output file outside its mirrored directory
    #[error("Path traversal attempt rejected: title '{title}'")]
    PathTraversal { title: String },

    /// Generic I/O error (directory enumeration, mirroring)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

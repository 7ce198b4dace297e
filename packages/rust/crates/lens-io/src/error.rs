//! Error types for vault I/O operations.
//!
//! Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for vault I/O operations.
///
/// Each variant represents a specific failure mode in the I/O pipeline.
#[derive(Error, Debug)]
pub enum IoError {
    /// File does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// File contains binary content (NULL bytes detected).
    #[error("Binary file detected")]
    BinaryFile,

    /// Note is not valid UTF-8 and must not be rewritten.
    #[error("Invalid UTF-8 at byte {0}")]
    Encoding(usize),

    /// Vault or backup root is missing or not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Directory traversal failed part-way.
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Backup archive could not be written or verified.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for IoError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Archive(value.to_string())
    }
}

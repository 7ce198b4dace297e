//! Error types for tokenizer setup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building tokenizer pipelines.
///
/// Tokenizing itself never fails; only loading configuration can.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Extra stop-word file could not be read.
    #[error("Failed to read stop-word file {path}: {source}")]
    StopWordsFile {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

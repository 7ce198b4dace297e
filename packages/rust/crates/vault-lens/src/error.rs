//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::frontmatter::FrontmatterError;
use crate::topics::TopicModelError;

/// Fatal errors of a vault-lens run.
#[derive(Error, Debug)]
pub enum VaultLensError {
    /// Unreadable vault, note or backup destination.
    #[error(transparent)]
    Io(#[from] lens_io::IoError),

    /// Tokenizer setup failed.
    #[error(transparent)]
    Tokenizer(#[from] lens_tokenizer::TokenizerError),

    /// Invalid or incomplete configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Topic model could not be fitted; nothing was modified.
    #[error(transparent)]
    TopicModel(#[from] TopicModelError),

    /// A tag rewrite failed part way through a run.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),

    /// Mutating run requested without a backup destination.
    #[error("a backup directory is required before notes can be tagged")]
    BackupRequired,
}

/// Result alias for vault-lens operations.
pub type Result<T> = std::result::Result<T, VaultLensError>;

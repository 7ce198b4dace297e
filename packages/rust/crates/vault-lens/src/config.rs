//! Run configuration: CLI overrides, environment, YAML file, defaults.
//!
//! Resolution is an explicit value built once per run. Environment access
//! goes through a lookup function so callers (and tests) choose the source.

use std::path::{Path, PathBuf};

use lens_io::DEFAULT_MAX_NOTE_BYTES;
use lens_tokenizer::TokenizerConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::topics::TopicModelConfig;
use crate::vault::{TopicScope, VaultOptions};

/// Vault root directory.
pub const VAULT_ENV: &str = "OBSIDIAN_VAULT";
/// Backup destination directory.
pub const BACKUP_DIR_ENV: &str = "OBSIDIAN_BACKUP_DIR";
/// Path of the YAML config file.
pub const CONFIG_FILE_ENV: &str = "VAULT_LENS_CONFIG";

/// Rows shown per ranked table by default.
pub const DEFAULT_REPORT_TOP: usize = 10;
/// Tag namespace written in front of topic labels.
pub const DEFAULT_TAG_NAMESPACE: &str = "topic";

/// Configuration failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No vault root from flags, environment or file.
    #[error("vault root is not configured (use --vault, {VAULT_ENV} or `vault_root` in the config file)")]
    MissingVaultRoot,

    /// Config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Requested file.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Requested file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: serde_yaml::Error,
    },
}

/// `report:` section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    /// Rows per ranked table.
    pub top: Option<usize>,
}

/// `topics:` section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TopicsSection {
    /// Subtree holding topic-eligible notes.
    pub subtree: Option<PathBuf>,
    /// Path substrings to exclude.
    pub exclude: Option<Vec<String>>,
    /// Number of topics.
    pub num_topics: Option<usize>,
    /// Label terms per topic.
    pub terms_per_topic: Option<usize>,
    /// Minimum document count per term.
    pub min_df: Option<usize>,
    /// Maximum document fraction per term.
    pub max_df: Option<f64>,
    /// Gibbs sweeps.
    pub iterations: Option<usize>,
    /// RNG seed.
    pub seed: Option<u64>,
    /// Tag namespace.
    pub tag_namespace: Option<String>,
}

/// On-disk YAML schema; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Vault root.
    pub vault_root: Option<PathBuf>,
    /// Backup destination.
    pub backup_dir: Option<PathBuf>,
    /// Note extension.
    pub note_extension: Option<String>,
    /// Maximum note size in bytes.
    pub max_note_bytes: Option<u64>,
    /// Extra stop-word file.
    pub stop_words_file: Option<PathBuf>,
    /// Extra stop words.
    pub extra_stop_words: Vec<String>,
    /// Report options.
    pub report: ReportSection,
    /// Topic options.
    pub topics: TopicsSection,
}

impl ConfigFile {
    /// Parse `path`.
    ///
    /// # Errors
    /// `Read` or `Parse`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--vault`.
    pub vault_root: Option<PathBuf>,
    /// `--backup-dir`.
    pub backup_dir: Option<PathBuf>,
    /// `--conf`.
    pub config_file: Option<PathBuf>,
    /// `words --top`.
    pub top: Option<usize>,
    /// `topics --topics`.
    pub num_topics: Option<usize>,
    /// `topics --terms`.
    pub terms_per_topic: Option<usize>,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, Serialize)]
pub struct VaultLensConfig {
    /// Vault root, used literally.
    pub vault_root: PathBuf,
    /// Backup destination for mutating runs.
    pub backup_dir: Option<PathBuf>,
    /// Note extension without the dot.
    pub note_extension: String,
    /// Maximum note size in bytes.
    pub max_note_bytes: u64,
    /// Extra stop-word file.
    pub stop_words_file: Option<PathBuf>,
    /// Extra stop words.
    pub extra_stop_words: Vec<String>,
    /// Rows per ranked table.
    pub report_top: usize,
    /// Topic-eligible notes.
    pub topic_scope: TopicScope,
    /// Topic model settings.
    pub topic_model: TopicModelConfig,
    /// Tag namespace.
    pub tag_namespace: String,
}

impl VaultLensConfig {
    /// Resolve against the process environment.
    ///
    /// # Errors
    /// See [`VaultLensConfig::resolve`].
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve: overrides, then `env`, then the config file, then defaults.
    ///
    /// # Errors
    /// `MissingVaultRoot`, or a config file that cannot be read or parsed.
    pub fn resolve<F>(overrides: &ConfigOverrides, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_path = |key: &str| env(key).filter(|value| !value.trim().is_empty()).map(PathBuf::from);

        let config_path = overrides.config_file.clone().or_else(|| env_path(CONFIG_FILE_ENV));
        let file = match &config_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                ConfigFile::load(path)?
            }
            None => ConfigFile::default(),
        };

        let vault_root = overrides
            .vault_root
            .clone()
            .or_else(|| env_path(VAULT_ENV))
            .or(file.vault_root)
            .ok_or(ConfigError::MissingVaultRoot)?;
        let backup_dir = overrides
            .backup_dir
            .clone()
            .or_else(|| env_path(BACKUP_DIR_ENV))
            .or(file.backup_dir);

        let defaults = TopicModelConfig::default();
        let topics = file.topics;
        let topic_model = TopicModelConfig {
            num_topics: overrides
                .num_topics
                .or(topics.num_topics)
                .unwrap_or(defaults.num_topics),
            terms_per_topic: overrides
                .terms_per_topic
                .or(topics.terms_per_topic)
                .unwrap_or(defaults.terms_per_topic),
            min_df: topics.min_df.unwrap_or(defaults.min_df),
            max_df: topics.max_df.unwrap_or(defaults.max_df),
            iterations: topics.iterations.unwrap_or(defaults.iterations),
            seed: topics.seed.unwrap_or(defaults.seed),
        };
        let default_scope = TopicScope::default();
        let topic_scope = TopicScope {
            subtree: topics.subtree.unwrap_or(default_scope.subtree),
            exclude: topics.exclude.unwrap_or(default_scope.exclude),
        };

        Ok(Self {
            vault_root,
            backup_dir,
            note_extension: file.note_extension.unwrap_or_else(|| "md".to_string()),
            max_note_bytes: file.max_note_bytes.unwrap_or(DEFAULT_MAX_NOTE_BYTES),
            stop_words_file: file.stop_words_file,
            extra_stop_words: file.extra_stop_words,
            report_top: overrides
                .top
                .or(file.report.top)
                .unwrap_or(DEFAULT_REPORT_TOP),
            topic_scope,
            topic_model,
            tag_namespace: topics
                .tag_namespace
                .unwrap_or_else(|| DEFAULT_TAG_NAMESPACE.to_string()),
        })
    }

    /// Traversal options for [`crate::Vault::open`].
    #[must_use]
    pub fn vault_options(&self) -> VaultOptions {
        VaultOptions {
            extension: self.note_extension.clone(),
            max_note_bytes: self.max_note_bytes,
        }
    }

    /// Stop-word configuration for [`lens_tokenizer::Tokenizer::new`].
    #[must_use]
    pub fn tokenizer_config(&self) -> TokenizerConfig {
        TokenizerConfig {
            extra_stop_words: self.extra_stop_words.clone(),
            stop_words_file: self.stop_words_file.clone(),
        }
    }
}

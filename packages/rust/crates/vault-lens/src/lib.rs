//! vault-lens - Link graph, word statistics and topic tagging for markdown vaults.
//!
//! Module layout (by domain):
//! - `vault`: note discovery, two-pass reading, topic document sets
//! - `link_graph`: `[[reference]]` extraction and existing/dangling classification
//! - `topics`: count vectorizer and seeded LDA topic model
//! - `frontmatter`: idempotent `tags:` line writer
//! - `pipeline`: whole-vault runs composed from the above
//! - `report`: markdown table rendering
//! - `config`: flags, environment, YAML file and defaults
//!
//! # Examples
//!
//! ```rust
//! use vault_lens::{extract_references, normalize_target};
//!
//! let refs = extract_references("See [[Project X|the project]] and [[2023-05-01]].");
//! assert_eq!(refs[0].target, "Project X");
//! assert_eq!(normalize_target("Note#^block"), "Note");
//! ```

pub mod config;
mod error;
pub mod frontmatter;
pub mod link_graph;
mod patterns;
pub mod pipeline;
pub mod report;
pub mod topics;
pub mod vault;

pub use config::{ConfigError, ConfigOverrides, VaultLensConfig};
pub use error::{Result, VaultLensError};
pub use frontmatter::{
    FrontmatterError, WriteOutcome, apply_tags, apply_tags_to_content, tag_line, topic_tags,
};
pub use link_graph::{
    LinkGraph, LinkReference, LinkStatus, build_link_graph, extract_references, normalize_target,
};
pub use pipeline::{
    LanguageReport, LinkReport, TopicRunConfig, TopicTaggingReport, WordCountReport, language_report,
    link_report, tag_topics, word_count,
};
pub use topics::{TopicModelConfig, TopicModelError, TopicModelOutput, fit_topics};
pub use vault::{DocumentSet, Note, TopicScope, Vault, VaultOptions};

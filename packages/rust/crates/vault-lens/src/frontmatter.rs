//! Idempotent `tags:` rewrite in a note's frontmatter.
//!
//! The first line starting with `tags:` is replaced in place. A note without
//! one gets a fresh frontmatter block prepended. Running the writer twice
//! yields the same file.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use lens_io::{IoError, read_text_strict, write_text_atomic};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::patterns::compile_regex;

/// Frontmatter block delimiter line.
pub const FRONTMATTER_DELIMITER: &str = "---";

static TAG_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?m)^tags:[^\r\n]*"));

/// Failure while rewriting one note.
#[derive(Error, Debug)]
pub enum FrontmatterError {
    /// Note could not be read or written.
    #[error("failed to tag note {path}: {source}")]
    Note {
        /// Note being rewritten.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: IoError,
    },
}

/// What the writer did to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// A new frontmatter block was prepended.
    Inserted,
    /// An existing `tags:` line was replaced.
    Replaced,
}

/// `#<namespace>/<label>` for each label; `#<label>` for an empty namespace.
#[must_use]
pub fn topic_tags(labels: &[String], namespace: &str) -> Vec<String> {
    let namespace = namespace.trim_matches('/');
    labels
        .iter()
        .map(|label| {
            if namespace.is_empty() {
                format!("#{label}")
            } else {
                format!("#{namespace}/{label}")
            }
        })
        .collect()
}

/// Canonical line: `tags: ["#a", "#b"]`.
#[must_use]
pub fn tag_line(tags: &[String]) -> String {
    let quoted: Vec<String> = tags.iter().map(|tag| format!("\"{tag}\"")).collect();
    format!("tags: [{}]", quoted.join(", "))
}

/// Rewrite `content` with `tags`, without touching the filesystem.
#[must_use]
pub fn apply_tags_to_content(content: &str, tags: &[String]) -> (String, WriteOutcome) {
    let line = tag_line(tags);
    if let Some(found) = TAG_LINE_REGEX.find(content) {
        let mut updated = String::with_capacity(content.len() + line.len());
        updated.push_str(&content[..found.start()]);
        updated.push_str(&line);
        updated.push_str(&content[found.end()..]);
        (updated, WriteOutcome::Replaced)
    } else {
        let updated =
            format!("{FRONTMATTER_DELIMITER}\n{line}\n{FRONTMATTER_DELIMITER}\n\n{content}");
        (updated, WriteOutcome::Inserted)
    }
}

/// Read `path`, rewrite its tag line and replace the file atomically.
///
/// The note is read strictly: invalid UTF-8 or a size above `max_bytes`
/// fails before anything is written.
///
/// # Errors
/// `FrontmatterError::Note` when the note cannot be read or written.
pub fn apply_tags(
    path: &Path,
    tags: &[String],
    max_bytes: u64,
) -> Result<WriteOutcome, FrontmatterError> {
    let wrap = |source: IoError| FrontmatterError::Note {
        path: path.to_path_buf(),
        source,
    };
    let content = read_text_strict(path, max_bytes).map_err(wrap)?;
    let (updated, outcome) = apply_tags_to_content(&content, tags);
    write_text_atomic(path, &updated).map_err(wrap)?;
    tracing::debug!(path = %path.display(), ?outcome, tags = tags.len(), "note tagged");
    Ok(outcome)
}

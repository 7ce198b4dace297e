//! Recursive note discovery for a vault root.
//!
//! Uses `walkdir` and returns a sorted list so that every pass over the
//! vault sees notes in the same order.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::IoError;

/// Options for note discovery.
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Note extensions without the leading dot (e.g., `["md"]`)
    pub extensions: Vec<String>,
    /// Skip hidden files and directories (names starting with `.`)
    pub skip_hidden: bool,
    /// Skip directories by name (e.g., `[".obsidian", ".trash"]`)
    pub skip_dirs: Vec<String>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string()],
            skip_hidden: true,
            skip_dirs: vec![".obsidian".to_string(), ".trash".to_string()],
        }
    }
}

impl DiscoverOptions {
    /// Options for a single note extension, other settings default.
    #[must_use]
    pub fn with_extension(extension: &str) -> Self {
        Self {
            extensions: vec![normalize_extension(extension)],
            ..Self::default()
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|wanted| normalize_extension(wanted) == ext)
    }

    fn keep_entry(&self, entry: &DirEntry) -> bool {
        // The root itself is always walked, even when it lives in a hidden dir.
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if self.skip_hidden && name.starts_with('.') {
            return false;
        }
        !(entry.file_type().is_dir() && self.skip_dirs.iter().any(|skip| *skip == name))
    }
}

/// Discover note files recursively below `root`.
///
/// The root is used literally: no `~` expansion, no canonicalisation.
///
/// # Errors
/// `NotADirectory` when `root` is missing or a file, `Walk` when a
/// directory below the root cannot be read.
pub fn discover_notes<P: AsRef<Path>>(
    root: P,
    options: &DiscoverOptions,
) -> Result<Vec<PathBuf>, IoError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(IoError::NotADirectory(root.to_string_lossy().to_string()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| options.keep_entry(entry));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && options.matches_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), notes = files.len(), "vault discovered");
    Ok(files)
}

/// Normalize extension (strip leading dot).
fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

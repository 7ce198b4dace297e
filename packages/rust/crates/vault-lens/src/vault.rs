//! Vault traversal and note materialization.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use lens_io::{
    DEFAULT_MAX_NOTE_BYTES, DiscoverOptions, IoError, discover_notes, read_text_safe, read_text_strict,
};
use lens_tokenizer::{Language, LanguageClassifier, normalize_note_text};
use serde::Serialize;

/// Traversal options.
#[derive(Debug, Clone)]
pub struct VaultOptions {
    /// Note file extension without the dot.
    pub extension: String,
    /// Notes larger than this fail the run.
    pub max_note_bytes: u64,
}

impl Default for VaultOptions {
    fn default() -> Self {
        Self {
            extension: "md".to_string(),
            max_note_bytes: DEFAULT_MAX_NOTE_BYTES,
        }
    }
}

/// One note read from disk.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    /// File stem, the name other notes link to.
    pub id: String,
    /// Absolute or root-relative location, used for rewriting.
    pub path: PathBuf,
    /// Raw file content.
    #[serde(skip)]
    pub content: String,
    /// Detected language.
    pub language: Language,
}

/// Which notes take part in topic modeling.
#[derive(Debug, Clone, Serialize)]
pub struct TopicScope {
    /// Subtree below the vault root holding eligible notes.
    pub subtree: PathBuf,
    /// Notes whose path contains any of these substrings are skipped.
    pub exclude: Vec<String>,
}

impl Default for TopicScope {
    fn default() -> Self {
        Self {
            subtree: PathBuf::from("🌳 Evergreen Notes"),
            exclude: vec!["✍️ Journal".to_string(), "🌳 Map of MoC.md".to_string()],
        }
    }
}

/// A named, ordered set of notes fed to the topic model.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSet {
    /// Partition name, `target-language` or `fallback-language`.
    pub name: String,
    /// Notes in traversal order.
    pub documents: Vec<Note>,
}

impl DocumentSet {
    /// Empty set with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
        }
    }

    /// Raw note texts in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|note| note.content.as_str()).collect()
    }

    /// Number of notes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the set has no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Topic-eligible notes partitioned by language.
#[derive(Debug, Clone, Serialize)]
pub struct TopicCorpus {
    /// Notes in [`Language::TARGET`].
    pub target: DocumentSet,
    /// Every other note.
    pub fallback: DocumentSet,
}

/// A vault root and its sorted note paths.
///
/// The path list is fixed at open time; every pass walks it in the same order.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    paths: Vec<PathBuf>,
    options: VaultOptions,
}

impl Vault {
    /// Discover notes below `root`.
    ///
    /// # Errors
    /// Returns `NotADirectory` when `root` is missing, or walk errors.
    pub fn open<P: AsRef<Path>>(root: P, options: VaultOptions) -> Result<Self, IoError> {
        let root = root.as_ref().to_path_buf();
        let discover = DiscoverOptions::with_extension(&options.extension);
        let paths = discover_notes(&root, &discover)?;
        tracing::info!(root = %root.display(), notes = paths.len(), "vault opened");
        Ok(Self {
            root,
            paths,
            options,
        })
    }

    /// Vault root as given.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Note paths in traversal order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Known note identifiers (first pass, no file reads).
    #[must_use]
    pub fn identifiers(&self) -> HashSet<String> {
        self.paths.iter().filter_map(|path| note_id(path)).collect()
    }

    /// Read one note's raw content.
    ///
    /// # Errors
    /// Any read failure is fatal for the run.
    pub fn read(&self, path: &Path) -> Result<String, IoError> {
        read_text_safe(path, self.options.max_note_bytes)
    }

    /// Size limit applied to every note read or rewritten.
    #[must_use]
    pub fn max_note_bytes(&self) -> u64 {
        self.options.max_note_bytes
    }

    /// Read one note, failing on invalid UTF-8 instead of replacing it.
    ///
    /// # Errors
    /// Any read failure, including `Encoding`.
    pub fn read_strict(&self, path: &Path) -> Result<String, IoError> {
        read_text_strict(path, self.options.max_note_bytes)
    }

    /// Read and classify every note (second pass).
    ///
    /// # Errors
    /// Fails on the first unreadable note.
    pub fn read_notes(&self, classifier: &dyn LanguageClassifier) -> Result<Vec<Note>, IoError> {
        self.paths
            .iter()
            .map(|path| self.load(path, classifier))
            .collect()
    }

    /// Build the topic model's input: notes under `scope.subtree` minus
    /// exclusions, split by language.
    ///
    /// # Errors
    /// Fails on the first unreadable note.
    pub fn topic_documents(
        &self,
        scope: &TopicScope,
        classifier: &dyn LanguageClassifier,
    ) -> Result<TopicCorpus, IoError> {
        let mut corpus = TopicCorpus {
            target: DocumentSet::new("target-language"),
            fallback: DocumentSet::new("fallback-language"),
        };
        let subtree = self.root.join(&scope.subtree);
        for path in &self.paths {
            if !path.starts_with(&subtree) {
                continue;
            }
            let display = path.to_string_lossy();
            if scope.exclude.iter().any(|needle| display.contains(needle.as_str())) {
                tracing::debug!(path = %path.display(), "excluded from topic documents");
                continue;
            }
            let note = self.load(path, classifier)?;
            if note.language == Language::TARGET {
                corpus.target.documents.push(note);
            } else {
                corpus.fallback.documents.push(note);
            }
        }
        tracing::info!(
            target = corpus.target.len(),
            fallback = corpus.fallback.len(),
            "topic documents collected"
        );
        Ok(corpus)
    }

    fn load(&self, path: &Path, classifier: &dyn LanguageClassifier) -> Result<Note, IoError> {
        let content = self.read(path)?;
        let language = if content.is_empty() {
            Language::FALLBACK
        } else {
            classifier.classify(&normalize_note_text(&content))
        };
        tracing::debug!(path = %path.display(), %language, "note loaded");
        Ok(Note {
            id: note_id(path).unwrap_or_default(),
            path: path.to_path_buf(),
            content,
            language,
        })
    }
}

/// File stem of `path`, the identifier links resolve against.
#[must_use]
pub fn note_id(path: &Path) -> Option<String> {
    path.file_stem().map(|stem| stem.to_string_lossy().to_string())
}

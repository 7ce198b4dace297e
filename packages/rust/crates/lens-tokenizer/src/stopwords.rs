//! Stop-word sets: language lists plus vault-specific noise.

use std::collections::HashSet;
use std::path::Path;

use stop_words::{LANGUAGE, get};

use crate::error::TokenizerError;
use crate::language::Language;

/// Markdown scaffolding, template phrases and emoji that appear in almost
/// every daily note. Shared by both languages.
pub const DOMAIN_STOP_WORDS: &[&str] = &[
    "_",
    "#",
    "##",
    "###",
    "####",
    "#####",
    "######",
    "←",
    "→",
    "🙅",
    "♂",
    "🤔",
    "🌳",
    "🌱",
    "✅",
    "*",
    "-",
    "=",
    "|",
    "[",
    "]",
    ">",
    "<",
    "/",
    "\\",
    "{",
    "}",
    "(",
    ")",
    "check todos",
    " ",
    "☀️",
    "☀",
    "📗 log",
    "🌙",
    "10 liegestütz",
    "das heutige highlight",
    "# 🌙 evening reflection",
    "todos",
    "[ ]",
    "[x]",
    "☀️ morning",
    "## 🌙 evening",
    "# 🌙 evening",
];

/// Case-insensitive stop-word set for one language.
///
/// Entries are compared after trimming and lowercasing, so multi-word
/// phrases match whole entities or chunks, never their parts.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Standard list for `language` merged with [`DOMAIN_STOP_WORDS`].
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        let list: Vec<String> = match language {
            Language::German => get(LANGUAGE::German),
            Language::English => get(LANGUAGE::English),
        };
        let mut stop_words = Self::default();
        stop_words.extend(list);
        stop_words.extend(DOMAIN_STOP_WORDS.iter().copied());
        stop_words
    }

    /// Add entries. Blank entries other than a single space are ignored.
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref();
            if word == " " {
                self.words.insert(" ".to_string());
                continue;
            }
            let key = Self::key(word);
            if !key.is_empty() {
                self.words.insert(key);
            }
        }
    }

    /// Add one entry per non-empty line of `path`. Lines starting with `#`
    /// followed by a space are treated as comments.
    ///
    /// # Errors
    /// Returns `StopWordsFile` when the file cannot be read.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize, TokenizerError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TokenizerError::StopWordsFile {
            path: path.to_path_buf(),
            source,
        })?;
        let before = self.words.len();
        self.extend(
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with("# ")),
        );
        let added = self.words.len() - before;
        tracing::debug!(path = %path.display(), added, "loaded extra stop words");
        Ok(added)
    }

    /// Whether `text` (word, entity or chunk) is a stop item.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        if text == " " {
            return self.words.contains(" ");
        }
        self.words.contains(&Self::key(text))
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn key(text: &str) -> String {
        text.trim().to_lowercase()
    }
}

//! Language classification with a safe fallback.

use serde::{Deserialize, Serialize};
use whatlang::{Detector, Lang};

/// Supported note languages. Each one maps to exactly one pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// German notes; the topic-tagging language.
    #[serde(rename = "de")]
    German,
    /// English notes; also used whenever detection fails.
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Language whose notes are eligible for topic tagging.
    pub const TARGET: Self = Self::German;
    /// Language assumed when detection is ambiguous or impossible.
    pub const FALLBACK: Self = Self::English;
    /// Every supported language, target first.
    pub const ALL: [Self; 2] = [Self::German, Self::English];

    /// ISO 639-1 code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::German => "de",
            Self::English => "en",
        }
    }

    /// Parse an ISO 639-1/639-3 code or English name.
    #[must_use]
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "de" | "deu" | "ger" | "german" => Some(Self::German),
            "en" | "eng" | "english" => Some(Self::English),
            _ => None,
        }
    }

    fn from_whatlang(lang: Lang) -> Option<Self> {
        match lang {
            Lang::Deu => Some(Self::German),
            Lang::Eng => Some(Self::English),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Maps raw text to one of the supported languages.
///
/// Implementations must not fail: anything they cannot decide is
/// reported as [`Language::FALLBACK`].
pub trait LanguageClassifier {
    /// Classify `text`.
    fn classify(&self, text: &str) -> Language;
}

/// Trigram detector restricted to the supported languages.
pub struct WhatlangClassifier {
    detector: Detector,
}

impl WhatlangClassifier {
    /// Build a detector over [`Language::ALL`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            detector: Detector::with_allowlist(vec![Lang::Deu, Lang::Eng]),
        }
    }
}

impl Default for WhatlangClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageClassifier for WhatlangClassifier {
    fn classify(&self, text: &str) -> Language {
        if text.trim().is_empty() {
            return Language::FALLBACK;
        }
        match self.detector.detect_lang(text).and_then(Language::from_whatlang) {
            Some(language) => language,
            None => {
                tracing::debug!(chars = text.chars().count(), "language detection failed, using fallback");
                Language::FALLBACK
            }
        }
    }
}

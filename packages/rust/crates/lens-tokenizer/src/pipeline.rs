//! Per-language pipelines and the tokenizer facade.

use std::path::PathBuf;

use rust_stemmers::{Algorithm, Stemmer};
use serde::Serialize;

use crate::error::TokenizerError;
use crate::language::{Language, LanguageClassifier, WhatlangClassifier};
use crate::normalize::{is_joiner_only, normalize_note_text};
use crate::segment::{Segment, SegmentKind, segment};
use crate::stopwords::StopWords;

/// Reduces an inflected word to its base form.
pub trait Lemmatizer {
    /// Base form of `word`, lowercased.
    fn lemma(&self, word: &str) -> String;
}

/// The three parallel streams produced for one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenStreams {
    /// Lemmatized content words.
    pub tokens: Vec<String>,
    /// Proper-name spans, surface form.
    pub entities: Vec<String>,
    /// Content phrases, surface form.
    pub noun_chunks: Vec<String>,
}

impl TokenStreams {
    /// Whether all three streams are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.entities.is_empty() && self.noun_chunks.is_empty()
    }

    /// Append another note's streams, preserving order.
    pub fn extend(&mut self, other: Self) {
        self.tokens.extend(other.tokens);
        self.entities.extend(other.entities);
        self.noun_chunks.extend(other.noun_chunks);
    }
}

/// Language decision plus streams for one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Detected language ([`Language::FALLBACK`] for empty text).
    pub language: Language,
    /// Extracted streams.
    pub streams: TokenStreams,
}

/// Stop words and stemmer for one language.
pub struct LanguagePipeline {
    language: Language,
    stop_words: StopWords,
    stemmer: Stemmer,
}

impl LanguagePipeline {
    /// Pipeline with the given stop-word set.
    #[must_use]
    pub fn new(language: Language, stop_words: StopWords) -> Self {
        let algorithm = match language {
            Language::German => Algorithm::German,
            Language::English => Algorithm::English,
        };
        Self {
            language,
            stop_words,
            stemmer: Stemmer::create(algorithm),
        }
    }

    /// Language served by this pipeline.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Stop-word set applied to every stream.
    #[must_use]
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Run on already-normalized text.
    #[must_use]
    pub fn run(&self, text: &str) -> TokenStreams {
        let segments = segment(text);
        TokenStreams {
            tokens: self.tokens(&segments),
            entities: self.entities(text, &segments),
            noun_chunks: self.noun_chunks(text, &segments),
        }
    }

    fn tokens(&self, segments: &[Segment<'_>]) -> Vec<String> {
        segments
            .iter()
            .filter(|seg| seg.kind == SegmentKind::Word && !self.stop_words.contains(seg.text))
            .map(|seg| self.lemma(seg.text))
            .filter(|lemma| !lemma.is_empty() && !is_joiner_only(lemma))
            .collect()
    }

    /// Capitalized runs that do not merely open a sentence, plus acronyms.
    /// German capitalizes every noun, so it needs two or more words.
    fn entities(&self, text: &str, segments: &[Segment<'_>]) -> Vec<String> {
        let mut out = Vec::new();
        let mut run: Vec<Segment<'_>> = Vec::new();
        let mut run_initial = false;
        let mut sentence_start = true;

        for seg in segments {
            match seg.kind {
                SegmentKind::Space => {}
                SegmentKind::Word if seg.is_capitalized() => {
                    if run.is_empty() {
                        run_initial = sentence_start;
                    }
                    run.push(*seg);
                    sentence_start = false;
                }
                _ => {
                    self.flush_entity(text, &run, run_initial, &mut out);
                    run.clear();
                    if seg.is_boundary() {
                        sentence_start = true;
                    } else if seg.kind != SegmentKind::Punct {
                        sentence_start = false;
                    }
                }
            }
        }
        self.flush_entity(text, &run, run_initial, &mut out);
        out
    }

    fn flush_entity(&self, text: &str, run: &[Segment<'_>], initial: bool, out: &mut Vec<String>) {
        let Some(first) = run.iter().position(|seg| !self.stop_words.contains(seg.text)) else {
            return;
        };
        let Some(last) = run.iter().rposition(|seg| !self.stop_words.contains(seg.text)) else {
            return;
        };
        let words = &run[first..=last];
        let initial = initial && first == 0;
        let single_acronym = words.len() == 1 && words[0].is_acronym();
        let accepted = match self.language {
            Language::German => words.len() >= 2 || single_acronym,
            Language::English => words.len() >= 2 || single_acronym || !initial,
        };
        if accepted {
            self.push_surface(&text[words[0].start..words[words.len() - 1].end()], out);
        }
    }

    /// Maximal runs of content words between stop words, punctuation and
    /// numerals. German chunks end at their last capitalized word (the noun).
    fn noun_chunks(&self, text: &str, segments: &[Segment<'_>]) -> Vec<String> {
        let mut out = Vec::new();
        let mut run: Vec<Segment<'_>> = Vec::new();
        for seg in segments {
            match seg.kind {
                SegmentKind::Space => {}
                SegmentKind::Word if !self.stop_words.contains(seg.text) => run.push(*seg),
                _ => {
                    self.flush_chunk(text, &run, &mut out);
                    run.clear();
                }
            }
        }
        self.flush_chunk(text, &run, &mut out);
        out
    }

    fn flush_chunk(&self, text: &str, run: &[Segment<'_>], out: &mut Vec<String>) {
        let end = match self.language {
            Language::German => run.iter().rposition(Segment::is_capitalized),
            Language::English => run.len().checked_sub(1),
        };
        let Some(end) = end else {
            return;
        };
        self.push_surface(&text[run[0].start..run[end].end()], out);
    }

    fn push_surface(&self, surface: &str, out: &mut Vec<String>) {
        let surface = surface.trim();
        if surface.is_empty() || is_joiner_only(surface) || self.stop_words.contains(surface) {
            return;
        }
        out.push(surface.to_string());
    }
}

impl Lemmatizer for LanguagePipeline {
    fn lemma(&self, word: &str) -> String {
        self.stemmer.stem(&word.to_lowercase()).into_owned()
    }
}

/// Stop-word configuration shared by both pipelines.
#[derive(Debug, Clone, Default)]
pub struct TokenizerConfig {
    /// Additional stop words for both languages.
    pub extra_stop_words: Vec<String>,
    /// File with one additional stop word per line.
    pub stop_words_file: Option<PathBuf>,
}

/// Two language pipelines behind one classifier.
pub struct Tokenizer {
    german: LanguagePipeline,
    english: LanguagePipeline,
    classifier: Box<dyn LanguageClassifier>,
}

impl Tokenizer {
    /// Build both pipelines with the default classifier.
    ///
    /// # Errors
    /// Returns `StopWordsFile` when the configured stop-word file is unreadable.
    pub fn new(config: &TokenizerConfig) -> Result<Self, TokenizerError> {
        let build = |language: Language| -> Result<LanguagePipeline, TokenizerError> {
            let mut stop_words = StopWords::for_language(language);
            stop_words.extend(&config.extra_stop_words);
            if let Some(path) = &config.stop_words_file {
                stop_words.extend_from_file(path)?;
            }
            Ok(LanguagePipeline::new(language, stop_words))
        };
        Ok(Self {
            german: build(Language::German)?,
            english: build(Language::English)?,
            classifier: Box::new(WhatlangClassifier::new()),
        })
    }

    /// Replace the language classifier.
    #[must_use]
    pub fn with_classifier<C: LanguageClassifier + 'static>(mut self, classifier: C) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Pipeline for `language`.
    #[must_use]
    pub fn pipeline(&self, language: Language) -> &LanguagePipeline {
        match language {
            Language::German => &self.german,
            Language::English => &self.english,
        }
    }

    /// Normalize `text` and run the pipeline for `language`.
    #[must_use]
    pub fn tokenize(&self, text: &str, language: Language) -> TokenStreams {
        if text.is_empty() {
            return TokenStreams::default();
        }
        self.pipeline(language).run(&normalize_note_text(text))
    }

    /// Normalize, detect the language and tokenize.
    ///
    /// Empty text yields empty streams without consulting the classifier.
    #[must_use]
    pub fn analyze(&self, text: &str) -> Analysis {
        if text.is_empty() {
            return Analysis {
                language: Language::FALLBACK,
                streams: TokenStreams::default(),
            };
        }
        let normalized = normalize_note_text(text);
        let language = self.classifier.classify(&normalized);
        Analysis {
            language,
            streams: self.pipeline(language).run(&normalized),
        }
    }
}

impl LanguageClassifier for Tokenizer {
    fn classify(&self, text: &str) -> Language {
        self.classifier.classify(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline(language: Language) -> LanguagePipeline {
        LanguagePipeline::new(language, StopWords::for_language(language))
    }

    #[test]
    fn test_english_sentence_initial_word_is_not_entity() {
        let streams = pipeline(Language::English).run("Yesterday I met Anna in Berlin.");
        assert_eq!(streams.entities, vec!["Anna", "Berlin"]);
    }

    #[test]
    fn test_german_needs_multiword_or_acronym() {
        let streams = pipeline(Language::German).run("Heute war Anna Schmidt bei der NASA im Garten.");
        assert_eq!(streams.entities, vec!["Anna Schmidt", "NASA"]);
    }

    #[test]
    fn test_german_chunks_end_at_noun() {
        let streams = pipeline(Language::German).run("der grüne Apfel reift");
        assert_eq!(streams.noun_chunks, vec!["grüne Apfel"]);
    }
}

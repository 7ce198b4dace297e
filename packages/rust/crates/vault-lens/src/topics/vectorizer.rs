//! Bag-of-words document-term counts with document-frequency pruning.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use lens_tokenizer::StopWords;
use regex::Regex;

use super::error::TopicModelError;
use crate::patterns::compile_regex;

static TERM_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?u)\b\w\w+\b"));

/// Sparse document-term count matrix over a sorted vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTermMatrix {
    vocabulary: Vec<String>,
    rows: Vec<Vec<(usize, u32)>>,
}

impl DocumentTermMatrix {
    /// Build from a vocabulary and per-document `(term index, count)` rows.
    #[must_use]
    pub fn new(vocabulary: Vec<String>, rows: Vec<Vec<(usize, u32)>>) -> Self {
        Self { vocabulary, rows }
    }

    /// Terms in column order (alphabetical when built by [`CountVectorizer`]).
    #[must_use]
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Number of documents.
    #[must_use]
    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    /// Number of vocabulary terms.
    #[must_use]
    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Non-zero counts of document `doc`, sorted by term index.
    #[must_use]
    pub fn row(&self, doc: usize) -> &[(usize, u32)] {
        self.rows.get(doc).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Term counter with stop words and document-frequency bounds.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    /// A term must occur in at least this many documents.
    pub min_df: usize,
    /// A term may occur in at most this fraction of documents.
    pub max_df: f64,
    stop_words: StopWords,
}

impl CountVectorizer {
    /// Default bounds: at least 3 documents, at most 75% of them.
    #[must_use]
    pub fn new(stop_words: StopWords) -> Self {
        Self {
            min_df: 3,
            max_df: 0.75,
            stop_words,
        }
    }

    /// Override both document-frequency bounds.
    #[must_use]
    pub fn with_document_frequency(mut self, min_df: usize, max_df: f64) -> Self {
        self.min_df = min_df;
        self.max_df = max_df;
        self
    }

    /// Lowercased terms of `text` that are not stop words.
    #[must_use]
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TERM_REGEX
            .find_iter(&lowered)
            .map(|term| term.as_str())
            .filter(|term| !self.stop_words.contains(term))
            .map(str::to_string)
            .collect()
    }

    /// Learn the vocabulary from `documents` and count it.
    ///
    /// # Errors
    /// `EmptyCorpus`, `InvalidDocumentFrequency` or `EmptyVocabulary`.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<DocumentTermMatrix, TopicModelError> {
        let n_docs = documents.len();
        if n_docs == 0 {
            return Err(TopicModelError::EmptyCorpus);
        }
        let max_count = self.max_document_count(n_docs)?;

        let mut counts: Vec<HashMap<String, u32>> = Vec::with_capacity(n_docs);
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for document in documents {
            let mut doc_counts: HashMap<String, u32> = HashMap::new();
            for term in self.analyze(document.as_ref()) {
                *doc_counts.entry(term).or_insert(0) += 1;
            }
            for term in doc_counts.keys() {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            counts.push(doc_counts);
        }

        let vocabulary: Vec<String> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= self.min_df && *df <= max_count)
            .map(|(term, _)| term)
            .collect();
        if vocabulary.is_empty() {
            return Err(TopicModelError::EmptyVocabulary {
                documents: n_docs,
                min_df: self.min_df,
                max_df: self.max_df,
            });
        }

        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(position, term)| (term.as_str(), position))
            .collect();
        let rows = counts
            .iter()
            .map(|doc_counts| {
                let mut row: Vec<(usize, u32)> = doc_counts
                    .iter()
                    .filter_map(|(term, count)| index.get(term.as_str()).map(|&col| (col, *count)))
                    .collect();
                row.sort_unstable_by_key(|&(col, _)| col);
                row
            })
            .collect();

        tracing::debug!(documents = n_docs, terms = vocabulary.len(), "vocabulary built");
        Ok(DocumentTermMatrix::new(vocabulary, rows))
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn max_document_count(&self, n_docs: usize) -> Result<usize, TopicModelError> {
        let invalid = || TopicModelError::InvalidDocumentFrequency {
            min_df: self.min_df,
            max_df: self.max_df,
            documents: n_docs,
        };
        if self.min_df == 0 || !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(invalid());
        }
        let max_count = (self.max_df * n_docs as f64).floor() as usize;
        if max_count < self.min_df {
            return Err(invalid());
        }
        Ok(max_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer() -> CountVectorizer {
        CountVectorizer::new(StopWords::default()).with_document_frequency(1, 1.0)
    }

    #[test]
    fn test_analyze_lowercases_and_skips_single_chars() {
        let terms = vectorizer().analyze("Ein Baum, a B-Tree und Über");
        assert_eq!(terms, vec!["ein", "baum", "tree", "und", "über"]);
    }

    #[test]
    fn test_vocabulary_is_sorted() -> Result<(), TopicModelError> {
        let dtm = vectorizer().fit_transform(&["zebra apfel", "mango apfel"])?;
        assert_eq!(dtm.vocabulary(), ["apfel", "mango", "zebra"]);
        assert_eq!(dtm.row(0), [(0, 1), (2, 1)]);
        Ok(())
    }
}

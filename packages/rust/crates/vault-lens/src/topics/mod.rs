//! Topic discovery over one language partition of the vault.
//!
//! Count vectors with document-frequency pruning feed a seeded LDA model;
//! each topic is labeled with its heaviest terms and every document gets
//! its most probable topic.

mod error;
mod lda;
mod vectorizer;

use std::collections::HashSet;
use std::path::PathBuf;

use lens_tokenizer::{Lemmatizer, StopWords};
use serde::Serialize;

use crate::vault::DocumentSet;

pub use error::TopicModelError;
pub use lda::{LdaConfig, LdaModel};
pub use vectorizer::{CountVectorizer, DocumentTermMatrix};

/// Vectorizer and sampler settings for one fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicModelConfig {
    /// Number of topics `K`.
    pub num_topics: usize,
    /// Label terms per topic.
    pub terms_per_topic: usize,
    /// Minimum document count per term.
    pub min_df: usize,
    /// Maximum document fraction per term.
    pub max_df: f64,
    /// Gibbs sweeps.
    pub iterations: usize,
    /// RNG seed.
    pub seed: u64,
}

impl Default for TopicModelConfig {
    fn default() -> Self {
        let lda = LdaConfig::default();
        Self {
            num_topics: lda.num_topics,
            terms_per_topic: 7,
            min_df: 3,
            max_df: 0.75,
            iterations: lda.iterations,
            seed: lda.seed,
        }
    }
}

impl TopicModelConfig {
    fn lda(&self) -> LdaConfig {
        LdaConfig {
            num_topics: self.num_topics,
            iterations: self.iterations,
            seed: self.seed,
            alpha: None,
            beta: None,
        }
    }
}

/// One discovered topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topic {
    /// Topic index `0..K`.
    pub index: usize,
    /// Heaviest vocabulary terms, heaviest first.
    pub terms: Vec<String>,
    /// Lemmas of `terms`, deduplicated, in weight order.
    pub labels: Vec<String>,
}

/// A document's assigned topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicAssignment {
    /// Note identifier.
    pub note_id: String,
    /// Note location.
    pub path: PathBuf,
    /// Assigned topic index.
    pub topic: usize,
}

/// Result of [`fit_topics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicModelOutput {
    /// All `K` topics.
    pub topics: Vec<Topic>,
    /// One entry per document, in document order.
    pub assignments: Vec<TopicAssignment>,
}

impl TopicModelOutput {
    /// Labels of the topic assigned to document `doc`.
    #[must_use]
    pub fn labels_for(&self, doc: usize) -> &[String] {
        self.assignments
            .get(doc)
            .and_then(|assignment| self.topics.get(assignment.topic))
            .map(|topic| topic.labels.as_slice())
            .unwrap_or_default()
    }
}

/// Fit `config.num_topics` topics to `documents`.
///
/// # Errors
/// Any [`TopicModelError`]; callers must not modify notes when this fails.
pub fn fit_topics(
    documents: &DocumentSet,
    config: &TopicModelConfig,
    stop_words: &StopWords,
    lemmatizer: &dyn Lemmatizer,
) -> Result<TopicModelOutput, TopicModelError> {
    let vectorizer = CountVectorizer::new(stop_words.clone())
        .with_document_frequency(config.min_df, config.max_df);
    let texts = documents.texts();
    let dtm = vectorizer.fit_transform(texts.as_slice())?;
    let model = LdaModel::fit(&dtm, &config.lda())?;

    let vocabulary = dtm.vocabulary();
    let topics: Vec<Topic> = model
        .top_terms(config.terms_per_topic)
        .into_iter()
        .enumerate()
        .map(|(index, columns)| {
            let terms: Vec<String> = columns.iter().map(|&col| vocabulary[col].clone()).collect();
            let labels = label_terms(&terms, lemmatizer);
            Topic {
                index,
                terms,
                labels,
            }
        })
        .collect();

    let assignments = model
        .assign()
        .into_iter()
        .zip(&documents.documents)
        .map(|(topic, note)| TopicAssignment {
            note_id: note.id.clone(),
            path: note.path.clone(),
            topic,
        })
        .collect();

    tracing::info!(
        set = %documents.name,
        documents = documents.len(),
        vocabulary = vocabulary.len(),
        topics = topics.len(),
        "topics fitted"
    );
    Ok(TopicModelOutput {
        topics,
        assignments,
    })
}

/// Lemmas of `terms`, deduplicated, in the terms' weight order.
fn label_terms(terms: &[String], lemmatizer: &dyn Lemmatizer) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .iter()
        .map(|term| lemmatizer.lemma(term))
        .filter(|lemma| seen.insert(lemma.clone()))
        .collect()
}

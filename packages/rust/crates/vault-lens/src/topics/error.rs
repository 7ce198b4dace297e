use thiserror::Error;

/// Data-insufficiency and parameter errors of the topic model.
///
/// Any of these aborts a tagging run before a note is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopicModelError {
    /// No documents to fit.
    #[error("no documents to fit a topic model on")]
    EmptyCorpus,

    /// Every term was pruned by stop words or document-frequency bounds.
    #[error("vocabulary is empty after filtering {documents} documents (min_df={min_df}, max_df={max_df})")]
    EmptyVocabulary {
        /// Documents in the corpus.
        documents: usize,
        /// Minimum document count.
        min_df: usize,
        /// Maximum document fraction.
        max_df: f64,
    },

    /// Bounds that cannot select any term.
    #[error("invalid document-frequency bounds: min_df={min_df}, max_df={max_df} over {documents} documents")]
    InvalidDocumentFrequency {
        /// Minimum document count.
        min_df: usize,
        /// Maximum document fraction.
        max_df: f64,
        /// Documents in the corpus.
        documents: usize,
    },

    /// Fewer vocabulary terms than requested topics.
    #[error("vocabulary has {terms} terms, fewer than the {topics} requested topics")]
    TooFewTerms {
        /// Vocabulary size.
        terms: usize,
        /// Requested topics.
        topics: usize,
    },

    /// Topic count of zero.
    #[error("topic count must be at least 1")]
    InvalidTopicCount,
}

//! Integration tests for the topic model.

use std::path::PathBuf;

use lens_tokenizer::{Language, Lemmatizer, StopWords};
use vault_lens::topics::{CountVectorizer, LdaConfig, LdaModel};
use vault_lens::{DocumentSet, Note, TopicModelConfig, TopicModelError, fit_topics};

struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemma(&self, word: &str) -> String {
        word.to_string()
    }
}

fn document_set(texts: &[&str]) -> DocumentSet {
    let mut set = DocumentSet::new("target-language");
    for (index, text) in texts.iter().enumerate() {
        set.documents.push(Note {
            id: format!("doc{index}"),
            path: PathBuf::from(format!("doc{index}.md")),
            content: (*text).to_string(),
            language: Language::German,
        });
    }
    set
}

fn disjoint_corpus() -> DocumentSet {
    let a = "apfel birne kirsche pflaume ";
    let b = "motor getriebe kolben zylinder ";
    document_set(&[&a.repeat(3), &a.repeat(3), &b.repeat(3), &b.repeat(3)])
}

fn small_config() -> TopicModelConfig {
    TopicModelConfig {
        num_topics: 2,
        terms_per_topic: 4,
        min_df: 2,
        ..TopicModelConfig::default()
    }
}

#[test]
fn test_disjoint_vocabularies_get_separate_topics() -> Result<(), Box<dyn std::error::Error>> {
    let output = fit_topics(
        &disjoint_corpus(),
        &small_config(),
        &StopWords::default(),
        &IdentityLemmatizer,
    )?;
    let topics: Vec<usize> = output.assignments.iter().map(|a| a.topic).collect();
    assert_eq!(topics[0], topics[1]);
    assert_eq!(topics[2], topics[3]);
    assert_ne!(topics[0], topics[2]);

    let mut fruit = output.topics[topics[0]].labels.clone();
    fruit.sort();
    assert_eq!(fruit, vec!["apfel", "birne", "kirsche", "pflaume"]);
    Ok(())
}

/// Drops a plural `s` and upper-cases, so merged and rewritten labels are visible.
struct SuffixLemmatizer;

impl Lemmatizer for SuffixLemmatizer {
    fn lemma(&self, word: &str) -> String {
        word.trim_end_matches('s').to_uppercase()
    }
}

#[test]
fn test_labels_are_lemmas_in_weight_order() -> Result<(), Box<dyn std::error::Error>> {
    // Counts: gartens 4, baum 3, garten 2.
    let corpus = document_set(&[
        "gartens gartens gartens garten baum baum",
        "gartens garten baum",
    ]);
    let config = TopicModelConfig {
        num_topics: 1,
        terms_per_topic: 3,
        min_df: 1,
        max_df: 1.0,
        ..TopicModelConfig::default()
    };
    let output = fit_topics(&corpus, &config, &StopWords::default(), &SuffixLemmatizer)?;
    assert_eq!(output.topics[0].terms, vec!["gartens", "baum", "garten"]);
    assert_eq!(output.topics[0].labels, vec!["GARTEN", "BAUM"]);
    assert_eq!(output.labels_for(1), ["GARTEN".to_string(), "BAUM".to_string()]);
    Ok(())
}

#[test]
fn test_fit_is_reproducible() -> Result<(), Box<dyn std::error::Error>> {
    let corpus = disjoint_corpus();
    let first = fit_topics(&corpus, &small_config(), &StopWords::default(), &IdentityLemmatizer)?;
    let second = fit_topics(&corpus, &small_config(), &StopWords::default(), &IdentityLemmatizer)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_document_frequency_bounds_prune_terms() -> Result<(), Box<dyn std::error::Error>> {
    // "gemeinsam" is in every document (above 75%), "selten" in one (below 3).
    let docs = [
        "gemeinsam alpha beta selten",
        "gemeinsam alpha gamma",
        "gemeinsam beta gamma",
        "gemeinsam alpha beta gamma",
    ];
    let dtm = CountVectorizer::new(StopWords::default()).fit_transform(&docs)?;
    assert_eq!(dtm.vocabulary(), ["alpha", "beta", "gamma"]);
    Ok(())
}

#[test]
fn test_stop_words_never_enter_vocabulary() -> Result<(), Box<dyn std::error::Error>> {
    let docs = ["und rose", "und rose", "und rose tulpe", "tulpe"];
    let dtm = CountVectorizer::new(StopWords::for_language(Language::German))
        .with_document_frequency(1, 1.0)
        .fit_transform(&docs)?;
    assert!(!dtm.vocabulary().iter().any(|term| term == "und"));
    Ok(())
}

#[test]
fn test_empty_vocabulary_is_data_insufficiency() {
    let corpus = document_set(&["eins", "zwei", "drei", "vier"]);
    let result = fit_topics(
        &corpus,
        &small_config(),
        &StopWords::default(),
        &IdentityLemmatizer,
    );
    assert!(matches!(result, Err(TopicModelError::EmptyVocabulary { .. })));
}

#[test]
fn test_too_few_documents_for_bounds() {
    // 75% of 3 documents is below the minimum of 3.
    let corpus = document_set(&["eins zwei", "eins zwei", "eins zwei"]);
    let result = fit_topics(
        &corpus,
        &TopicModelConfig::default(),
        &StopWords::default(),
        &IdentityLemmatizer,
    );
    assert_eq!(
        result,
        Err(TopicModelError::InvalidDocumentFrequency {
            min_df: 3,
            max_df: 0.75,
            documents: 3,
        })
    );
}

#[test]
fn test_empty_corpus_and_too_few_terms() {
    let empty = DocumentSet::new("target-language");
    assert_eq!(
        fit_topics(&empty, &small_config(), &StopWords::default(), &IdentityLemmatizer),
        Err(TopicModelError::EmptyCorpus)
    );

    let corpus = disjoint_corpus();
    let config = TopicModelConfig {
        num_topics: 20,
        ..small_config()
    };
    assert_eq!(
        fit_topics(&corpus, &config, &StopWords::default(), &IdentityLemmatizer),
        Err(TopicModelError::TooFewTerms { terms: 8, topics: 20 })
    );
}

#[test]
fn test_top_terms_are_heaviest_first() -> Result<(), Box<dyn std::error::Error>> {
    let docs = ["aa aa aa bb", "aa aa bb cc"];
    let dtm = CountVectorizer::new(StopWords::default())
        .with_document_frequency(1, 1.0)
        .fit_transform(&docs)?;
    let model = LdaModel::fit(
        &dtm,
        &LdaConfig {
            num_topics: 1,
            iterations: 10,
            ..LdaConfig::default()
        },
    )?;
    assert_eq!(model.top_terms(2), vec![vec![0, 1]]);
    assert_eq!(model.assign(), vec![0, 0]);
    Ok(())
}

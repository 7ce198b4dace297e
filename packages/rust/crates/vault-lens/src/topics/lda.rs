//! Latent Dirichlet allocation fitted by collapsed Gibbs sampling.
//!
//! The sampler is driven by a seeded `StdRng`, so the same matrix and
//! configuration always produce the same model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::error::TopicModelError;
use super::vectorizer::DocumentTermMatrix;

/// Sampler settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LdaConfig {
    /// Number of topics `K`.
    pub num_topics: usize,
    /// Full sweeps over every token.
    pub iterations: usize,
    /// RNG seed.
    pub seed: u64,
    /// Document-topic prior; `1/K` when unset.
    pub alpha: Option<f64>,
    /// Topic-word prior; `1/K` when unset.
    pub beta: Option<f64>,
}

impl Default for LdaConfig {
    fn default() -> Self {
        Self {
            num_topics: 20,
            iterations: 500,
            seed: 42,
            alpha: None,
            beta: None,
        }
    }
}

/// Fitted topic-word weights and document-topic distributions.
#[derive(Debug, Clone)]
pub struct LdaModel {
    topic_word: Vec<Vec<f64>>,
    doc_topic: Vec<Vec<f64>>,
}

struct Counts {
    doc_topic: Vec<Vec<u32>>,
    topic_word: Vec<Vec<u32>>,
    topic_total: Vec<u32>,
}

impl Counts {
    fn add(&mut self, doc: usize, word: usize, topic: usize) {
        self.doc_topic[doc][topic] += 1;
        self.topic_word[topic][word] += 1;
        self.topic_total[topic] += 1;
    }

    fn remove(&mut self, doc: usize, word: usize, topic: usize) {
        self.doc_topic[doc][topic] -= 1;
        self.topic_word[topic][word] -= 1;
        self.topic_total[topic] -= 1;
    }
}

impl LdaModel {
    /// Fit `config.num_topics` topics to `dtm`.
    ///
    /// # Errors
    /// `InvalidTopicCount` for zero topics, `EmptyCorpus` for a matrix without
    /// documents, `TooFewTerms` when the vocabulary is smaller than `K`.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(dtm: &DocumentTermMatrix, config: &LdaConfig) -> Result<Self, TopicModelError> {
        let k = config.num_topics;
        if k == 0 {
            return Err(TopicModelError::InvalidTopicCount);
        }
        if dtm.n_docs() == 0 {
            return Err(TopicModelError::EmptyCorpus);
        }
        let v = dtm.n_terms();
        if v < k {
            return Err(TopicModelError::TooFewTerms { terms: v, topics: k });
        }
        let alpha = config.alpha.unwrap_or(1.0 / k as f64);
        let beta = config.beta.unwrap_or(1.0 / k as f64);
        let v_beta = v as f64 * beta;

        // One entry per token occurrence.
        let words: Vec<Vec<usize>> = (0..dtm.n_docs())
            .map(|doc| {
                dtm.row(doc)
                    .iter()
                    .flat_map(|&(word, count)| std::iter::repeat_n(word, count as usize))
                    .collect()
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut counts = Counts {
            doc_topic: vec![vec![0; k]; words.len()],
            topic_word: vec![vec![0; v]; k],
            topic_total: vec![0; k],
        };
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(words.len());
        for (doc, doc_words) in words.iter().enumerate() {
            let mut doc_assignments = Vec::with_capacity(doc_words.len());
            for &word in doc_words {
                let topic = rng.gen_range(0..k);
                counts.add(doc, word, topic);
                doc_assignments.push(topic);
            }
            assignments.push(doc_assignments);
        }

        let mut weights = vec![0.0_f64; k];
        for _ in 0..config.iterations {
            for (doc, doc_words) in words.iter().enumerate() {
                for (position, &word) in doc_words.iter().enumerate() {
                    counts.remove(doc, word, assignments[doc][position]);
                    let mut total = 0.0;
                    for (topic, weight) in weights.iter_mut().enumerate() {
                        *weight = (f64::from(counts.doc_topic[doc][topic]) + alpha)
                            * (f64::from(counts.topic_word[topic][word]) + beta)
                            / (f64::from(counts.topic_total[topic]) + v_beta);
                        total += *weight;
                    }
                    let topic = sample(&weights, rng.gen_range(0.0..total));
                    counts.add(doc, word, topic);
                    assignments[doc][position] = topic;
                }
            }
        }

        let topic_word = counts
            .topic_word
            .iter()
            .map(|row| row.iter().map(|&n| f64::from(n) + beta).collect())
            .collect();
        let doc_topic = counts
            .doc_topic
            .iter()
            .zip(&words)
            .map(|(row, doc_words)| {
                let denominator = doc_words.len() as f64 + k as f64 * alpha;
                row.iter()
                    .map(|&n| (f64::from(n) + alpha) / denominator)
                    .collect()
            })
            .collect();

        tracing::debug!(topics = k, terms = v, iterations = config.iterations, "topic model fitted");
        Ok(Self {
            topic_word,
            doc_topic,
        })
    }

    /// Number of topics.
    #[must_use]
    pub fn num_topics(&self) -> usize {
        self.topic_word.len()
    }

    /// Unnormalized topic-word weights, `K x V`.
    #[must_use]
    pub fn topic_word(&self) -> &[Vec<f64>] {
        &self.topic_word
    }

    /// Per-document topic distributions, `D x K`, rows sum to 1.
    #[must_use]
    pub fn doc_topic(&self) -> &[Vec<f64>] {
        &self.doc_topic
    }

    /// Most probable topic per document; the lowest index wins ties.
    #[must_use]
    pub fn assign(&self) -> Vec<usize> {
        self.doc_topic.iter().map(|row| argmax(row)).collect()
    }

    /// Vocabulary indices of each topic's `n` heaviest terms, heaviest first.
    #[must_use]
    pub fn top_terms(&self, n: usize) -> Vec<Vec<usize>> {
        self.topic_word
            .iter()
            .map(|row| {
                let mut order: Vec<usize> = (0..row.len()).collect();
                order.sort_by(|&a, &b| row[b].total_cmp(&row[a]).then(a.cmp(&b)));
                order.truncate(n);
                order
            })
            .collect()
    }
}

fn sample(weights: &[f64], mut target: f64) -> usize {
    for (topic, weight) in weights.iter().enumerate() {
        if target < *weight {
            return topic;
        }
        target -= weight;
    }
    weights.len().saturating_sub(1)
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = index;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), 1);
    }

    #[test]
    fn test_sample_walks_cumulative_weights() {
        assert_eq!(sample(&[1.0, 2.0], 0.5), 0);
        assert_eq!(sample(&[1.0, 2.0], 1.5), 1);
        assert_eq!(sample(&[1.0, 2.0], 3.0), 1);
    }

    #[test]
    fn test_too_few_terms() {
        let dtm = DocumentTermMatrix::new(vec!["a".into()], vec![vec![(0, 2)]]);
        let config = LdaConfig {
            num_topics: 2,
            ..LdaConfig::default()
        };
        assert_eq!(
            LdaModel::fit(&dtm, &config).err(),
            Some(TopicModelError::TooFewTerms { terms: 1, topics: 2 })
        );
    }

    #[test]
    fn test_fit_is_deterministic() -> Result<(), TopicModelError> {
        let dtm = DocumentTermMatrix::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![(0, 3), (1, 1)], vec![(2, 4)], vec![(0, 1), (2, 2)]],
        );
        let config = LdaConfig {
            num_topics: 2,
            iterations: 50,
            ..LdaConfig::default()
        };
        let first = LdaModel::fit(&dtm, &config)?;
        let second = LdaModel::fit(&dtm, &config)?;
        assert_eq!(first.doc_topic(), second.doc_topic());
        for row in first.doc_topic() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
        Ok(())
    }
}

//! Whole-vault runs: word statistics, link usage, languages, topic tagging.

use std::path::{Path, PathBuf};

use lens_io::{BackupArchive, BackupOptions, create_backup};
use lens_tokenizer::{Language, RankedList, TokenStreams, Tokenizer, rank};
use serde::Serialize;

use crate::error::{Result, VaultLensError};
use crate::frontmatter::{WriteOutcome, apply_tags, topic_tags};
use crate::link_graph::build_link_graph;
use crate::topics::{Topic, TopicModelConfig, fit_topics};
use crate::vault::{TopicScope, Vault};

/// Ranked token, entity and noun-chunk frequencies over the whole vault.
#[derive(Debug, Clone, Serialize)]
pub struct WordCountReport {
    /// Notes analyzed.
    pub notes: usize,
    /// Lemmatized tokens.
    pub tokens: RankedList,
    /// Named entities.
    pub entities: RankedList,
    /// Noun chunks.
    pub noun_chunks: RankedList,
}

/// Tokenize every note in its detected language and rank the streams.
///
/// # Errors
/// Fails on the first unreadable note.
pub fn word_count(vault: &Vault, tokenizer: &Tokenizer) -> Result<WordCountReport> {
    let notes = vault.read_notes(tokenizer)?;
    let mut corpus = TokenStreams::default();
    for note in &notes {
        corpus.extend(tokenizer.tokenize(&note.content, note.language));
    }
    tracing::info!(
        notes = notes.len(),
        tokens = corpus.tokens.len(),
        entities = corpus.entities.len(),
        noun_chunks = corpus.noun_chunks.len(),
        "word count finished"
    );
    Ok(WordCountReport {
        notes: notes.len(),
        tokens: rank(&corpus.tokens),
        entities: rank(&corpus.entities),
        noun_chunks: rank(&corpus.noun_chunks),
    })
}

/// Ranked existing and dangling link targets.
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    /// Notes in the vault.
    pub notes: usize,
    /// Targets that resolve to a note.
    pub existing: RankedList,
    /// Dangling targets.
    pub not_existing: RankedList,
    /// Date and person references skipped.
    pub discarded: usize,
}

/// Build the link graph and rank both sides.
///
/// # Errors
/// Fails on the first unreadable note.
pub fn link_report(vault: &Vault) -> Result<LinkReport> {
    let graph = build_link_graph(vault)?;
    let ranked = graph.ranked();
    Ok(LinkReport {
        notes: vault.paths().len(),
        existing: ranked.existing,
        not_existing: ranked.not_existing,
        discarded: graph.discarded,
    })
}

/// Note count for one language.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageCount {
    /// Language.
    pub language: Language,
    /// Notes detected in it.
    pub notes: usize,
}

/// Per-language note counts.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageReport {
    /// Notes in the vault.
    pub notes: usize,
    /// One entry per supported language, target first.
    pub languages: Vec<LanguageCount>,
}

/// Classify every note and count per language.
///
/// # Errors
/// Fails on the first unreadable note.
pub fn language_report(vault: &Vault, tokenizer: &Tokenizer) -> Result<LanguageReport> {
    let notes = vault.read_notes(tokenizer)?;
    let languages = Language::ALL
        .iter()
        .map(|&language| LanguageCount {
            language,
            notes: notes.iter().filter(|note| note.language == language).count(),
        })
        .collect();
    Ok(LanguageReport {
        notes: notes.len(),
        languages,
    })
}

/// Settings of a topic tagging run.
#[derive(Debug, Clone, Serialize)]
pub struct TopicRunConfig {
    /// Topic-eligible notes.
    pub scope: TopicScope,
    /// Model settings.
    pub model: TopicModelConfig,
    /// Tag namespace.
    pub tag_namespace: String,
    /// Plan only: no backup, no writes.
    pub dry_run: bool,
}

/// Planned or applied tags for one note.
#[derive(Debug, Clone, Serialize)]
pub struct NoteTagging {
    /// Note identifier.
    pub note_id: String,
    /// Note location.
    pub path: PathBuf,
    /// Assigned topic.
    pub topic: usize,
    /// Tags written (or planned).
    pub tags: Vec<String>,
    /// Writer outcome, `None` in dry runs.
    pub outcome: Option<WriteOutcome>,
}

/// Result of [`tag_topics`].
#[derive(Debug, Clone, Serialize)]
pub struct TopicTaggingReport {
    /// Language of the tagged partition.
    pub language: Language,
    /// Documents in the tagged partition.
    pub documents: usize,
    /// Topic-eligible notes in other languages, left untouched.
    pub skipped: usize,
    /// Discovered topics.
    pub topics: Vec<Topic>,
    /// Per-note tags in document order.
    pub notes: Vec<NoteTagging>,
    /// Backup taken before the first write.
    pub backup: Option<BackupArchive>,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// Fit topics on the target-language notes and write their tags.
///
/// Order: collect documents, fit (abort without changes on failure), check
/// that every note to be tagged decodes as UTF-8, back up the vault into
/// `backup_dir`, then rewrite notes one by one. A dry run skips the backup
/// and the writes.
///
/// # Errors
/// `TopicModel` before any change, `Io` before any change when a note to be
/// tagged is not valid UTF-8, `BackupRequired`/`Io` when the backup cannot be
/// taken, `Frontmatter` when a write fails part way.
pub fn tag_topics(
    vault: &Vault,
    config: &TopicRunConfig,
    tokenizer: &Tokenizer,
    backup_dir: Option<&Path>,
) -> Result<TopicTaggingReport> {
    let corpus = vault.topic_documents(&config.scope, tokenizer)?;
    if !corpus.fallback.is_empty() {
        tracing::warn!(
            skipped = corpus.fallback.len(),
            language = %Language::FALLBACK,
            "topic-eligible notes outside the target language are left untagged"
        );
    }
    let pipeline = tokenizer.pipeline(Language::TARGET);
    let output = fit_topics(&corpus.target, &config.model, pipeline.stop_words(), pipeline)?;

    let mut notes: Vec<NoteTagging> = output
        .assignments
        .iter()
        .enumerate()
        .map(|(doc, assignment)| NoteTagging {
            note_id: assignment.note_id.clone(),
            path: assignment.path.clone(),
            topic: assignment.topic,
            tags: topic_tags(output.labels_for(doc), &config.tag_namespace),
            outcome: None,
        })
        .collect();

    let backup = if config.dry_run {
        tracing::info!(notes = notes.len(), "dry run, no notes modified");
        None
    } else {
        let backup_dir = backup_dir.ok_or(VaultLensError::BackupRequired)?;
        // Every note must be rewritable before the first one is touched.
        for note in &notes {
            vault.read_strict(&note.path)?;
        }
        let archive = create_backup(vault.root(), backup_dir, &BackupOptions::default())?;
        for note in &mut notes {
            note.outcome = Some(apply_tags(&note.path, &note.tags, vault.max_note_bytes())?);
        }
        tracing::info!(notes = notes.len(), archive = %archive.path.display(), "notes tagged");
        Some(archive)
    };

    Ok(TopicTaggingReport {
        language: Language::TARGET,
        documents: corpus.target.len(),
        skipped: corpus.fallback.len(),
        topics: output.topics,
        notes,
        backup,
        dry_run: config.dry_run,
    })
}

//! Integration tests for whole-vault runs.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

use lens_tokenizer::{Language, LanguageClassifier, Tokenizer, TokenizerConfig};
use vault_lens::pipeline::TopicRunConfig;
use vault_lens::{
    TopicModelConfig, TopicScope, Vault, VaultLensError, VaultOptions, language_report, tag_topics,
    word_count,
};

const EVERGREEN: &str = "🌳 Evergreen Notes";

fn write_file(path: &Path, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// German when the text contains " und ", English otherwise.
struct MarkerClassifier;

impl LanguageClassifier for MarkerClassifier {
    fn classify(&self, text: &str) -> Language {
        if text.contains(" und ") {
            Language::German
        } else {
            Language::English
        }
    }
}

fn tokenizer() -> Result<Tokenizer, Box<dyn std::error::Error>> {
    Ok(Tokenizer::new(&TokenizerConfig::default())?.with_classifier(MarkerClassifier))
}

fn topic_vault(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let fruit = "Apfel und Birne und Kirsche und Pflaume. ".repeat(3);
    let engine = "Motor und Getriebe und Kolben und Zylinder. ".repeat(3);
    let evergreen = root.join(EVERGREEN);
    write_file(&evergreen.join("Obst eins.md"), &fruit)?;
    write_file(&evergreen.join("Obst zwei.md"), &fruit)?;
    write_file(&evergreen.join("Technik/Motor eins.md"), &engine)?;
    write_file(&evergreen.join("Technik/Motor zwei.md"), &engine)?;
    write_file(&evergreen.join("English.md"), "An english note about gardens.\n")?;
    write_file(&evergreen.join("✍️ Journal/Tag.md"), &fruit)?;
    write_file(&root.join("Inbox.md"), &fruit)?;
    Ok(())
}

fn run_config(dry_run: bool) -> TopicRunConfig {
    TopicRunConfig {
        scope: TopicScope::default(),
        model: TopicModelConfig {
            num_topics: 2,
            terms_per_topic: 4,
            min_df: 2,
            ..TopicModelConfig::default()
        },
        tag_namespace: "topic".to_string(),
        dry_run,
    }
}

fn archived(archive: &Path, name: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut zip = zip::ZipArchive::new(File::open(archive)?)?;
    let mut entry = zip.by_name(name)?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

#[test]
fn test_backup_is_taken_before_tags_are_written() -> Result<(), Box<dyn std::error::Error>> {
    let vault_dir = TempDir::new()?;
    let backup_dir = TempDir::new()?;
    topic_vault(vault_dir.path())?;
    let note = vault_dir.path().join(EVERGREEN).join("Obst eins.md");
    let before = fs::read_to_string(&note)?;

    let vault = Vault::open(vault_dir.path(), VaultOptions::default())?;
    let report = tag_topics(&vault, &run_config(false), &tokenizer()?, Some(backup_dir.path()))?;

    assert_eq!(report.language, Language::German);
    assert_eq!(report.documents, 4);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.notes.len(), 4);
    assert!(!report.dry_run);

    let backup = report.backup.ok_or("missing backup")?;
    assert!(backup.path.starts_with(backup_dir.path()));
    let archived_note = archived(&backup.path, &format!("{EVERGREEN}/Obst eins.md"))?;
    assert_eq!(archived_note, before);

    let after = fs::read_to_string(&note)?;
    assert!(after.starts_with("---\ntags: [\"#topic/"));
    assert!(after.ends_with(&before));
    Ok(())
}

#[test]
fn test_only_target_language_scope_notes_are_tagged() -> Result<(), Box<dyn std::error::Error>> {
    let vault_dir = TempDir::new()?;
    let backup_dir = TempDir::new()?;
    topic_vault(vault_dir.path())?;
    let vault = Vault::open(vault_dir.path(), VaultOptions::default())?;
    let report = tag_topics(&vault, &run_config(false), &tokenizer()?, Some(backup_dir.path()))?;

    let tagged: Vec<&str> = report.notes.iter().map(|n| n.note_id.as_str()).collect();
    for untouched in ["English", "Tag", "Inbox"] {
        assert!(!tagged.contains(&untouched), "{untouched} should not be tagged");
    }
    let journal = fs::read_to_string(vault_dir.path().join(EVERGREEN).join("✍️ Journal/Tag.md"))?;
    assert!(!journal.starts_with("---"));
    let inbox = fs::read_to_string(vault_dir.path().join("Inbox.md"))?;
    assert!(!inbox.starts_with("---"));

    // Notes with the same vocabulary share a topic and its tags.
    let by_id = |id: &str| report.notes.iter().find(|n| n.note_id == id);
    let fruit = by_id("Obst eins").ok_or("missing note")?;
    let engine = by_id("Motor eins").ok_or("missing note")?;
    assert_eq!(Some(fruit.topic), by_id("Obst zwei").map(|n| n.topic));
    assert_eq!(Some(engine.topic), by_id("Motor zwei").map(|n| n.topic));
    assert_ne!(fruit.topic, engine.topic);
    assert!(fruit.tags.iter().all(|tag| tag.starts_with("#topic/")));
    Ok(())
}

#[test]
fn test_fit_failure_leaves_vault_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let vault_dir = TempDir::new()?;
    let backup_root = TempDir::new()?;
    let backup_dir = backup_root.path().join("backups");
    write_file(
        &vault_dir.path().join(EVERGREEN).join("Allein.md"),
        "Apfel und Birne",
    )?;
    let vault = Vault::open(vault_dir.path(), VaultOptions::default())?;
    let config = TopicRunConfig {
        model: TopicModelConfig::default(),
        ..run_config(false)
    };

    let result = tag_topics(&vault, &config, &tokenizer()?, Some(&backup_dir));
    assert!(matches!(result, Err(VaultLensError::TopicModel(_))));
    assert!(!backup_dir.exists());
    let content = fs::read_to_string(vault_dir.path().join(EVERGREEN).join("Allein.md"))?;
    assert_eq!(content, "Apfel und Birne");
    Ok(())
}

#[test]
fn test_invalid_utf8_note_aborts_before_backup() -> Result<(), Box<dyn std::error::Error>> {
    let vault_dir = TempDir::new()?;
    let backup_root = TempDir::new()?;
    let backup_dir = backup_root.path().join("backups");
    topic_vault(vault_dir.path())?;
    // Sorts after the other target notes and still fits; only the pre-write check rejects it.
    let latin1 = vault_dir.path().join(EVERGREEN).join("Technik/Zylinder.md");
    let mut raw = "Motor und Getriebe und Kolben und Zylinder. ".repeat(3).into_bytes();
    raw.extend_from_slice(b"Caf\xe9\n");
    fs::write(&latin1, &raw)?;
    let first = vault_dir.path().join(EVERGREEN).join("Obst eins.md");
    let before = fs::read_to_string(&first)?;

    let vault = Vault::open(vault_dir.path(), VaultOptions::default())?;
    let result = tag_topics(&vault, &run_config(false), &tokenizer()?, Some(&backup_dir));
    assert!(matches!(result, Err(VaultLensError::Io(_))));
    assert!(!backup_dir.exists());
    assert_eq!(fs::read(&latin1)?, raw);
    assert_eq!(fs::read_to_string(&first)?, before);
    Ok(())
}

#[test]
fn test_configured_size_limit_applies_to_writes() -> Result<(), Box<dyn std::error::Error>> {
    let vault_dir = TempDir::new()?;
    let backup_dir = TempDir::new()?;
    topic_vault(vault_dir.path())?;
    let padded = vault_dir.path().join(EVERGREEN).join("Obst zwei.md");
    let mut body = "Apfel und Birne und Kirsche und Pflaume. ".repeat(3);
    body.push_str(&" ".repeat(9 * 1024 * 1024));
    fs::write(&padded, &body)?;

    let options = VaultOptions {
        max_note_bytes: 16 * 1024 * 1024,
        ..VaultOptions::default()
    };
    let vault = Vault::open(vault_dir.path(), options)?;
    let report = tag_topics(&vault, &run_config(false), &tokenizer()?, Some(backup_dir.path()))?;
    assert!(report.notes.iter().all(|n| n.outcome.is_some()));
    assert!(fs::read_to_string(&padded)?.starts_with("---\ntags: "));
    Ok(())
}

#[test]
fn test_dry_run_plans_without_writing() -> Result<(), Box<dyn std::error::Error>> {
    let vault_dir = TempDir::new()?;
    topic_vault(vault_dir.path())?;
    let note = vault_dir.path().join(EVERGREEN).join("Obst eins.md");
    let before = fs::read_to_string(&note)?;

    let vault = Vault::open(vault_dir.path(), VaultOptions::default())?;
    let report = tag_topics(&vault, &run_config(true), &tokenizer()?, None)?;
    assert!(report.dry_run);
    assert!(report.backup.is_none());
    assert!(report.notes.iter().all(|n| n.outcome.is_none() && !n.tags.is_empty()));
    assert_eq!(fs::read_to_string(&note)?, before);
    Ok(())
}

#[test]
fn test_writing_requires_backup_dir() -> Result<(), Box<dyn std::error::Error>> {
    let vault_dir = TempDir::new()?;
    topic_vault(vault_dir.path())?;
    let vault = Vault::open(vault_dir.path(), VaultOptions::default())?;
    let result = tag_topics(&vault, &run_config(false), &tokenizer()?, None);
    assert!(matches!(result, Err(VaultLensError::BackupRequired)));
    let note = fs::read_to_string(vault_dir.path().join(EVERGREEN).join("Obst eins.md"))?;
    assert!(!note.starts_with("---"));
    Ok(())
}

#[test]
fn test_word_count_ranks_lemmas_and_entities() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let body = "The gardens bloom.\nAnna Schmidt visits the [[gardens]].\n";
    write_file(&tmp.path().join("a.md"), body)?;
    write_file(&tmp.path().join("b.md"), "")?;
    let vault = Vault::open(tmp.path(), VaultOptions::default())?;
    let tokenizer = tokenizer()?;

    let report = word_count(&vault, &tokenizer)?;
    assert_eq!(report.notes, 2);
    assert_eq!(report.tokens.count_of("garden"), 2);
    assert_eq!(report.entities.count_of("Anna Schmidt"), 1);
    let streams = tokenizer.tokenize(body, Language::English);
    let expected_tokens: usize = streams.tokens.len();
    assert_eq!(report.tokens.total(), expected_tokens);
    assert_eq!(report.entities.total(), streams.entities.len());
    Ok(())
}

#[test]
fn test_language_report_counts_every_note() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_file(&tmp.path().join("de.md"), "Brot und Butter")?;
    write_file(&tmp.path().join("en.md"), "Bread and butter")?;
    write_file(&tmp.path().join("empty.md"), "")?;
    let vault = Vault::open(tmp.path(), VaultOptions::default())?;

    let report = language_report(&vault, &tokenizer()?)?;
    assert_eq!(report.notes, 3);
    let counts: Vec<(Language, usize)> = report
        .languages
        .iter()
        .map(|entry| (entry.language, entry.notes))
        .collect();
    assert_eq!(
        counts,
        vec![(Language::German, 1), (Language::English, 2)]
    );
    Ok(())
}

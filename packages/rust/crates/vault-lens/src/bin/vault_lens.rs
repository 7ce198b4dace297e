#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lens_tokenizer::Tokenizer;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vault_lens::report::{render_languages, render_links, render_topics, render_word_count};
use vault_lens::{
    ConfigOverrides, TopicRunConfig, Vault, VaultLensConfig, language_report, link_report,
    tag_topics, word_count,
};

#[derive(Parser, Debug)]
#[command(
    name = "vault-lens",
    about = "Link usage, word statistics and topic tagging for markdown vaults",
    arg_required_else_help = true
)]
struct Cli {
    /// Vault root directory (overrides OBSIDIAN_VAULT).
    #[arg(long, short = 'r', value_name = "DIR", global = true)]
    vault: Option<PathBuf>,

    /// Backup destination for topic tagging (overrides OBSIDIAN_BACKUP_DIR).
    #[arg(long = "backup-dir", value_name = "DIR", global = true)]
    backup_dir: Option<PathBuf>,

    /// Explicit YAML config file (overrides VAULT_LENS_CONFIG).
    #[arg(long = "conf", short = 'c', value_name = "FILE", global = true)]
    config_file: Option<PathBuf>,

    /// Output format.
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Markdown, global = true)]
    output: OutputFormat,

    /// Debug logging on stderr.
    #[arg(long, short = 'v', default_value_t = false, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank tokens, entities and noun chunks over all notes.
    Words {
        /// Rows per table.
        #[arg(short, long)]
        top: Option<usize>,
    },
    /// Rank existing and dangling link targets.
    Links,
    /// Fit topics on target-language evergreen notes and tag them.
    Topics {
        /// Number of topics.
        #[arg(long = "topics", short = 'k')]
        num_topics: Option<usize>,
        /// Label terms per topic.
        #[arg(long = "terms", short = 'n')]
        terms_per_topic: Option<usize>,
        /// Report planned tags without backing up or writing.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Count notes per detected language.
    Languages,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
    Pretty,
}

fn emit<T: Serialize>(value: &T, output: OutputFormat, markdown: impl FnOnce(&T) -> String) -> Result<()> {
    let rendered = match output {
        OutputFormat::Markdown => markdown(value),
        OutputFormat::Json => {
            serde_json::to_string(value).context("failed to serialize CLI output as JSON")?
        }
        OutputFormat::Pretty => {
            serde_json::to_string_pretty(value).context("failed to serialize CLI output as JSON")?
        }
    };
    println!("{rendered}");
    Ok(())
}

fn overrides(cli: &Cli) -> ConfigOverrides {
    let mut overrides = ConfigOverrides {
        vault_root: cli.vault.clone(),
        backup_dir: cli.backup_dir.clone(),
        config_file: cli.config_file.clone(),
        ..ConfigOverrides::default()
    };
    match &cli.command {
        Command::Words { top } => overrides.top = *top,
        Command::Topics {
            num_topics,
            terms_per_topic,
            ..
        } => {
            overrides.num_topics = *num_topics;
            overrides.terms_per_topic = *terms_per_topic;
        }
        Command::Links | Command::Languages => {}
    }
    overrides
}

fn execute(cli: &Cli, config: &VaultLensConfig) -> Result<()> {
    let vault = Vault::open(&config.vault_root, config.vault_options())
        .with_context(|| format!("failed to open vault {}", config.vault_root.display()))?;

    match &cli.command {
        Command::Words { .. } => {
            let tokenizer = Tokenizer::new(&config.tokenizer_config())?;
            let report = word_count(&vault, &tokenizer).context("word count failed")?;
            emit(&report, cli.output, |report| {
                render_word_count(report, config.report_top)
            })
        }
        Command::Links => {
            let report = link_report(&vault).context("link report failed")?;
            emit(&report, cli.output, render_links)
        }
        Command::Topics { dry_run, .. } => {
            let tokenizer = Tokenizer::new(&config.tokenizer_config())?;
            let run = TopicRunConfig {
                scope: config.topic_scope.clone(),
                model: config.topic_model.clone(),
                tag_namespace: config.tag_namespace.clone(),
                dry_run: *dry_run,
            };
            let report = tag_topics(&vault, &run, &tokenizer, config.backup_dir.as_deref())
                .context("topic tagging aborted")?;
            emit(&report, cli.output, render_topics)
        }
        Command::Languages => {
            let tokenizer = Tokenizer::new(&config.tokenizer_config())?;
            let report = language_report(&vault, &tokenizer).context("language report failed")?;
            emit(&report, cli.output, render_languages)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = dotenv::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "vault_lens=debug,lens_io=debug,lens_tokenizer=debug"
        } else {
            "vault_lens=info,lens_io=info,lens_tokenizer=warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = VaultLensConfig::from_env(&overrides(&cli)).context("invalid configuration")?;
    execute(&cli, &config)
}

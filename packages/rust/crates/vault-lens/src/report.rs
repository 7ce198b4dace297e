//! Markdown table rendering for run reports.

use std::fmt::Write as _;

use lens_tokenizer::{RankedItem, RankedList};

use crate::frontmatter::WriteOutcome;
use crate::pipeline::{LanguageReport, LinkReport, TopicTaggingReport, WordCountReport};

const CONTENT_WIDTH: usize = 30;
const LINK_WIDTH: usize = 60;

/// `## Top N <kind>` followed by a rank/count/content table.
///
/// `N` is clamped to the number of available rows.
#[must_use]
pub fn render_ranked(kind: &str, list: &RankedList, top: usize) -> String {
    let rows = list.top(top);
    let mut out = String::new();
    let _ = writeln!(out, "## Top {} {kind}", rows.len());
    out.push('\n');
    out.push_str("| #  | Count | Content                      |\n");
    out.push_str("|---:|------:|------------------------------|\n");
    for (index, RankedItem { item, count }) in rows.iter().enumerate() {
        let _ = writeln!(out, "|{:4}|{count:7}|{item:<CONTENT_WIDTH$}|", index + 1);
    }
    out.push('\n');
    out
}

/// Tokens, entities and noun chunks tables.
#[must_use]
pub fn render_word_count(report: &WordCountReport, top: usize) -> String {
    [
        render_ranked("Tokens", &report.tokens, top),
        render_ranked("Entities", &report.entities, top),
        render_ranked("Noun Chunks", &report.noun_chunks, top),
    ]
    .concat()
}

/// Side-by-side existing and dangling link table, cells `target (count)`.
#[must_use]
pub fn render_links(report: &LinkReport) -> String {
    let mut out = String::from("# Used Links\n\n");
    out.push_str("| #  | Existing Links | Not Existing Links  |\n");
    out.push_str("|---:|-------------------------------|--------------------------------|\n");
    let existing: Vec<&RankedItem> = report.existing.iter().collect();
    let not_existing: Vec<&RankedItem> = report.not_existing.iter().collect();
    let rows = existing.len().max(not_existing.len());
    for index in 0..rows {
        let left = existing.get(index).map(|entry| cell(entry)).unwrap_or_default();
        let right = not_existing.get(index).map(|entry| cell(entry)).unwrap_or_default();
        let _ = writeln!(out, "|{:4}|{left:<LINK_WIDTH$}|{right:<LINK_WIDTH$}|", index + 1);
    }
    out.push('\n');
    out
}

fn cell(entry: &RankedItem) -> String {
    format!("{} ({})", entry.item, entry.count)
}

/// Per-language note counts.
#[must_use]
pub fn render_languages(report: &LanguageReport) -> String {
    let mut out = String::from("## Languages\n\n| Language | Notes |\n|:---------|------:|\n");
    for entry in &report.languages {
        let _ = writeln!(out, "| {:<8} | {:5} |", entry.language.code(), entry.notes);
    }
    let _ = writeln!(out, "| {:<8} | {:5} |", "total", report.notes);
    out.push('\n');
    out
}

/// Topic labels, then per-note assignments and outcomes.
#[must_use]
pub fn render_topics(report: &TopicTaggingReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "## Topics ({} documents, language {})\n",
        report.documents, report.language
    );
    out.push_str("| #  | Labels |\n|---:|--------|\n");
    for topic in &report.topics {
        let _ = writeln!(out, "|{:4}| {} |", topic.index, topic.labels.join(", "));
    }
    out.push_str("\n## Notes\n\n| Note | Topic | Tags | Outcome |\n|------|------:|------|---------|\n");
    for note in &report.notes {
        let outcome = match note.outcome {
            Some(WriteOutcome::Inserted) => "inserted",
            Some(WriteOutcome::Replaced) => "replaced",
            None => "planned",
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {outcome} |",
            note.note_id,
            note.topic,
            note.tags.join(" ")
        );
    }
    if let Some(backup) = &report.backup {
        let _ = writeln!(out, "\nBackup: `{}`", backup.path.display());
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_tokenizer::rank;

    #[test]
    fn test_ranked_table_shape() {
        let table = render_ranked("Tokens", &rank(["rust", "rust", "go"]), 10);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "## Top 2 Tokens");
        assert_eq!(lines[2], "| #  | Count | Content                      |");
        assert_eq!(lines[4], format!("|   1|      2|{:<30}|", "rust"));
        assert_eq!(lines[5], format!("|   2|      1|{:<30}|", "go"));
    }

    #[test]
    fn test_links_table_pads_shorter_side() {
        let report = LinkReport {
            notes: 2,
            existing: rank(["A", "A", "B"]),
            not_existing: rank(["Z"]),
            discarded: 0,
        };
        let table = render_links(&report);
        let rows: Vec<&str> = table.lines().filter(|line| line.starts_with("|   ")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("A (2)") && rows[0].contains("Z (1)"));
        assert!(rows[1].contains("B (1)"));
    }

    #[test]
    fn test_links_table_without_links_is_header_only() {
        let report = LinkReport {
            notes: 1,
            existing: RankedList::default(),
            not_existing: RankedList::default(),
            discarded: 0,
        };
        let table = render_links(&report);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "| #  | Existing Links | Not Existing Links  |");
        assert!(!lines.iter().any(|line| line.starts_with("|   ")));
    }
}

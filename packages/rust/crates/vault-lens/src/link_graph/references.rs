//! Wikilink reference extraction primitives.
//!
//! Pattern: `[[Target]]`, `[[Target|Alias]]`, `[[Target#^block]]`.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::patterns::compile_regex;

static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"\[\[([^\]]+)\]\]"));
static ISO_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$"));

/// Prefix marking a person mention rather than a note.
pub const PERSON_SIGIL: char = '@';

/// Why a reference never reaches classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// Journal link such as `[[2023-05-01]]`.
    Date,
    /// Person mention such as `[[@alice]]`.
    Person,
}

/// Resolution against the vault's identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// Target names an existing note.
    Existing,
    /// Dangling reference.
    NotExisting,
}

/// One `[[...]]` occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReference {
    /// Full matched text including brackets.
    pub raw: String,
    /// Target with alias and block anchor removed.
    pub target: String,
}

impl LinkReference {
    /// Category that excludes this reference, if any.
    #[must_use]
    pub fn discard_reason(&self) -> Option<DiscardReason> {
        if ISO_DATE_REGEX.is_match(&self.target) {
            Some(DiscardReason::Date)
        } else if self.target.starts_with(PERSON_SIGIL) {
            Some(DiscardReason::Person)
        } else {
            None
        }
    }

    /// Case-sensitive lookup in `known`; `None` for discarded references.
    #[must_use]
    pub fn classify(&self, known: &HashSet<String>) -> Option<LinkStatus> {
        if self.discard_reason().is_some() {
            return None;
        }
        if known.contains(&self.target) {
            Some(LinkStatus::Existing)
        } else {
            Some(LinkStatus::NotExisting)
        }
    }
}

/// Cut at the first alias separator, then at the first block anchor.
#[must_use]
pub fn normalize_target(raw: &str) -> &str {
    let target = raw.split('|').next().unwrap_or(raw);
    target.split("#^").next().unwrap_or(target)
}

/// All references in `body`, in order of appearance.
#[must_use]
pub fn extract_references(body: &str) -> Vec<LinkReference> {
    REFERENCE_REGEX
        .captures_iter(body)
        .filter_map(|caps| {
            let raw = caps.get(0)?.as_str().to_string();
            let inner = caps.get(1)?.as_str();
            Some(LinkReference {
                raw,
                target: normalize_target(inner).to_string(),
            })
        })
        .collect()
}

use lens_tokenizer::{RankedList, rank};
use serde::Serialize;

/// Classified reference targets, duplicates kept in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkGraph {
    /// Targets that resolve to a note.
    pub existing: Vec<String>,
    /// Dangling targets.
    pub not_existing: Vec<String>,
    /// Date and person references that were skipped.
    pub discarded: usize,
}

/// Both reference multisets ranked by frequency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankedLinks {
    /// Ranked existing targets.
    pub existing: RankedList,
    /// Ranked dangling targets.
    pub not_existing: RankedList,
}

impl LinkGraph {
    /// Rank both multisets.
    #[must_use]
    pub fn ranked(&self) -> RankedLinks {
        RankedLinks {
            existing: rank(&self.existing),
            not_existing: rank(&self.not_existing),
        }
    }

    /// Total classified references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.existing.len() + self.not_existing.len()
    }

    /// Whether nothing was classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.existing.is_empty() && self.not_existing.is_empty()
    }
}

//! Frequency ranking with first-occurrence tie-break.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::Serialize;

/// One distinct item and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedItem {
    /// The item text.
    pub item: String,
    /// Occurrence count, always at least 1.
    pub count: usize,
}

/// Items sorted by descending count; equal counts keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankedList {
    items: Vec<RankedItem>,
}

impl RankedList {
    /// All entries in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, RankedItem> {
        self.items.iter()
    }

    /// The first `n` entries (fewer if the list is shorter).
    #[must_use]
    pub fn top(&self, n: usize) -> &[RankedItem] {
        &self.items[..n.min(self.items.len())]
    }

    /// Number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all counts, equal to the length of the ranked stream.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.iter().map(|entry| entry.count).sum()
    }

    /// Count for `item`, 0 when absent.
    #[must_use]
    pub fn count_of(&self, item: &str) -> usize {
        self.items
            .iter()
            .find(|entry| entry.item == item)
            .map_or(0, |entry| entry.count)
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a RankedItem;
    type IntoIter = std::slice::Iter<'a, RankedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Count identical items and sort by descending count.
///
/// Grouping is exact string equality. The sort is stable over
/// first-occurrence order, so ties are deterministic.
#[must_use]
pub fn rank<I, S>(items: I) -> RankedList
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<RankedItem> = Vec::new();
    for item in items {
        let item = item.as_ref();
        if let Some(&slot) = index.get(item) {
            entries[slot].count += 1;
        } else {
            index.insert(item.to_string(), entries.len());
            entries.push(RankedItem {
                item: item.to_string(),
                count: 1,
            });
        }
    }
    entries.sort_by_key(|entry| Reverse(entry.count));
    RankedList { items: entries }
}

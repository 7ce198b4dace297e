//! Link graph: which `[[references]]` resolve to notes and which dangle.

mod models;
mod references;

use std::collections::HashSet;

use lens_io::IoError;

use crate::vault::Vault;

pub use models::{LinkGraph, RankedLinks};
pub use references::{
    DiscardReason, LinkReference, LinkStatus, PERSON_SIGIL, extract_references, normalize_target,
};

impl LinkGraph {
    /// Classify every reference in `bodies` against `known`.
    #[must_use]
    pub fn collect<'a, I>(known: &HashSet<String>, bodies: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut graph = Self::default();
        for body in bodies {
            graph.add_body(known, body);
        }
        graph
    }

    fn add_body(&mut self, known: &HashSet<String>, body: &str) {
        for reference in extract_references(body) {
            match reference.classify(known) {
                Some(LinkStatus::Existing) => self.existing.push(reference.target),
                Some(LinkStatus::NotExisting) => self.not_existing.push(reference.target),
                None => self.discarded += 1,
            }
        }
    }
}

/// Two passes over the vault: identifiers first, then every note body.
///
/// # Errors
/// Fails on the first unreadable note.
pub fn build_link_graph(vault: &Vault) -> Result<LinkGraph, IoError> {
    let known = vault.identifiers();
    let mut graph = LinkGraph::default();
    for path in vault.paths() {
        let body = vault.read(path)?;
        graph.add_body(&known, &body);
    }
    tracing::info!(
        identifiers = known.len(),
        existing = graph.existing.len(),
        not_existing = graph.not_existing.len(),
        discarded = graph.discarded,
        "link graph built"
    );
    Ok(graph)
}

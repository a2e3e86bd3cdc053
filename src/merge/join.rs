//! Per-release join of translated and canonical string tables.

use crate::lang::LangMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// What one release says about a canonical term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    pub translation: String,
    pub source_key: String,
}

/// Canonical term -> entry, for one release.
pub type TermMap = BTreeMap<String, TranslationEntry>;

/// Counters describing one join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Identifiers present in both tables.
    pub joined: usize,
    /// Translated identifiers with no canonical counterpart.
    pub dropped: usize,
    /// Joined identifiers whose canonical string was already taken.
    pub collisions: usize,
}

/// Inner-join the two tables of one release on internal identifier.
///
/// See [`join_version_with_stats`] for the collision policy.
pub fn join_version(translated: &LangMap, canonical: &LangMap) -> TermMap {
    join_version_with_stats(translated, canonical).0
}

/// Inner-join and report how many identifiers were joined, dropped or overwritten.
///
/// Identifiers are visited in the translated table's file order. When two
/// identifiers share a canonical string, the one appearing later in the file
/// replaces the earlier one in the result.
pub fn join_version_with_stats(translated: &LangMap, canonical: &LangMap) -> (TermMap, JoinStats) {
    let mut terms = TermMap::new();
    let mut stats = JoinStats::default();

    for (identifier, translation) in translated {
        let Some(term) = canonical.get(identifier) else {
            stats.dropped += 1;
            continue;
        };
        stats.joined += 1;

        let entry = TranslationEntry {
            translation: translation.clone(),
            source_key: identifier.clone(),
        };
        if let Some(previous) = terms.insert(term.clone(), entry) {
            stats.collisions += 1;
            debug!(
                "Canonical string {:?} shared by {} and {}; keeping {}",
                term, previous.source_key, identifier, identifier
            );
        }
    }

    (terms, stats)
}

//! Key-indexed view: internal identifier -> translation variants.
//!
//! Same grouping as the value-indexed view, pivoted on the identifier. One
//! identifier can sit behind several canonical terms (renames, duplicated
//! strings), so a single release may reach a variant through more than one
//! term. The variant range is computed over the deduplicated release set.

use super::{ordered_versions, FirstSeen, Span, VersionedTermMaps};
use crate::version::{serialize_or_empty, Version};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One canonical term that carried a variant, and when it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRange {
    pub term: String,
    pub minimal_version: Version,
    pub maximal_version: Version,
}

/// One distinct translation of an identifier.
///
/// Bounds are `None` only if no release contributed, which the builder never
/// produces; they serialize as `""` in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyVariant {
    pub translation: String,
    #[serde(serialize_with = "serialize_or_empty")]
    pub minimal_version: Option<Version>,
    #[serde(serialize_with = "serialize_or_empty")]
    pub maximal_version: Option<Version>,
    pub terms: Vec<TermRange>,
    /// Distinct releases that reached this variant through any term.
    #[serde(skip)]
    pub release_count: usize,
}

/// Identifier -> its variants, oldest first.
pub type KeyIndex = BTreeMap<String, Vec<KeyVariant>>;

#[derive(Default)]
struct KeyVariantBuilder {
    terms: FirstSeen<Span>,
    versions: BTreeSet<Version>,
}

impl KeyVariantBuilder {
    fn observe(&mut self, term: &str, version: Version) {
        self.terms.slot(term, || Span::at(version)).observe(version);
        self.versions.insert(version);
    }

    fn finish(self, translation: String) -> KeyVariant {
        let terms = self
            .terms
            .into_groups()
            .map(|(term, span)| TermRange {
                term,
                minimal_version: span.first,
                maximal_version: span.last,
            })
            .collect();

        KeyVariant {
            translation,
            minimal_version: self.versions.first().copied(),
            maximal_version: self.versions.last().copied(),
            terms,
            release_count: self.versions.len(),
        }
    }
}

/// Group every release's entries by identifier, then by exact translation,
/// then by the canonical term that carried it.
pub fn build_key_index(maps: &VersionedTermMaps) -> KeyIndex {
    let mut keys: BTreeMap<&str, FirstSeen<KeyVariantBuilder>> = BTreeMap::new();

    for (version, term_map) in ordered_versions(maps) {
        for (term, entry) in term_map {
            keys.entry(entry.source_key.as_str())
                .or_default()
                .slot(&entry.translation, KeyVariantBuilder::default)
                .observe(term, version);
        }
    }

    keys.into_iter()
        .map(|(key, variants)| {
            let variants = variants
                .into_groups()
                .map(|(translation, builder)| builder.finish(translation))
                .collect();
            (key.to_string(), variants)
        })
        .collect()
}

//! Cross-version merge engine.
//!
//! Turns one [`TermMap`] per release into two consolidated dictionaries:
//!
//! - `by_term`: canonical term -> every translation it has had, with the
//!   release range of each translation and of each identifier behind it
//! - `by_key`: internal identifier -> every translation it has had, with the
//!   canonical terms that carried it
//!
//! Both aggregations are pure. Releases are visited in ascending [`Version`]
//! order, which fixes the order of variants in the output.

mod by_key;
mod by_term;
mod join;

pub use by_key::{build_key_index, KeyIndex, KeyVariant, TermRange};
pub use by_term::{build_value_index, KeyRange, ValueIndex, Variant};
pub use join::{join_version, join_version_with_stats, JoinStats, TermMap, TranslationEntry};

use crate::version::Version;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Release label (as published, e.g. `"1.20.1"`) -> joined terms of that release.
pub type VersionedTermMaps = HashMap<String, TermMap>;

/// Both views of the merged history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dictionaries {
    pub by_term: ValueIndex,
    pub by_key: KeyIndex,
}

/// Order releases ascending by version, breaking ties on the label so that
/// `"1.12"` and `"1.12.0"` always come out the same way.
pub fn ordered_versions(maps: &VersionedTermMaps) -> Vec<(Version, &TermMap)> {
    let mut ordered: Vec<(Version, &String, &TermMap)> = maps
        .iter()
        .map(|(label, terms)| (Version::parse(label), label, terms))
        .collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    ordered
        .into_iter()
        .map(|(version, _, terms)| (version, terms))
        .collect()
}

/// Run both aggregations over the same release set.
pub fn build_dictionaries(maps: &VersionedTermMaps) -> Dictionaries {
    let by_term = build_value_index(maps);
    let by_key = build_key_index(maps);

    info!(
        "Merged {} releases into {} terms and {} keys",
        maps.len(),
        by_term.len(),
        by_key.len()
    );

    Dictionaries { by_term, by_key }
}

/// Inclusive release range, widened one observation at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) first: Version,
    pub(crate) last: Version,
}

impl Span {
    pub(crate) fn at(version: Version) -> Self {
        Self {
            first: version,
            last: version,
        }
    }

    pub(crate) fn observe(&mut self, version: Version) {
        self.first = self.first.min(version);
        self.last = self.last.max(version);
    }
}

/// Groups keyed by string, iterated in the order each key was first seen.
#[derive(Debug)]
pub(crate) struct FirstSeen<T> {
    groups: Vec<(String, T)>,
    slots: HashMap<String, usize>,
}

impl<T> Default for FirstSeen<T> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            slots: HashMap::new(),
        }
    }
}

impl<T> FirstSeen<T> {
    /// The group for `key`, created with `make` if this is its first sighting.
    pub(crate) fn slot(&mut self, key: &str, make: impl FnOnce() -> T) -> &mut T {
        let index = match self.slots.get(key) {
            Some(&index) => index,
            None => {
                self.groups.push((key.to_string(), make()));
                self.slots.insert(key.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[index].1
    }

    pub(crate) fn into_groups(self) -> impl Iterator<Item = (String, T)> {
        self.groups.into_iter()
    }
}

//! Value-indexed view: canonical term -> translation variants.

use super::{ordered_versions, FirstSeen, Span, VersionedTermMaps};
use crate::version::Version;
use serde::Serialize;
use std::collections::BTreeMap;

/// One identifier that carried a variant, and when it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRange {
    pub key: String,
    pub minimal_version: Version,
    pub maximal_version: Version,
}

/// One distinct translation of a canonical term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub translation: String,
    pub minimal_version: Version,
    pub maximal_version: Version,
    pub keys: Vec<KeyRange>,
}

/// Canonical term -> its variants, oldest first.
pub type ValueIndex = BTreeMap<String, Vec<Variant>>;

struct VariantBuilder {
    span: Span,
    keys: FirstSeen<Span>,
}

impl VariantBuilder {
    fn finish(self, translation: String) -> Variant {
        Variant {
            translation,
            minimal_version: self.span.first,
            maximal_version: self.span.last,
            keys: self
                .keys
                .into_groups()
                .map(|(key, span)| KeyRange {
                    key,
                    minimal_version: span.first,
                    maximal_version: span.last,
                })
                .collect(),
        }
    }
}

/// Group every release's entries by canonical term, then by exact translation,
/// then by contributing identifier.
///
/// Variants appear in the order their translation was first seen when walking
/// releases from oldest to newest.
pub fn build_value_index(maps: &VersionedTermMaps) -> ValueIndex {
    let mut terms: BTreeMap<&str, FirstSeen<VariantBuilder>> = BTreeMap::new();

    for (version, term_map) in ordered_versions(maps) {
        for (term, entry) in term_map {
            let variant = terms
                .entry(term.as_str())
                .or_default()
                .slot(&entry.translation, || VariantBuilder {
                    span: Span::at(version),
                    keys: FirstSeen::default(),
                });
            variant.span.observe(version);
            variant
                .keys
                .slot(&entry.source_key, || Span::at(version))
                .observe(version);
        }
    }

    terms
        .into_iter()
        .map(|(term, variants)| {
            let variants = variants
                .into_groups()
                .map(|(translation, builder)| builder.finish(translation))
                .collect();
            (term.to_string(), variants)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::history;
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s)
    }

    // ==================== Stability Tests ====================

    #[test]
    fn test_stable_translation_yields_single_variant() {
        let maps = history(&[
            ("1.2", &[("stone", "石头", "tile.stone.name")]),
            ("1.3", &[("stone", "石头", "tile.stone.name")]),
            ("1.4", &[("stone", "石头", "tile.stone.name")]),
        ]);

        let index = build_value_index(&maps);
        let variants = &index["stone"];

        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].translation, "石头");
        assert_eq!(variants[0].minimal_version, v("1.2"));
        assert_eq!(variants[0].maximal_version, v("1.4"));
        assert_eq!(
            variants[0].keys,
            vec![KeyRange {
                key: "tile.stone.name".to_string(),
                minimal_version: v("1.2"),
                maximal_version: v("1.4"),
            }]
        );
    }

    // ==================== Change Detection Tests ====================

    #[test]
    fn test_changed_translation_yields_two_variants() {
        let maps = history(&[
            ("1.2", &[("stone", "石头", "tile.stone.name")]),
            ("1.3", &[("stone", "石头", "tile.stone.name")]),
            ("1.4", &[("stone", "石块", "tile.stone.name")]),
        ]);

        let index = build_value_index(&maps);
        let variants = &index["stone"];

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].translation, "石头");
        assert_eq!(variants[0].minimal_version.to_string(), "1.2.0");
        assert_eq!(variants[0].maximal_version.to_string(), "1.3.0");
        assert_eq!(variants[1].translation, "石块");
        assert_eq!(variants[1].minimal_version.to_string(), "1.4.0");
        assert_eq!(variants[1].maximal_version.to_string(), "1.4.0");
    }

    #[test]
    fn test_variant_order_follows_versions_not_input_order() {
        // Labels deliberately out of order and non-lexicographic.
        let maps = history(&[
            ("1.10", &[("stone", "新", "k")]),
            ("1.9", &[("stone", "旧", "k")]),
        ]);

        let index = build_value_index(&maps);
        let translations: Vec<&str> = index["stone"]
            .iter()
            .map(|variant| variant.translation.as_str())
            .collect();
        assert_eq!(translations, vec!["旧", "新"]);
    }

    #[test]
    fn test_non_contiguous_reappearance_extends_range() {
        let maps = history(&[
            ("1.2", &[("stone", "石头", "k")]),
            ("1.3", &[("stone", "石块", "k")]),
            ("1.4", &[("stone", "石头", "k")]),
        ]);

        let index = build_value_index(&maps);
        let variants = &index["stone"];

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].translation, "石头");
        assert_eq!(variants[0].minimal_version, v("1.2"));
        assert_eq!(variants[0].maximal_version, v("1.4"));
        assert_eq!(variants[1].minimal_version, v("1.3"));
        assert_eq!(variants[1].maximal_version, v("1.3"));
    }

    // ==================== Key Sub-Group Tests ====================

    #[test]
    fn test_key_ranges_split_by_identifier() {
        let maps = history(&[
            ("1.12", &[("Stone", "石头", "tile.stone.stone.name")]),
            ("1.12.2", &[("Stone", "石头", "tile.stone.stone.name")]),
            ("1.13", &[("Stone", "石头", "block.minecraft.stone")]),
            ("1.20.1", &[("Stone", "石头", "block.minecraft.stone")]),
        ]);

        let index = build_value_index(&maps);
        let variant = &index["Stone"][0];

        assert_eq!(variant.minimal_version, v("1.12"));
        assert_eq!(variant.maximal_version, v("1.20.1"));
        assert_eq!(variant.keys.len(), 2);
        assert_eq!(variant.keys[0].key, "tile.stone.stone.name");
        assert_eq!(variant.keys[0].maximal_version, v("1.12.2"));
        assert_eq!(variant.keys[1].key, "block.minecraft.stone");
        assert_eq!(variant.keys[1].minimal_version, v("1.13"));
        assert_eq!(variant.keys[1].maximal_version, v("1.20.1"));
    }

    #[test]
    fn test_every_observation_lands_in_exactly_one_variant() {
        let maps = history(&[
            ("1.2", &[("a", "甲", "k1"), ("b", "乙", "k2")]),
            ("1.3", &[("a", "丙", "k1")]),
            ("1.4", &[("a", "甲", "k3"), ("b", "乙", "k2")]),
        ]);

        let index = build_value_index(&maps);

        assert_eq!(index.len(), 2);
        assert_eq!(index["a"].len(), 2);
        assert_eq!(index["b"].len(), 1);
        let a_keys: Vec<&str> = index["a"][0].keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(a_keys, vec!["k1", "k3"]);
    }

    #[test]
    fn test_term_absent_from_some_versions() {
        let maps = history(&[
            ("1.2", &[("Dirt", "泥土", "k")]),
            ("1.3", &[]),
            ("1.4", &[("Dirt", "泥土", "k")]),
        ]);

        let index = build_value_index(&maps);
        assert_eq!(index["Dirt"].len(), 1);
        assert_eq!(index["Dirt"][0].minimal_version, v("1.2"));
        assert_eq!(index["Dirt"][0].maximal_version, v("1.4"));
    }

    #[test]
    fn test_translation_equality_is_exact() {
        let maps = history(&[
            ("1.2", &[("Stone", "石头", "k")]),
            ("1.3", &[("Stone", "石头 ", "k")]),
        ]);

        let index = build_value_index(&maps);
        assert_eq!(index["Stone"].len(), 2);
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_serialized_shape() {
        let maps = history(&[("1.7.10", &[("Stone", "石头", "tile.stone.name")])]);

        let json = serde_json::to_value(build_value_index(&maps)).expect("Should serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "Stone": [{
                    "translation": "石头",
                    "minimalVersion": "1.7.10",
                    "maximalVersion": "1.7.10",
                    "keys": [{
                        "key": "tile.stone.name",
                        "minimalVersion": "1.7.10",
                        "maximalVersion": "1.7.10"
                    }]
                }]
            })
        );
    }
}

//! Release version values.
//!
//! Release identifiers look like `1.<minor>.<patch>`. Only the minor and patch
//! components take part in ordering; the leading major segment is always `1`
//! for the releases we track and is never compared.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A comparable release version.
///
/// Ordering is lexicographic over `(minor, patch)`, which is what the derived
/// `Ord` gives us from the field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Earliest release whose asset index ships a translated language file.
    pub const MIN_SUPPORTED: Version = Version::new(6, 1);

    pub const fn new(minor: u32, patch: u32) -> Self {
        Self { minor, patch }
    }

    /// Parse a dotted version string.
    ///
    /// Never fails: missing or unparsable components after the major segment
    /// default to 0, so `"1.2"` is `1.2.0` and `"garbage"` is `1.0.0`.
    pub fn parse(s: &str) -> Self {
        let mut parts = s.trim().split('.').skip(1);
        let mut component = || {
            parts
                .next()
                .and_then(|p| p.trim().parse::<u32>().ok())
                .unwrap_or(0)
        };
        let minor = component();
        let patch = component();
        Self { minor, patch }
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1.{}.{}", self.minor, self.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Serialize an optional bound, writing `""` when no version contributed.
pub fn serialize_or_empty<S: Serializer>(
    version: &Option<Version>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match version {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_str(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== Parsing Tests ====================

    #[test]
    fn test_parse_full_version() {
        let v = Version::parse("1.20.4");
        assert_eq!(v.minor, 20);
        assert_eq!(v.patch, 4);
    }

    #[test]
    fn test_parse_missing_patch_defaults_to_zero() {
        let v = Version::parse("1.2");
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 0);
    }

    #[test]
    fn test_parse_major_only() {
        assert_eq!(Version::parse("1"), Version::new(0, 0));
    }

    #[test]
    fn test_parse_malformed_components_default_to_zero() {
        assert_eq!(Version::parse("1.x.3"), Version::new(0, 3));
        assert_eq!(Version::parse("1.14.pre"), Version::new(14, 0));
        assert_eq!(Version::parse(""), Version::new(0, 0));
    }

    #[test]
    fn test_major_segment_is_ignored() {
        assert_eq!(Version::parse("2.5.1"), Version::parse("1.5.1"));
    }

    #[test]
    fn test_from_str_ref() {
        let v: Version = "1.16.5".into();
        assert_eq!(v, Version::new(16, 5));
    }

    // ==================== Ordering Tests ====================

    #[test]
    fn test_ordering_by_minor_then_patch() {
        assert!(Version::parse("1.9.4") < Version::parse("1.10"));
        assert!(Version::parse("1.12") < Version::parse("1.12.2"));
        assert!(Version::parse("1.20.1") > Version::parse("1.19.4"));
        assert_eq!(Version::parse("1.12"), Version::parse("1.12.0"));
    }

    #[test]
    fn test_sort_is_numeric_not_lexicographic() {
        let mut versions: Vec<Version> = ["1.10", "1.9", "1.2", "1.10.2"]
            .iter()
            .map(|s| Version::parse(s))
            .collect();
        versions.sort();
        let rendered: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        assert_eq!(rendered, vec!["1.2.0", "1.9.0", "1.10.0", "1.10.2"]);
    }

    #[test]
    fn test_min_supported() {
        assert_eq!(Version::MIN_SUPPORTED.to_string(), "1.6.1");
        assert!(Version::parse("1.6") < Version::MIN_SUPPORTED);
        assert!(Version::parse("1.6.2") >= Version::MIN_SUPPORTED);
    }

    // ==================== Formatting / Serde Tests ====================

    #[test]
    fn test_display_always_has_three_segments() {
        assert_eq!(Version::parse("1.2").to_string(), "1.2.0");
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&Version::new(7, 10)).expect("Should serialize");
        assert_eq!(json, "\"1.7.10\"");
    }

    #[test]
    fn test_deserialize_from_string() {
        let v: Version = serde_json::from_str("\"1.18\"").expect("Should deserialize");
        assert_eq!(v, Version::new(18, 0));
    }

    #[test]
    fn test_serialize_or_empty() {
        #[derive(Serialize)]
        struct Bound {
            #[serde(serialize_with = "serialize_or_empty")]
            v: Option<Version>,
        }

        let some = serde_json::to_string(&Bound { v: Some(Version::new(3, 1)) }).unwrap();
        let none = serde_json::to_string(&Bound { v: None }).unwrap();
        assert_eq!(some, r#"{"v":"1.3.1"}"#);
        assert_eq!(none, r#"{"v":""}"#);
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_format_parse_roundtrip(minor in 0u32..1000, patch in 0u32..1000) {
            let v = Version::new(minor, patch);
            prop_assert_eq!(Version::parse(&v.to_string()), v);
        }

        #[test]
        fn prop_ordering_is_transitive(
            a in (0u32..30, 0u32..10),
            b in (0u32..30, 0u32..10),
            c in (0u32..30, 0u32..10),
        ) {
            let (a, b, c) = (
                Version::new(a.0, a.1),
                Version::new(b.0, b.1),
                Version::new(c.0, c.1),
            );
            if a < b && b < c {
                prop_assert!(a < c);
            }
        }

        #[test]
        fn prop_ordering_matches_tuple(
            a in (0u32..30, 0u32..10),
            b in (0u32..30, 0u32..10),
        ) {
            let va = Version::new(a.0, a.1);
            let vb = Version::new(b.0, b.1);
            prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
        }
    }
}

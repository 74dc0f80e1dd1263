//! Tag matcher: the pure core of the scan.
//!
//! Given one resource's tag map and the variant dictionary, report every
//! non-canonical key present and whether the canonical key also exists.
//! No side effects; everything downstream is built on this function.

use crate::dictionary::{VariantDictionary, fold_key};
use serde::{Deserialize, Serialize};
use tagmend_inventory::TagMap;

/// One variant key found on a resource, in its stored casing.
///
/// The original casing matters: the later delete must name exactly the
/// key the provider stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatch {
    pub key: String,
    pub value: String,
}

/// Matcher verdict for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// True iff any key case-insensitively equals the canonical key,
    /// independent of variant matches.
    pub has_canonical: bool,
    /// All variant keys present, in dictionary order, then stored-key
    /// byte order within one variant.
    pub matches: Vec<TagMatch>,
}

impl MatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Find every non-canonical key in `tags`.
///
/// The tag map is not assumed to be case-normalized: two keys that fold
/// to the same variant (e.g. `dept` and `DEPT`) are distinct matches,
/// since each needs its own delete.
pub fn match_tags(tags: &TagMap, dictionary: &VariantDictionary) -> MatchOutcome {
    let has_canonical = tags.keys().any(|key| dictionary.is_canonical(key));

    let mut matches = Vec::new();
    for variant in dictionary.variants() {
        let folded_variant = fold_key(variant);
        for (key, value) in tags {
            if fold_key(key) == folded_variant {
                matches.push(TagMatch {
                    key: key.clone(),
                    value: value.clone(),
                });
            }
        }
    }

    MatchOutcome {
        has_canonical,
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> VariantDictionary {
        VariantDictionary::new("DeptCode", ["Dept", "Department", "DeptId"])
            .expect("dictionary builds")
    }

    fn tags(pairs: &[(&str, &str)]) -> TagMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn variant_next_to_canonical_reports_both() {
        let outcome = match_tags(
            &tags(&[("Dept", "Finance"), ("DeptCode", "FIN001")]),
            &dictionary(),
        );
        assert!(outcome.has_canonical);
        assert_eq!(
            outcome.matches,
            vec![TagMatch {
                key: "Dept".to_string(),
                value: "Finance".to_string()
            }]
        );
    }

    #[test]
    fn canonical_only_map_yields_zero_matches() {
        let outcome = match_tags(&tags(&[("DeptCode", "ENG")]), &dictionary());
        assert!(outcome.has_canonical);
        assert!(outcome.is_clean());
    }

    #[test]
    fn multiple_variants_emit_in_dictionary_order() {
        let outcome = match_tags(&tags(&[("DeptId", "HR02"), ("Dept", "HR")]), &dictionary());
        assert!(!outcome.has_canonical);
        let keys: Vec<&str> = outcome.matches.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, ["Dept", "DeptId"]);
    }

    #[test]
    fn matching_is_case_insensitive_and_preserves_stored_casing() {
        let outcome = match_tags(&tags(&[("dEpArTmEnT", "Ops")]), &dictionary());
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].key, "dEpArTmEnT");
    }

    #[test]
    fn two_casings_of_one_variant_are_distinct_matches() {
        let outcome = match_tags(&tags(&[("DEPT", "a"), ("dept", "b")]), &dictionary());
        let keys: Vec<&str> = outcome.matches.iter().map(|m| m.key.as_str()).collect();
        // Stored-key byte order within the one variant.
        assert_eq!(keys, ["DEPT", "dept"]);
    }

    #[test]
    fn canonical_detection_is_independent_of_variant_matches() {
        let outcome = match_tags(&tags(&[("deptcode", "ENG"), ("Owner", "bob")]), &dictionary());
        assert!(outcome.has_canonical);
        assert!(outcome.is_clean());
    }

    #[test]
    fn unrelated_tags_never_match() {
        let outcome = match_tags(
            &tags(&[("Owner", "bob"), ("CostCenter", "cc-9")]),
            &dictionary(),
        );
        assert!(!outcome.has_canonical);
        assert!(outcome.is_clean());
    }
}

//! Variant dictionary: the canonical key and its non-canonical synonyms.

use serde::{Deserialize, Serialize};

/// Ordered set of case-insensitive key variants converging on one
/// canonical key.
///
/// Static configuration: built once per run, immutable thereafter.
/// Construction guarantees that no variant is case-insensitively equal
/// to the canonical key, so a finding's matched key can never be the
/// canonical key itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDictionary {
    canonical: String,
    variants: Vec<String>,
}

/// Errors from dictionary construction.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("canonical key must not be empty")]
    EmptyCanonical,

    #[error("variant at position {0} is empty")]
    EmptyVariant(usize),

    #[error("variant `{0}` is the canonical key; remove it from the variant list")]
    CanonicalVariant(String),
}

impl VariantDictionary {
    /// Build a dictionary from the canonical key and its variants.
    ///
    /// Variants that repeat case-insensitively are deduplicated, first
    /// occurrence wins, preserving dictionary order. A variant equal to
    /// the canonical key is rejected: silently matching it would plan
    /// deletions of correctly-tagged resources.
    pub fn new(
        canonical: impl Into<String>,
        variants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, DictionaryError> {
        let canonical = canonical.into();
        if canonical.trim().is_empty() {
            return Err(DictionaryError::EmptyCanonical);
        }
        let canonical_folded = fold_key(&canonical);

        let mut kept: Vec<String> = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for (index, variant) in variants.into_iter().enumerate() {
            let variant = variant.into();
            if variant.trim().is_empty() {
                return Err(DictionaryError::EmptyVariant(index));
            }
            let folded = fold_key(&variant);
            if folded == canonical_folded {
                return Err(DictionaryError::CanonicalVariant(variant));
            }
            if seen.contains(&folded) {
                continue;
            }
            seen.push(folded);
            kept.push(variant);
        }

        Ok(Self {
            canonical,
            variants: kept,
        })
    }

    pub fn canonical_key(&self) -> &str {
        &self.canonical
    }

    /// Variants in dictionary order.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// True iff `key` is case-insensitively the canonical key.
    pub fn is_canonical(&self, key: &str) -> bool {
        fold_key(key) == fold_key(&self.canonical)
    }

    /// True iff `key` case-insensitively equals the given variant.
    pub fn matches_variant(&self, variant: &str, key: &str) -> bool {
        fold_key(variant) == fold_key(key)
    }
}

/// Case folding used for every key comparison in the engine.
pub(crate) fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_variant_equal_to_canonical_key() {
        let err = VariantDictionary::new("DeptCode", ["Dept", "deptcode"])
            .expect_err("canonical variant must be rejected");
        assert!(matches!(err, DictionaryError::CanonicalVariant(v) if v == "deptcode"));
    }

    #[test]
    fn rejects_empty_keys() {
        assert!(matches!(
            VariantDictionary::new("  ", ["Dept"]),
            Err(DictionaryError::EmptyCanonical)
        ));
        assert!(matches!(
            VariantDictionary::new("DeptCode", ["Dept", " "]),
            Err(DictionaryError::EmptyVariant(1))
        ));
    }

    #[test]
    fn dedupes_case_insensitive_repeats_first_wins() {
        let dictionary = VariantDictionary::new("DeptCode", ["Dept", "DEPT", "DeptId"])
            .expect("dictionary builds");
        assert_eq!(dictionary.variants(), ["Dept", "DeptId"]);
    }

    #[test]
    fn canonical_comparison_is_case_insensitive() {
        let dictionary = VariantDictionary::new("DeptCode", ["Dept"]).expect("dictionary builds");
        assert!(dictionary.is_canonical("DEPTCODE"));
        assert!(dictionary.is_canonical("deptcode"));
        assert!(!dictionary.is_canonical("Dept"));
    }
}

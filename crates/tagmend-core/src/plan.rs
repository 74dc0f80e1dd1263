//! Remediation planning: findings become executable items.

use crate::dictionary::VariantDictionary;
use crate::scan::{Finding, ScanReport};
use serde::{Deserialize, Serialize};
use tagmend_inventory::TagMap;

/// One planned corrective action, derived 1:1 from a finding.
///
/// Carries the resource's full tag map (captured at planning time) and
/// the boundary id for context switching. Consumed by the executor and
/// discarded; never persisted. The captured value is a snapshot: live
/// edits between planning and execution are overwritten
/// (last-snapshot-wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationItem {
    pub boundary_id: String,
    pub boundary_name: String,
    pub resource_id: String,
    pub resource_name: String,
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_group: String,
    /// The non-canonical key, in stored casing: the delete target.
    pub key: String,
    /// Captured value, re-applied under the canonical key.
    pub value: String,
    /// True when the canonical key already exists on the resource.
    pub has_canonical: bool,
    /// Current value under the canonical key, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_value: Option<String>,
    /// Full tag map captured at planning time.
    pub tags: TagMap,
}

/// Errors from planning.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A finding references a resource the scan kept no snapshot for.
    /// Indicates a report assembled by hand, not by `collect_findings`.
    #[error("no tag snapshot for resource {0}")]
    MissingSnapshot(String),
}

/// Build remediation items from a scan report.
///
/// 1:1 and order-preserving: each finding gets its own item, including
/// several items for one resource carrying several variant keys — each
/// variant needs an independent delete.
pub fn plan_remediation(
    report: &ScanReport,
    dictionary: &VariantDictionary,
) -> Result<Vec<RemediationItem>, PlanError> {
    report
        .findings
        .iter()
        .map(|finding| {
            let tags = report
                .tags_for(&finding.resource_id)
                .ok_or_else(|| PlanError::MissingSnapshot(finding.resource_id.clone()))?;
            Ok(plan_item(finding, tags, dictionary))
        })
        .collect()
}

fn plan_item(finding: &Finding, tags: &TagMap, dictionary: &VariantDictionary) -> RemediationItem {
    let canonical_value = tags
        .iter()
        .find(|(key, _)| dictionary.is_canonical(key))
        .map(|(_, value)| value.clone());

    RemediationItem {
        boundary_id: finding.boundary_id.clone(),
        boundary_name: finding.boundary_name.clone(),
        resource_id: finding.resource_id.clone(),
        resource_name: finding.resource_name.clone(),
        resource_type: finding.resource_type.clone(),
        resource_group: finding.resource_group.clone(),
        key: finding.key.clone(),
        value: finding.value.clone(),
        has_canonical: finding.has_canonical,
        canonical_value,
        tags: tags.clone(),
    }
}

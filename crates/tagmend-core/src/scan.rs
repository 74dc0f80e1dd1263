//! Finding aggregation: one scan pass over every reachable boundary.

use crate::dictionary::VariantDictionary;
use crate::matcher::match_tags;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tagmend_inventory::{Boundary, InventoryError, InventorySource, TagMap};

/// A detected instance of a variant key on one resource.
///
/// Immutable provenance record: which boundary, which resource, which
/// stored key, and whether the canonical key also exists on the same
/// resource. A resource carrying several variant keys yields one finding
/// per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub boundary_id: String,
    pub boundary_name: String,
    pub resource_id: String,
    pub resource_name: String,
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_group: String,
    pub key: String,
    pub value: String,
    pub has_canonical: bool,
}

/// A boundary the scan could not enumerate, with the reason it was skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundarySkip {
    pub boundary: Boundary,
    pub reason: String,
}

/// Everything one scan pass produced.
///
/// Findings are ordered boundary-enumeration order, then resource order,
/// then dictionary order: deterministic given deterministic inputs, so
/// two scans over an unchanged inventory compare equal (`snapshot_ref`).
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub findings: Vec<Finding>,
    pub skipped_boundaries: Vec<BoundarySkip>,
    pub boundary_count: usize,
    pub resource_count: usize,
    tag_snapshots: BTreeMap<String, TagMap>,
}

impl ScanReport {
    /// Planning-time tag-map snapshot for a resource that produced findings.
    pub fn tags_for(&self, resource_id: &str) -> Option<&TagMap> {
        self.tag_snapshots.get(resource_id)
    }

    /// Content digest over the ordered findings list.
    ///
    /// Two audit passes with no interleaved mutation produce equal refs.
    pub fn snapshot_ref(&self) -> String {
        let mut hasher = Sha256::new();
        for finding in &self.findings {
            for component in [
                finding.boundary_id.as_str(),
                finding.resource_id.as_str(),
                finding.key.as_str(),
                finding.value.as_str(),
            ] {
                hasher.update(component.as_bytes());
                hasher.update([0]);
            }
            hasher.update([u8::from(finding.has_canonical)]);
        }
        format!("scan:{:x}", hasher.finalize())
    }
}

/// Scan every reachable boundary and collect findings.
///
/// Boundary-level enumeration failures (authorization, vanished boundary,
/// transport) skip that boundary and continue: the scan is best-effort
/// across boundaries, never silently partial — every skip is recorded.
/// Only the initial boundary listing is fatal.
pub fn collect_findings(
    source: &mut dyn InventorySource,
    dictionary: &VariantDictionary,
) -> Result<ScanReport, InventoryError> {
    let boundaries = source.list_boundaries()?;
    let mut report = ScanReport {
        boundary_count: boundaries.len(),
        ..ScanReport::default()
    };

    for boundary in boundaries {
        let resources = match source
            .set_active_boundary(&boundary.id)
            .and_then(|()| source.list_tagged_resources())
        {
            Ok(resources) => resources,
            Err(err) => {
                report.skipped_boundaries.push(BoundarySkip {
                    reason: err.to_string(),
                    boundary,
                });
                continue;
            }
        };

        for resource in resources {
            if !resource.has_tags() {
                continue;
            }
            report.resource_count += 1;

            let outcome = match_tags(&resource.tags, dictionary);
            if outcome.is_clean() {
                continue;
            }

            report
                .tag_snapshots
                .insert(resource.id.clone(), resource.tags.clone());
            for matched in outcome.matches {
                report.findings.push(Finding {
                    boundary_id: boundary.id.clone(),
                    boundary_name: boundary.name.clone(),
                    resource_id: resource.id.clone(),
                    resource_name: resource.name.clone(),
                    resource_type: resource.resource_type.clone(),
                    resource_group: resource.group.clone(),
                    key: matched.key,
                    value: matched.value,
                    has_canonical: outcome.has_canonical,
                });
            }
        }
    }

    Ok(report)
}

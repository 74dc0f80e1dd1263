//! # tagmend-report
//!
//! Reporting sink over scan findings: console table, CSV export, and
//! grouped per-key summaries. Rendering only — nothing here mutates or
//! re-reads the inventory.

pub mod csv;
pub mod table;

pub use csv::{ReportError, csv_field, export_csv};
pub use table::render_findings_table;

use tagmend_core::Finding;

/// One row of the grouped summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCount {
    pub key: String,
    pub count: usize,
}

/// Count findings per inconsistent key, descending, ties by key.
///
/// Grouping is by stored casing: `dept` and `DEPT` are separate rows,
/// since each names a distinct stored key the operator will see deleted.
pub fn group_by_key(findings: &[Finding]) -> Vec<KeyCount> {
    let mut counts: Vec<KeyCount> = Vec::new();
    for finding in findings {
        match counts.iter_mut().find(|entry| entry.key == finding.key) {
            Some(entry) => entry.count += 1,
            None => counts.push(KeyCount {
                key: finding.key.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    counts
}

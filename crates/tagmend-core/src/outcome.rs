//! Run outcome: per-item results and the final tallies.

use serde::{Deserialize, Serialize};

/// What happened to one remediation item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Delete and merge both succeeded.
    Remediated,
    /// Operator declined, the run was aborted, or a conflict blocked it.
    Skipped,
    /// Delete, merge, or the boundary switch failed.
    Errored,
}

/// One item's recorded outcome, in processing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    pub boundary_id: String,
    pub resource_id: String,
    pub resource_name: String,
    pub key: String,
    pub value: String,
    pub status: ItemStatus,
    /// Error message for `Errored`, skip reason for `Skipped`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Tallies plus the ordered per-item results.
///
/// Built incrementally during execution, emitted once at run end.
/// `remediated + skipped + errored` always equals the number of items
/// processed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunOutcome {
    pub remediated: usize,
    pub skipped: usize,
    pub errored: usize,
    pub results: Vec<ItemResult>,
}

impl RunOutcome {
    pub fn record(&mut self, result: ItemResult) {
        match result.status {
            ItemStatus::Remediated => self.remediated += 1,
            ItemStatus::Skipped => self.skipped += 1,
            ItemStatus::Errored => self.errored += 1,
        }
        self.results.push(result);
    }

    pub fn processed(&self) -> usize {
        self.remediated + self.skipped + self.errored
    }

    pub fn is_clean(&self) -> bool {
        self.errored == 0
    }
}

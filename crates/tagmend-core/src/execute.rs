//! Mutation executor: the two-phase rewrite, one item at a time.
//!
//! Strictly sequential. The mutation API is rate- and ordering-sensitive,
//! and the delete/settle/merge sequence for one item must never interleave
//! with another item's sequence against the same resource.

use crate::confirm::{ConfirmMode, ItemDecision, Prompt, apply_answer};
use crate::dictionary::VariantDictionary;
use crate::outcome::{ItemResult, ItemStatus, RunOutcome};
use crate::plan::RemediationItem;
use std::time::Duration;
use tagmend_inventory::{InventoryError, InventorySource, TagMutator, TagOperation};

/// Default pause between the delete and the merge, in seconds.
///
/// Some inventory back-ends are eventually consistent between a delete
/// and a following write to a different key on the same resource.
pub const DEFAULT_SETTLE_SECONDS: u64 = 10;

/// Upper bound on the configurable settling delay, in seconds.
pub const MAX_SETTLE_SECONDS: u64 = 300;

/// Execution knobs, injectable so tests run with a zero delay.
#[derive(Debug, Clone)]
pub struct ExecuteConfig {
    /// Pause between the delete and the merge of each item.
    pub settle_delay: Duration,
    /// When false, items whose canonical tag already exists are skipped
    /// instead of overwritten.
    pub overwrite_conflicts: bool,
}

impl Default for ExecuteConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_SECONDS),
            overwrite_conflicts: true,
        }
    }
}

/// Observer for per-item outcomes, called as each item completes.
///
/// Implementations print inline progress and append to the run log; the
/// executor itself only produces data.
pub trait RunListener {
    fn on_item(&mut self, index: usize, total: usize, result: &ItemResult) {
        let _ = (index, total, result);
    }
}

/// Listener that observes nothing.
#[derive(Debug, Default)]
pub struct NoopListener;

impl RunListener for NoopListener {}

/// Process every planned item under the selected confirmation mode.
///
/// Abort short-circuits before any mutation: every item is counted
/// skipped and nothing is touched. Otherwise each item is dispatched
/// through the gate, then applied: switch boundary if needed, delete the
/// variant key, wait the settling delay, merge the canonical key.
/// Failures are isolated per item — recorded, counted, and the run
/// continues with the next item. No automatic retry, no rollback: a
/// merge failure after a successful delete leaves the resource with
/// neither tag, which the recorded error makes visible.
pub fn execute_run<C>(
    client: &mut C,
    dictionary: &VariantDictionary,
    items: Vec<RemediationItem>,
    mode: ConfirmMode,
    prompt: &mut dyn Prompt,
    config: &ExecuteConfig,
    listener: &mut dyn RunListener,
) -> RunOutcome
where
    C: InventorySource + TagMutator,
{
    let total = items.len();
    let mut outcome = RunOutcome::default();
    let mut mode = mode;
    // Tracked active boundary; switched immediately before each item's
    // sequence, only when it differs.
    let mut active: Option<String> = None;

    for (index, item) in items.into_iter().enumerate() {
        let result = process_item(
            client,
            dictionary,
            item,
            &mut mode,
            prompt,
            config,
            &mut active,
        );
        listener.on_item(index, total, &result);
        outcome.record(result);
    }

    outcome
}

fn process_item<C>(
    client: &mut C,
    dictionary: &VariantDictionary,
    item: RemediationItem,
    mode: &mut ConfirmMode,
    prompt: &mut dyn Prompt,
    config: &ExecuteConfig,
    active: &mut Option<String>,
) -> ItemResult
where
    C: InventorySource + TagMutator,
{
    if *mode == ConfirmMode::Abort {
        return skipped(item, "run aborted before mutation");
    }

    if *mode == ConfirmMode::ConfirmEach {
        let answer = match prompt.ask(&item) {
            Ok(answer) => answer,
            Err(err) => {
                // Never mutate without an answer: abort the rest of the run.
                *mode = ConfirmMode::Abort;
                return skipped(item, &err.to_string());
            }
        };
        let (next_mode, decision) = apply_answer(*mode, answer);
        *mode = next_mode;
        if decision == ItemDecision::Skip {
            return skipped(item, "operator declined");
        }
    }

    if item.has_canonical && !config.overwrite_conflicts {
        return skipped(item, "canonical tag already present; overwrite disabled");
    }

    match apply_item(client, dictionary, &item, config, active) {
        Ok(()) => ItemResult {
            boundary_id: item.boundary_id,
            resource_id: item.resource_id,
            resource_name: item.resource_name,
            key: item.key,
            value: item.value,
            status: ItemStatus::Remediated,
            message: None,
        },
        Err(err) => ItemResult {
            boundary_id: item.boundary_id,
            resource_id: item.resource_id,
            resource_name: item.resource_name,
            key: item.key,
            value: item.value,
            status: ItemStatus::Errored,
            message: Some(err.to_string()),
        },
    }
}

fn apply_item<C>(
    client: &mut C,
    dictionary: &VariantDictionary,
    item: &RemediationItem,
    config: &ExecuteConfig,
    active: &mut Option<String>,
) -> Result<(), InventoryError>
where
    C: InventorySource + TagMutator,
{
    if active.as_deref() != Some(item.boundary_id.as_str()) {
        client.set_active_boundary(&item.boundary_id)?;
        *active = Some(item.boundary_id.clone());
    }

    client.mutate_tag(&item.resource_id, &item.key, &item.value, TagOperation::Delete)?;

    if !config.settle_delay.is_zero() {
        std::thread::sleep(config.settle_delay);
    }

    client.mutate_tag(
        &item.resource_id,
        dictionary.canonical_key(),
        &item.value,
        TagOperation::Merge,
    )?;
    Ok(())
}

fn skipped(item: RemediationItem, reason: &str) -> ItemResult {
    ItemResult {
        boundary_id: item.boundary_id,
        resource_id: item.resource_id,
        resource_name: item.resource_name,
        key: item.key,
        value: item.value,
        status: ItemStatus::Skipped,
        message: Some(reason.to_string()),
    }
}

//! End-to-end reconciliation runs over a deterministic in-memory inventory.
//!
//! Each test drives the full pipeline: scan → plan → confirm → execute →
//! outcome, the way the CLI wires it, with the settling delay at zero and
//! scripted operator answers.

use std::time::Duration;
use tagmend_core::{
    ConfirmMode, ExecuteConfig, ItemAnswer, ItemStatus, NoopListener, ScriptedPrompt,
    VariantDictionary, collect_findings, execute_run, plan_remediation,
};
use tagmend_inventory::{Boundary, MemoryInventory, Resource};

fn dictionary() -> VariantDictionary {
    VariantDictionary::new("DeptCode", ["Dept", "Department", "DeptId"])
        .expect("dictionary builds")
}

fn zero_delay() -> ExecuteConfig {
    ExecuteConfig {
        settle_delay: Duration::ZERO,
        overwrite_conflicts: true,
    }
}

fn resource(id: &str, tags: &[(&str, &str)]) -> Resource {
    Resource {
        id: id.to_string(),
        name: format!("vm-{id}"),
        resource_type: "Microsoft.Compute/virtualMachines".to_string(),
        group: "app-rg".to_string(),
        location: "westeurope".to_string(),
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// Two boundaries, mixed clean/dirty/conflicted resources.
fn sample_inventory() -> MemoryInventory {
    MemoryInventory::new()
        .with_boundary(
            Boundary::new("s1", "prod"),
            vec![
                resource("r-1", &[("Dept", "Finance"), ("DeptCode", "FIN001")]),
                resource("r-2", &[("DeptCode", "ENG")]),
                resource("r-3", &[("Dept", "HR"), ("DeptId", "HR02")]),
            ],
        )
        .with_boundary(
            Boundary::new("s2", "dev"),
            vec![resource("r-4", &[("department", "Ops")])],
        )
}

#[test]
fn full_remediation_pass_converges_the_inventory() {
    let mut client = sample_inventory();
    let dict = dictionary();

    let report = collect_findings(&mut client, &dict).expect("scan succeeds");
    assert_eq!(report.findings.len(), 4);

    let items = plan_remediation(&report, &dict).expect("planning succeeds");
    let outcome = execute_run(
        &mut client,
        &dict,
        items,
        ConfirmMode::ApplyAll,
        &mut ScriptedPrompt::default(),
        &zero_delay(),
        &mut NoopListener,
    );

    assert_eq!(outcome.remediated, 4);
    assert_eq!(outcome.processed(), 4);

    // r-1's conflict was overwritten with the snapshot value.
    let tags = client.tags_of("r-1").expect("resource exists");
    assert_eq!(tags.get("DeptCode").map(String::as_str), Some("Finance"));
    assert!(!tags.contains_key("Dept"));

    // r-3 carried two variants; the later one's merge wins.
    let tags = client.tags_of("r-3").expect("resource exists");
    assert_eq!(tags.get("DeptCode").map(String::as_str), Some("HR02"));
    assert!(!tags.contains_key("Dept"));
    assert!(!tags.contains_key("DeptId"));

    // The cross-boundary resource converged too.
    let tags = client.tags_of("r-4").expect("resource exists");
    assert_eq!(tags.get("DeptCode").map(String::as_str), Some("Ops"));

    // A fresh scan over the converged inventory is clean.
    let after = collect_findings(&mut client, &dict).expect("rescan succeeds");
    assert!(after.findings.is_empty());
}

#[test]
fn audit_pass_is_idempotent_and_never_mutates() {
    let mut client = sample_inventory();
    let dict = dictionary();

    let first = collect_findings(&mut client, &dict).expect("first scan");
    let second = collect_findings(&mut client, &dict).expect("second scan");

    assert_eq!(first.findings, second.findings);
    assert_eq!(first.snapshot_ref(), second.snapshot_ref());
    let tags = client.tags_of("r-1").expect("resource exists");
    assert!(tags.contains_key("Dept"));
}

#[test]
fn abort_produces_a_zero_change_summary() {
    let mut client = sample_inventory();
    let dict = dictionary();

    let report = collect_findings(&mut client, &dict).expect("scan succeeds");
    let items = plan_remediation(&report, &dict).expect("planning succeeds");
    let pending = items.len();

    let outcome = execute_run(
        &mut client,
        &dict,
        items,
        ConfirmMode::Abort,
        &mut ScriptedPrompt::default(),
        &zero_delay(),
        &mut NoopListener,
    );

    assert_eq!(outcome.remediated, 0);
    assert_eq!(outcome.skipped, pending);
    assert_eq!(outcome.errored, 0);

    let unchanged = collect_findings(&mut client, &dict).expect("rescan succeeds");
    assert_eq!(unchanged.snapshot_ref(), report.snapshot_ref());
}

#[test]
fn confirm_each_applies_answers_per_item_then_escalates() {
    let mut client = sample_inventory();
    let dict = dictionary();

    let report = collect_findings(&mut client, &dict).expect("scan succeeds");
    let items = plan_remediation(&report, &dict).expect("planning succeeds");

    // Skip the first item, escalate on the second; the remaining two
    // proceed without prompts.
    let mut prompt = ScriptedPrompt::new([ItemAnswer::Skip, ItemAnswer::AllRemaining]);
    let outcome = execute_run(
        &mut client,
        &dict,
        items,
        ConfirmMode::ConfirmEach,
        &mut prompt,
        &zero_delay(),
        &mut NoopListener,
    );

    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.remediated, 3);
    assert_eq!(outcome.results[0].status, ItemStatus::Skipped);

    // The skipped item's variant key survived.
    let tags = client.tags_of("r-1").expect("resource exists");
    assert!(tags.contains_key("Dept"));
}

#[test]
fn denied_boundary_limits_the_run_to_reachable_findings() {
    let mut client = sample_inventory().deny_boundary("s1");
    let dict = dictionary();

    let report = collect_findings(&mut client, &dict).expect("scan succeeds");
    assert_eq!(report.skipped_boundaries.len(), 1);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].resource_id, "r-4");

    let items = plan_remediation(&report, &dict).expect("planning succeeds");
    let outcome = execute_run(
        &mut client,
        &dict,
        items,
        ConfirmMode::ApplyAll,
        &mut ScriptedPrompt::default(),
        &zero_delay(),
        &mut NoopListener,
    );
    assert_eq!(outcome.remediated, 1);
}

#[test]
fn vanished_resource_is_an_item_level_error() {
    let mut client = sample_inventory();
    let dict = dictionary();

    let report = collect_findings(&mut client, &dict).expect("scan succeeds");
    let mut items = plan_remediation(&report, &dict).expect("planning succeeds");
    // Simulate a resource deleted between discovery and mutation.
    items[1].resource_id = "r-gone".to_string();

    let total = items.len();
    let outcome = execute_run(
        &mut client,
        &dict,
        items,
        ConfirmMode::ApplyAll,
        &mut ScriptedPrompt::default(),
        &zero_delay(),
        &mut NoopListener,
    );

    assert_eq!(outcome.errored, 1);
    assert_eq!(outcome.remediated, total - 1);
    assert_eq!(outcome.results[1].status, ItemStatus::Errored);
    assert!(outcome.results[1].message.as_deref().unwrap().contains("not found"));
}

use crate::support::{client_or_exit, load_config_or_exit, log_or_warn, open_log_or_exit, yes_no};
use chrono::Utc;
use serde_json::{Value, json};
use std::path::PathBuf;
use tagmend_audit::RunAction;
use tagmend_core::collect_findings;
use tagmend_report::{export_csv, group_by_key, render_findings_table};

pub fn run(config: String, log: Option<String>, csv: Option<String>, json_output: bool) {
    let config = load_config_or_exit(&config);
    let log_path = log.map(PathBuf::from).unwrap_or_else(|| config.log_path.clone());
    let mut client = client_or_exit();
    let mut run_log = open_log_or_exit(&log_path);

    log_or_warn(
        &mut run_log,
        RunAction::RunStarted {
            command: "audit".to_string(),
            mode: "read-only".to_string(),
            item_count: 0,
        },
    );

    let report = collect_findings(&mut client, &config.dictionary).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    for skip in &report.skipped_boundaries {
        eprintln!(
            "warning: skipped boundary {} ({}): {}",
            skip.boundary.name, skip.boundary.id, skip.reason
        );
        log_or_warn(
            &mut run_log,
            RunAction::BoundarySkipped {
                boundary_id: skip.boundary.id.clone(),
                boundary_name: skip.boundary.name.clone(),
                reason: skip.reason.clone(),
            },
        );
    }
    for finding in &report.findings {
        log_or_warn(
            &mut run_log,
            RunAction::FindingRecorded {
                boundary_id: finding.boundary_id.clone(),
                resource_id: finding.resource_id.clone(),
                key: finding.key.clone(),
                value: finding.value.clone(),
                has_canonical: finding.has_canonical,
            },
        );
    }
    let snapshot_ref = report.snapshot_ref();
    log_or_warn(
        &mut run_log,
        RunAction::ScanCompleted {
            boundary_count: report.boundary_count,
            resource_count: report.resource_count,
            finding_count: report.findings.len(),
            snapshot_ref: snapshot_ref.clone(),
        },
    );

    let csv_path = csv.map(|dir| {
        export_csv(&report.findings, &dir, Utc::now()).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        })
    });

    let groups = group_by_key(&report.findings);

    if json_output {
        let payload = json!({
            "canonicalKey": config.dictionary.canonical_key(),
            "boundaryCount": report.boundary_count,
            "resourceCount": report.resource_count,
            "findingCount": report.findings.len(),
            "findings": report.findings,
            "skippedBoundaries": report.skipped_boundaries,
            "groups": groups
                .iter()
                .map(|g| json!({ "key": g.key, "count": g.count }))
                .collect::<Vec<Value>>(),
            "snapshotRef": snapshot_ref,
            "csvPath": csv_path.as_ref().map(|p| p.display().to_string()),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
        return;
    }

    if report.findings.is_empty() {
        println!(
            "No inconsistent tags found across {} boundaries ({} tagged resources).",
            report.boundary_count, report.resource_count
        );
        return;
    }

    print!("{}", render_findings_table(&report.findings));
    println!();
    println!("Findings by tag:");
    for group in &groups {
        println!("  {}: {}", group.key, group.count);
    }
    println!();
    println!(
        "{} findings across {} boundaries ({} tagged resources)",
        report.findings.len(),
        report.boundary_count,
        report.resource_count
    );
    println!("  Snapshot: {snapshot_ref}");
    println!(
        "  Conflicts (canonical tag already set): {}",
        yes_no(report.findings.iter().any(|f| f.has_canonical))
    );
    if let Some(path) = csv_path {
        println!("  CSV: {}", path.display());
    }
}

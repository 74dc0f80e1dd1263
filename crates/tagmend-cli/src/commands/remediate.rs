use crate::support::{
    apply_settle_override_or_exit, client_or_exit, load_config_or_exit, log_or_warn,
    open_log_or_exit,
};
use serde_json::json;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tagmend_audit::{RunAction, RunLog};
use tagmend_core::{
    ConfirmMode, ExecuteConfig, ItemAnswer, ItemResult, ItemStatus, Prompt, PromptError,
    RemediationItem, RunListener, collect_findings, execute_run, parse_answer, plan_remediation,
};
use tagmend_report::render_findings_table;

pub struct Args {
    pub config: String,
    pub log: Option<String>,
    pub mode: Option<String>,
    pub settle_secs: Option<u64>,
    pub skip_conflicts: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let mut config = load_config_or_exit(&args.config);
    apply_settle_override_or_exit(&mut config, args.settle_secs);
    if args.skip_conflicts {
        config.overwrite_conflicts = false;
    }
    let log_path = args
        .log
        .map(PathBuf::from)
        .unwrap_or_else(|| config.log_path.clone());

    let mut client = client_or_exit();
    let mut run_log = open_log_or_exit(&log_path);

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

    let items = plan_remediation(&report, &config.dictionary).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if items.is_empty() {
        log_or_warn(
            &mut run_log,
            RunAction::RunFinished {
                remediated: 0,
                skipped: 0,
                errored: 0,
            },
        );
        if args.json {
            let payload = json!({ "remediated": 0, "skipped": 0, "errored": 0, "results": [] });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).expect("json serialization")
            );
        } else {
            println!("Nothing to remediate.");
        }
        return;
    }

    if !args.json {
        print!("{}", render_findings_table(&report.findings));
        println!();
    }

    let mode = match args.mode.as_deref() {
        Some(raw) => raw.parse::<ConfirmMode>().unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        }),
        None => select_mode_or_exit(items.len()),
    };

    log_or_warn(
        &mut run_log,
        RunAction::RunStarted {
            command: "remediate".to_string(),
            mode: mode.to_string(),
            item_count: items.len(),
        },
    );

    let exec_config = ExecuteConfig {
        settle_delay: config.settle_delay,
        overwrite_conflicts: config.overwrite_conflicts,
    };
    let mut prompt = StdinPrompt {
        canonical_key: config.dictionary.canonical_key().to_string(),
    };
    let mut listener = CliListener {
        log: &mut run_log,
        canonical_key: config.dictionary.canonical_key().to_string(),
        quiet: args.json,
    };
    let outcome = execute_run(
        &mut client,
        &config.dictionary,
        items,
        mode,
        &mut prompt,
        &exec_config,
        &mut listener,
    );

    log_or_warn(
        &mut run_log,
        RunAction::RunFinished {
            remediated: outcome.remediated,
            skipped: outcome.skipped,
            errored: outcome.errored,
        },
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "mode": mode.to_string(),
                "remediated": outcome.remediated,
                "skipped": outcome.skipped,
                "errored": outcome.errored,
                "results": outcome.results,
            }))
            .expect("json serialization")
        );
    } else {
        println!();
        println!(
            "Done: {} remediated, {} skipped, {} errored ({} processed)",
            outcome.remediated,
            outcome.skipped,
            outcome.errored,
            outcome.processed()
        );
        println!("  Log: {}", log_path.display());
    }

    if !outcome.is_clean() {
        std::process::exit(1);
    }
}

/// Interactive mode selection: re-prompts on malformed input, never
/// silently defaults.
fn select_mode_or_exit(item_count: usize) -> ConfirmMode {
    println!("{item_count} item(s) pending remediation.");
    let stdin = std::io::stdin();
    loop {
        print!("Mode [apply-all/confirm-each/abort]: ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                eprintln!("error: operator input unavailable; aborting without mutation");
                std::process::exit(1);
            }
            Ok(_) => {}
        }
        match line.parse::<ConfirmMode>() {
            Ok(mode) => return mode,
            Err(err) => println!("{err}"),
        }
    }
}

/// Stdin-backed item prompt for confirm-each runs.
struct StdinPrompt {
    canonical_key: String,
}

impl Prompt for StdinPrompt {
    fn ask(&mut self, item: &RemediationItem) -> Result<ItemAnswer, PromptError> {
        println!();
        println!("Boundary:  {} ({})", item.boundary_name, item.boundary_id);
        println!("Resource:  {} [{}]", item.resource_name, item.resource_type);
        if !item.resource_group.is_empty() {
            println!("Group:     {}", item.resource_group);
        }
        println!(
            "Rewrite:   {}={} -> {}={}",
            item.key, item.value, self.canonical_key, item.value
        );
        if item.has_canonical {
            match item.canonical_value.as_deref() {
                Some(existing) => println!(
                    "WARNING:   {} already set to `{existing}`; it will be overwritten",
                    self.canonical_key
                ),
                None => println!(
                    "WARNING:   {} already present; it will be overwritten",
                    self.canonical_key
                ),
            }
        }

        let stdin = std::io::stdin();
        loop {
            print!("Apply? [y]es / [n]o / [a]ll remaining: ");
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => return Err(PromptError("stdin closed".to_string())),
                Err(err) => return Err(PromptError(err.to_string())),
                Ok(_) => {}
            }
            match parse_answer(&line) {
                Some(answer) => return Ok(answer),
                None => println!("Unrecognized answer `{}`.", line.trim()),
            }
        }
    }
}

/// Prints inline progress and appends every outcome to the run log.
struct CliListener<'a> {
    log: &'a mut RunLog,
    canonical_key: String,
    quiet: bool,
}

impl RunListener for CliListener<'_> {
    fn on_item(&mut self, index: usize, total: usize, result: &ItemResult) {
        if !self.quiet {
            let position = format!("[{}/{total}]", index + 1);
            match result.status {
                ItemStatus::Remediated => println!(
                    "{position} remediated {}: {} -> {}",
                    result.resource_name, result.key, self.canonical_key
                ),
                ItemStatus::Skipped => println!(
                    "{position} skipped {}: {} ({})",
                    result.resource_name,
                    result.key,
                    result.message.as_deref().unwrap_or("no reason recorded")
                ),
                ItemStatus::Errored => eprintln!(
                    "{position} error on {}: {}: {}",
                    result.resource_name,
                    result.key,
                    result.message.as_deref().unwrap_or("unknown error")
                ),
            }
        }

        let action = match result.status {
            ItemStatus::Remediated => RunAction::ItemRemediated {
                boundary_id: result.boundary_id.clone(),
                resource_id: result.resource_id.clone(),
                key: result.key.clone(),
                value: result.value.clone(),
            },
            ItemStatus::Skipped => RunAction::ItemSkipped {
                boundary_id: result.boundary_id.clone(),
                resource_id: result.resource_id.clone(),
                key: result.key.clone(),
                reason: result.message.clone(),
            },
            ItemStatus::Errored => RunAction::ItemErrored {
                boundary_id: result.boundary_id.clone(),
                resource_id: result.resource_id.clone(),
                key: result.key.clone(),
                message: result.message.clone().unwrap_or_default(),
            },
        };
        log_or_warn(self.log, action);
    }
}

//! # tagmend-audit
//!
//! Persistent append-only run log: one JSON line per action or outcome.
//!
//! `tagmend.run_event.v1` is the minimal envelope: a schema tag, the run
//! id, a UTC timestamp, and the action payload. Every scan and every
//! remediation appends here; the log is the durable record operators
//! consult after a partial or interrupted run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const RUN_EVENT_SCHEMA: &str = "tagmend.run_event.v1";

fn default_run_event_schema() -> String {
    RUN_EVENT_SCHEMA.to_string()
}

/// One logged action. Flat string/counter payloads keep the log
/// readable with nothing but a JSONL viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RunAction {
    RunStarted {
        command: String,
        mode: String,
        item_count: usize,
    },
    BoundarySkipped {
        boundary_id: String,
        boundary_name: String,
        reason: String,
    },
    FindingRecorded {
        boundary_id: String,
        resource_id: String,
        key: String,
        value: String,
        has_canonical: bool,
    },
    ScanCompleted {
        boundary_count: usize,
        resource_count: usize,
        finding_count: usize,
        snapshot_ref: String,
    },
    ItemRemediated {
        boundary_id: String,
        resource_id: String,
        key: String,
        value: String,
    },
    ItemSkipped {
        boundary_id: String,
        resource_id: String,
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    ItemErrored {
        boundary_id: String,
        resource_id: String,
        key: String,
        message: String,
    },
    RunFinished {
        remediated: usize,
        skipped: usize,
        errored: usize,
    },
}

/// Envelope around one logged action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunEvent {
    #[serde(default = "default_run_event_schema")]
    pub schema: String,
    pub run_id: Uuid,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub action: RunAction,
}

/// Errors from run-log operations.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("line {0}: I/O error: {1}")]
    Io(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("line {line}: unsupported run-event schema: {schema}")]
    UnsupportedSchema { line: usize, schema: String },
}

/// Append-only writer over one run-log file.
///
/// Opening stamps a fresh run id; every event appended through this
/// handle carries it, so one file interleaves many runs and each run's
/// entries stay attributable.
#[derive(Debug)]
pub struct RunLog {
    run_id: Uuid,
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Open (creating parents and the file as needed) for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| AuditError::Io(0, format!("{}: {e}", parent.display())))?;
        }
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| AuditError::Io(0, format!("{}: {e}", path.display())))?;
        Ok(Self {
            run_id: Uuid::new_v4(),
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one action, stamped with the run id and the current time.
    pub fn append(&mut self, action: RunAction) -> Result<(), AuditError> {
        let event = RunEvent {
            schema: RUN_EVENT_SCHEMA.to_string(),
            run_id: self.run_id,
            at: Utc::now(),
            action,
        };
        let line =
            serde_json::to_string(&event).map_err(|e| AuditError::Serialize(e.to_string()))?;
        writeln!(self.file, "{line}")
            .map_err(|e| AuditError::Io(0, format!("{}: {e}", self.path.display())))?;
        self.file
            .flush()
            .map_err(|e| AuditError::Io(0, format!("{}: {e}", self.path.display())))
    }
}

/// Read run events from a JSONL reader. Blank lines and `#` comments
/// are skipped; an unknown schema is an error, not a silent skip.
pub fn read_events(reader: impl BufRead) -> Result<Vec<RunEvent>, AuditError> {
    let mut events = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AuditError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event: RunEvent = serde_json::from_str(trimmed)
            .map_err(|e| AuditError::Parse(line_no + 1, e.to_string()))?;
        if event.schema != RUN_EVENT_SCHEMA {
            return Err(AuditError::UnsupportedSchema {
                line: line_no + 1,
                schema: event.schema,
            });
        }
        events.push(event);
    }
    Ok(events)
}

/// Read run events from a JSONL file path.
pub fn read_events_from_path(path: impl AsRef<Path>) -> Result<Vec<RunEvent>, AuditError> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|e| AuditError::Io(0, format!("{}: {e}", path.display())))?;
    read_events(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "tagmend-audit-{prefix}-{}-{unique}.jsonl",
            std::process::id()
        ))
    }

    #[test]
    fn appended_events_read_back_in_order_with_one_run_id() {
        let path = temp_path("roundtrip");
        let mut log = RunLog::open(&path).expect("log opens");
        log.append(RunAction::RunStarted {
            command: "remediate".to_string(),
            mode: "apply-all".to_string(),
            item_count: 2,
        })
        .expect("append");
        log.append(RunAction::ItemRemediated {
            boundary_id: "s1".to_string(),
            resource_id: "r-1".to_string(),
            key: "Dept".to_string(),
            value: "HR".to_string(),
        })
        .expect("append");
        log.append(RunAction::RunFinished {
            remediated: 1,
            skipped: 1,
            errored: 0,
        })
        .expect("append");

        let events = read_events_from_path(&path).expect("read back");
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.run_id == log.run_id()));
        assert!(matches!(events[0].action, RunAction::RunStarted { .. }));
        assert!(matches!(events[2].action, RunAction::RunFinished { errored: 0, .. }));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn reopening_appends_instead_of_truncating() {
        let path = temp_path("append");
        let first_id = {
            let mut log = RunLog::open(&path).expect("first open");
            log.append(RunAction::ScanCompleted {
                boundary_count: 1,
                resource_count: 2,
                finding_count: 0,
                snapshot_ref: "scan:abc".to_string(),
            })
            .expect("append");
            log.run_id()
        };
        let mut log = RunLog::open(&path).expect("second open");
        log.append(RunAction::RunFinished {
            remediated: 0,
            skipped: 0,
            errored: 0,
        })
        .expect("append");

        let events = read_events_from_path(&path).expect("read back");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].run_id, first_id);
        assert_ne!(events[1].run_id, first_id);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn reader_skips_blank_lines_and_comments() {
        let input = "\n# operator note\n".to_string()
            + &serde_json::to_string(&RunEvent {
                schema: RUN_EVENT_SCHEMA.to_string(),
                run_id: Uuid::new_v4(),
                at: Utc::now(),
                action: RunAction::RunFinished {
                    remediated: 0,
                    skipped: 5,
                    errored: 0,
                },
            })
            .expect("serialize");
        let events = read_events(input.as_bytes()).expect("read");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let line = r#"{"schema":"tagmend.run_event.v9","run_id":"b4f8a3a0-0000-0000-0000-000000000000","at":"2026-01-01T00:00:00Z","action":"run_finished","remediated":0,"skipped":0,"errored":0}"#;
        let err = read_events(line.as_bytes()).expect_err("schema guard");
        assert!(matches!(err, AuditError::UnsupportedSchema { line: 1, .. }));
    }

    #[test]
    fn action_payloads_round_trip_through_serde() {
        let action = RunAction::ItemSkipped {
            boundary_id: "s1".to_string(),
            resource_id: "r-1".to_string(),
            key: "Dept".to_string(),
            reason: Some("operator declined".to_string()),
        };
        let json = serde_json::to_string(&action).expect("serialize");
        assert!(json.contains("\"action\":\"item_skipped\""));
        let back: RunAction = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, action);
    }
}

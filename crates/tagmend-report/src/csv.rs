//! CSV export with a timestamped filename.

use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tagmend_core::Finding;

/// Errors from writing a CSV export.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Write findings to `<dir>/tag-findings-YYYYMMDD-HHMMSS.csv`.
///
/// The timestamp is a parameter so callers (and tests) control the
/// filename; the CLI passes `Utc::now()`.
pub fn export_csv(
    findings: &[Finding],
    dir: impl AsRef<Path>,
    at: DateTime<Utc>,
) -> Result<PathBuf, ReportError> {
    let path = dir
        .as_ref()
        .join(format!("tag-findings-{}.csv", at.format("%Y%m%d-%H%M%S")));
    let file = File::create(&path).map_err(|e| ReportError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, findings).map_err(|e| ReportError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(path)
}

fn write_rows(writer: &mut impl Write, findings: &[Finding]) -> std::io::Result<()> {
    writeln!(
        writer,
        "BoundaryName,ResourceName,ResourceType,ResourceGroup,InconsistentTag,TagValue,HasCorrectTag"
    )?;
    for finding in findings {
        let cells = [
            finding.boundary_name.as_str(),
            finding.resource_name.as_str(),
            finding.resource_type.as_str(),
            finding.resource_group.as_str(),
            finding.key.as_str(),
            finding.value.as_str(),
            if finding.has_canonical { "yes" } else { "no" },
        ];
        let line: Vec<String> = cells.iter().map(|cell| csv_field(cell)).collect();
        writeln!(writer, "{}", line.join(","))?;
    }
    writer.flush()
}

/// Quote a field when it contains a comma, quote, or newline; embedded
/// quotes are doubled.
pub fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

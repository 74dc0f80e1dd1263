//! Console table rendering for findings.

use tagmend_core::Finding;

const HEADERS: [&str; 7] = [
    "Boundary",
    "Resource",
    "Type",
    "Group",
    "InconsistentTag",
    "Value",
    "HasCorrectTag",
];

/// Render findings as a fixed-width text table.
///
/// Column widths fit the widest cell. Returns a string ending in a
/// newline so callers can `print!` it directly.
pub fn render_findings_table(findings: &[Finding]) -> String {
    let rows: Vec<[String; 7]> = findings.iter().map(row).collect();

    let mut widths: [usize; 7] = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, &HEADERS.map(str::to_string));
    push_row(&mut out, &widths, &widths.map(|w| "-".repeat(w)));
    for row in &rows {
        push_row(&mut out, &widths, row);
    }
    out
}

fn row(finding: &Finding) -> [String; 7] {
    [
        finding.boundary_name.clone(),
        finding.resource_name.clone(),
        finding.resource_type.clone(),
        finding.resource_group.clone(),
        finding.key.clone(),
        finding.value.clone(),
        if finding.has_canonical { "yes" } else { "no" }.to_string(),
    ]
}

fn push_row(out: &mut String, widths: &[usize; 7], cells: &[String; 7]) {
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        // No trailing padding on the last column.
        if index < cells.len() - 1 {
            for _ in cell.chars().count()..*width {
                out.push(' ');
            }
        }
    }
    out.push('\n');
}

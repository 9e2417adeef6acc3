//! Output formatting for scan results.
//!
//! Supports two output formats:
//! - Pretty: colored log lines, one per missing docblock, plus `OK` lines
//!   for classes without findings
//! - JSON: one record per finding for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::detect::{ClassStatus, FileError, Finding, ScanReport};

// =============================================================================
// JSON Format
// =============================================================================

/// One JSON record per finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRecord {
    /// `class` or `method`
    #[serde(rename = "type")]
    pub kind: String,
    pub file: String,
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub line: usize,
}

impl From<&Finding> for JsonRecord {
    fn from(f: &Finding) -> Self {
        JsonRecord {
            kind: f.kind.report_type().to_string(),
            file: f.file.clone(),
            class: f.owner().to_string(),
            method: f.kind.is_function().then(|| f.name.clone()),
            line: f.line,
        }
    }
}

/// Build JSON records for every finding in report order.
pub fn json_records(report: &ScanReport) -> Vec<JsonRecord> {
    report.findings().map(JsonRecord::from).collect()
}

/// Write results as a JSON array.
pub fn write_json(report: &ScanReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&json_records(report))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// A single line of the pretty log.
#[derive(Debug)]
pub enum LogLine<'r> {
    Missing(&'r Finding),
    Clean(&'r ClassStatus),
    Skipped(&'r FileError),
}

/// Lines of the pretty log in output order.
///
/// Within a file, findings and `OK` lines are interleaved by line number.
/// Skipped files come last.
pub fn log_lines(report: &ScanReport, show_clean: bool) -> Vec<LogLine<'_>> {
    let mut lines = Vec::new();

    for file in &report.files {
        let mut entries: Vec<(usize, LogLine<'_>)> = file
            .findings
            .iter()
            .map(|f| (f.line, LogLine::Missing(f)))
            .collect();
        if show_clean {
            entries.extend(
                file.classes
                    .iter()
                    .filter(|c| c.clean)
                    .map(|c| (c.line, LogLine::Clean(c))),
            );
        }
        entries.sort_by_key(|(line, _)| *line);
        lines.extend(entries.into_iter().map(|(_, entry)| entry));
    }

    lines.extend(report.errors.iter().map(LogLine::Skipped));
    lines
}

/// Plain text of a log line, without color.
pub fn format_line(line: &LogLine<'_>) -> String {
    match line {
        LogLine::Missing(f) => format!("{}: {} - {}", f.file, f.line, f.message()),
        LogLine::Clean(c) => format!("{} OK", c.name),
        LogLine::Skipped(e) => format!("{}: skipped - {}", e.file, e.error),
    }
}

/// Write results in pretty (human-readable) format.
pub fn write_pretty(report: &ScanReport, show_clean: bool) {
    for line in log_lines(report, show_clean) {
        match &line {
            LogLine::Missing(_) => println!("{}", format_line(&line).red()),
            LogLine::Clean(c) => println!("{} {}", c.name, "OK".green()),
            LogLine::Skipped(_) => println!("{}", format_line(&line).yellow()),
        }
    }

    write_summary(report);
}

fn write_summary(report: &ScanReport) {
    let count = report.finding_count();
    let files = report.scanned();
    println!();
    print!(
        "  {}",
        format!(
            "{} file{} scanned",
            files,
            if files == 1 { "" } else { "s" }
        )
        .dimmed()
    );
    if !report.errors.is_empty() {
        print!(
            "  {}",
            format!("({} skipped)", report.errors.len()).yellow()
        );
    }
    print!("  ");
    if count == 0 {
        print!("{}", "no missing docblocks".green());
    } else {
        let label = format!(
            "{} missing docblock{}",
            count,
            if count == 1 { "" } else { "s" }
        );
        print!("{}", label.red().bold());
    }
    println!();
}

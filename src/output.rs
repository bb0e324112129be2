//! CLI output formatting for the run report.
//!
//! # Output Format
//!
//! ```text
//! Summary
//!     list: 3 done
//!     download: 12 done, 1 failed
//!     normalize: 9 done
//!     transcode: 2 done
//!     upload: 8 done, 1 failed
//!
//! Failures (2)
//! 001 download disk:/Shop/broken.jpg
//!     Error: Transfer error: API error 503 for disk:/Shop/broken.jpg: ...
//! 002 upload disk:/Shop/Bags/sj_4.jpg
//!     Error: Transfer error: ...
//! ```
//!
//! Stages with no recorded operations are left out. A clean run ends with
//! `No failures` instead of the failure list.
//!
//! # Architecture
//!
//! [`format_report`] returns `Vec<String>` for testability and
//! [`print_report`] writes it to stdout. Formatting is pure: no I/O.

use crate::report::{Outcome, RunReport, Stage};

const STAGES: [Stage; 5] = [
    Stage::List,
    Stage::Download,
    Stage::Normalize,
    Stage::Transcode,
    Stage::Upload,
];

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn stage_line(report: &RunReport, stage: Stage) -> Option<String> {
    let (done, failed) = report
        .entries()
        .iter()
        .filter(|e| e.stage == stage)
        .fold((0, 0), |(done, failed), e| match e.outcome {
            Outcome::Done => (done + 1, failed),
            Outcome::Failed(_) => (done, failed + 1),
        });

    match (done, failed) {
        (0, 0) => None,
        (done, 0) => Some(format!("    {stage}: {done} done")),
        (done, failed) => Some(format!("    {stage}: {done} done, {failed} failed")),
    }
}

/// Format the end-of-run summary and failure list.
pub fn format_report(report: &RunReport) -> Vec<String> {
    let mut lines = vec!["Summary".to_string()];
    let stage_lines: Vec<String> = STAGES
        .iter()
        .filter_map(|&stage| stage_line(report, stage))
        .collect();
    if stage_lines.is_empty() {
        lines.push("    nothing to do".to_string());
    }
    lines.extend(stage_lines);
    lines.push(String::new());

    let failures: Vec<_> = report.failures().collect();
    if failures.is_empty() {
        lines.push("No failures".to_string());
        return lines;
    }

    lines.push(format!("Failures ({})", failures.len()));
    for (i, entry) in failures.iter().enumerate() {
        lines.push(format!(
            "{} {} {}",
            format_index(i + 1),
            entry.stage,
            entry.subject
        ));
        if let Outcome::Failed(reason) = &entry.outcome {
            lines.push(format!("    Error: {reason}"));
        }
    }
    lines
}

/// Print the run report to stdout.
pub fn print_report(report: &RunReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

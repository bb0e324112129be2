//! Per-run outcome report and the failure-isolation policy.
//!
//! Every per-file operation (list, download, normalize, transcode, upload)
//! goes through [`RunReport::settle`]. The outcome is recorded, and then:
//!
//! - by default the failure is logged and swallowed, so the batch continues;
//! - with `fail_fast` the failure is returned and the run aborts.
//!
//! Either way the report ends up with one `(subject, stage, outcome)` entry
//! per attempted operation, in the order they ran.

use crate::error::{Error, Result};
use std::fmt;

/// Pipeline step an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    List,
    Download,
    Normalize,
    Transcode,
    Upload,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::List => "list",
            Stage::Download => "download",
            Stage::Normalize => "normalize",
            Stage::Transcode => "transcode",
            Stage::Upload => "upload",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Local or remote path the operation acted on.
    pub subject: String,
    pub stage: Stage,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct RunReport {
    entries: Vec<ReportEntry>,
    fail_fast: bool,
}

impl RunReport {
    pub fn new(fail_fast: bool) -> Self {
        Self {
            entries: Vec::new(),
            fail_fast,
        }
    }

    /// Record the outcome of one operation and apply the isolation policy.
    ///
    /// Returns `Ok(Some(value))` on success, `Ok(None)` for an isolated
    /// failure, and `Err` only when `fail_fast` is set.
    pub fn settle<T, E>(
        &mut self,
        stage: Stage,
        subject: impl Into<String>,
        result: std::result::Result<T, E>,
    ) -> Result<Option<T>>
    where
        E: Into<Error>,
    {
        let subject = subject.into();
        match result {
            Ok(value) => {
                self.entries.push(ReportEntry {
                    subject,
                    stage,
                    outcome: Outcome::Done,
                });
                Ok(Some(value))
            }
            Err(err) => {
                let err: Error = err.into();
                tracing::warn!(%stage, %subject, error = %err, "operation failed");
                self.entries.push(ReportEntry {
                    subject,
                    stage,
                    outcome: Outcome::Failed(err.to_string()),
                });
                if self.fail_fast { Err(err) } else { Ok(None) }
            }
        }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Failed(_)))
    }

    /// Successful operations of one stage.
    pub fn done(&self, stage: Stage) -> usize {
        self.entries
            .iter()
            .filter(|e| e.stage == stage && e.outcome == Outcome::Done)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    SkippedFiltered,
    SkippedDuplicate,
    Failed,
    ParseError,
    /// Never claimed by a worker because the batch was stopped first.
    Cancelled,
}

impl OutcomeStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::SkippedFiltered => "skipped (filtered)",
            Self::SkippedDuplicate => "skipped (already applied)",
            Self::Failed => "failed",
            Self::ParseError => "parse error",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::ParseError)
    }

    pub fn is_skip(self) -> bool {
        matches!(self, Self::SkippedFiltered | Self::SkippedDuplicate)
    }
}

/// Per-file record handed to the report layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    path: PathBuf,
    status: OutcomeStatus,
    detail: Option<String>,
}

impl FileOutcome {
    pub fn new(path: impl Into<PathBuf>, status: OutcomeStatus, detail: Option<String>) -> Self {
        Self {
            path: path.into(),
            status,
            detail,
        }
    }

    pub(crate) fn cancelled(path: impl Into<PathBuf>) -> Self {
        Self::new(path, OutcomeStatus::Cancelled, None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    /// Error text for failures, the filter that did not hold for skips, the rendered diff for
    /// successful edits.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped_filtered: usize,
    pub skipped_duplicate: usize,
    pub failed: usize,
    pub parse_errors: usize,
    pub cancelled: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            let counter = match outcome.status {
                OutcomeStatus::Succeeded => &mut summary.succeeded,
                OutcomeStatus::SkippedFiltered => &mut summary.skipped_filtered,
                OutcomeStatus::SkippedDuplicate => &mut summary.skipped_duplicate,
                OutcomeStatus::Failed => &mut summary.failed,
                OutcomeStatus::ParseError => &mut summary.parse_errors,
                OutcomeStatus::Cancelled => &mut summary.cancelled,
            };
            *counter += 1;
        }
        summary
    }

    pub fn skipped(&self) -> usize {
        self.skipped_filtered + self.skipped_duplicate
    }
}

/// Coarse result of a batch for the CLI layer, which maps it to a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitCategory {
    NoMatchingFiles,
    Failures,
    Interrupted,
    AllSkipped,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    outcomes: Vec<FileOutcome>,
    summary: BatchSummary,
    dry_run: bool,
}

impl BatchReport {
    pub fn new(outcomes: Vec<FileOutcome>, dry_run: bool) -> Self {
        let summary = BatchSummary::from_outcomes(&outcomes);
        Self {
            outcomes,
            summary,
            dry_run,
        }
    }

    /// Outcomes in input order.
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn summary(&self) -> &BatchSummary {
        &self.summary
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn category(&self) -> ExitCategory {
        let summary = &self.summary;
        if summary.total == 0 {
            ExitCategory::NoMatchingFiles
        } else if summary.failed + summary.parse_errors > 0 {
            ExitCategory::Failures
        } else if summary.cancelled > 0 {
            ExitCategory::Interrupted
        } else if summary.succeeded == 0 {
            ExitCategory::AllSkipped
        } else {
            ExitCategory::Success
        }
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural checks over a set of diagrams: required groups and participants, forbidden groups.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rayon::prelude::*;
use serde::Serialize;

use crate::batch::SourceDocument;
use crate::model::Document;
use crate::query::{find_group, first_failing, has_group, has_participant, Predicate};

use super::render::{to_json, ReportError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRules {
    pub required_groups: Vec<String>,
    pub required_participants: Vec<String>,
    pub forbidden_groups: Vec<String>,
    /// Files where any of these does not hold are reported as skipped.
    pub only_if: Vec<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pass,
    Fail,
    Warning,
    Skipped,
}

impl ValidationStatus {
    fn symbol(self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Fail => "✗",
            Self::Warning | Self::Skipped => "·",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    path: PathBuf,
    status: ValidationStatus,
    checks_passed: usize,
    checks_failed: usize,
    messages: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            status: ValidationStatus::Pass,
            checks_passed: 0,
            checks_failed: 0,
            messages: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn check(&mut self, ok: bool, failure: impl FnOnce() -> String) {
        if ok {
            self.checks_passed += 1;
        } else {
            self.checks_failed += 1;
            self.messages.push(failure());
        }
    }

    fn finish(mut self) -> Self {
        self.status = if self.checks_failed > 0 {
            ValidationStatus::Fail
        } else if !self.warnings.is_empty() {
            ValidationStatus::Warning
        } else {
            ValidationStatus::Pass
        };
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub fn checks_passed(&self) -> usize {
        self.checks_passed
    }

    pub fn checks_failed(&self) -> usize {
        self.checks_failed
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

pub fn validate_document(path: &Path, doc: &Document, rules: &ValidationRules) -> ValidationResult {
    let mut result = ValidationResult::new(path);
    let index = doc.index();

    if let Some(err) = index.malformed() {
        result.check(false, || format!("document is malformed: {err}"));
        return result.finish();
    }

    if let Some(failing) = first_failing(&rules.only_if, doc) {
        result.status = ValidationStatus::Skipped;
        result.messages.push(format!("filter not met: {failing}"));
        return result;
    }

    for name in &rules.required_groups {
        result.check(has_group(index, name), || {
            format!("missing required group '{name}'")
        });
    }
    for alias in &rules.required_participants {
        result.check(has_participant(index, alias), || {
            format!("missing required participant '{alias}'")
        });
    }
    for name in &rules.forbidden_groups {
        let found = find_group(index, name).map(|(_, group)| group.start_line() + 1);
        result.check(found.is_none(), || {
            format!(
                "forbidden group '{name}' present on line {}",
                found.unwrap_or_default()
            )
        });
    }

    result
        .warnings
        .extend(index.warnings().iter().map(ToString::to_string));
    if !index.has_start_tag() {
        result.warnings.push("missing @startuml".to_owned());
    }
    if !index.has_end_tag() {
        result.warnings.push("missing @enduml".to_owned());
    }
    result.finish()
}

pub fn validate_source(source: &SourceDocument, rules: &ValidationRules) -> ValidationResult {
    match source.text() {
        Ok(text) => validate_document(source.path(), &Document::parse(text), rules),
        Err(err) => {
            let mut result = ValidationResult::new(source.path());
            result.check(false, || format!("cannot read file: {err}"));
            result.finish()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub total_files: usize,
    pub files_passed: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    summary: ValidationSummary,
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn new(results: Vec<ValidationResult>) -> Self {
        let count = |wanted: &[ValidationStatus]| {
            results
                .iter()
                .filter(|result| wanted.contains(&result.status))
                .count()
        };
        let summary = ValidationSummary {
            total_files: results.len(),
            files_passed: count(&[ValidationStatus::Pass, ValidationStatus::Warning]),
            files_failed: count(&[ValidationStatus::Fail]),
            files_skipped: count(&[ValidationStatus::Skipped]),
        };
        Self { summary, results }
    }

    pub fn summary(&self) -> &ValidationSummary {
        &self.summary
    }

    /// Results in input order.
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    pub fn has_failures(&self) -> bool {
        self.summary.files_failed > 0
    }
}

/// Validates every source in parallel; results keep input order.
pub fn validate_all(sources: &[SourceDocument], rules: &ValidationRules) -> ValidationReport {
    let results = sources
        .par_iter()
        .map(|source| validate_source(source, rules))
        .collect();
    ValidationReport::new(results)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ValidationFormat {
    #[default]
    Table,
    Json,
    Simple,
}

pub fn render_validation(
    report: &ValidationReport,
    format: ValidationFormat,
    verbose: bool,
) -> Result<String, ReportError> {
    let mut out = String::new();
    match format {
        ValidationFormat::Json => return to_json(report),
        ValidationFormat::Simple => {
            for result in &report.results {
                let _ = writeln!(out, "{} {}", result.status.symbol(), result.path.display());
            }
        }
        ValidationFormat::Table => {
            let rule = "=".repeat(80);
            let _ = writeln!(out, "Validation Results\n{rule}");
            for result in &report.results {
                if result.status == ValidationStatus::Skipped && !verbose {
                    continue;
                }
                let _ = writeln!(out, "{} {}", result.status.symbol(), result.path.display());
                if verbose || result.status == ValidationStatus::Fail {
                    for message in &result.messages {
                        let _ = writeln!(out, "  {message}");
                    }
                    for warning in &result.warnings {
                        let _ = writeln!(out, "  ⚠ {warning}");
                    }
                }
            }
            let summary = &report.summary;
            let _ = writeln!(
                out,
                "{rule}\nTotal files: {}\nPassed: {}\nFailed: {}\nSkipped: {}",
                summary.total_files,
                summary.files_passed,
                summary.files_failed,
                summary.files_skipped
            );
        }
    }
    Ok(out)
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Batch coordinator: runs the parse, filter, mutate, emit pipeline over many documents.
//!
//! Each document is processed independently on a bounded rayon pool. Workers claim documents in
//! input order from a shared counter and write into a pre-sized slot, so the report order never
//! depends on completion order and a stopped batch always covers a prefix of the input.

mod outcome;

use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::model::Document;
use crate::ops::{self, Instruction, InstructionError};
use crate::query::{first_failing, Predicate};

pub use outcome::{BatchReport, BatchSummary, ExitCategory, FileOutcome, OutcomeStatus};

/// Only-if filters (all must hold) plus the skip-if-exists marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub only_if_has_participant: Vec<String>,
    pub only_if_has_group: Vec<String>,
    pub skip_if_exists: Option<String>,
}

impl Filters {
    pub fn only_if_predicates(&self) -> Vec<Predicate> {
        self.only_if_has_participant
            .iter()
            .cloned()
            .map(Predicate::HasParticipant)
            .chain(
                self.only_if_has_group
                    .iter()
                    .cloned()
                    .map(Predicate::HasGroup),
            )
            .collect()
    }

    pub fn skip_predicate(&self) -> Option<Predicate> {
        self.skip_if_exists.clone().map(Predicate::ContainsText)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchConfig {
    /// File pattern the documents were discovered with; only used for reporting.
    pub pattern: String,
    pub filters: Filters,
    pub dry_run: bool,
    pub backup: bool,
    /// Worker count; `None` uses the available parallelism.
    pub jobs: Option<NonZeroUsize>,
}

/// Opaque failure reported by an I/O collaborator. The coordinator records it without
/// inspecting the cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorError {
    message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::new(err.to_string())
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CollaboratorError {}

/// A discovered file and its contents, or the reason it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    path: PathBuf,
    text: Result<String, CollaboratorError>,
}

impl SourceDocument {
    pub fn loaded(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: Ok(text.into()),
        }
    }

    pub fn unreadable(path: impl Into<PathBuf>, err: CollaboratorError) -> Self {
        Self {
            path: path.into(),
            text: Err(err),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> Result<&str, &CollaboratorError> {
        self.text.as_deref()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WriteRequest<'a> {
    pub path: &'a Path,
    pub original: &'a str,
    pub updated: &'a str,
    pub backup: bool,
}

/// Accepts final text in apply mode. Implementations own atomicity and backups.
pub trait DocumentSink: Sync {
    fn commit(&self, request: &WriteRequest<'_>) -> Result<(), CollaboratorError>;
}

/// Renders the change between two revisions of one file.
pub trait DiffRenderer: Sync {
    fn render(&self, path: &Path, original: &str, updated: &str) -> String;
}

#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub sink: &'a dyn DocumentSink,
    pub diff: &'a dyn DiffRenderer,
}

/// Cooperative cancellation, checked before each document is claimed.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub enum BatchError {
    /// The instruction cannot apply to any document; nothing was processed.
    Instruction(InstructionError),
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instruction(source) => write!(f, "invalid instruction: {source}"),
            Self::ThreadPool(source) => write!(f, "cannot start worker pool: {source}"),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Instruction(source) => Some(source),
            Self::ThreadPool(source) => Some(source),
        }
    }
}

fn worker_count(config: &BatchConfig, documents: usize) -> usize {
    let requested = config.jobs.map_or_else(
        || std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
        NonZeroUsize::get,
    );
    requested.clamp(1, documents.max(1))
}

/// Runs `instruction` over `documents` and returns one outcome per document, in input order.
///
/// Per-document problems never abort the batch. Only an instruction that fails validation (or a
/// worker pool that cannot start) is an error, and in that case no document is touched.
pub fn run_batch(
    config: &BatchConfig,
    instruction: &Instruction,
    documents: &[SourceDocument],
    collaborators: Collaborators<'_>,
    stop: &StopSignal,
) -> Result<BatchReport, BatchError> {
    instruction.validate().map_err(BatchError::Instruction)?;

    if documents.is_empty() {
        info!(pattern = %config.pattern, "no files matched");
        return Ok(BatchReport::new(Vec::new(), config.dry_run));
    }

    let jobs = worker_count(config, documents.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .thread_name(|idx| format!("seqsplice-worker-{idx}"))
        .build()
        .map_err(BatchError::ThreadPool)?;

    info!(
        operation = %instruction.describe(),
        files = documents.len(),
        jobs,
        dry_run = config.dry_run,
        "starting batch"
    );

    let slots: Vec<OnceLock<FileOutcome>> = documents.iter().map(|_| OnceLock::new()).collect();
    let next = AtomicUsize::new(0);

    {
        let slots = &slots;
        let next = &next;
        pool.scope(|scope| {
            for _ in 0..jobs {
                scope.spawn(move |_| loop {
                    if stop.is_stopped() {
                        break;
                    }
                    let idx = next.fetch_add(1, Ordering::SeqCst);
                    let Some(source) = documents.get(idx) else {
                        break;
                    };
                    let outcome = process_document(config, instruction, source, collaborators);
                    let _ = slots[idx].set(outcome);
                });
            }
        });
    }

    let outcomes: Vec<FileOutcome> = slots
        .into_iter()
        .zip(documents)
        .map(|(slot, source)| {
            slot.into_inner()
                .unwrap_or_else(|| FileOutcome::cancelled(source.path()))
        })
        .collect();

    let report = BatchReport::new(outcomes, config.dry_run);
    let summary = report.summary();
    if summary.cancelled > 0 {
        warn!(cancelled = summary.cancelled, "batch stopped before all files were processed");
    }
    info!(
        succeeded = summary.succeeded,
        skipped = summary.skipped(),
        failed = summary.failed,
        parse_errors = summary.parse_errors,
        "batch finished"
    );
    Ok(report)
}

/// The single-document pipeline: parse, reject malformed input, apply only-if filters, honor
/// skip-if-exists, mutate, then hand the result to the sink (or the diff renderer in dry-run).
///
/// Both modes render the outcome diff from the same new text, so a dry run reports exactly the
/// change an apply run writes.
pub fn process_document(
    config: &BatchConfig,
    instruction: &Instruction,
    source: &SourceDocument,
    collaborators: Collaborators<'_>,
) -> FileOutcome {
    let path = source.path();
    let outcome = match source.text() {
        Ok(text) => run_pipeline(config, instruction, path, text, collaborators),
        Err(err) => FileOutcome::new(path, OutcomeStatus::Failed, Some(err.to_string())),
    };
    debug!(
        path = %path.display(),
        status = outcome.status().label(),
        "processed document"
    );
    outcome
}

fn run_pipeline(
    config: &BatchConfig,
    instruction: &Instruction,
    path: &Path,
    text: &str,
    collaborators: Collaborators<'_>,
) -> FileOutcome {
    let doc = Document::parse(text);
    if let Some(err) = doc.index().malformed() {
        return FileOutcome::new(path, OutcomeStatus::ParseError, Some(err.to_string()));
    }

    let only_if = config.filters.only_if_predicates();
    if let Some(failing) = first_failing(&only_if, &doc) {
        return FileOutcome::new(
            path,
            OutcomeStatus::SkippedFiltered,
            Some(format!("filter not met: {failing}")),
        );
    }

    if let Some(marker) = config.filters.skip_predicate() {
        if marker.holds(&doc) {
            return FileOutcome::new(
                path,
                OutcomeStatus::SkippedDuplicate,
                Some(format!("already applied: {marker}")),
            );
        }
    }

    let updated = match ops::apply(&doc, instruction) {
        Ok(updated) => updated.render(),
        Err(err) => return FileOutcome::new(path, OutcomeStatus::Failed, Some(err.to_string())),
    };
    let diff = collaborators.diff.render(path, text, &updated);

    if !config.dry_run {
        let request = WriteRequest {
            path,
            original: text,
            updated: &updated,
            backup: config.backup,
        };
        if let Err(err) = collaborators.sink.commit(&request) {
            return FileOutcome::new(path, OutcomeStatus::Failed, Some(err.to_string()));
        }
    }

    FileOutcome::new(path, OutcomeStatus::Succeeded, Some(diff))
}

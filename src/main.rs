// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Seqsplice CLI entrypoint.
//!
//! Batch commands (`insert-after`, `add-participant`, `remove-group`, `replace-group`) discover
//! files, run the edit over each one and print a per-file outcome table. `validate` and `report`
//! are read-only.

use std::error::Error;
use std::fs;
use std::io::{self, Write as _};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, warn, Level};

use seqsplice::batch::{
    run_batch, BatchConfig, Collaborators, ExitCategory, Filters, SourceDocument, StopSignal,
};
use seqsplice::model::Document;
use seqsplice::ops::{Instruction, ParticipantAnchor};
use seqsplice::query::Predicate;
use seqsplice::report::{
    group_rows, participant_rows, render_listing, render_matrix, render_outcomes,
    render_structure, render_validation, validate_all, ListFormat, OutcomeFormat,
    StructureFormat, StructureView, UnifiedDiff, ValidationFormat, ValidationRules,
};
use seqsplice::store::{self, FileSink, WriteDurability};

const EXIT_FAILURES: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_NO_FILES: u8 = 3;
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "seqsplice")]
#[command(
    about = "Structure-aware batch editing for PlantUML sequence diagrams",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Debug logging, and print diffs for applied edits
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Insert a block of lines after a named group
    InsertAfter(InsertAfterArgs),

    /// Add a participant declaration
    AddParticipant(AddParticipantArgs),

    /// Remove a named group, from its opening line through its `end`
    RemoveGroup(RemoveGroupArgs),

    /// Replace the body of a named group
    ReplaceGroup(ReplaceGroupArgs),

    /// Check that diagrams contain required structures
    Validate(ValidateArgs),

    /// Print listings of diagram structure
    #[command(subcommand)]
    Report(ReportCommand),
}

#[derive(Args)]
struct BatchArgs {
    /// Glob pattern for files to process
    #[arg(long)]
    pattern: String,

    /// Skip files that already contain this text
    #[arg(long)]
    skip_if_exists: Option<String>,

    /// Only process files declaring this participant alias (repeatable)
    #[arg(long)]
    only_if_has_participant: Vec<String>,

    /// Only process files containing this group (repeatable)
    #[arg(long)]
    only_if_has_group: Vec<String>,

    /// Show changes without writing them
    #[arg(long)]
    dry_run: bool,

    /// Keep a `<file>.bak` copy of each modified file
    #[arg(long)]
    backup: bool,

    /// Worker threads (default: available parallelism)
    #[arg(long)]
    jobs: Option<NonZeroUsize>,

    /// Sync written files to stable storage where supported
    #[arg(long)]
    durable_writes: bool,

    #[arg(long, value_enum, default_value_t = OutcomeFormat::Table)]
    format: OutcomeFormat,
}

impl BatchArgs {
    fn config(&self) -> BatchConfig {
        BatchConfig {
            pattern: self.pattern.clone(),
            filters: Filters {
                only_if_has_participant: self.only_if_has_participant.clone(),
                only_if_has_group: self.only_if_has_group.clone(),
                skip_if_exists: self.skip_if_exists.clone(),
            },
            dry_run: self.dry_run,
            backup: self.backup,
            jobs: self.jobs,
        }
    }

    fn durability(&self) -> WriteDurability {
        if self.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        }
    }
}

#[derive(Args)]
struct InsertAfterArgs {
    #[command(flatten)]
    batch: BatchArgs,

    /// Name of the group to insert after
    #[arg(long)]
    after_group: String,

    /// File containing the lines to insert
    #[arg(long)]
    block_file: PathBuf,
}

#[derive(Args)]
struct AddParticipantArgs {
    #[command(flatten)]
    batch: BatchArgs,

    /// Participant declaration, e.g. `participant "Auth" as Auth #LightBlue`
    #[arg(long)]
    participant: String,

    /// Insert after this participant alias
    #[arg(long, conflicts_with = "before_participant")]
    after_participant: Option<String>,

    /// Insert before this participant alias
    #[arg(long)]
    before_participant: Option<String>,
}

#[derive(Args)]
struct RemoveGroupArgs {
    #[command(flatten)]
    batch: BatchArgs,

    #[arg(long)]
    group: String,
}

#[derive(Args)]
struct ReplaceGroupArgs {
    #[command(flatten)]
    batch: BatchArgs,

    #[arg(long)]
    group: String,

    /// File containing the new body lines
    #[arg(long)]
    body_file: PathBuf,
}

#[derive(Args)]
struct ValidateArgs {
    /// Glob pattern for files to validate
    #[arg(long)]
    pattern: String,

    /// Group that must be present (repeatable)
    #[arg(long)]
    require_group: Vec<String>,

    /// Participant alias that must be declared (repeatable)
    #[arg(long)]
    require_participant: Vec<String>,

    /// Group that must not be present (repeatable)
    #[arg(long)]
    forbid_group: Vec<String>,

    #[arg(long)]
    only_if_has_participant: Vec<String>,

    #[arg(long)]
    only_if_has_group: Vec<String>,

    #[arg(long, value_enum, default_value_t = ValidationFormat::Table)]
    report_format: ValidationFormat,
}

#[derive(Subcommand)]
enum ReportCommand {
    /// List named groups in matching files
    Groups {
        #[arg(long)]
        pattern: String,
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },
    /// List participants in matching files
    Participants {
        #[arg(long)]
        pattern: String,
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },
    /// Show the block tree of a single file
    Structure {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = StructureFormat::Tree)]
        format: StructureFormat,
    },
    /// Show which files contain which groups
    Matrix {
        #[arg(long)]
        pattern: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command, cli.verbose) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command, verbose: bool) -> Result<ExitCode, Box<dyn Error>> {
    match command {
        Command::InsertAfter(args) => {
            let instruction = Instruction::InsertBlockAfterGroup {
                group_name: args.after_group,
                block_lines: read_lines(&args.block_file)?,
            };
            run_batch_command(&args.batch, &instruction, verbose)
        }
        Command::AddParticipant(args) => {
            let anchor = match (args.after_participant, args.before_participant) {
                (Some(alias), _) => ParticipantAnchor::After(alias),
                (None, Some(alias)) => ParticipantAnchor::Before(alias),
                (None, None) => ParticipantAnchor::End,
            };
            let instruction = Instruction::InsertParticipant {
                declaration: args.participant,
                anchor,
            };
            run_batch_command(&args.batch, &instruction, verbose)
        }
        Command::RemoveGroup(args) => {
            let instruction = Instruction::RemoveGroup {
                group_name: args.group,
            };
            run_batch_command(&args.batch, &instruction, verbose)
        }
        Command::ReplaceGroup(args) => {
            let instruction = Instruction::ReplaceGroupBody {
                group_name: args.group,
                body_lines: read_lines(&args.body_file)?,
            };
            run_batch_command(&args.batch, &instruction, verbose)
        }
        Command::Validate(args) => run_validate(args, verbose),
        Command::Report(command) => run_report(command),
    }
}

/// Snippet files are read once up front; a missing file is a usage error, not a per-file one.
fn read_lines(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    Ok(text.lines().map(str::to_owned).collect())
}

fn run_batch_command(
    args: &BatchArgs,
    instruction: &Instruction,
    verbose: bool,
) -> Result<ExitCode, Box<dyn Error>> {
    let config = args.config();
    let paths = store::discover(&config.pattern)?;
    let documents = store::load_documents(&paths);
    let sink = FileSink::new().with_durability(args.durability());
    let collaborators = Collaborators {
        sink: &sink,
        diff: &UnifiedDiff,
    };

    let report = run_batch(
        &config,
        instruction,
        &documents,
        collaborators,
        &StopSignal::new(),
    )?;
    print_stdout(&render_outcomes(
        &report,
        args.format,
        config.dry_run || verbose,
    )?)?;

    Ok(exit_code(report.category()))
}

fn exit_code(category: ExitCategory) -> ExitCode {
    match category {
        ExitCategory::Success | ExitCategory::AllSkipped => ExitCode::SUCCESS,
        ExitCategory::Failures => ExitCode::from(EXIT_FAILURES),
        ExitCategory::NoMatchingFiles => ExitCode::from(EXIT_NO_FILES),
        ExitCategory::Interrupted => ExitCode::from(EXIT_INTERRUPTED),
    }
}

fn run_validate(args: ValidateArgs, verbose: bool) -> Result<ExitCode, Box<dyn Error>> {
    let documents = discover_and_load(&args.pattern)?;
    if documents.is_empty() {
        warn!(pattern = %args.pattern, "no files matched");
        return Ok(ExitCode::from(EXIT_NO_FILES));
    }

    let only_if = args
        .only_if_has_participant
        .into_iter()
        .map(Predicate::HasParticipant)
        .chain(args.only_if_has_group.into_iter().map(Predicate::HasGroup))
        .collect();
    let rules = ValidationRules {
        required_groups: args.require_group,
        required_participants: args.require_participant,
        forbidden_groups: args.forbid_group,
        only_if,
    };

    let report = validate_all(&documents, &rules);
    print_stdout(&render_validation(&report, args.report_format, verbose)?)?;
    if report.has_failures() {
        Ok(ExitCode::from(EXIT_FAILURES))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_report(command: ReportCommand) -> Result<ExitCode, Box<dyn Error>> {
    let output = match command {
        ReportCommand::Groups { pattern, format } => {
            let parsed = parse_all(discover_and_load(&pattern)?);
            let rows: Vec<_> = parsed
                .iter()
                .flat_map(|(path, doc)| group_rows(path, doc))
                .collect();
            render_listing(&rows, format)?
        }
        ReportCommand::Participants { pattern, format } => {
            let parsed = parse_all(discover_and_load(&pattern)?);
            let rows: Vec<_> = parsed
                .iter()
                .flat_map(|(path, doc)| participant_rows(path, doc))
                .collect();
            render_listing(&rows, format)?
        }
        ReportCommand::Structure { file, format } => {
            let text = fs::read_to_string(&file)
                .map_err(|err| format!("cannot read {}: {err}", file.display()))?;
            let view = StructureView::new(&file, &Document::parse(&text));
            render_structure(&view, format)?
        }
        ReportCommand::Matrix { pattern } => {
            let parsed = parse_all(discover_and_load(&pattern)?);
            render_matrix(parsed.iter().map(|(path, doc)| (path.as_path(), doc)))
        }
    };
    print_stdout(&output)?;
    Ok(ExitCode::SUCCESS)
}

fn discover_and_load(pattern: &str) -> Result<Vec<SourceDocument>, Box<dyn Error>> {
    let paths = store::discover(pattern)?;
    debug!(pattern, files = paths.len(), "loading documents");
    Ok(store::load_documents(&paths))
}

/// Parsed documents for read-only reports; unreadable files are logged and left out.
fn parse_all(sources: Vec<SourceDocument>) -> Vec<(PathBuf, Document)> {
    sources
        .into_iter()
        .filter_map(|source| match source.text() {
            Ok(text) => Some((source.path().to_path_buf(), Document::parse(text))),
            Err(err) => {
                warn!(path = %source.path().display(), error = %err, "skipping unreadable file");
                None
            }
        })
        .collect()
}

fn print_stdout(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err);
    }
    Ok(())
}

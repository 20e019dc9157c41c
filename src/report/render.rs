// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Write as _;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::batch::{BatchReport, OutcomeStatus};
use crate::model::{BlockKind, Document, GroupId, StructuralIndex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutcomeFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StructureFormat {
    #[default]
    Tree,
    Json,
}

#[derive(Debug)]
pub enum ReportError {
    Json(serde_json::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(source) => write!(f, "cannot serialize report: {source}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(source) => Some(source),
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json(source)
    }
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReportError> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

/// Left-aligned columns separated by two spaces, with a header row.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|header| (*header).to_owned()).collect();
    push_row(&mut out, &widths, &header_cells);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_row(&mut out, &widths, &rule);
    for row in rows {
        push_row(&mut out, &widths, row);
    }
    out
}

fn push_row(out: &mut String, widths: &[usize], cells: &[String]) {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let pad = width.saturating_sub(cell.chars().count());
        line.push_str(cell);
        line.extend(std::iter::repeat(' ').take(pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn render_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = headers.join(",");
    out.push('\n');
    for row in rows {
        let fields: Vec<Cow<'_, str>> = row.iter().map(|cell| csv_field(cell)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

// Batch outcomes.

pub fn render_outcomes(
    report: &BatchReport,
    format: OutcomeFormat,
    show_diffs: bool,
) -> Result<String, ReportError> {
    match format {
        OutcomeFormat::Json => to_json(report),
        OutcomeFormat::Table => Ok(outcome_table(report, show_diffs)),
    }
}

fn outcome_table(report: &BatchReport, show_diffs: bool) -> String {
    let mut out = String::new();
    for outcome in report.outcomes() {
        let _ = writeln!(
            out,
            "{:<25}  {}",
            outcome.status().label(),
            outcome.path().display()
        );
        match (outcome.status(), outcome.detail()) {
            (OutcomeStatus::Succeeded, Some(diff)) => {
                if show_diffs && !diff.is_empty() {
                    out.push_str(diff);
                    if !diff.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
            (_, Some(detail)) => {
                let _ = writeln!(out, "    {detail}");
            }
            (_, None) => {}
        }
    }

    let summary = report.summary();
    let mode = if report.dry_run() { " (dry run)" } else { "" };
    let _ = writeln!(
        out,
        "\n{} file(s){mode}: {} succeeded, {} skipped, {} failed, {} parse error(s), {} cancelled",
        summary.total,
        summary.succeeded,
        summary.skipped(),
        summary.failed,
        summary.parse_errors,
        summary.cancelled,
    );
    out
}

// Listings.

/// A listing row that can be rendered as a table, JSON or CSV.
pub trait Tabular: Serialize {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRow {
    pub file: String,
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub depth: usize,
}

impl Tabular for GroupRow {
    const HEADERS: &'static [&'static str] = &["FILE", "GROUP", "LINES", "DEPTH"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.file.clone(),
            self.name.clone(),
            format!("{}-{}", self.start_line, self.end_line),
            self.depth.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantRow {
    pub file: String,
    pub alias: String,
    pub display_name: String,
    pub keyword: String,
    pub line: usize,
    pub color: Option<String>,
}

impl Tabular for ParticipantRow {
    const HEADERS: &'static [&'static str] = &["FILE", "ALIAS", "NAME", "KIND", "LINE", "COLOR"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.file.clone(),
            self.alias.clone(),
            self.display_name.clone(),
            self.keyword.clone(),
            self.line.to_string(),
            self.color.clone().unwrap_or_default(),
        ]
    }
}

/// Named `group` blocks of one document, 1-based lines.
pub fn group_rows(path: &Path, doc: &Document) -> Vec<GroupRow> {
    let file = path.display().to_string();
    doc.index()
        .named_groups()
        .map(|(_, group)| GroupRow {
            file: file.clone(),
            name: group.name().to_owned(),
            start_line: group.start_line() + 1,
            end_line: group.end_line() + 1,
            depth: group.depth(),
        })
        .collect()
}

pub fn participant_rows(path: &Path, doc: &Document) -> Vec<ParticipantRow> {
    let file = path.display().to_string();
    doc.index()
        .participants()
        .iter()
        .map(|participant| ParticipantRow {
            file: file.clone(),
            alias: participant.alias().to_owned(),
            display_name: participant.display_name().to_owned(),
            keyword: participant.keyword().to_owned(),
            line: participant.line() + 1,
            color: participant.color().map(ToOwned::to_owned),
        })
        .collect()
}

pub fn render_listing<T: Tabular>(rows: &[T], format: ListFormat) -> Result<String, ReportError> {
    match format {
        ListFormat::Json => to_json(rows),
        ListFormat::Table => Ok(render_table(
            T::HEADERS,
            &rows.iter().map(Tabular::cells).collect::<Vec<_>>(),
        )),
        ListFormat::Csv => Ok(render_csv(
            T::HEADERS,
            &rows.iter().map(Tabular::cells).collect::<Vec<_>>(),
        )),
    }
}

// Structure of a single document.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureView {
    pub file: String,
    pub participants: Vec<ParticipantRow>,
    pub blocks: Vec<BlockNode>,
    pub malformed: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockNode {
    pub kind: BlockKind,
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub children: Vec<BlockNode>,
}

impl StructureView {
    pub fn new(path: &Path, doc: &Document) -> Self {
        let index = doc.index();
        Self {
            file: path.display().to_string(),
            participants: participant_rows(path, doc),
            blocks: index
                .roots()
                .iter()
                .filter_map(|id| block_node(index, *id))
                .collect(),
            malformed: index.malformed().map(ToString::to_string),
            warnings: index.warnings().iter().map(ToString::to_string).collect(),
        }
    }
}

fn block_node(index: &StructuralIndex, id: GroupId) -> Option<BlockNode> {
    let group = index.group(id)?;
    Some(BlockNode {
        kind: group.kind(),
        name: group.name().to_owned(),
        start_line: group.start_line() + 1,
        end_line: group.end_line() + 1,
        children: group
            .children()
            .iter()
            .filter_map(|child| block_node(index, *child))
            .collect(),
    })
}

pub fn render_structure(
    view: &StructureView,
    format: StructureFormat,
) -> Result<String, ReportError> {
    match format {
        StructureFormat::Json => to_json(view),
        StructureFormat::Tree => Ok(structure_tree(view)),
    }
}

fn structure_tree(view: &StructureView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.file);
    if let Some(malformed) = &view.malformed {
        let _ = writeln!(out, "  malformed: {malformed}");
    }

    let _ = writeln!(out, "  participants ({})", view.participants.len());
    for participant in &view.participants {
        let _ = write!(
            out,
            "    {} \"{}\" [{}, line {}]",
            participant.alias, participant.display_name, participant.keyword, participant.line
        );
        if let Some(color) = &participant.color {
            let _ = write!(out, " #{color}");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "  blocks ({})", view.blocks.len());
    let mut stack: Vec<(&BlockNode, usize)> =
        view.blocks.iter().rev().map(|node| (node, 2)).collect();
    while let Some((node, level)) = stack.pop() {
        let indent = "  ".repeat(level);
        let _ = write!(out, "{indent}{}", node.kind.keyword());
        if !node.name.is_empty() {
            let _ = write!(out, " \"{}\"", node.name);
        }
        let _ = writeln!(out, " [lines {}-{}]", node.start_line, node.end_line);
        stack.extend(node.children.iter().rev().map(|child| (child, level + 1)));
    }

    for warning in &view.warnings {
        let _ = writeln!(out, "  warning: {warning}");
    }
    out
}

// Coverage matrix.

/// Files by named groups; a cell is `x` when the file contains the group.
pub fn render_matrix<'a, I>(documents: I) -> String
where
    I: IntoIterator<Item = (&'a Path, &'a Document)>,
{
    let documents: Vec<(&Path, &Document)> = documents.into_iter().collect();
    let names: BTreeSet<&str> = documents
        .iter()
        .flat_map(|(_, doc)| doc.index().named_groups().map(|(_, group)| group.name()))
        .collect();

    let mut headers = vec!["FILE"];
    headers.extend(names.iter().copied());
    let rows: Vec<Vec<String>> = documents
        .iter()
        .map(|(path, doc)| {
            let present: BTreeSet<&str> = doc
                .index()
                .named_groups()
                .map(|(_, group)| group.name())
                .collect();
            std::iter::once(path.display().to_string())
                .chain(names.iter().map(|name| {
                    if present.contains(name) {
                        "x".to_owned()
                    } else {
                        String::new()
                    }
                }))
                .collect()
        })
        .collect();
    render_table(&headers, &rows)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rstest::{fixture, rstest};

    use super::{
        csv_field, group_rows, participant_rows, render_listing, render_matrix, render_outcomes,
        render_structure, ListFormat, OutcomeFormat, StructureFormat, StructureView,
    };
    use crate::batch::{BatchReport, FileOutcome, OutcomeStatus};
    use crate::model::Document;

    #[fixture]
    fn doc() -> Document {
        Document::parse(
            r#"@startuml
participant "Web Shop" as Shop #LightBlue
actor User
group Checkout
  alt paid
    User -> Shop: pay
  end
end
@enduml
"#,
        )
    }

    #[rstest]
    fn lists_groups_with_one_based_lines(doc: Document) {
        let rows = group_rows(Path::new("shop.puml"), &doc);
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].start_line, rows[0].end_line), (4, 8));
        assert_eq!(rows[0].depth, 0);
    }

    #[rstest]
    fn renders_participant_csv_with_quoting(doc: Document) {
        let rows = participant_rows(Path::new("shop.puml"), &doc);
        let csv = render_listing(&rows, ListFormat::Csv).expect("csv");
        assert_eq!(
            csv,
            "FILE,ALIAS,NAME,KIND,LINE,COLOR\n\
             shop.puml,Shop,Web Shop,participant,2,LightBlue\n\
             shop.puml,User,User,actor,3,\n"
        );
    }

    #[rstest]
    fn renders_aligned_table(doc: Document) {
        let rows = group_rows(Path::new("shop.puml"), &doc);
        let table = render_listing(&rows, ListFormat::Table).expect("table");
        assert_eq!(
            table,
            "FILE       GROUP     LINES  DEPTH\n\
             ---------  --------  -----  -----\n\
             shop.puml  Checkout  4-8    0\n"
        );
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[rstest]
    fn structure_tree_nests_blocks(doc: Document) {
        let view = StructureView::new(Path::new("shop.puml"), &doc);
        let tree = render_structure(&view, StructureFormat::Tree).expect("tree");
        assert!(tree.contains("    Shop \"Web Shop\" [participant, line 2] #LightBlue\n"));
        assert!(tree.contains(
            "    group \"Checkout\" [lines 4-8]\n      alt \"paid\" [lines 5-7]\n"
        ));
    }

    #[rstest]
    fn structure_json_carries_kinds(doc: Document) {
        let view = StructureView::new(Path::new("shop.puml"), &doc);
        let json = render_structure(&view, StructureFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["blocks"][0]["kind"], "group");
        assert_eq!(value["blocks"][0]["children"][0]["kind"], "alt");
        assert_eq!(value["malformed"], serde_json::Value::Null);
    }

    #[rstest]
    fn matrix_marks_group_presence(doc: Document) {
        let other = Document::parse("group Refund\nend\n");
        let matrix = render_matrix([
            (Path::new("shop.puml"), &doc),
            (Path::new("refund.puml"), &other),
        ]);
        assert_eq!(
            matrix,
            "FILE         Checkout  Refund\n\
             -----------  --------  ------\n\
             shop.puml    x\n\
             refund.puml            x\n"
        );
    }

    #[test]
    fn outcome_table_shows_details_and_summary() {
        let report = BatchReport::new(
            vec![
                FileOutcome::new(
                    "a.puml",
                    OutcomeStatus::Succeeded,
                    Some("--- a/a.puml\n".to_owned()),
                ),
                FileOutcome::new(
                    "b.puml",
                    OutcomeStatus::Failed,
                    Some("group 'X' not found in diagram".to_owned()),
                ),
            ],
            true,
        );

        let table = render_outcomes(&report, OutcomeFormat::Table, false).expect("table");
        assert!(!table.contains("--- a/a.puml"));
        assert!(table.contains("    group 'X' not found in diagram\n"));
        assert!(table.ends_with(
            "2 file(s) (dry run): 1 succeeded, 0 skipped, 1 failed, 0 parse error(s), 0 cancelled\n"
        ));

        let with_diffs = render_outcomes(&report, OutcomeFormat::Table, true).expect("table");
        assert!(with_diffs.contains("--- a/a.puml\n"));
    }

    #[test]
    fn outcome_json_uses_snake_case_statuses() {
        let report = BatchReport::new(
            vec![FileOutcome::new("a.puml", OutcomeStatus::SkippedDuplicate, None)],
            false,
        );
        let json = render_outcomes(&report, OutcomeFormat::Json, false).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["outcomes"][0]["status"], "skipped_duplicate");
        assert_eq!(value["summary"]["skipped_duplicate"], 1);
    }
}

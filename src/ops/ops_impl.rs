// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn ensure_well_formed(doc: &Document) -> Result<(), MutationError> {
    match doc.index().malformed() {
        Some(err) => Err(MutationError::Malformed(err.clone())),
        None => Ok(()),
    }
}

fn group_not_found(doc: &Document, group_name: &str) -> MutationError {
    MutationError::GroupNotFound {
        name: group_name.to_owned(),
        suggestion: closest_group_name(doc.index(), group_name).map(ToOwned::to_owned),
    }
}

fn participant_not_found(alias: &str) -> impl FnOnce(NotFound) -> MutationError + '_ {
    move |NotFound| MutationError::ParticipantNotFound {
        alias: alias.to_owned(),
    }
}

/// Replaces `remove` lines at `at` with `insert` and re-derives the index.
///
/// Lines outside the spliced range are carried over untouched, except that appending past an
/// unterminated final line of a CRLF document moves the terminator so the file keeps its
/// line-ending shape. The result must re-index cleanly: no broken nesting and no region opened
/// by the inserted lines that runs to the end of the file.
fn splice(
    doc: &Document,
    at: usize,
    remove: usize,
    mut insert: Vec<String>,
) -> Result<Document, MutationError> {
    if let Some(line) = insert.iter().find(|line| has_embedded_break(line)) {
        return Err(MutationError::EmbeddedLineBreak { text: line.clone() });
    }

    let mut lines = doc.lines().to_vec();
    let at = at.min(lines.len());
    let inserted = at..at + insert.len();
    let end = at.saturating_add(remove).min(lines.len());

    if at == lines.len() && !insert.is_empty() && doc.line_ending() == LineEnding::CrLf {
        if let Some(last) = lines.last_mut() {
            last.push('\r');
        }
        if let Some(new_last) = insert.last_mut() {
            if new_last.ends_with('\r') {
                new_last.pop();
            }
        }
    }

    lines.splice(at..end, insert);
    let updated = Document::from_lines(lines);
    if let Some(err) = updated.index().malformed() {
        return Err(MutationError::InvalidInsertion(err.clone()));
    }

    let already_open = doc.index().warnings().iter().any(is_unclosed_region);
    let opened = updated.index().warnings().iter().find(|warning| match warning {
        StructureWarning::UnterminatedRegion { line, .. } => {
            !already_open || inserted.contains(line)
        }
        StructureWarning::DuplicateAlias { .. } => false,
    });
    if let Some(warning) = opened {
        return Err(MutationError::UnclosedRegion(warning.clone()));
    }
    Ok(updated)
}

fn is_unclosed_region(warning: &StructureWarning) -> bool {
    matches!(warning, StructureWarning::UnterminatedRegion { .. })
}

fn adapt_lines<S: AsRef<str>>(doc: &Document, lines: &[S]) -> Vec<String> {
    let ending = doc.line_ending();
    lines.iter().map(|line| ending.apply(line.as_ref())).collect()
}

/// Position right after the leading `@startuml`/`title` lines, for diagrams that declare no
/// participants yet.
fn header_end(doc: &Document) -> usize {
    let mut at = 0;
    for (idx, line) in doc.lines().iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("@startuml") || trimmed.starts_with("title") {
            at = idx + 1;
        } else if !trimmed.is_empty() {
            break;
        }
    }
    at
}

/// Splices a blank separator line plus `block_lines` directly after the terminator of the first
/// group named `group_name`.
pub fn insert_block_after_group<S: AsRef<str>>(
    doc: &Document,
    group_name: &str,
    block_lines: &[S],
) -> Result<Document, MutationError> {
    ensure_well_formed(doc)?;
    let (_, group) =
        find_group(doc.index(), group_name).ok_or_else(|| group_not_found(doc, group_name))?;

    let mut insert = Vec::with_capacity(block_lines.len() + 1);
    insert.push(doc.line_ending().apply(""));
    insert.extend(adapt_lines(doc, block_lines));
    splice(doc, group.end_line() + 1, 0, insert)
}

/// Inserts `declaration` verbatim at the resolved anchor. No alias or color is synthesized.
pub fn insert_participant(
    doc: &Document,
    declaration: &str,
    anchor: &ParticipantAnchor,
) -> Result<Document, MutationError> {
    ensure_well_formed(doc)?;
    let index = doc.index();
    let ending = doc.line_ending();

    match anchor {
        ParticipantAnchor::After(alias) => {
            let at = find_participant_anchor(index, alias, AnchorSide::After)
                .map_err(participant_not_found(alias))?;
            splice(doc, at, 0, vec![ending.apply(declaration)])
        }
        ParticipantAnchor::Before(alias) => {
            let at = find_participant_anchor(index, alias, AnchorSide::Before)
                .map_err(participant_not_found(alias))?;
            splice(doc, at, 0, vec![ending.apply(declaration)])
        }
        ParticipantAnchor::End => match index.participants().last() {
            Some(last) => splice(doc, last.line() + 1, 0, vec![ending.apply(declaration)]),
            None => splice(
                doc,
                header_end(doc),
                0,
                vec![ending.apply(""), ending.apply(declaration)],
            ),
        },
    }
}

/// Deletes the first group named `group_name`, from its opening line through its terminator.
pub fn remove_group(doc: &Document, group_name: &str) -> Result<Document, MutationError> {
    ensure_well_formed(doc)?;
    let (_, group) =
        find_group(doc.index(), group_name).ok_or_else(|| group_not_found(doc, group_name))?;
    let span = group.end_line() - group.start_line() + 1;
    splice(doc, group.start_line(), span, Vec::new())
}

/// Replaces everything strictly between the opening line and the terminator of the first group
/// named `group_name`.
pub fn replace_group_body<S: AsRef<str>>(
    doc: &Document,
    group_name: &str,
    body_lines: &[S],
) -> Result<Document, MutationError> {
    ensure_well_formed(doc)?;
    let (_, group) =
        find_group(doc.index(), group_name).ok_or_else(|| group_not_found(doc, group_name))?;
    let body_len = group.end_line() - group.start_line() - 1;
    splice(
        doc,
        group.start_line() + 1,
        body_len,
        adapt_lines(doc, body_lines),
    )
}

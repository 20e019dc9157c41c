// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for documents.
//!
//! Every operation reads one [`Document`] revision and either returns a complete new revision with
//! a freshly derived index, or an error and no changes at all. There is no partially applied
//! state: the input document is only ever borrowed.

use std::fmt;

use crate::format::plantuml::{classify_line, LineKind};
use crate::model::{Document, LineEnding, StructureError, StructureWarning};
use crate::query::{
    closest_group_name, find_group, find_participant_anchor, AnchorSide, NotFound,
};

/// Where a new participant declaration goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantAnchor {
    After(String),
    Before(String),
    /// After the last declared participant, or after the diagram header when there is none.
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    InsertBlockAfterGroup {
        group_name: String,
        block_lines: Vec<String>,
    },
    InsertParticipant {
        declaration: String,
        anchor: ParticipantAnchor,
    },
    RemoveGroup {
        group_name: String,
    },
    ReplaceGroupBody {
        group_name: String,
        body_lines: Vec<String>,
    },
}

impl Instruction {
    /// Rejects instructions that cannot apply to any document.
    ///
    /// Called once before a batch starts; a failure here is a caller error, not a per-file one.
    pub fn validate(&self) -> Result<(), InstructionError> {
        match self {
            Self::InsertBlockAfterGroup {
                group_name,
                block_lines,
            } => {
                validate_group_name(group_name)?;
                if block_lines.is_empty() {
                    return Err(InstructionError::EmptyBlock);
                }
                validate_single_lines(block_lines)
            }
            Self::InsertParticipant {
                declaration,
                anchor,
            } => {
                match anchor {
                    ParticipantAnchor::After(alias) | ParticipantAnchor::Before(alias)
                        if alias.trim().is_empty() =>
                    {
                        return Err(InstructionError::EmptyAlias);
                    }
                    _ => {}
                }
                if declaration.contains('\n') {
                    return Err(InstructionError::NotAParticipantDeclaration {
                        text: declaration.clone(),
                    });
                }
                match classify_line(declaration) {
                    LineKind::ParticipantDecl(_) => Ok(()),
                    _ => Err(InstructionError::NotAParticipantDeclaration {
                        text: declaration.clone(),
                    }),
                }
            }
            Self::RemoveGroup { group_name } => validate_group_name(group_name),
            Self::ReplaceGroupBody {
                group_name,
                body_lines,
            } => {
                validate_group_name(group_name)?;
                validate_single_lines(body_lines)
            }
        }
    }

    /// Short human description used in logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Self::InsertBlockAfterGroup {
                group_name,
                block_lines,
            } => format!(
                "insert {} line(s) after group '{group_name}'",
                block_lines.len()
            ),
            Self::InsertParticipant {
                declaration,
                anchor,
            } => match anchor {
                ParticipantAnchor::After(alias) => {
                    format!("add participant `{declaration}` after '{alias}'")
                }
                ParticipantAnchor::Before(alias) => {
                    format!("add participant `{declaration}` before '{alias}'")
                }
                ParticipantAnchor::End => format!("add participant `{declaration}`"),
            },
            Self::RemoveGroup { group_name } => format!("remove group '{group_name}'"),
            Self::ReplaceGroupBody {
                group_name,
                body_lines,
            } => format!(
                "replace body of group '{group_name}' with {} line(s)",
                body_lines.len()
            ),
        }
    }
}

fn validate_group_name(name: &str) -> Result<(), InstructionError> {
    if name.trim().is_empty() {
        return Err(InstructionError::EmptyGroupName);
    }
    Ok(())
}

fn validate_single_lines(lines: &[String]) -> Result<(), InstructionError> {
    match lines.iter().find(|line| has_embedded_break(line)) {
        Some(line) => Err(InstructionError::EmbeddedLineBreak { text: line.clone() }),
        None => Ok(()),
    }
}

/// A buffer entry may carry one trailing `\r`; any other `\r` or `\n` would split it on render.
fn has_embedded_break(line: &str) -> bool {
    let bare = line.strip_suffix('\r').unwrap_or(line);
    bare.contains(['\n', '\r'])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionError {
    EmptyGroupName,
    EmptyAlias,
    EmptyBlock,
    NotAParticipantDeclaration { text: String },
    EmbeddedLineBreak { text: String },
}

impl fmt::Display for InstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGroupName => f.write_str("group name must not be empty"),
            Self::EmptyAlias => f.write_str("anchor participant alias must not be empty"),
            Self::EmptyBlock => f.write_str("block to insert must contain at least one line"),
            Self::NotAParticipantDeclaration { text } => write!(
                f,
                "not a participant declaration: {text:?} \
                 (expected e.g. 'participant \"Name\" as Alias')"
            ),
            Self::EmbeddedLineBreak { text } => {
                write!(f, "each inserted line must be a single line, got {text:?}")
            }
        }
    }
}

impl std::error::Error for InstructionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// The input document itself has broken nesting.
    Malformed(StructureError),
    GroupNotFound {
        name: String,
        suggestion: Option<String>,
    },
    ParticipantNotFound {
        alias: String,
    },
    /// The edit would leave the document with broken nesting.
    InvalidInsertion(StructureError),
    /// An inserted line would render as more than one physical line.
    EmbeddedLineBreak { text: String },
    /// The edit opens a note, ref or block comment that nothing closes.
    UnclosedRegion(StructureWarning),
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(source) => write!(f, "document is malformed: {source}"),
            Self::GroupNotFound {
                name,
                suggestion: Some(suggestion),
            } => write!(
                f,
                "group '{name}' not found in diagram (did you mean '{suggestion}'?)"
            ),
            Self::GroupNotFound {
                name,
                suggestion: None,
            } => write!(f, "group '{name}' not found in diagram"),
            Self::ParticipantNotFound { alias } => {
                write!(f, "participant '{alias}' not found in diagram")
            }
            Self::InvalidInsertion(source) => {
                write!(f, "edit would leave the diagram malformed: {source}")
            }
            Self::EmbeddedLineBreak { text } => {
                write!(f, "inserted line {text:?} contains a line break")
            }
            Self::UnclosedRegion(warning) => {
                write!(f, "edit would leave the diagram malformed: {warning}")
            }
        }
    }
}

impl std::error::Error for MutationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed(source) | Self::InvalidInsertion(source) => Some(source),
            Self::GroupNotFound { .. }
            | Self::ParticipantNotFound { .. }
            | Self::EmbeddedLineBreak { .. }
            | Self::UnclosedRegion(_) => None,
        }
    }
}

pub fn apply(doc: &Document, instruction: &Instruction) -> Result<Document, MutationError> {
    match instruction {
        Instruction::InsertBlockAfterGroup {
            group_name,
            block_lines,
        } => insert_block_after_group(doc, group_name, block_lines),
        Instruction::InsertParticipant {
            declaration,
            anchor,
        } => insert_participant(doc, declaration, anchor),
        Instruction::RemoveGroup { group_name } => remove_group(doc, group_name),
        Instruction::ReplaceGroupBody {
            group_name,
            body_lines,
        } => replace_group_body(doc, group_name, body_lines),
    }
}

// Splicing and re-indexing helpers shared by the operations above.
include!("ops_impl.rs");

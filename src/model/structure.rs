// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;
use smol_str::SmolStr;

/// The keyword that opened a nested block.
///
/// Every kind shares the `end` terminator, so all of them take part in nesting. Only
/// [`BlockKind::Group`] blocks are addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Group,
    Alt,
    Opt,
    Loop,
    Par,
    Break,
    Critical,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        Self::Group,
        Self::Alt,
        Self::Opt,
        Self::Loop,
        Self::Par,
        Self::Break,
        Self::Critical,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Alt => "alt",
            Self::Opt => "opt",
            Self::Loop => "loop",
            Self::Par => "par",
            Self::Break => "break",
            Self::Critical => "critical",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }
}

/// Index of a [`Group`] in [`StructuralIndex::groups`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GroupId(usize);

impl GroupId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    line: usize,
    keyword: SmolStr,
    display_name: SmolStr,
    alias: SmolStr,
    color: Option<SmolStr>,
    raw_text: String,
}

impl Participant {
    pub fn new(
        line: usize,
        keyword: impl Into<SmolStr>,
        display_name: impl Into<SmolStr>,
        alias: impl Into<SmolStr>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            line,
            keyword: keyword.into(),
            display_name: display_name.into(),
            alias: alias.into(),
            color: None,
            raw_text: raw_text.into(),
        }
    }

    pub fn with_color<T: Into<SmolStr>>(mut self, color: Option<T>) -> Self {
        self.color = color.map(Into::into);
        self
    }

    /// 0-based line of the declaration.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Color tag without the leading `#`.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    name: SmolStr,
    kind: BlockKind,
    start_line: usize,
    end_line: usize,
    depth: usize,
    parent: Option<GroupId>,
    children: SmallVec<[GroupId; 4]>,
}

impl Group {
    pub(crate) fn new(
        name: impl Into<SmolStr>,
        kind: BlockKind,
        start_line: usize,
        end_line: usize,
        depth: usize,
        parent: Option<GroupId>,
    ) -> Self {
        debug_assert!(start_line < end_line);
        Self {
            name: name.into(),
            kind,
            start_line,
            end_line,
            depth,
            parent,
            children: SmallVec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// 0-based line of the opening keyword.
    pub fn start_line(&self) -> usize {
        self.start_line
    }

    /// 0-based line of the matching terminator.
    pub fn end_line(&self) -> usize {
        self.end_line
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    pub fn children(&self) -> &[GroupId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: GroupId) {
        self.children.push(child);
    }

    pub fn contains_line(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }
}

/// Why a document cannot be mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureError {
    UnterminatedGroup {
        name: String,
        block: BlockKind,
        line: usize,
    },
    UnmatchedEnd {
        line: usize,
    },
}

impl StructureError {
    /// 0-based line the problem was detected on.
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedGroup { line, .. } | Self::UnmatchedEnd { line } => *line,
        }
    }
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedGroup { name, block, line } => write!(
                f,
                "unterminated '{}' block {name:?} opened on line {}: missing 'end'",
                block.keyword(),
                line + 1
            ),
            Self::UnmatchedEnd { line } => write!(
                f,
                "unmatched 'end' on line {}: no block is currently open",
                line + 1
            ),
        }
    }
}

impl std::error::Error for StructureError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Note,
    Ref,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureWarning {
    DuplicateAlias {
        alias: String,
        first_line: usize,
        line: usize,
    },
    UnterminatedRegion {
        region: RegionKind,
        line: usize,
    },
}

impl fmt::Display for StructureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAlias {
                alias,
                first_line,
                line,
            } => write!(
                f,
                "duplicate participant alias '{alias}' on line {} (first declared on line {})",
                line + 1,
                first_line + 1
            ),
            Self::UnterminatedRegion { region, line } => {
                let what = match region {
                    RegionKind::Note => "note",
                    RegionKind::Ref => "ref",
                    RegionKind::Comment => "block comment",
                };
                write!(f, "unterminated {what} opened on line {}", line + 1)
            }
        }
    }
}

/// Participants and the group forest derived from a line buffer.
///
/// Built once per parse by [`crate::format::plantuml::build_index`] and never mutated afterwards.
/// `groups` is an arena in ascending start-line order; it only holds blocks whose whole ancestor
/// chain was terminated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StructuralIndex {
    participants: Vec<Participant>,
    groups: Vec<Group>,
    roots: Vec<GroupId>,
    malformed: Option<StructureError>,
    warnings: Vec<StructureWarning>,
    has_start_tag: bool,
    has_end_tag: bool,
}

impl StructuralIndex {
    pub(crate) fn new(
        participants: Vec<Participant>,
        groups: Vec<Group>,
        roots: Vec<GroupId>,
    ) -> Self {
        Self {
            participants,
            groups,
            roots,
            ..Self::default()
        }
    }

    pub(crate) fn set_malformed(&mut self, malformed: Option<StructureError>) {
        self.malformed = malformed;
    }

    pub(crate) fn set_warnings(&mut self, warnings: Vec<StructureWarning>) {
        self.warnings = warnings;
    }

    pub(crate) fn set_tags(&mut self, has_start_tag: bool, has_end_tag: bool) {
        self.has_start_tag = has_start_tag;
        self.has_end_tag = has_end_tag;
    }

    /// Participants in first-appearance order, duplicates included.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// First participant declared with `alias`.
    pub fn participant(&self, alias: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.alias() == alias)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, group_id: GroupId) -> Option<&Group> {
        self.groups.get(group_id.index())
    }

    pub fn roots(&self) -> &[GroupId] {
        &self.roots
    }

    /// Named `group` blocks (not `alt`/`loop`/...) in ascending start-line order.
    pub fn named_groups(&self) -> impl Iterator<Item = (GroupId, &Group)> + '_ {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.kind() == BlockKind::Group)
            .map(|(idx, group)| (GroupId::new(idx), group))
    }

    pub fn ancestors(&self, group_id: GroupId) -> impl Iterator<Item = &Group> + '_ {
        let mut next = self.group(group_id).and_then(Group::parent);
        std::iter::from_fn(move || {
            let group = self.group(next?)?;
            next = group.parent();
            Some(group)
        })
    }

    pub fn malformed(&self) -> Option<&StructureError> {
        self.malformed.as_ref()
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed.is_some()
    }

    pub fn warnings(&self) -> &[StructureWarning] {
        &self.warnings
    }

    pub fn has_start_tag(&self) -> bool {
        self.has_start_tag
    }

    pub fn has_end_tag(&self) -> bool {
        self.has_end_tag
    }
}

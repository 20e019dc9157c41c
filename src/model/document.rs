// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use memchr::memmem;

use super::structure::StructuralIndex;
use crate::format::plantuml::build_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Adapts a caller-supplied line to this ending (the buffer stores `\r` inline for CRLF).
    pub fn apply(self, line: &str) -> String {
        let bare = line.strip_suffix('\r').unwrap_or(line);
        match self {
            Self::Lf => bare.to_owned(),
            Self::CrLf => format!("{bare}\r"),
        }
    }
}

/// One revision of a diagram: its line buffer plus the index derived from it.
///
/// The buffer is the input split on `\n` with any `\r` kept in place, so [`Document::render`] is
/// byte-identical to the parsed text. Revisions are never edited in place; the mutators in
/// [`crate::ops`] build a new buffer and re-derive the index from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
    index: StructuralIndex,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.split('\n').map(ToOwned::to_owned).collect())
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        let index = build_index(&lines);
        Self { lines, index }
    }

    pub fn index(&self) -> &StructuralIndex {
        &self.index
    }

    /// Raw buffer entries (a trailing `\r` is kept for CRLF input).
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line content without any trailing `\r`.
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines
            .get(line)
            .map(|raw| raw.strip_suffix('\r').unwrap_or(raw))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_ending(&self) -> LineEnding {
        match self.lines.split_last() {
            Some((_, terminated)) if terminated.first().is_some_and(|l| l.ends_with('\r')) => {
                LineEnding::CrLf
            }
            _ => LineEnding::Lf,
        }
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// Raw substring scan over the whole text, independent of structure.
    pub fn contains_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        if needle.contains('\n') {
            return memmem::find(self.render().as_bytes(), needle.as_bytes()).is_some();
        }
        let finder = memmem::Finder::new(needle.as_bytes());
        self.lines
            .iter()
            .any(|line| finder.find(line.as_bytes()).is_some())
    }

    pub(crate) fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

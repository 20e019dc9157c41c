// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::model::{Group, GroupId, StructuralIndex};

/// A locator query whose target does not exist (or only exists in a malformed region).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not found")
    }
}

impl std::error::Error for NotFound {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSide {
    After,
    Before,
}

const SUGGESTION_MIN_SCORE: f64 = 0.7;

/// First `group` block named exactly `name` (case-sensitive), by lowest start line.
///
/// Depth is irrelevant: a nested block wins over a later top-level one with the same name.
pub fn find_group<'a>(index: &'a StructuralIndex, name: &str) -> Option<(GroupId, &'a Group)> {
    index.named_groups().find(|(_, group)| group.name() == name)
}

/// End line of the first `group` named `name`; see [`find_group`] for the tie-break.
pub fn find_group_end(index: &StructuralIndex, name: &str) -> Result<usize, NotFound> {
    find_group(index, name)
        .map(|(_, group)| group.end_line())
        .ok_or(NotFound)
}

/// Insertion position relative to the first participant declared with `alias`: the line after
/// the declaration for [`AnchorSide::After`], the declaration line itself for
/// [`AnchorSide::Before`].
pub fn find_participant_anchor(
    index: &StructuralIndex,
    alias: &str,
    side: AnchorSide,
) -> Result<usize, NotFound> {
    let participant = index.participant(alias).ok_or(NotFound)?;
    Ok(match side {
        AnchorSide::After => participant.line() + 1,
        AnchorSide::Before => participant.line(),
    })
}

/// Closest existing group name, for "did you mean" hints on a failed lookup.
pub fn closest_group_name<'a>(index: &'a StructuralIndex, name: &str) -> Option<&'a str> {
    let mut best: Option<(f64, &str)> = None;
    for (_, group) in index.named_groups() {
        let score = rapidfuzz::fuzz::ratio(name.chars(), group.name().chars());
        if score < SUGGESTION_MIN_SCORE {
            continue;
        }
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, group.name()));
        }
    }
    best.map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::{
        closest_group_name, find_group, find_group_end, find_participant_anchor, AnchorSide,
        NotFound,
    };
    use crate::model::Document;

    fn doc(input: &str) -> Document {
        Document::parse(input)
    }

    #[test]
    fn finds_each_group_at_its_own_terminator() {
        let d = doc("@startuml
group Outer
  group Middle
    group Inner
      A -> B: x
    end
  end
  group Sibling
  end
end
@enduml");
        let index = d.index();
        assert_eq!(find_group_end(index, "Outer"), Ok(9));
        assert_eq!(find_group_end(index, "Middle"), Ok(6));
        assert_eq!(find_group_end(index, "Inner"), Ok(5));
        assert_eq!(find_group_end(index, "Sibling"), Ok(8));
    }

    #[test]
    fn duplicate_names_resolve_to_lowest_start_line() {
        let d = doc("group Setup
  group Retry
  end
end
group Retry
end");
        let index = d.index();
        assert_eq!(find_group_end(index, "Retry"), Ok(2));
        let (_, group) = find_group(index, "Retry").expect("retry");
        assert_eq!(group.depth(), 1);
    }

    #[test]
    fn matching_is_exact_and_case_sensitive() {
        let d = doc("group Process Request\nend\ngroup Process\nend");
        let index = d.index();
        assert_eq!(find_group_end(index, "Process"), Ok(3));
        assert_eq!(find_group_end(index, "process request"), Err(NotFound));
        assert_eq!(find_group_end(index, "Process Request "), Err(NotFound));
    }

    #[test]
    fn only_group_blocks_are_addressable() {
        let d = doc("alt Process Request\nend");
        assert_eq!(find_group_end(d.index(), "Process Request"), Err(NotFound));
    }

    #[test]
    fn matches_inside_unterminated_region_are_not_found() {
        let d = doc("group Outer\n  group Target\n  end\n");
        assert!(d.index().is_malformed());
        assert_eq!(find_group_end(d.index(), "Target"), Err(NotFound));
        assert_eq!(find_group_end(d.index(), "Outer"), Err(NotFound));
    }

    #[test]
    fn participant_anchor_sides() {
        let d = doc("@startuml\nparticipant User\nparticipant API\n@enduml");
        let index = d.index();
        assert_eq!(find_participant_anchor(index, "User", AnchorSide::After), Ok(2));
        assert_eq!(find_participant_anchor(index, "User", AnchorSide::Before), Ok(1));
        assert_eq!(
            find_participant_anchor(index, "Missing", AnchorSide::After),
            Err(NotFound)
        );
    }

    #[test]
    fn suggests_close_group_names() {
        let d = doc("group Process Request\nend\ngroup Cleanup\nend");
        assert_eq!(
            closest_group_name(d.index(), "Process Requests"),
            Some("Process Request")
        );
        assert_eq!(closest_group_name(d.index(), "zzz"), None);
    }
}

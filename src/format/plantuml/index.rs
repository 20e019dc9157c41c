// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use smol_str::SmolStr;

use super::line::{classify_line, LineKind};
use crate::model::{
    BlockKind, Group, GroupId, Participant, RegionKind, StructuralIndex, StructureError,
    StructureWarning,
};

#[derive(Debug)]
struct OpenGroup {
    name: SmolStr,
    kind: BlockKind,
    start_line: usize,
    children: Vec<usize>,
}

#[derive(Debug)]
struct ClosedGroup {
    name: SmolStr,
    kind: BlockKind,
    start_line: usize,
    end_line: usize,
    children: Vec<usize>,
}

/// Builds the structural index in a single scan.
///
/// Open blocks live on an explicit stack: every terminator closes the nearest unclosed block,
/// whatever its name or keyword. Closed blocks attach to the block below them on the stack, so
/// blocks nested in a never-terminated block are unreachable from the roots and are left out of
/// the index. Lines inside multi-line notes, refs and block comments are never structural.
pub fn build_index<S: AsRef<str>>(lines: &[S]) -> StructuralIndex {
    let mut participants = Vec::<Participant>::new();
    let mut first_alias_line = HashMap::<SmolStr, usize>::new();
    let mut warnings = Vec::<StructureWarning>::new();
    let mut issues = Vec::<StructureError>::new();

    let mut stack = Vec::<OpenGroup>::new();
    let mut closed = Vec::<ClosedGroup>::new();
    let mut roots = Vec::<usize>::new();
    let mut region: Option<(RegionKind, usize)> = None;
    let mut has_start_tag = false;
    let mut has_end_tag = false;

    for (line, raw) in lines.iter().enumerate() {
        let raw = raw.as_ref();
        let kind = classify_line(raw);

        if let Some((open_region, _)) = region {
            if kind == LineKind::RegionEnd(open_region) {
                region = None;
            }
            continue;
        }

        match kind {
            LineKind::RegionOpen(open_region) => region = Some((open_region, line)),
            LineKind::RegionEnd(_) | LineKind::Opaque => {}
            LineKind::DiagramStart => has_start_tag = true,
            LineKind::DiagramEnd => has_end_tag = true,
            LineKind::ParticipantDecl(decl) => {
                let alias = SmolStr::new(decl.alias);
                match first_alias_line.get(&alias) {
                    Some(&first_line) => warnings.push(StructureWarning::DuplicateAlias {
                        alias: alias.to_string(),
                        first_line,
                        line,
                    }),
                    None => {
                        first_alias_line.insert(alias.clone(), line);
                    }
                }
                let raw_text = raw.strip_suffix('\r').unwrap_or(raw);
                participants.push(
                    Participant::new(line, decl.keyword, decl.display_name, alias, raw_text)
                        .with_color(decl.color),
                );
            }
            LineKind::GroupOpen { kind, name } => stack.push(OpenGroup {
                name: SmolStr::new(name),
                kind,
                start_line: line,
                children: Vec::new(),
            }),
            LineKind::GroupEnd { .. } => {
                let Some(open) = stack.pop() else {
                    issues.push(StructureError::UnmatchedEnd { line });
                    continue;
                };
                let closed_index = closed.len();
                closed.push(ClosedGroup {
                    name: open.name,
                    kind: open.kind,
                    start_line: open.start_line,
                    end_line: line,
                    children: open.children,
                });
                match stack.last_mut() {
                    Some(parent) => parent.children.push(closed_index),
                    None => roots.push(closed_index),
                }
            }
        }
    }

    if let Some((open_region, line)) = region {
        warnings.push(StructureWarning::UnterminatedRegion {
            region: open_region,
            line,
        });
    }

    issues.extend(stack.iter().map(|open| StructureError::UnterminatedGroup {
        name: open.name.to_string(),
        block: open.kind,
        line: open.start_line,
    }));
    let malformed = issues.into_iter().min_by_key(StructureError::line);

    let (groups, root_ids) = arrange_groups(&closed, &roots);
    let mut index = StructuralIndex::new(participants, groups, root_ids);
    index.set_malformed(malformed);
    index.set_warnings(warnings);
    index.set_tags(has_start_tag, has_end_tag);
    index
}

/// Lays the closed blocks reachable from `roots` out in pre-order, which is ascending start-line
/// order because siblings close in the order they open.
fn arrange_groups(closed: &[ClosedGroup], roots: &[usize]) -> (Vec<Group>, Vec<GroupId>) {
    let mut groups = Vec::<Group>::with_capacity(closed.len());
    let mut root_ids = Vec::with_capacity(roots.len());
    let mut pending = roots
        .iter()
        .rev()
        .map(|&raw| (raw, None::<GroupId>, 0usize))
        .collect::<Vec<_>>();

    while let Some((raw, parent, depth)) = pending.pop() {
        let Some(source) = closed.get(raw) else {
            continue;
        };
        let group_id = GroupId::new(groups.len());
        groups.push(Group::new(
            source.name.clone(),
            source.kind,
            source.start_line,
            source.end_line,
            depth,
            parent,
        ));
        match parent.and_then(|parent| groups.get_mut(parent.index())) {
            Some(parent_group) => parent_group.push_child(group_id),
            None => root_ids.push(group_id),
        }
        pending.extend(
            source
                .children
                .iter()
                .rev()
                .map(|&child| (child, Some(group_id), depth + 1)),
        );
    }

    (groups, root_ids)
}

#[cfg(test)]
mod tests {
    use super::build_index;
    use crate::model::{BlockKind, RegionKind, StructureError, StructureWarning};

    fn lines(input: &str) -> Vec<&str> {
        input.lines().collect()
    }

    #[test]
    fn collects_participants_in_first_appearance_order() {
        let index = build_index(&lines(
            r#"@startuml
participant "User" as User
participant "System" as System #orange
User -> System: Request
@enduml"#,
        ));

        let aliases = index
            .participants()
            .iter()
            .map(|p| p.alias())
            .collect::<Vec<_>>();
        assert_eq!(aliases, ["User", "System"]);
        assert_eq!(index.participants()[1].color(), Some("orange"));
        assert_eq!(index.participants()[1].line(), 2);
        assert!(index.has_start_tag());
        assert!(index.has_end_tag());
        assert!(!index.is_malformed());
    }

    #[test]
    fn builds_nested_group_tree() {
        let index = build_index(&lines(
            "group Outer
    group Inner
        System -> System: Process
    end
    alt ok
        A -> B: x
    else
        A -> B: y
    end
end",
        ));

        assert_eq!(index.groups().len(), 3);
        assert_eq!(index.roots().len(), 1);

        let outer = &index.groups()[0];
        assert_eq!(outer.name(), "Outer");
        assert_eq!((outer.start_line(), outer.end_line()), (0, 9));
        assert_eq!(outer.depth(), 0);
        assert_eq!(outer.children().len(), 2);

        let inner = index.group(outer.children()[0]).expect("inner");
        assert_eq!(inner.name(), "Inner");
        assert_eq!((inner.start_line(), inner.end_line()), (1, 3));
        assert_eq!(inner.depth(), 1);
        assert_eq!(inner.parent(), Some(index.roots()[0]));

        let alt = index.group(outer.children()[1]).expect("alt");
        assert_eq!(alt.kind(), BlockKind::Alt);
        assert_eq!((alt.start_line(), alt.end_line()), (4, 8));

        assert_eq!(
            index.named_groups().map(|(_, g)| g.name()).collect::<Vec<_>>(),
            ["Outer", "Inner"]
        );
    }

    #[test]
    fn children_lie_within_parent_range() {
        let index = build_index(&lines(
            "group A
group B
group C
end
end
group D
end
end
group A
end",
        ));

        for group in index.groups() {
            assert!(group.start_line() < group.end_line());
            if let Some(parent) = group.parent().and_then(|id| index.group(id)) {
                assert!(parent.start_line() < group.start_line());
                assert!(group.end_line() < parent.end_line());
            }
        }
        let starts = index
            .groups()
            .iter()
            .map(|g| g.start_line())
            .collect::<Vec<_>>();
        assert_eq!(starts, [0, 1, 2, 5, 8]);
    }

    #[test]
    fn keyword_mentions_do_not_change_nesting() {
        let index = build_index(&lines(
            "group Process Request
A -> B: please end group discussion
System -> System: check group status
end",
        ));

        assert!(!index.is_malformed());
        assert_eq!(index.groups().len(), 1);
        assert_eq!(index.groups()[0].end_line(), 3);
    }

    #[test]
    fn color_suffixed_openers_nest_like_plain_ones() {
        let index = build_index(&lines(
            "group Outer
alt#Gold #LightBlue ok
A -> B: x
end
B -> A: y
end
participant API <<Service>>
participant DB order 10",
        ));

        assert!(!index.is_malformed());
        let outer = &index.groups()[0];
        assert_eq!((outer.start_line(), outer.end_line()), (0, 5));
        let alt = index.group(outer.children()[0]).expect("alt");
        assert_eq!(alt.kind(), BlockKind::Alt);
        assert_eq!(alt.name(), "ok");
        assert_eq!((alt.start_line(), alt.end_line()), (1, 3));

        let aliases = index
            .participants()
            .iter()
            .map(|p| p.alias())
            .collect::<Vec<_>>();
        assert_eq!(aliases, ["API", "DB"]);
    }

    #[test]
    fn unterminated_group_marks_index_malformed() {
        let index = build_index(&lines(
            "group Closed
end
group Open
group Nested
end",
        ));

        assert_eq!(
            index.malformed(),
            Some(&StructureError::UnterminatedGroup {
                name: "Open".to_owned(),
                block: BlockKind::Group,
                line: 2,
            })
        );
        let names = index.groups().iter().map(|g| g.name()).collect::<Vec<_>>();
        assert_eq!(names, ["Closed"]);
    }

    #[test]
    fn unmatched_end_marks_index_malformed() {
        let index = build_index(&lines("group A\nend\nend"));
        assert_eq!(
            index.malformed(),
            Some(&StructureError::UnmatchedEnd { line: 2 })
        );
        assert_eq!(index.groups().len(), 1);
    }

    #[test]
    fn reports_lowest_line_issue() {
        let index = build_index(&lines("end\ngroup Never closed"));
        assert_eq!(
            index.malformed(),
            Some(&StructureError::UnmatchedEnd { line: 0 })
        );
    }

    #[test]
    fn ignores_structure_inside_notes_and_comments() {
        let index = build_index(&lines(
            "note over A
group Not a group
end note
/'
group Disabled
end
'/
ref over A, B
end
end ref
group Real
end",
        ));

        assert!(!index.is_malformed());
        assert_eq!(index.groups().len(), 1);
        assert_eq!(index.groups()[0].name(), "Real");
        assert!(index.warnings().is_empty());
    }

    #[test]
    fn reports_unterminated_region_as_warning() {
        let index = build_index(&lines("note over A\ngroup Hidden\nend"));
        assert!(index.groups().is_empty());
        assert!(!index.is_malformed());
        assert_eq!(
            index.warnings(),
            [StructureWarning::UnterminatedRegion {
                region: RegionKind::Note,
                line: 0,
            }]
        );
    }

    #[test]
    fn duplicate_alias_is_a_warning_and_first_wins() {
        let index = build_index(&lines(
            "participant \"A\" as A\nparticipant B\nparticipant \"Again\" as A",
        ));

        assert_eq!(index.participants().len(), 3);
        assert_eq!(
            index.participant("A").map(|p| p.display_name()),
            Some("A")
        );
        assert_eq!(
            index.warnings(),
            [StructureWarning::DuplicateAlias {
                alias: "A".to_owned(),
                first_line: 0,
                line: 2,
            }]
        );
    }

    #[test]
    fn empty_input_is_well_formed() {
        let index = build_index::<&str>(&[]);
        assert!(index.participants().is_empty());
        assert!(index.groups().is_empty());
        assert!(!index.is_malformed());
        assert!(!index.has_start_tag());
    }
}

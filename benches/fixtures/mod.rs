// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic generated diagrams for benchmarks (no RNG).

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub const ALL: [Case; 3] = [Case::Small, Case::Medium, Case::Large];

    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// (participants, top-level groups, nesting depth, messages per block)
    fn shape(self) -> (usize, usize, usize, usize) {
        match self {
            Self::Small => (4, 3, 1, 4),
            Self::Medium => (12, 20, 3, 8),
            Self::Large => (40, 120, 5, 12),
        }
    }
}

pub const TARGET_GROUP: &str = "Group 0";

/// A well-formed sequence diagram whose size scales with `case`.
///
/// Groups are named `Group <n>`; nested levels alternate between `group`, `alt` and `loop`, and a
/// multi-line note plus a message mentioning "end group" appear in every top-level block.
pub fn diagram(case: Case) -> String {
    let (participants, groups, depth, messages) = case.shape();
    let mut out = String::from("@startuml\ntitle Generated\n\n");

    for idx in 0..participants {
        if idx % 3 == 0 {
            let _ = writeln!(out, "participant \"Service {idx}\" as S{idx} #LightBlue");
        } else {
            let _ = writeln!(out, "participant S{idx}");
        }
    }
    out.push('\n');

    for group in 0..groups {
        let _ = writeln!(out, "group Group {group}");
        for level in 1..depth {
            let keyword = ["group", "alt", "loop"][level % 3];
            let _ = writeln!(out, "{}{keyword} Level {group}.{level}", "  ".repeat(level));
        }
        for msg in 0..messages {
            let from = (group + msg) % participants;
            let to = (group + msg + 1) % participants;
            let _ = writeln!(out, "{}S{from} -> S{to}: step {msg}", "  ".repeat(depth));
        }
        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{indent}S0 -> S1: please end group discussion");
        let _ = writeln!(out, "{indent}note over S0\n{indent}end\n{indent}end note");
        for level in (0..depth).rev() {
            let _ = writeln!(out, "{}end", "  ".repeat(level));
        }
        out.push('\n');
    }

    out.push_str("@enduml\n");
    out
}

pub fn block() -> Vec<String> {
    vec![
        "group Audit".to_owned(),
        "  S0 -> S1: record".to_owned(),
        "end".to_owned(),
    ]
}

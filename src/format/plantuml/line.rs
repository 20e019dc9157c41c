// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{BlockKind, RegionKind};

const PARTICIPANT_KEYWORDS: [&str; 8] = [
    "participant",
    "actor",
    "boundary",
    "control",
    "entity",
    "database",
    "collections",
    "queue",
];

/// Fields extracted from a participant declaration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantDecl<'a> {
    pub keyword: &'a str,
    pub display_name: &'a str,
    pub alias: &'a str,
    /// Without the leading `#`.
    pub color: Option<&'a str>,
}

/// Classification of one physical line, without any surrounding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    ParticipantDecl(ParticipantDecl<'a>),
    GroupOpen { kind: BlockKind, name: &'a str },
    GroupEnd { kind: Option<BlockKind> },
    RegionOpen(RegionKind),
    RegionEnd(RegionKind),
    DiagramStart,
    DiagramEnd,
    Opaque,
}

fn participant_regex() -> &'static Regex {
    static PARTICIPANT: OnceLock<Regex> = OnceLock::new();
    PARTICIPANT.get_or_init(|| {
        let keywords = PARTICIPANT_KEYWORDS.join("|");
        let name = r##"(?:"(?P<quoted>[^"]*)"|(?P<bare>[^\s"#<]+))"##;
        let alias = r##"(?:\s+as\s+(?:"(?P<quoted_alias>[^"]*)"|(?P<alias>[^\s"#<]+)))?"##;
        // Stereotypes, `#color` and `order N` may follow in any order.
        let tail = r"(?:\s+(?:<<[^>]*>>|#(?P<color>\S+)|order\s+-?\d+))*";
        Regex::new(&format!("^(?P<keyword>{keywords})\\s+{name}{alias}{tail}$"))
            .expect("valid participant regex")
    })
}

fn parse_participant(trimmed: &str) -> Option<ParticipantDecl<'_>> {
    let caps = participant_regex().captures(trimmed)?;
    let keyword = caps.name("keyword")?.as_str();
    let color = caps.name("color").map(|m| m.as_str());

    let (display_name, alias) = match (
        caps.name("quoted"),
        caps.name("bare"),
        caps.name("quoted_alias"),
        caps.name("alias"),
    ) {
        // `participant "Display" as Alias`
        (Some(display), _, _, Some(alias)) => (display.as_str(), alias.as_str()),
        // `participant Alias as "Display"`
        (_, Some(alias), Some(display), _) => (display.as_str(), alias.as_str()),
        (_, Some(display), _, Some(alias)) => (display.as_str(), alias.as_str()),
        (Some(display), _, Some(alias), _) => (display.as_str(), alias.as_str()),
        (Some(name), _, None, None) | (_, Some(name), None, None) => (name.as_str(), name.as_str()),
        _ => return None,
    };
    if alias.is_empty() {
        return None;
    }

    Some(ParticipantDecl {
        keyword,
        display_name,
        alias,
        color,
    })
}

fn region_end(tokens: &[&str]) -> Option<RegionKind> {
    match tokens {
        ["endnote" | "endhnote" | "endrnote"] | ["end", "note" | "hnote" | "rnote"] => {
            Some(RegionKind::Note)
        }
        ["endref"] | ["end", "ref"] => Some(RegionKind::Ref),
        _ => None,
    }
}

/// Classifies a single line. Never fails: anything unrecognized is [`LineKind::Opaque`].
///
/// Keywords are matched by identity on the first whitespace-separated token of the trimmed
/// line, so message text that merely mentions `group` or `end` stays opaque.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Opaque;
    }

    if let Some(rest) = trimmed.strip_prefix("/'") {
        return if rest.contains("'/") {
            LineKind::Opaque
        } else {
            LineKind::RegionOpen(RegionKind::Comment)
        };
    }
    if trimmed.ends_with("'/") {
        return LineKind::RegionEnd(RegionKind::Comment);
    }
    if trimmed.starts_with('\'') {
        return LineKind::Opaque;
    }

    let mut tokens = trimmed.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return LineKind::Opaque;
    };

    match keyword {
        "@startuml" => return LineKind::DiagramStart,
        "@enduml" => return LineKind::DiagramEnd,
        "end" | "endnote" | "endhnote" | "endrnote" | "endref" => {
            let tokens = trimmed.split_whitespace().collect::<Vec<_>>();
            if let Some(region) = region_end(&tokens) {
                return LineKind::RegionEnd(region);
            }
            return match tokens.as_slice() {
                ["end"] => LineKind::GroupEnd { kind: None },
                ["end", block] => match BlockKind::from_keyword(block) {
                    Some(kind) => LineKind::GroupEnd { kind: Some(kind) },
                    None => LineKind::Opaque,
                },
                _ => LineKind::Opaque,
            };
        }
        "note" | "hnote" | "rnote" => {
            return if trimmed.contains(':') {
                LineKind::Opaque
            } else {
                LineKind::RegionOpen(RegionKind::Note)
            };
        }
        "ref" => {
            return if trimmed.contains(':') {
                LineKind::Opaque
            } else {
                LineKind::RegionOpen(RegionKind::Ref)
            };
        }
        _ => {}
    }

    // `alt#Gold #LightBlue ok`: colors glued to the keyword, then optional background colors.
    let (bare_keyword, styled) = match keyword.split_once('#') {
        Some((bare, _)) => (bare, true),
        None => (keyword, false),
    };
    if let Some(kind) = BlockKind::from_keyword(bare_keyword) {
        let mut name = trimmed[keyword.len()..].trim_start();
        if styled {
            while let Some(rest) = name.strip_prefix('#') {
                name = rest
                    .find(char::is_whitespace)
                    .map_or("", |at| rest[at..].trim_start());
            }
        }
        return LineKind::GroupOpen {
            kind,
            name: name.trim_end(),
        };
    }

    if PARTICIPANT_KEYWORDS.contains(&keyword) {
        if let Some(decl) = parse_participant(trimmed) {
            return LineKind::ParticipantDecl(decl);
        }
    }

    LineKind::Opaque
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::model::{Document, StructuralIndex};

use super::locate::find_group;

/// A document filter. Filters only compose with AND (see [`first_failing`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    HasParticipant(String),
    HasGroup(String),
    /// Raw text scan, independent of structure: the marker may sit inside an opaque line.
    ContainsText(String),
}

impl Predicate {
    pub fn holds(&self, doc: &Document) -> bool {
        match self {
            Self::HasParticipant(alias) => has_participant(doc.index(), alias),
            Self::HasGroup(name) => has_group(doc.index(), name),
            Self::ContainsText(needle) => contains_literal_text(doc, needle),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasParticipant(alias) => write!(f, "has participant '{alias}'"),
            Self::HasGroup(name) => write!(f, "has group '{name}'"),
            Self::ContainsText(needle) => write!(f, "contains '{needle}'"),
        }
    }
}

pub fn has_participant(index: &StructuralIndex, alias: &str) -> bool {
    index.participant(alias).is_some()
}

pub fn has_group(index: &StructuralIndex, name: &str) -> bool {
    find_group(index, name).is_some()
}

pub fn contains_literal_text(doc: &Document, needle: &str) -> bool {
    doc.contains_text(needle)
}

/// The first predicate that does not hold, if any.
pub fn first_failing<'a>(
    predicates: impl IntoIterator<Item = &'a Predicate>,
    doc: &Document,
) -> Option<&'a Predicate> {
    predicates.into_iter().find(|predicate| !predicate.holds(doc))
}

#[cfg(test)]
mod tests {
    use super::{first_failing, Predicate};
    use crate::model::Document;
    use rstest::{fixture, rstest};

    #[fixture]
    fn doc() -> Document {
        Document::parse(
            r#"@startuml
participant "User" as User
participant "Payment Service" as Pay
group Process Request
  User -> Pay: charge
  note right: audit-v2
end
@enduml
"#,
        )
    }

    #[rstest]
    #[case(Predicate::HasParticipant("User".to_owned()), true)]
    #[case(Predicate::HasParticipant("Pay".to_owned()), true)]
    #[case(Predicate::HasParticipant("Payment Service".to_owned()), false)]
    #[case(Predicate::HasParticipant("user".to_owned()), false)]
    #[case(Predicate::HasGroup("Process Request".to_owned()), true)]
    #[case(Predicate::HasGroup("Process".to_owned()), false)]
    #[case(Predicate::ContainsText("audit-v2".to_owned()), true)]
    #[case(Predicate::ContainsText("audit-v3".to_owned()), false)]
    fn evaluates_single_predicates(
        doc: Document,
        #[case] predicate: Predicate,
        #[case] expected: bool,
    ) {
        assert_eq!(predicate.holds(&doc), expected);
    }

    #[rstest]
    fn predicates_compose_with_and(doc: Document) {
        let all = [
            Predicate::HasParticipant("User".to_owned()),
            Predicate::HasGroup("Process Request".to_owned()),
        ];
        assert_eq!(first_failing(&all, &doc), None);

        let one_missing = [
            Predicate::HasParticipant("User".to_owned()),
            Predicate::HasGroup("Cleanup".to_owned()),
            Predicate::HasParticipant("Ghost".to_owned()),
        ];
        assert_eq!(first_failing(&one_missing, &doc), Some(&one_missing[1]));
        assert_eq!(first_failing([], &doc), None);
    }

    #[test]
    fn describes_predicates() {
        assert_eq!(
            Predicate::HasGroup("Init".to_owned()).to_string(),
            "has group 'Init'"
        );
        assert_eq!(
            Predicate::ContainsText("x".to_owned()).to_string(),
            "contains 'x'"
        );
    }
}

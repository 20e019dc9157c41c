// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over a document's structural index.
//!
//! The locator resolves named targets to line positions; predicates decide whether a document is
//! in scope for an edit. Both fail closed and never guess.

pub mod locate;
pub mod predicate;

pub use locate::{
    closest_group_name, find_group, find_group_end, find_participant_anchor, AnchorSide, NotFound,
};
pub use predicate::{
    contains_literal_text, first_failing, has_group, has_participant, Predicate,
};

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Output side of the tool: diffs, outcome tables, listings and validation reports.
//!
//! Nothing here feeds back into editing; every function takes finished results and renders text.

pub mod diff;
mod render;
pub mod validate;

pub use diff::{unified_diff, UnifiedDiff};
pub use render::{
    group_rows, participant_rows, render_listing, render_matrix, render_outcomes,
    render_structure, BlockNode, GroupRow, ListFormat, OutcomeFormat, ParticipantRow,
    ReportError, StructureFormat, StructureView, Tabular,
};
pub use validate::{
    render_validation, validate_all, validate_document, ValidationFormat, ValidationReport,
    ValidationResult, ValidationRules, ValidationStatus,
};

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Document model: the line buffer and the structural index derived from it.
//!
//! A document holds participants and a forest of nested blocks; everything else in the text is
//! opaque and preserved byte-for-byte.

pub mod document;
pub mod structure;

pub use document::{Document, LineEnding};
pub use structure::{
    BlockKind, Group, GroupId, Participant, RegionKind, StructuralIndex, StructureError,
    StructureWarning,
};

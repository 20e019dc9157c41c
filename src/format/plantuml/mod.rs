// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! PlantUML sequence diagram notation: line classification and structural indexing.

mod index;
pub mod line;

pub use index::build_index;
pub use line::{classify_line, LineKind, ParticipantDecl};

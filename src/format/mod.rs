// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram text parsing.
//!
//! Currently this module focuses on the PlantUML sequence diagram subset the editor understands:
//! participant declarations, nested blocks and their terminators.

pub mod plantuml;

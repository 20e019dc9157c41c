// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Seqsplice: structure-aware batch editing for PlantUML sequence diagrams.
//!
//! Text flows one way: [`format`] classifies lines and derives a structural index, [`query`]
//! answers lookups against it, [`ops`] produces new document revisions, and [`batch`] runs that
//! pipeline over many files. [`store`] and [`report`] are the filesystem and output edges.

pub mod batch;
pub mod format;
pub mod model;
pub mod ops;
pub mod query;
pub mod report;
pub mod store;

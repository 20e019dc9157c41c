// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use super::StoreError;
use crate::batch::{CollaboratorError, SourceDocument};

/// Regular files matching `pattern`, sorted and without duplicates.
///
/// Directories matching the pattern are ignored. Entries the glob walker cannot read are logged
/// and skipped.
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>, StoreError> {
    let entries = glob::glob(pattern).map_err(|source| StoreError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(err) => warn!(
                path = %err.path().display(),
                error = %err.error(),
                "skipping unreadable path"
            ),
        }
    }
    paths.sort();
    paths.dedup();
    debug!(pattern, files = paths.len(), "discovered files");
    Ok(paths)
}

/// Reads each path; unreadable files become [`SourceDocument::unreadable`] entries so the batch
/// can report them per file.
pub fn load_documents(paths: &[PathBuf]) -> Vec<SourceDocument> {
    paths.par_iter().map(|path| load_document(path)).collect()
}

fn load_document(path: &Path) -> SourceDocument {
    match fs::read_to_string(path) {
        Ok(text) => SourceDocument::loaded(path, text),
        Err(source) => {
            let err = StoreError::Io {
                path: path.to_path_buf(),
                source,
            };
            SourceDocument::unreadable(path, CollaboratorError::from_error(&err))
        }
    }
}

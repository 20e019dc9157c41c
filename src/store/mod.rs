// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Filesystem side of a batch: discovering diagram files, reading them, and writing results back.
//!
//! The batch coordinator never touches the disk itself; it receives [`SourceDocument`]s from
//! [`load_documents`] and hands finished text to a [`FileSink`].
//!
//! [`SourceDocument`]: crate::batch::SourceDocument

mod discover;
mod sink;

use std::fmt;
use std::io;
use std::path::PathBuf;

pub use discover::{discover, load_documents};
pub use sink::{backup_path, FileSink, WriteDurability};

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    SymlinkRefused {
        path: PathBuf,
    },
    /// The file no longer holds the text the edit was computed from.
    ChangedOnDisk {
        path: PathBuf,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Pattern { pattern, source } => {
                write!(f, "invalid file pattern {pattern:?}: {source}")
            }
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
            Self::ChangedOnDisk { path } => write!(
                f,
                "file changed on disk since it was read, not overwriting {path:?}"
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Pattern { source, .. } => Some(source),
            Self::SymlinkRefused { .. } => None,
            Self::ChangedOnDisk { .. } => None,
        }
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use super::StoreError;
use crate::batch::{CollaboratorError, DocumentSink, WriteRequest};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus atomic rename, no fsync.
    #[default]
    BestEffort,

    /// Also syncs the written file and its directory where the platform allows it.
    Durable,
}

/// `<path>.bak`, keeping the original extension.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Writes edited documents back to their files.
#[derive(Debug, Clone, Default)]
pub struct FileSink {
    durability: WriteDurability,
}

impl FileSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    /// Backs up (if requested) and replaces one file.
    ///
    /// The current file contents must still equal `request.original`; otherwise nothing is
    /// written.
    pub fn write(&self, request: &WriteRequest<'_>) -> Result<(), StoreError> {
        let path = request.path;
        refuse_symlink(path)?;

        let on_disk = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if on_disk != request.original {
            return Err(StoreError::ChangedOnDisk {
                path: path.to_path_buf(),
            });
        }

        if request.backup {
            let backup = backup_path(path);
            refuse_symlink(&backup)?;
            write_atomic(&backup, request.original.as_bytes(), self.durability)?;
            debug!(backup = %backup.display(), "wrote backup");
        }

        write_atomic(path, request.updated.as_bytes(), self.durability)?;
        debug!(path = %path.display(), bytes = request.updated.len(), "wrote document");
        Ok(())
    }
}

impl DocumentSink for FileSink {
    fn commit(&self, request: &WriteRequest<'_>) -> Result<(), CollaboratorError> {
        self.write(request)
            .map_err(|err| CollaboratorError::from_error(&err))
    }
}

fn refuse_symlink(path: &Path) -> Result<(), StoreError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => Err(StoreError::SymlinkRefused {
            path: path.to_path_buf(),
        }),
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Moves the finished temp file over `target`. Windows will not rename onto an existing file, so
/// there the target is removed and the rename retried once.
fn replace_with(tmp: &Path, target: &Path) -> io::Result<()> {
    let renamed = fs::rename(tmp, target);
    if cfg!(windows) {
        if let Err(err) = &renamed {
            if matches!(
                err.kind(),
                io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
            ) {
                fs::remove_file(target).ok();
                return fs::rename(tmp, target);
            }
        }
    }
    renamed
}

fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let io_error = |path: &Path, source: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => return Err(io_error(path, io::Error::other("path has no parent"))),
    };
    let Some(file_name) = path.file_name() else {
        return Err(io_error(path, io::Error::other("path has no file name")));
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".seqsplice.tmp.{}.{}.{}",
        file_name.to_string_lossy(),
        std::process::id(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| io_error(&tmp_path, source))?;
    let written = file.write_all(contents).and_then(|()| {
        if durability == WriteDurability::Durable {
            file.sync_all()
        } else {
            Ok(())
        }
    });
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error(&tmp_path, source));
    }

    if let Err(source) = replace_with(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error(path, source));
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| io_error(parent, source))?;
            dir.sync_all().map_err(|source| io_error(parent, source))?;
        }
    }

    Ok(())
}

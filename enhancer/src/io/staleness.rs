//! Staleness check against the filesystem.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use filetime::FileTime;

use crate::core::staleness::decide;
use crate::core::types::Staleness;
use crate::error::{EnhanceError, EnhanceResult, IoResultExt};

/// Compare `current`'s modification time against `backup`'s.
pub fn check_staleness(current: &Path, backup: &Path) -> EnhanceResult<Staleness> {
    let current_mtime = modified(current)?;
    let backup_mtime = match fs::metadata(backup) {
        Ok(meta) => Some(FileTime::from_last_modification_time(&meta)),
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => return Err(EnhanceError::io("stat backup", backup, err)),
    };
    Ok(decide(current_mtime, backup_mtime))
}

/// Full-precision modification time of `path`.
pub fn modified(path: &Path) -> EnhanceResult<FileTime> {
    let meta = fs::metadata(path).io_context("stat", path)?;
    Ok(FileTime::from_last_modification_time(&meta))
}

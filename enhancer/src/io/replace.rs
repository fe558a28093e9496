//! Swap a rewritten class file into place while retaining the original.
//!
//! Sequence per artifact:
//! 1. Remove the previous backup, if any.
//! 2. Move the original artifact to the backup location.
//! 3. Move the rewritten file to the original artifact location.
//! 4. Set the backup's modification time to the new artifact's.
//!
//! This is not a transaction. If step 3 fails, the original is moved back
//! from the backup location on a best-effort basis before the error is
//! returned; a removed stale backup is never restored.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use filetime::{FileTime, set_file_mtime};
use tracing::{debug, warn};

use crate::core::artifact::ArtifactPaths;
use crate::error::{EnhanceError, EnhanceResult, IoResultExt};
use crate::io::staleness::modified;

/// Commit `paths.rewritten` over `paths.current`, keeping the original at `paths.backup`.
pub fn commit_replacement(paths: &ArtifactPaths) -> EnhanceResult<()> {
    if paths.backup.exists() {
        debug!(
            backup = %paths.backup.display(),
            "backup for original class file already exists, removing it"
        );
        fs::remove_file(&paths.backup).io_context("remove stale backup", &paths.backup)?;
    }

    if let Some(parent) = paths.backup.parent() {
        fs::create_dir_all(parent).io_context("create backup directory", parent)?;
    }

    debug!(
        from = %paths.current.display(),
        to = %paths.backup.display(),
        "moving original class file to backup"
    );
    move_file(&paths.current, &paths.backup)?;

    debug!(
        from = %paths.rewritten.display(),
        to = %paths.current.display(),
        "moving rewritten class file into place"
    );
    if let Err(err) = move_file(&paths.rewritten, &paths.current) {
        restore_original(paths);
        return Err(err);
    }

    let enhanced_mtime = modified(&paths.current)?;
    debug!(
        backup = %paths.backup.display(),
        "synchronizing backup timestamp with enhanced class file"
    );
    set_file_mtime(&paths.backup, enhanced_mtime).io_context("set backup timestamp", &paths.backup)
}

/// Remove a leftover rewrite file after a failed transformation.
pub fn discard_rewritten(paths: &ArtifactPaths) {
    match fs::remove_file(&paths.rewritten) {
        Ok(()) => debug!(path = %paths.rewritten.display(), "removed partial rewrite"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!(
            path = %paths.rewritten.display(),
            err = %err,
            "failed to remove partial rewrite"
        ),
    }
}

fn restore_original(paths: &ArtifactPaths) {
    warn!(
        artifact = %paths.current.display(),
        "rewritten class file could not be moved into place, restoring original"
    );
    if let Err(err) = move_file(&paths.backup, &paths.current) {
        warn!(
            backup = %paths.backup.display(),
            err = %err,
            "failed to restore original class file; it remains at the backup location"
        );
    }
}

/// Rename, falling back to copy + remove across filesystems.
///
/// The fallback keeps the source's modification time.
fn move_file(from: &Path, to: &Path) -> EnhanceResult<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::CrossesDevices => copy_then_remove(from, to),
        Err(err) => Err(EnhanceError::io("move", from, err)),
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> EnhanceResult<()> {
    let meta = fs::metadata(from).io_context("stat", from)?;
    fs::copy(from, to).io_context("copy", from)?;
    set_file_mtime(to, FileTime::from_last_modification_time(&meta))
        .io_context("set timestamp", to)?;
    fs::remove_file(from).io_context("remove", from)
}

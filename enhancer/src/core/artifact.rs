//! Path rules for artifact references.
//!
//! An artifact reference is a manifest entry such as `a/b/C.class`. It is
//! resolved under an output root for the current file and under a backup root
//! for the retained original; both share the same relative structure.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::ValidationFailure;

/// File-name suffix of a compiled class file.
pub const CLASS_FILE_SUFFIX: &str = ".class";

/// Suffix appended to an artifact's path for its rewritten sibling.
pub const REWRITE_SUFFIX: &str = ".enhanced";

/// Reject entries that would not resolve under the output root.
pub fn check_relative(entry: &str) -> Result<(), ValidationFailure> {
    let relative = Path::new(entry)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if relative {
        Ok(())
    } else {
        Err(ValidationFailure::NotRelative)
    }
}

/// True if the file name ends in [`CLASS_FILE_SUFFIX`].
pub fn has_class_suffix(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(CLASS_FILE_SUFFIX))
        .unwrap_or(false)
}

/// Deterministic sibling path that receives the rewritten bytes.
pub fn rewrite_path(current: &Path) -> PathBuf {
    let mut raw = OsString::from(current.as_os_str());
    raw.push(REWRITE_SUFFIX);
    PathBuf::from(raw)
}

/// All filesystem locations involved in enhancing one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// The artifact under the output root.
    pub current: PathBuf,
    /// Temporary sibling holding rewritten bytes until the swap.
    pub rewritten: PathBuf,
    /// Retained original under the backup root.
    pub backup: PathBuf,
}

impl ArtifactPaths {
    pub fn resolve(output_root: &Path, backup_root: &Path, entry: &str) -> Self {
        let current = output_root.join(entry);
        Self {
            rewritten: rewrite_path(&current),
            backup: backup_root.join(entry),
            current,
        }
    }
}

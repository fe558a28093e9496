//! Manifest reader: one artifact reference per line.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::core::artifact::{check_relative, has_class_suffix};
use crate::error::{EnhanceError, EnhanceResult, IoResultExt, ValidationFailure};

/// Read and validate a manifest against `output_root`.
///
/// Returns the entries as written, in order, duplicates included. Empty lines
/// are skipped; whitespace-only lines are validated like any other entry. The first invalid entry aborts the whole read.
pub fn read_manifest(manifest: &Path, output_root: &Path) -> EnhanceResult<Vec<String>> {
    debug!(manifest = %manifest.display(), "reading manifest");
    let contents = fs::read_to_string(manifest).io_context("read manifest", manifest)?;

    let mut entries = Vec::new();
    for line in contents.lines() {
        if line.is_empty() {
            continue;
        }
        validate_entry(output_root, line)?;
        entries.push(line.to_string());
    }

    debug!(count = entries.len(), "manifest validated");
    Ok(entries)
}

fn validate_entry(output_root: &Path, entry: &str) -> EnhanceResult<()> {
    let resolved = output_root.join(entry);
    check_relative(entry).map_err(|failure| EnhanceError::validation(&resolved, failure))?;

    if !resolved.exists() {
        return Err(EnhanceError::validation(resolved, ValidationFailure::Missing));
    }
    if !resolved.is_file() {
        return Err(EnhanceError::validation(
            resolved,
            ValidationFailure::NotAFile,
        ));
    }
    if !has_class_suffix(&resolved) {
        return Err(EnhanceError::validation(
            resolved,
            ValidationFailure::NotClassFile,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(entries: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("classes");
        fs::create_dir_all(out.join("a")).expect("mkdir");
        fs::write(out.join("a/B.class"), b"class-b").expect("write");
        fs::write(out.join("a/C.class"), b"class-c").expect("write");
        fs::write(out.join("a/notes.txt"), b"text").expect("write");
        fs::create_dir_all(out.join("a/Dir.class")).expect("mkdir");
        let manifest = temp.path().join("classes.txt");
        fs::write(&manifest, entries).expect("write manifest");
        (temp, manifest)
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let (temp, manifest) = setup("a/C.class\na/B.class\n\na/C.class\n");
        let entries = read_manifest(&manifest, &temp.path().join("classes")).expect("read");
        assert_eq!(entries, vec!["a/C.class", "a/B.class", "a/C.class"]);
    }

    #[test]
    fn whitespace_only_line_is_validated() {
        let (temp, manifest) = setup("a/B.class\n  \n");
        let err = read_manifest(&manifest, &temp.path().join("classes")).unwrap_err();
        assert!(matches!(
            err,
            EnhanceError::Validation {
                failure: ValidationFailure::Missing,
                ..
            }
        ));
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let (temp, manifest) = setup("a/B.class\r\na/C.class\r\n");
        let entries = read_manifest(&manifest, &temp.path().join("classes")).expect("read");
        assert_eq!(entries, vec!["a/B.class", "a/C.class"]);
    }

    #[test]
    fn missing_entry_aborts_read() {
        let (temp, manifest) = setup("a/B.class\na/Missing.class\na/C.class\n");
        let err = read_manifest(&manifest, &temp.path().join("classes")).unwrap_err();
        match err {
            EnhanceError::Validation { path, failure } => {
                assert_eq!(failure, ValidationFailure::Missing);
                assert!(path.ends_with("a/Missing.class"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directory_entry_is_not_a_file() {
        let (temp, manifest) = setup("a/Dir.class\n");
        let err = read_manifest(&manifest, &temp.path().join("classes")).unwrap_err();
        assert!(matches!(
            err,
            EnhanceError::Validation {
                failure: ValidationFailure::NotAFile,
                ..
            }
        ));
    }

    #[test]
    fn wrong_suffix_is_rejected() {
        let (temp, manifest) = setup("a/notes.txt\n");
        let err = read_manifest(&manifest, &temp.path().join("classes")).unwrap_err();
        assert!(matches!(
            err,
            EnhanceError::Validation {
                failure: ValidationFailure::NotClassFile,
                ..
            }
        ));
    }

    #[test]
    fn escaping_entry_is_rejected() {
        let (temp, manifest) = setup("../classes/a/B.class\n");
        let err = read_manifest(&manifest, &temp.path().join("classes")).unwrap_err();
        assert!(matches!(
            err,
            EnhanceError::Validation {
                failure: ValidationFailure::NotRelative,
                ..
            }
        ));
    }

    #[test]
    fn unreadable_manifest_is_io_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = read_manifest(&temp.path().join("absent"), temp.path()).unwrap_err();
        assert!(matches!(err, EnhanceError::Io { .. }));
    }
}

//! Error kinds surfaced by the enhancement pipeline.
//!
//! Every variant is fatal to the current run: there is no retry and no
//! partial-success mode. Messages always name the failing path.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a manifest entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Resolved path does not exist.
    Missing,
    /// Resolved path exists but is not a regular file.
    NotAFile,
    /// File name does not end in the class-file suffix.
    NotClassFile,
    /// Entry is absolute or climbs out of the output root.
    NotRelative,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Missing => "class file does not exist",
            Self::NotAFile => "not a file",
            Self::NotClassFile => "not a class file",
            Self::NotRelative => "not a path relative to the output directory",
        };
        f.write_str(msg)
    }
}

/// Errors from manifest reading, transformation, and file replacement.
#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("invalid manifest entry {}: {failure}", .path.display())]
    Validation {
        path: PathBuf,
        failure: ValidationFailure,
    },

    #[error("transformation of {} failed: {reason}", .path.display())]
    Transformation { path: PathBuf, reason: String },

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for pipeline operations.
pub type EnhanceResult<T> = Result<T, EnhanceError>;

impl EnhanceError {
    pub fn validation(path: impl Into<PathBuf>, failure: ValidationFailure) -> Self {
        Self::Validation {
            path: path.into(),
            failure,
        }
    }

    pub fn transformation(path: &Path, reason: impl Into<String>) -> Self {
        Self::Transformation {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Attach an action and path to a bare `io::Error`.
pub(crate) trait IoResultExt<T> {
    fn io_context(self, action: &'static str, path: &Path) -> EnhanceResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn io_context(self, action: &'static str, path: &Path) -> EnhanceResult<T> {
        self.map_err(|source| EnhanceError::io(action, path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_path_and_cause() {
        let err = EnhanceError::validation("out/a/B.class", ValidationFailure::Missing);
        assert_eq!(
            err.to_string(),
            "invalid manifest entry out/a/B.class: class file does not exist"
        );
    }

    #[test]
    fn io_context_wraps_source() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let err = result
            .io_context("move", Path::new("a/B.class"))
            .unwrap_err();
        assert!(matches!(err, EnhanceError::Io { action: "move", .. }));
        assert!(err.to_string().contains("move a/B.class: denied"));
    }
}

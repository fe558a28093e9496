//! Resolution of manifest, output, and backup locations per artifact set.

use std::path::{Path, PathBuf};

use crate::core::types::ArtifactSet;
use crate::error::{EnhanceError, EnhanceResult};
use crate::io::config::EnhancerConfig;

/// Canonical locations for one artifact set, resolved against a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLayout {
    pub set: ArtifactSet,
    /// Manifest listing the artifacts to enhance. May not exist.
    pub manifest: PathBuf,
    /// Compiled-classes directory supplied by the host build.
    pub output_root: Option<PathBuf>,
    /// Directory holding pre-enhancement originals.
    pub backup_root: PathBuf,
}

impl SetLayout {
    pub fn resolve(root: &Path, cfg: &EnhancerConfig, set: ArtifactSet) -> Self {
        let overrides = cfg.set(set);
        let manifest = overrides
            .manifest
            .clone()
            .unwrap_or_else(|| default_manifest(&cfg.tool, set));
        let backup_root = overrides
            .backup_dir
            .clone()
            .unwrap_or_else(|| default_backup_dir(&cfg.build_dir, &cfg.tool, set));
        Self {
            set,
            manifest: root.join(manifest),
            output_root: overrides.output_dir.as_ref().map(|dir| root.join(dir)),
            backup_root: root.join(backup_root),
        }
    }

    /// True if the set has a manifest to process.
    pub fn has_manifest(&self) -> bool {
        self.manifest.is_file()
    }

    /// Output root, or a configuration error naming the missing setting.
    pub fn require_output_root(&self) -> EnhanceResult<&Path> {
        self.output_root.as_deref().ok_or_else(|| {
            EnhanceError::configuration(format!(
                "{} output directory is not set but manifest {} exists",
                self.set,
                self.manifest.display()
            ))
        })
    }
}

/// `src/<main|test>/<tool>/classes`
pub fn default_manifest(tool: &str, set: ArtifactSet) -> PathBuf {
    Path::new("src").join(set.as_str()).join(tool).join("classes")
}

/// `<build_dir>/<tool>/orig-classes` or `<build_dir>/<tool>/orig-test-classes`
pub fn default_backup_dir(build_dir: &Path, tool: &str, set: ArtifactSet) -> PathBuf {
    let leaf = match set {
        ArtifactSet::Main => "orig-classes",
        ArtifactSet::Test => "orig-test-classes",
    };
    build_dir.join(tool).join(leaf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_tool_and_build_dir() {
        let cfg = EnhancerConfig::default();
        let main = SetLayout::resolve(Path::new("/proj"), &cfg, ArtifactSet::Main);
        let test = SetLayout::resolve(Path::new("/proj"), &cfg, ArtifactSet::Test);

        assert_eq!(main.manifest, Path::new("/proj/src/main/javaflow/classes"));
        assert_eq!(test.manifest, Path::new("/proj/src/test/javaflow/classes"));
        assert_eq!(
            main.backup_root,
            Path::new("/proj/target/javaflow/orig-classes")
        );
        assert_eq!(
            test.backup_root,
            Path::new("/proj/target/javaflow/orig-test-classes")
        );
        assert_eq!(main.output_root, None);
    }

    #[test]
    fn overrides_resolve_relative_and_keep_absolute() {
        let mut cfg = EnhancerConfig::default();
        cfg.main.output_dir = Some(PathBuf::from("target/classes"));
        cfg.main.backup_dir = Some(PathBuf::from("/var/backups/classes"));

        let layout = SetLayout::resolve(Path::new("/proj"), &cfg, ArtifactSet::Main);
        assert_eq!(
            layout.output_root.as_deref(),
            Some(Path::new("/proj/target/classes"))
        );
        assert_eq!(layout.backup_root, Path::new("/var/backups/classes"));
    }

    #[test]
    fn missing_output_root_is_a_configuration_error() {
        let layout = SetLayout::resolve(
            Path::new("/proj"),
            &EnhancerConfig::default(),
            ArtifactSet::Test,
        );
        let err = layout.require_output_root().unwrap_err();
        assert!(matches!(err, EnhanceError::Configuration(_)));
        assert!(err.to_string().contains("test output directory"));
    }
}

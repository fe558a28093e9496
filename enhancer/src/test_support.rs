//! Test-only helpers: a throwaway project layout and scripted transformers.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use filetime::{FileTime, set_file_mtime};
use tempfile::TempDir;

use crate::core::types::ArtifactSet;
use crate::error::{EnhanceError, EnhanceResult, IoResultExt};
use crate::io::config::{CONFIG_FILE, EnhancerConfig};
use crate::io::layout::SetLayout;
use crate::io::transformer::Transformer;

/// Modification time given to freshly written class files.
pub const COMPILED_AT: i64 = 1_600_000_000;

/// Prefix [`RecordingTransformer`] puts in front of the original bytes.
pub const ENHANCED_PREFIX: &[u8] = b"ENHANCED:";

/// Temporary project root with `target/classes` and `target/test-classes`
/// output directories and default manifest/backup locations.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Config with both output directories set.
    pub fn config(&self) -> EnhancerConfig {
        let mut cfg = EnhancerConfig::default();
        cfg.main.output_dir = Some(PathBuf::from("target/classes"));
        cfg.test.output_dir = Some(PathBuf::from("target/test-classes"));
        cfg
    }

    /// Write [`TestProject::config`] plus `transformer_command` to `enhance.toml`.
    pub fn write_config(&self, transformer_command: &[&str]) -> Result<PathBuf> {
        let mut cfg = self.config();
        cfg.transformer.command = transformer_command.iter().map(|s| s.to_string()).collect();
        let path = self.root().join(CONFIG_FILE);
        let buf = toml::to_string_pretty(&cfg).context("serialize config")?;
        fs::write(&path, buf).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn layout(&self, set: ArtifactSet) -> SetLayout {
        SetLayout::resolve(self.root(), &self.config(), set)
    }

    pub fn class_path(&self, set: ArtifactSet, entry: &str) -> PathBuf {
        self.output_root(set).join(entry)
    }

    pub fn backup_path(&self, set: ArtifactSet, entry: &str) -> PathBuf {
        self.layout(set).backup_root.join(entry)
    }

    /// Write a class file with modification time [`COMPILED_AT`].
    pub fn write_class(&self, set: ArtifactSet, entry: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.class_path(set, entry);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        self.set_mtime(&path, FileTime::from_unix_time(COMPILED_AT, 0))?;
        Ok(path)
    }

    /// Simulate recompilation: new bytes and a timestamp past the backup's.
    pub fn recompile(&self, set: ArtifactSet, entry: &str, bytes: &[u8]) -> Result<()> {
        let backup = self.backup_path(set, entry);
        let backup_mtime = FileTime::from_last_modification_time(
            &fs::metadata(&backup).with_context(|| format!("stat {}", backup.display()))?,
        );
        let path = self.class_path(set, entry);
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        self.set_mtime(
            &path,
            FileTime::from_unix_time(backup_mtime.unix_seconds() + 60, 0),
        )
    }

    pub fn set_mtime(&self, path: &Path, mtime: FileTime) -> Result<()> {
        set_file_mtime(path, mtime).with_context(|| format!("set mtime {}", path.display()))
    }

    /// Write the set's manifest at its default location.
    pub fn write_manifest(&self, set: ArtifactSet, entries: &[&str]) -> Result<PathBuf> {
        let path = self.layout(set).manifest;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let mut buf = entries.join("\n");
        buf.push('\n');
        fs::write(&path, buf).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    fn output_root(&self, set: ArtifactSet) -> PathBuf {
        match set {
            ArtifactSet::Main => self.root().join("target/classes"),
            ArtifactSet::Test => self.root().join("target/test-classes"),
        }
    }
}

/// Prefixes bytes with [`ENHANCED_PREFIX`] and records each source it saw.
#[derive(Default)]
pub struct RecordingTransformer {
    seen: RefCell<Vec<PathBuf>>,
}

impl RecordingTransformer {
    pub fn calls(&self) -> usize {
        self.seen.borrow().len()
    }

    pub fn seen(&self) -> Vec<PathBuf> {
        self.seen.borrow().clone()
    }
}

impl Transformer for RecordingTransformer {
    fn transform(&self, source: &Path, destination: &Path) -> EnhanceResult<()> {
        self.seen.borrow_mut().push(source.to_path_buf());
        let mut bytes = ENHANCED_PREFIX.to_vec();
        bytes.extend(fs::read(source).io_context("read class file", source)?);
        fs::write(destination, bytes).io_context("write rewritten class file", destination)
    }
}

/// Always fails. Optionally leaves a partial rewrite behind first.
pub struct FailingTransformer {
    partial_write: bool,
}

impl FailingTransformer {
    pub fn new() -> Self {
        Self {
            partial_write: false,
        }
    }

    pub fn partial_write() -> Self {
        Self {
            partial_write: true,
        }
    }
}

impl Default for FailingTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for FailingTransformer {
    fn transform(&self, source: &Path, destination: &Path) -> EnhanceResult<()> {
        if self.partial_write {
            fs::write(destination, b"trunc").io_context("write partial rewrite", destination)?;
        }
        Err(EnhanceError::transformation(source, "malformed class file"))
    }
}

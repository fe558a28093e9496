//! Enhancer configuration stored in `enhance.toml` at the project root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::types::ArtifactSet;

/// Default config file name, relative to the project root.
pub const CONFIG_FILE: &str = "enhance.toml";

/// Enhancer configuration (TOML).
///
/// Every field is optional in the file. Missing output directories are not
/// defaulted here: they come from the host build and are checked when a set
/// actually has a manifest to process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnhancerConfig {
    /// Tool name used in default manifest and backup paths.
    pub tool: String,

    /// Build output directory (`<build-output>` in default backup paths).
    pub build_dir: PathBuf,

    pub main: SetConfig,

    pub test: SetConfig,

    pub transformer: TransformerConfig,
}

/// Per-set path overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SetConfig {
    pub manifest: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransformerConfig {
    /// External rewrite command. `{input}`, `{output}` and `{classpath}` are
    /// substituted per artifact.
    pub command: Vec<String>,

    /// Entries the transformer needs to resolve referenced classes.
    pub classpath: Vec<PathBuf>,

    /// Kill the transformer after this many seconds. Unset waits forever.
    pub timeout_secs: Option<u64>,

    /// Keep at most this many bytes of transformer stderr.
    pub output_limit_bytes: usize,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            classpath: Vec::new(),
            timeout_secs: None,
            output_limit_bytes: 100_000,
        }
    }
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            tool: "javaflow".to_string(),
            build_dir: PathBuf::from("target"),
            main: SetConfig::default(),
            test: SetConfig::default(),
            transformer: TransformerConfig::default(),
        }
    }
}

impl EnhancerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            return Err(anyhow!("tool must be non-empty"));
        }
        if self.build_dir.as_os_str().is_empty() {
            return Err(anyhow!("build_dir must be non-empty"));
        }
        if self.transformer.output_limit_bytes == 0 {
            return Err(anyhow!("transformer.output_limit_bytes must be > 0"));
        }
        if self.transformer.timeout_secs == Some(0) {
            return Err(anyhow!("transformer.timeout_secs must be > 0 when set"));
        }
        Ok(())
    }

    pub fn set(&self, set: ArtifactSet) -> &SetConfig {
        match set {
            ArtifactSet::Main => &self.main,
            ArtifactSet::Test => &self.test,
        }
    }

    pub fn set_mut(&mut self, set: ArtifactSet) -> &mut SetConfig {
        match set {
            ArtifactSet::Main => &mut self.main,
            ArtifactSet::Test => &mut self.test,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `EnhancerConfig::default()`.
pub fn load_config(path: &Path) -> Result<EnhancerConfig> {
    if !path.exists() {
        let cfg = EnhancerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: EnhancerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

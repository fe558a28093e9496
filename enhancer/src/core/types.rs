//! Shared deterministic types for the enhancement pipeline.
//!
//! Report types serialize to stable JSON for `enhancer enhance --json` and
//! `enhancer status --json`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which compiled-class tree an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactSet {
    Main,
    Test,
}

impl ArtifactSet {
    /// Sets in the order the pipeline processes them.
    pub const ALL: [ArtifactSet; 2] = [ArtifactSet::Main, ArtifactSet::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for ArtifactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staleness decision for one artifact/backup pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Staleness {
    /// No backup exists yet; the artifact has never been enhanced.
    NoBackup,
    /// The artifact is newer than its backup (recompiled since last run).
    Recompiled,
    /// The artifact is not newer than its backup.
    UpToDate,
}

impl Staleness {
    pub fn needs_enhancement(self) -> bool {
        !matches!(self, Self::UpToDate)
    }
}

/// What happened to one artifact during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactOutcome {
    Enhanced,
    UpToDate,
}

/// Per-artifact line of a set report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReport {
    /// Manifest entry as written (relative to the output root).
    pub artifact: String,
    pub outcome: ArtifactOutcome,
}

/// Result of enhancing one artifact set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetReport {
    pub set: ArtifactSet,
    pub artifacts: Vec<ArtifactReport>,
}

impl SetReport {
    pub fn new(set: ArtifactSet) -> Self {
        Self {
            set,
            artifacts: Vec::new(),
        }
    }

    pub fn count(&self, outcome: ArtifactOutcome) -> usize {
        self.artifacts
            .iter()
            .filter(|report| report.outcome == outcome)
            .count()
    }
}

/// Result of a whole pipeline run. Sets whose manifest is absent are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub sets: Vec<SetReport>,
}

impl RunReport {
    pub fn count(&self, outcome: ArtifactOutcome) -> usize {
        self.sets.iter().map(|set| set.count(outcome)).sum()
    }

    pub fn set(&self, set: ArtifactSet) -> Option<&SetReport> {
        self.sets.iter().find(|report| report.set == set)
    }
}

/// Per-artifact line of a read-only status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStatus {
    pub artifact: String,
    pub staleness: Staleness,
}

/// Read-only staleness report for one artifact set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetStatus {
    pub set: ArtifactSet,
    pub artifacts: Vec<ArtifactStatus>,
}

impl SetStatus {
    pub fn stale_count(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|status| status.staleness.needs_enhancement())
            .count()
    }
}

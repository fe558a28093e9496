//! Orchestration for `enhancer enhance`.
//!
//! Each artifact set (main, then test) is processed independently: its
//! manifest is read and fully validated, then every artifact is checked for
//! staleness and, if stale, transformed and swapped into place. The first
//! failure aborts the run; artifacts already enhanced stay enhanced.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::core::artifact::ArtifactPaths;
use crate::core::types::{ArtifactOutcome, ArtifactReport, ArtifactSet, RunReport, SetReport};
use crate::error::EnhanceResult;
use crate::io::config::EnhancerConfig;
use crate::io::layout::SetLayout;
use crate::io::manifest::read_manifest;
use crate::io::replace::{commit_replacement, discard_rewritten};
use crate::io::staleness::check_staleness;
use crate::io::transformer::Transformer;

/// Enhance every set in `sets` (in the given order) for the project at `root`.
pub fn run_pipeline<T: Transformer>(
    root: &Path,
    cfg: &EnhancerConfig,
    sets: &[ArtifactSet],
    transformer: &T,
) -> EnhanceResult<RunReport> {
    let mut report = RunReport::default();
    for &set in sets {
        let layout = SetLayout::resolve(root, cfg, set);
        if let Some(set_report) = enhance_set(&layout, transformer)? {
            report.sets.push(set_report);
        }
    }
    info!(
        enhanced = report.count(ArtifactOutcome::Enhanced),
        up_to_date = report.count(ArtifactOutcome::UpToDate),
        "enhancement finished"
    );
    Ok(report)
}

/// Enhance one artifact set. Returns `None` when the set has no manifest.
#[instrument(skip_all, fields(set = %layout.set))]
pub fn enhance_set<T: Transformer>(
    layout: &SetLayout,
    transformer: &T,
) -> EnhanceResult<Option<SetReport>> {
    if !layout.has_manifest() {
        debug!(manifest = %layout.manifest.display(), "no manifest, skipping set");
        return Ok(None);
    }
    let output_root = layout.require_output_root()?;
    let entries = read_manifest(&layout.manifest, output_root)?;

    let mut report = SetReport::new(layout.set);
    for entry in entries {
        let paths = ArtifactPaths::resolve(output_root, &layout.backup_root, &entry);
        let outcome = enhance_artifact(&paths, transformer)?;
        report.artifacts.push(ArtifactReport {
            artifact: entry,
            outcome,
        });
    }
    Ok(Some(report))
}

/// Enhance a single artifact if it is stale.
pub fn enhance_artifact<T: Transformer>(
    paths: &ArtifactPaths,
    transformer: &T,
) -> EnhanceResult<ArtifactOutcome> {
    let staleness = check_staleness(&paths.current, &paths.backup)?;
    if !staleness.needs_enhancement() {
        info!("{} is up to date", paths.current.display());
        return Ok(ArtifactOutcome::UpToDate);
    }

    info!(reason = ?staleness, "enhancing class file bytecode: {}", paths.current.display());
    // A rewrite left over from an interrupted run must never be committed.
    discard_rewritten(paths);
    if let Err(err) = transformer.transform(&paths.current, &paths.rewritten) {
        discard_rewritten(paths);
        return Err(err);
    }
    commit_replacement(paths)?;
    Ok(ArtifactOutcome::Enhanced)
}

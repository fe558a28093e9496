//! Read-only staleness report for `enhancer status`.

use std::path::Path;

use tracing::debug;

use crate::core::artifact::ArtifactPaths;
use crate::core::types::{ArtifactSet, ArtifactStatus, SetStatus};
use crate::error::EnhanceResult;
use crate::io::config::EnhancerConfig;
use crate::io::layout::SetLayout;
use crate::io::manifest::read_manifest;
use crate::io::staleness::check_staleness;

/// Validate manifests and report which artifacts would be enhanced.
///
/// Never transforms, moves, or writes anything. Sets without a manifest are
/// omitted.
pub fn collect_status(
    root: &Path,
    cfg: &EnhancerConfig,
    sets: &[ArtifactSet],
) -> EnhanceResult<Vec<SetStatus>> {
    let mut statuses = Vec::new();
    for &set in sets {
        let layout = SetLayout::resolve(root, cfg, set);
        if !layout.has_manifest() {
            debug!(%set, manifest = %layout.manifest.display(), "no manifest, skipping set");
            continue;
        }
        let output_root = layout.require_output_root()?;
        let entries = read_manifest(&layout.manifest, output_root)?;

        let mut artifacts = Vec::with_capacity(entries.len());
        for entry in entries {
            let paths = ArtifactPaths::resolve(output_root, &layout.backup_root, &entry);
            let staleness = check_staleness(&paths.current, &paths.backup)?;
            artifacts.push(ArtifactStatus {
                artifact: entry,
                staleness,
            });
        }
        statuses.push(SetStatus { set, artifacts });
    }
    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Staleness;
    use crate::io::transformer::IdentityTransformer;
    use crate::pipeline::run_pipeline;
    use crate::test_support::TestProject;

    #[test]
    fn status_reflects_pipeline_progress_without_writing() {
        let project = TestProject::new().expect("project");
        project
            .write_class(ArtifactSet::Test, "a/BTest.class", b"test")
            .expect("class");
        project
            .write_manifest(ArtifactSet::Test, &["a/BTest.class"])
            .expect("manifest");
        let cfg = project.config();

        let before = collect_status(project.root(), &cfg, &ArtifactSet::ALL).expect("status");
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].set, ArtifactSet::Test);
        assert_eq!(before[0].artifacts[0].staleness, Staleness::NoBackup);
        assert_eq!(before[0].stale_count(), 1);
        assert!(
            !project
                .backup_path(ArtifactSet::Test, "a/BTest.class")
                .exists()
        );

        run_pipeline(project.root(), &cfg, &ArtifactSet::ALL, &IdentityTransformer).expect("run");

        let after = collect_status(project.root(), &cfg, &ArtifactSet::ALL).expect("status");
        assert_eq!(after[0].artifacts[0].staleness, Staleness::UpToDate);
        assert_eq!(after[0].stale_count(), 0);
    }
}

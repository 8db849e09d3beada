//! create-fix-tag mode - bump the patch component on a release branch.

use anyhow::Result;

use crate::core::version::ReleaseMode;
use crate::release::ReleaseOrchestrator;

/// Create the next fix tag on `branch` and publish its release.
///
/// A branch with no prior release tag is "nothing to do": the run completes
/// successfully without mutation and without a release.
pub async fn create_fix_tag(
    orchestrator: &ReleaseOrchestrator<'_>,
    branch: &str,
    main_branch: &str,
) -> Result<()> {
    if let Some(new_tag) = orchestrator.create_fix_tag(branch).await? {
        orchestrator
            .create_release_entity(main_branch, branch, &new_tag, ReleaseMode::Fix)
            .await?;
    }
    Ok(())
}

//! create-rc-tag mode - create or bump the release-candidate tag.

use anyhow::Result;

use crate::release::ReleaseOrchestrator;

/// Resolve and create the next rc tag for `major_version` on `branch`.
pub async fn create_rc_tag(
    orchestrator: &ReleaseOrchestrator<'_>,
    branch: &str,
    commit: &str,
    major_version: u64,
) -> Result<()> {
    orchestrator
        .create_rc_tag(branch, commit, major_version)
        .await?;
    Ok(())
}

//! promote-release mode - cut the release branch and publish the release.

use anyhow::Result;

use crate::core::version::ReleaseMode;
use crate::release::ReleaseOrchestrator;

/// Cut (or reuse) the release branch for `tag`, create the first release
/// tag, and publish the release record.
///
/// The release is only published when this run actually created the tag; a
/// re-run against an already-promoted tag stops after the idempotency
/// checks.
pub async fn promote_release(
    orchestrator: &ReleaseOrchestrator<'_>,
    tag: &str,
    main_branch: &str,
) -> Result<()> {
    let release_branch = orchestrator.create_release_branch(tag, main_branch).await?;
    if let Some(new_tag) = orchestrator
        .create_first_release_tag(&release_branch)
        .await?
    {
        orchestrator
            .create_release_entity(main_branch, &release_branch.name, &new_tag, ReleaseMode::New)
            .await?;
    }
    Ok(())
}

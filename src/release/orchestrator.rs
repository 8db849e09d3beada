//! release::orchestrator
//!
//! Sequencing for the three release-cycle modes.
//!
//! # Design
//!
//! Each operation takes one fresh tag snapshot, resolves the target name
//! through [`crate::core::version`], checks its preconditions against live
//! remote state, and applies at most the mutations the mode calls for.
//! There is no multi-step rollback: every mutation is idempotency-checked
//! before it is applied (an existing release branch is reused, an existing
//! tag is treated as already satisfied), so re-running a failed invocation
//! converges instead of duplicating state.

use std::time::Duration;

use thiserror::Error;

use super::changelog::ChangelogBuilder;
use super::retry::RetryPolicy;
use super::template::{ReleaseTemplate, TemplateError};
use crate::core::config::Config;
use crate::core::types::{Branch, CommitRecord, ReleaseRecord};
use crate::core::version::{self, ReleaseMode, VersionError};
use crate::gateway::{GatewayError, RepositoryGateway};
use crate::ui::output::{self, Verbosity};

/// Errors from release-cycle sequencing.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// The branch a mode requires does not exist on the platform.
    #[error("branch `{0}` was not found")]
    BranchNotFound(String),

    /// The commit to tag is not reachable from the resolving branch.
    #[error("commit {commit} was not found in branch `{branch}`")]
    CommitNotInBranch { commit: String, branch: String },

    /// A tag or branch name could not be read as a semantic version.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// The remote platform rejected or failed an operation.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Changelog rendering failed.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Coordinates branch, tag, and release creation for one project.
pub struct ReleaseOrchestrator<'a> {
    gateway: &'a dyn RepositoryGateway,
    config: &'a Config,
    template: &'a ReleaseTemplate,
    verbosity: Verbosity,
    changelog_retry: RetryPolicy,
}

impl<'a> ReleaseOrchestrator<'a> {
    pub fn new(
        gateway: &'a dyn RepositoryGateway,
        config: &'a Config,
        template: &'a ReleaseTemplate,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            gateway,
            config,
            template,
            verbosity,
            // A freshly created tag can lag behind the compare endpoint;
            // re-read an empty range a couple of times before accepting it.
            changelog_retry: RetryPolicy::new(3, Duration::from_secs(2)),
        }
    }

    /// Override the retry policy applied to changelog assembly.
    pub fn with_changelog_retry(mut self, policy: RetryPolicy) -> Self {
        self.changelog_retry = policy;
        self
    }

    /// Create the next release-candidate tag for `major` on `branch`.
    ///
    /// Resolves against a fresh tag snapshot, then requires the branch to
    /// exist and `commit` to be reachable on it. Returns the created tag
    /// name.
    ///
    /// # Errors
    ///
    /// - [`ReleaseError::BranchNotFound`] when the branch is absent
    /// - [`ReleaseError::CommitNotInBranch`] when the commit is not on it
    pub async fn create_rc_tag(
        &self,
        branch: &str,
        commit: &str,
        major: u64,
    ) -> Result<String, ReleaseError> {
        output::debug(
            format!("resolving next rc tag for major {}", major),
            self.verbosity,
        );
        let snapshot = self.gateway.list_tags().await?;
        let new_tag = version::next_rc_tag(&snapshot, major, &self.config.rc_suffix)?;

        let branch = self
            .gateway
            .get_branch(branch)
            .await?
            .ok_or_else(|| ReleaseError::BranchNotFound(branch.to_string()))?;

        if self.set_tag(&branch.name, commit, &new_tag).await? {
            output::info(
                format!(
                    "A new tag {} has been set on commit {} for {} branch.",
                    new_tag, commit, branch.name
                ),
                self.verbosity,
            );
        }
        Ok(new_tag)
    }

    /// Create the release branch for `source_tag`, or return it if it
    /// already exists.
    ///
    /// The branch name is derived deterministically from the tag's
    /// (major, minor) line; creation is cut from `source_branch`.
    pub async fn create_release_branch(
        &self,
        source_tag: &str,
        source_branch: &str,
    ) -> Result<Branch, ReleaseError> {
        let name = version::release_branch_name(
            source_tag,
            &self.config.release_prefix,
            &self.config.rc_suffix,
        )?;
        if let Some(existing) = self.gateway.get_branch(&name).await? {
            output::warn(
                format!(
                    "Target branch {} already exists, skipping branch creation.",
                    name
                ),
                self.verbosity,
            );
            return Ok(existing);
        }
        output::info(
            format!("Creating new {} branch from {}.", name, source_branch),
            self.verbosity,
        );
        Ok(self.gateway.create_branch(&name, source_branch).await?)
    }

    /// Create the first release tag on a freshly cut release branch.
    ///
    /// The tag goes on the branch head. Returns `None` when the tag already
    /// exists on the platform - the release was cut on a previous run, so
    /// there is nothing left to publish.
    pub async fn create_first_release_tag(
        &self,
        release_branch: &Branch,
    ) -> Result<Option<String>, ReleaseError> {
        let new_tag =
            version::first_release_tag(&release_branch.name, &self.config.release_prefix)?;
        output::info(
            format!("Creating new release tag {}", new_tag),
            self.verbosity,
        );
        if !self
            .set_tag(&release_branch.name, &release_branch.commit_id, &new_tag)
            .await?
        {
            return Ok(None);
        }
        output::info(
            format!(
                "A new tag {} has been set on commit {} for {} branch.",
                new_tag, release_branch.commit_id, release_branch.name
            ),
            self.verbosity,
        );
        Ok(Some(new_tag))
    }

    /// Create the next fix tag on an existing release branch.
    ///
    /// Returns `None` when the branch has no prior release tag (nothing to
    /// do, not a failure) or when the resolved tag already exists.
    ///
    /// # Errors
    ///
    /// - [`ReleaseError::BranchNotFound`] when the branch is absent
    pub async fn create_fix_tag(&self, branch: &str) -> Result<Option<String>, ReleaseError> {
        let branch = self
            .gateway
            .get_branch(branch)
            .await?
            .ok_or_else(|| ReleaseError::BranchNotFound(branch.to_string()))?;

        let base = branch.name.replace(&self.config.release_prefix, "");
        let snapshot = self.gateway.list_tags().await?;
        let Some(new_tag) = version::next_fix_tag(&snapshot, &base) else {
            output::warn(
                format!(
                    "No release tags found for {} branch, nothing to do.",
                    branch.name
                ),
                self.verbosity,
            );
            return Ok(None);
        };

        output::info(format!("Creating new fix tag {}", new_tag), self.verbosity);
        if !self
            .set_tag(&branch.name, &branch.commit_id, &new_tag)
            .await?
        {
            return Ok(None);
        }
        output::info(
            format!(
                "A new tag {} has been set on commit {} for {} branch.",
                new_tag, branch.commit_id, branch.name
            ),
            self.verbosity,
        );
        Ok(Some(new_tag))
    }

    /// Assemble, render, and publish the release record for `new_tag`.
    ///
    /// The changelog lower bound is the previous minor release tag; when the
    /// project has none, the range falls back to `source_branch`.
    pub async fn create_release_entity(
        &self,
        source_branch: &str,
        release_branch: &str,
        new_tag: &str,
        mode: ReleaseMode,
    ) -> Result<ReleaseRecord, ReleaseError> {
        output::info(
            format!("Preparing release for {} release branch.", release_branch),
            self.verbosity,
        );
        let base = release_branch.replace(&self.config.release_prefix, "");
        let snapshot = self.gateway.list_tags().await?;
        let lower_bound = version::previous_minor_release_tag(&snapshot, &base, new_tag, mode)
            .unwrap_or_else(|| source_branch.to_string());

        output::debug(
            format!("Generating diff between {} and {}.", lower_bound, new_tag),
            self.verbosity,
        );
        let builder = ChangelogBuilder::new(self.gateway);
        let changelog = self
            .changelog_retry
            .run(
                |records: &Vec<CommitRecord>| records.is_empty(),
                || builder.build_changelog(&lower_bound, new_tag),
            )
            .await?;

        let description = self.template.render(&changelog)?;
        let record = self
            .gateway
            .create_release(&format!("Release {}", new_tag), new_tag, &description)
            .await?;
        output::info(
            format!("Release {} published.", record.tag_name),
            self.verbosity,
        );
        Ok(record)
    }

    /// Verify `commit` is on `branch`, then create `new_tag` on it.
    ///
    /// Returns whether the tag was created: a conflicting tag is logged and
    /// reported as `false` (already satisfied), never retried.
    async fn set_tag(
        &self,
        branch: &str,
        commit: &str,
        new_tag: &str,
    ) -> Result<bool, ReleaseError> {
        let commits = self.gateway.list_commits(branch).await?;
        if !commits.iter().any(|id| id == commit) {
            return Err(ReleaseError::CommitNotInBranch {
                commit: commit.to_string(),
                branch: branch.to_string(),
            });
        }
        match self.gateway.create_tag(new_tag, commit).await {
            Ok(_) => Ok(true),
            Err(GatewayError::TagConflict(name)) => {
                output::warn(
                    format!("Tag {} already exists, skipping tag creation.", name),
                    self.verbosity,
                );
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

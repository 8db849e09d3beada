//! gateway::traits
//!
//! RepositoryGateway trait definition.
//!
//! # Design
//!
//! The trait is async because every operation is network I/O. A gateway
//! instance is bound to one project at construction; the release layer never
//! sees project identifiers, only repository objects.
//!
//! No caching happens here: each call re-queries the platform. Callers that
//! need a consistent view take one snapshot (e.g. `list_tags`) and reuse it
//! for the whole resolution.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{Branch, CommitRecord, CommitSummary, ReleaseRecord, Tag};

/// Errors from gateway operations.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Credentials rejected or missing permissions.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The bound project does not exist or is not visible to the token.
    #[error("project `{0}` not found")]
    ProjectNotFound(String),

    /// A referenced resource (commit, ref, release) was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The tag already exists on the platform.
    ///
    /// Callers treat this as "already satisfied", never as a retry trigger.
    #[error("tag `{0}` already exists")]
    TagConflict(String),

    /// The API rejected the request.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Transport(String),
}

/// Abstraction over the remote hosting platform, bound to one project.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, GatewayError>`. Lookups that can legally
/// come back empty (`get_branch`) express absence as `Ok(None)`; only
/// genuinely exceptional conditions become errors.
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Gateway name (e.g. "gitlab", "mock").
    fn name(&self) -> &'static str;

    /// List every tag of the project, platform listing order preserved.
    ///
    /// Callers rely on the returned order for rc resolution, so
    /// implementations must not re-sort.
    async fn list_tags(&self) -> Result<Vec<Tag>, GatewayError>;

    /// Look up a branch by name. `Ok(None)` when it does not exist.
    async fn get_branch(&self, name: &str) -> Result<Option<Branch>, GatewayError>;

    /// Create a branch from `source_ref`.
    async fn create_branch(&self, name: &str, source_ref: &str) -> Result<Branch, GatewayError>;

    /// List the ids of every commit reachable on `branch`.
    async fn list_commits(&self, branch: &str) -> Result<Vec<String>, GatewayError>;

    /// Create a tag on `target` commit.
    ///
    /// # Errors
    ///
    /// - `TagConflict` when a tag of that name already exists
    async fn create_tag(&self, name: &str, target: &str) -> Result<Tag, GatewayError>;

    /// Platform-side compare: commits unique to `to`, ancestors of `from`
    /// excluded.
    async fn compare(&self, from: &str, to: &str) -> Result<Vec<CommitSummary>, GatewayError>;

    /// Fetch full metadata for one commit, including stats and changed paths.
    async fn get_commit(&self, id: &str) -> Result<CommitRecord, GatewayError>;

    /// Publish a release record for `tag_name`.
    async fn create_release(
        &self,
        name: &str,
        tag_name: &str,
        description: &str,
    ) -> Result<ReleaseRecord, GatewayError>;
}

//! core::types
//!
//! Plain immutable records for the remote repository state.
//!
//! # Design
//!
//! The remote platform hands back dynamic JSON objects; this module pins the
//! fields the release cycle actually consumes into owned, serde-backed
//! structs. The [`crate::gateway::RepositoryGateway`] trait is the single
//! seam of polymorphism over "real platform" vs "test double" - these types
//! carry no behavior beyond construction helpers.

use serde::{Deserialize, Serialize};

/// A tag as listed by the remote repository.
///
/// Tags are immutable once created on the platform; they are only ever
/// created, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name, e.g. `1.3.0-rc` or `1.3.2`.
    pub name: String,
    /// Id of the commit the tag points at.
    pub target: String,
}

impl Tag {
    /// Construct a tag record.
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }
}

/// A branch and its head commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name, e.g. `master` or `release/1.3`.
    pub name: String,
    /// Id of the branch head commit.
    pub commit_id: String,
}

impl Branch {
    /// Construct a branch record.
    pub fn new(name: impl Into<String>, commit_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_id: commit_id.into(),
        }
    }
}

/// A commit as returned by a platform-side compare.
///
/// Only the fields needed to drive changelog assembly; the full record is
/// fetched per commit via [`crate::gateway::RepositoryGateway::get_commit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Commit id.
    pub id: String,
    /// First line of the commit message.
    pub title: String,
}

/// Line-change statistics for one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
    pub additions: u64,
    pub deletions: u64,
    pub total: u64,
}

/// One changed path in a commit diff.
///
/// The changelog only lists what changed, not the content, so a diff entry
/// is reduced to the post-change path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Path the change applies to.
    pub change_for: String,
}

/// Full per-commit metadata handed to the changelog template.
///
/// Field names are the template input contract: templates receive an ordered
/// sequence of these records under the single `changelog_data` variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub commit_id: String,
    pub commit_url: String,
    pub commit_author: String,
    pub title: String,
    pub committed_date: String,
    pub stats: CommitStats,
    pub diff: Vec<DiffEntry>,
}

/// A published release record.
///
/// Created once per tag; there is no update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// Display name, `Release <tag>`.
    pub name: String,
    /// Tag the release is attached to.
    pub tag_name: String,
    /// Rendered changelog body.
    pub description: String,
}

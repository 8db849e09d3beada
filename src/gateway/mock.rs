//! gateway::mock
//!
//! Mock gateway implementation for deterministic testing.
//!
//! # Design
//!
//! The mock holds the remote repository state in memory: tags in listing
//! order, branches with their commit histories, compare results, and commit
//! details. Mutations behave like the platform does - creating an existing
//! tag conflicts, creating a branch records it - and every call is recorded
//! for verification.
//!
//! # Example
//!
//! ```
//! use semrel::gateway::{mock::MockGateway, RepositoryGateway};
//! use semrel::core::types::Tag;
//!
//! # tokio_test::block_on(async {
//! let gateway = MockGateway::new().with_tags(vec![Tag::new("1.2.0-rc", "aaa")]);
//! let tags = gateway.list_tags().await.unwrap();
//! assert_eq!(tags[0].name, "1.2.0-rc");
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{GatewayError, RepositoryGateway};
use crate::core::types::{Branch, CommitRecord, CommitSummary, ReleaseRecord, Tag};

/// Mock gateway for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockGateway {
    inner: Arc<Mutex<MockGatewayInner>>,
}

#[derive(Debug, Default)]
struct MockGatewayInner {
    /// Tags in platform listing order.
    tags: Vec<Tag>,
    /// Branches by name.
    branches: HashMap<String, Branch>,
    /// Commit ids reachable per branch.
    branch_commits: HashMap<String, Vec<String>>,
    /// Full commit records by id.
    commits: HashMap<String, CommitRecord>,
    /// Compare results keyed by (from, to).
    compares: HashMap<(String, String), Vec<CommitSummary>>,
    /// Published releases.
    releases: Vec<ReleaseRecord>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    ListTags(GatewayError),
    GetBranch(GatewayError),
    CreateBranch(GatewayError),
    ListCommits(GatewayError),
    CreateTag(GatewayError),
    Compare(GatewayError),
    GetCommit(GatewayError),
    CreateRelease(GatewayError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ListTags,
    GetBranch { name: String },
    CreateBranch { name: String, source_ref: String },
    ListCommits { branch: String },
    CreateTag { name: String, target: String },
    Compare { from: String, to: String },
    GetCommit { id: String },
    CreateRelease { name: String, tag_name: String },
}

impl MockGateway {
    /// Create an empty mock gateway.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockGatewayInner::default())),
        }
    }

    /// Seed the tag snapshot, listing order preserved.
    pub fn with_tags(self, tags: Vec<Tag>) -> Self {
        self.inner.lock().unwrap().tags = tags;
        self
    }

    /// Seed a branch with its head commit and reachable commit ids.
    pub fn with_branch(self, name: &str, head: &str, commits: Vec<String>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner
                .branches
                .insert(name.to_string(), Branch::new(name, head));
            inner.branch_commits.insert(name.to_string(), commits);
        }
        self
    }

    /// Seed a compare result for (from, to).
    pub fn with_compare(self, from: &str, to: &str, commits: Vec<CommitSummary>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .compares
            .insert((from.to_string(), to.to_string()), commits);
        self
    }

    /// Seed a full commit record.
    pub fn with_commit(self, record: CommitRecord) -> Self {
        self.inner
            .lock()
            .unwrap()
            .commits
            .insert(record.commit_id.clone(), record);
        self
    }

    /// Configure one operation to fail.
    pub fn fail_on(self, fail: FailOn) -> Self {
        self.inner.lock().unwrap().fail_on = Some(fail);
        self
    }

    /// Tags currently known to the mock, including created ones.
    pub fn tags(&self) -> Vec<Tag> {
        self.inner.lock().unwrap().tags.clone()
    }

    /// Branches currently known to the mock.
    pub fn branches(&self) -> Vec<Branch> {
        let inner = self.inner.lock().unwrap();
        let mut branches: Vec<Branch> = inner.branches.values().cloned().collect();
        branches.sort_by(|a, b| a.name.cmp(&b.name));
        branches
    }

    /// Releases published so far.
    pub fn releases(&self) -> Vec<ReleaseRecord> {
        self.inner.lock().unwrap().releases.clone()
    }

    /// All recorded operations, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::ListTags);
        if let Some(FailOn::ListTags(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        Ok(inner.tags.clone())
    }

    async fn get_branch(&self, name: &str) -> Result<Option<Branch>, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::GetBranch {
            name: name.to_string(),
        });
        if let Some(FailOn::GetBranch(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        Ok(inner.branches.get(name).cloned())
    }

    async fn create_branch(&self, name: &str, source_ref: &str) -> Result<Branch, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateBranch {
            name: name.to_string(),
            source_ref: source_ref.to_string(),
        });
        if let Some(FailOn::CreateBranch(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        if inner.branches.contains_key(name) {
            return Err(GatewayError::Api {
                status: 400,
                message: "Branch already exists".into(),
            });
        }
        // The new branch head is the source branch head when the source is a
        // known branch, otherwise the ref itself stands in for a commit id.
        let head = inner
            .branches
            .get(source_ref)
            .map(|b| b.commit_id.clone())
            .unwrap_or_else(|| source_ref.to_string());
        let commits = inner
            .branch_commits
            .get(source_ref)
            .cloned()
            .unwrap_or_else(|| vec![head.clone()]);
        let branch = Branch::new(name, head);
        inner.branches.insert(name.to_string(), branch.clone());
        inner.branch_commits.insert(name.to_string(), commits);
        Ok(branch)
    }

    async fn list_commits(&self, branch: &str) -> Result<Vec<String>, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::ListCommits {
            branch: branch.to_string(),
        });
        if let Some(FailOn::ListCommits(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        Ok(inner.branch_commits.get(branch).cloned().unwrap_or_default())
    }

    async fn create_tag(&self, name: &str, target: &str) -> Result<Tag, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateTag {
            name: name.to_string(),
            target: target.to_string(),
        });
        if let Some(FailOn::CreateTag(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        if inner.tags.iter().any(|t| t.name == name) {
            return Err(GatewayError::TagConflict(name.to_string()));
        }
        let tag = Tag::new(name, target);
        // Platforms list newest tags first.
        inner.tags.insert(0, tag.clone());
        Ok(tag)
    }

    async fn compare(&self, from: &str, to: &str) -> Result<Vec<CommitSummary>, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::Compare {
            from: from.to_string(),
            to: to.to_string(),
        });
        if let Some(FailOn::Compare(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        Ok(inner
            .compares
            .get(&(from.to_string(), to.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_commit(&self, id: &str) -> Result<CommitRecord, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::GetCommit {
            id: id.to_string(),
        });
        if let Some(FailOn::GetCommit(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        inner
            .commits
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("commit {}", id)))
    }

    async fn create_release(
        &self,
        name: &str,
        tag_name: &str,
        description: &str,
    ) -> Result<ReleaseRecord, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateRelease {
            name: name.to_string(),
            tag_name: tag_name.to_string(),
        });
        if let Some(FailOn::CreateRelease(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        let record = ReleaseRecord {
            name: name.to_string(),
            tag_name: tag_name.to_string(),
            description: description.to_string(),
        };
        inner.releases.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_preserves_seed_order() {
        let gateway = MockGateway::new().with_tags(vec![
            Tag::new("1.3.0", "c3"),
            Tag::new("1.2.0", "c2"),
        ]);
        let tags = gateway.list_tags().await.unwrap();
        assert_eq!(tags[0].name, "1.3.0");
        assert_eq!(tags[1].name, "1.2.0");
    }

    #[tokio::test]
    async fn created_tags_show_up_newest_first() {
        let gateway = MockGateway::new().with_tags(vec![Tag::new("1.2.0", "c2")]);
        gateway.create_tag("1.3.0", "c3").await.unwrap();
        let tags = gateway.list_tags().await.unwrap();
        assert_eq!(tags[0].name, "1.3.0");
    }

    #[tokio::test]
    async fn duplicate_tag_conflicts() {
        let gateway = MockGateway::new().with_tags(vec![Tag::new("1.2.0", "c2")]);
        let err = gateway.create_tag("1.2.0", "c9").await.unwrap_err();
        assert!(matches!(err, GatewayError::TagConflict(name) if name == "1.2.0"));
    }

    #[tokio::test]
    async fn branch_creation_inherits_source_history() {
        let gateway = MockGateway::new().with_branch(
            "master",
            "head",
            vec!["head".into(), "older".into()],
        );
        let branch = gateway.create_branch("release/1.0", "master").await.unwrap();
        assert_eq!(branch.commit_id, "head");
        let commits = gateway.list_commits("release/1.0").await.unwrap();
        assert_eq!(commits, vec!["head".to_string(), "older".to_string()]);
    }

    #[tokio::test]
    async fn missing_branch_is_none_not_error() {
        let gateway = MockGateway::new();
        assert!(gateway.get_branch("release/9.9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn configured_failure_fires() {
        let gateway = MockGateway::new().fail_on(FailOn::ListTags(GatewayError::Transport(
            "connection reset".into(),
        )));
        let err = gateway.list_tags().await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test]
    async fn operations_are_recorded_in_order() {
        let gateway = MockGateway::new().with_branch("master", "head", vec!["head".into()]);
        gateway.get_branch("master").await.unwrap();
        gateway.list_commits("master").await.unwrap();
        assert_eq!(
            gateway.operations(),
            vec![
                MockOperation::GetBranch {
                    name: "master".into()
                },
                MockOperation::ListCommits {
                    branch: "master".into()
                },
            ]
        );
    }
}

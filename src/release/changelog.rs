//! release::changelog
//!
//! Changelog assembly between two refs.
//!
//! # Design
//!
//! The commit range comes from a platform-side compare (commits unique to
//! the target, ancestors of the source excluded) - there is no local graph
//! walk. Each commit in the range is then resolved to a full
//! [`CommitRecord`]; the platform's returned ordering is preserved
//! throughout, so the rendered changelog reads in platform order.

use crate::core::types::{CommitRecord, CommitSummary};
use crate::gateway::{GatewayError, RepositoryGateway};

/// Assembles per-commit metadata for a release changelog.
pub struct ChangelogBuilder<'a> {
    gateway: &'a dyn RepositoryGateway,
}

impl<'a> ChangelogBuilder<'a> {
    pub fn new(gateway: &'a dyn RepositoryGateway) -> Self {
        Self { gateway }
    }

    /// The commits unique to `target` relative to `source`.
    pub async fn commit_range(
        &self,
        source: &str,
        target: &str,
    ) -> Result<Vec<CommitSummary>, GatewayError> {
        self.gateway.compare(source, target).await
    }

    /// Full metadata for one commit.
    pub async fn commit_detail(&self, commit_id: &str) -> Result<CommitRecord, GatewayError> {
        self.gateway.get_commit(commit_id).await
    }

    /// Ordered commit records for the range `source..target`.
    pub async fn build_changelog(
        &self,
        source: &str,
        target: &str,
    ) -> Result<Vec<CommitRecord>, GatewayError> {
        let range = self.commit_range(source, target).await?;
        let mut records = Vec::with_capacity(range.len());
        for summary in range {
            records.push(self.commit_detail(&summary.id).await?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CommitStats, DiffEntry};
    use crate::gateway::mock::MockGateway;

    fn record(id: &str, title: &str) -> CommitRecord {
        CommitRecord {
            commit_id: id.to_string(),
            commit_url: format!("https://gitlab.com/g/p/-/commit/{}", id),
            commit_author: "Sam".into(),
            title: title.to_string(),
            committed_date: "2024-05-01T10:00:00Z".into(),
            stats: CommitStats::default(),
            diff: vec![DiffEntry {
                change_for: "src/lib.rs".into(),
            }],
        }
    }

    #[tokio::test]
    async fn changelog_preserves_compare_order() {
        let gateway = MockGateway::new()
            .with_compare(
                "1.2.0",
                "1.3.0",
                vec![
                    CommitSummary {
                        id: "bbb".into(),
                        title: "Second".into(),
                    },
                    CommitSummary {
                        id: "aaa".into(),
                        title: "First".into(),
                    },
                ],
            )
            .with_commit(record("bbb", "Second"))
            .with_commit(record("aaa", "First"));

        let builder = ChangelogBuilder::new(&gateway);
        let changelog = builder.build_changelog("1.2.0", "1.3.0").await.unwrap();
        let ids: Vec<&str> = changelog.iter().map(|c| c.commit_id.as_str()).collect();
        assert_eq!(ids, vec!["bbb", "aaa"]);
    }

    #[tokio::test]
    async fn empty_range_builds_empty_changelog() {
        let gateway = MockGateway::new();
        let builder = ChangelogBuilder::new(&gateway);
        let changelog = builder.build_changelog("1.2.0", "1.3.0").await.unwrap();
        assert!(changelog.is_empty());
    }

    #[tokio::test]
    async fn missing_commit_detail_is_an_error() {
        let gateway = MockGateway::new().with_compare(
            "1.2.0",
            "1.3.0",
            vec![CommitSummary {
                id: "gone".into(),
                title: "Vanished".into(),
            }],
        );
        let builder = ChangelogBuilder::new(&gateway);
        let err = builder.build_changelog("1.2.0", "1.3.0").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }
}

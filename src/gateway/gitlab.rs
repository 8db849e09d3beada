//! gateway::gitlab
//!
//! GitLab implementation of the repository gateway using the v4 REST API.
//!
//! # Design
//!
//! One gateway instance is bound to a single project (full path, e.g.
//! `group/subgroup/app`). Authentication is a personal or project access
//! token sent via the `PRIVATE-TOKEN` header.
//!
//! All listing endpoints are paginated; this implementation follows pages to
//! exhaustion so a tag snapshot is always complete. There is no caching and
//! no automatic retry here - transient-failure policy belongs to call sites,
//! see [`crate::release::RetryPolicy`].
//!
//! # Timeouts
//!
//! Connect and per-request timeouts come from [`Config`] and are applied to
//! the underlying HTTP client at construction.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::traits::{GatewayError, RepositoryGateway};
use crate::core::config::Config;
use crate::core::types::{
    Branch, CommitRecord, CommitStats, CommitSummary, DiffEntry, ReleaseRecord, Tag,
};

/// Page size for paginated listing endpoints.
const PER_PAGE: usize = 100;

/// GitLab gateway implementation.
pub struct GitLabGateway {
    /// HTTP client for making requests
    client: Client,
    /// Access token sent as `PRIVATE-TOKEN`
    token: String,
    /// Full project path, e.g. `group/app`
    project: String,
    /// API base URL, `<instance>/api/v4`
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitLabGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabGateway")
            .field("has_token", &!self.token.is_empty())
            .field("project", &self.project)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitLabGateway {
    /// Create a gateway bound to one project on one GitLab instance.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Instance URL, e.g. `https://gitlab.com`
    /// * `token` - Access token with `api` scope
    /// * `project` - Full project path, e.g. `group/subgroup/app`
    /// * `config` - Run configuration; supplies the transport timeouts
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        project: impl Into<String>,
        config: &Config,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            token: token.into(),
            project: project.into(),
            api_base: format!("{}/api/v4", base_url.trim_end_matches('/')),
        })
    }

    /// The bound project path.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// The API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Verify the bound project exists and the token can see it.
    ///
    /// # Errors
    ///
    /// - `Authentication` when the token is rejected
    /// - `ProjectNotFound` when the project path resolves to nothing
    pub async fn ensure_project(&self) -> Result<(), GatewayError> {
        let url = format!("{}/projects/{}", self.api_base, encode_path(&self.project));
        let response = self.get(&url, &[]).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::ProjectNotFound(self.project.clone()));
        }
        Err(self.error_for(response, status).await)
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, GatewayError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&self.token).map_err(|_| {
            GatewayError::Authentication("token contains invalid header characters".into())
        })?;
        headers.insert("PRIVATE-TOKEN", value);
        Ok(headers)
    }

    /// Build URL for a project repository endpoint.
    fn project_url(&self, path: &str) -> String {
        format!(
            "{}/projects/{}/{}",
            self.api_base,
            encode_path(&self.project),
            path
        )
    }

    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, GatewayError> {
        self.client
            .get(url)
            .headers(self.headers()?)
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let response = self.get(url, query).await?;
        self.handle_response(response).await
    }

    /// Follow a paginated listing endpoint to exhaustion.
    async fn get_paged<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, GatewayError> {
        let mut all = Vec::new();
        let mut page: u32 = 1;
        loop {
            let page_str = page.to_string();
            let per_page_str = PER_PAGE.to_string();
            let mut q: Vec<(&str, &str)> = query.to_vec();
            q.push(("per_page", per_page_str.as_str()));
            q.push(("page", page_str.as_str()));

            let batch: Vec<T> = self.get_json(url, &q).await?;
            let len = batch.len();
            all.extend(batch);
            if len < PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(all)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, GatewayError> {
        let response = self
            .client
            .post(url)
            .headers(self.headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        self.handle_response(response).await
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(|e| GatewayError::Api {
                status: status.as_u16(),
                message: format!("failed to parse response: {}", e),
            })
        } else {
            Err(self.error_for(response, status).await)
        }
    }

    /// Map an error response to the gateway taxonomy.
    async fn error_for(&self, response: Response, status: StatusCode) -> GatewayError {
        let message = error_message(response).await;
        match status {
            StatusCode::UNAUTHORIZED => {
                GatewayError::Authentication("invalid or expired token".into())
            }
            StatusCode::FORBIDDEN => {
                GatewayError::Authentication(format!("permission denied: {}", message))
            }
            StatusCode::NOT_FOUND => GatewayError::NotFound(message),
            _ => GatewayError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl RepositoryGateway for GitLabGateway {
    fn name(&self) -> &'static str {
        "gitlab"
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, GatewayError> {
        let raw: Vec<GitLabTag> = self
            .get_paged(&self.project_url("repository/tags"), &[])
            .await?;
        Ok(raw
            .into_iter()
            .map(|t| Tag::new(t.name, t.commit.id))
            .collect())
    }

    async fn get_branch(&self, name: &str) -> Result<Option<Branch>, GatewayError> {
        let url = self.project_url(&format!("repository/branches/{}", encode_path(name)));
        let response = self.get(&url, &[]).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let raw: GitLabBranch = if status.is_success() {
            response.json().await.map_err(|e| GatewayError::Api {
                status: status.as_u16(),
                message: format!("failed to parse response: {}", e),
            })?
        } else {
            return Err(self.error_for(response, status).await);
        };
        Ok(Some(Branch::new(raw.name, raw.commit.id)))
    }

    async fn create_branch(&self, name: &str, source_ref: &str) -> Result<Branch, GatewayError> {
        let raw: GitLabBranch = self
            .post_json(
                &self.project_url("repository/branches"),
                &serde_json::json!({ "branch": name, "ref": source_ref }),
            )
            .await?;
        Ok(Branch::new(raw.name, raw.commit.id))
    }

    async fn list_commits(&self, branch: &str) -> Result<Vec<String>, GatewayError> {
        let raw: Vec<GitLabCommitRef> = self
            .get_paged(
                &self.project_url("repository/commits"),
                &[("ref_name", branch)],
            )
            .await?;
        Ok(raw.into_iter().map(|c| c.id).collect())
    }

    async fn create_tag(&self, name: &str, target: &str) -> Result<Tag, GatewayError> {
        let result: Result<GitLabTag, GatewayError> = self
            .post_json(
                &self.project_url("repository/tags"),
                &serde_json::json!({ "tag_name": name, "ref": target }),
            )
            .await;
        match result {
            Ok(raw) => Ok(Tag::new(raw.name, raw.commit.id)),
            Err(GatewayError::Api { message, .. }) if message.contains("already exists") => {
                Err(GatewayError::TagConflict(name.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn compare(&self, from: &str, to: &str) -> Result<Vec<CommitSummary>, GatewayError> {
        let raw: GitLabCompare = self
            .get_json(
                &self.project_url("repository/compare"),
                &[("from", from), ("to", to)],
            )
            .await?;
        Ok(raw
            .commits
            .into_iter()
            .map(|c| CommitSummary {
                id: c.id,
                title: c.title,
            })
            .collect())
    }

    async fn get_commit(&self, id: &str) -> Result<CommitRecord, GatewayError> {
        let detail: GitLabCommitDetail = self
            .get_json(
                &self.project_url(&format!("repository/commits/{}", id)),
                &[("stats", "true")],
            )
            .await?;
        let diff: Vec<GitLabDiffEntry> = self
            .get_paged(
                &self.project_url(&format!("repository/commits/{}/diff", id)),
                &[],
            )
            .await?;
        Ok(CommitRecord {
            commit_id: detail.id,
            commit_url: detail.web_url,
            commit_author: detail.author_name,
            title: detail.title,
            committed_date: detail.committed_date,
            stats: CommitStats {
                additions: detail.stats.additions,
                deletions: detail.stats.deletions,
                total: detail.stats.total,
            },
            diff: diff
                .into_iter()
                .map(|d| DiffEntry {
                    change_for: d.new_path,
                })
                .collect(),
        })
    }

    async fn create_release(
        &self,
        name: &str,
        tag_name: &str,
        description: &str,
    ) -> Result<ReleaseRecord, GatewayError> {
        let raw: GitLabRelease = self
            .post_json(
                &self.project_url("releases"),
                &serde_json::json!({
                    "name": name,
                    "tag_name": tag_name,
                    "description": description,
                }),
            )
            .await?;
        Ok(ReleaseRecord {
            name: raw.name,
            tag_name: raw.tag_name,
            description: raw.description,
        })
    }
}

// --------------------------------------------------------------------------
// Wire types
// --------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GitLabCommitRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GitLabTag {
    name: String,
    commit: GitLabCommitRef,
}

#[derive(Debug, Deserialize)]
struct GitLabBranch {
    name: String,
    commit: GitLabCommitRef,
}

#[derive(Debug, Deserialize)]
struct GitLabCompare {
    #[serde(default)]
    commits: Vec<GitLabCompareCommit>,
}

#[derive(Debug, Deserialize)]
struct GitLabCompareCommit {
    id: String,
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct GitLabStats {
    additions: u64,
    deletions: u64,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct GitLabCommitDetail {
    id: String,
    web_url: String,
    author_name: String,
    title: String,
    committed_date: String,
    #[serde(default)]
    stats: GitLabStats,
}

#[derive(Debug, Deserialize)]
struct GitLabDiffEntry {
    new_path: String,
}

#[derive(Debug, Deserialize)]
struct GitLabRelease {
    name: String,
    tag_name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct GitLabErrorResponse {
    message: serde_json::Value,
}

/// Extract a human-readable message from an error response body.
///
/// GitLab error bodies carry `message` as either a plain string or a
/// field-to-errors object; both are flattened to text.
async fn error_message(response: Response) -> String {
    match response.json::<GitLabErrorResponse>().await {
        Ok(err) => match err.message {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        },
        Err(_) => "unknown error".to_string(),
    }
}

/// URL-encode a path used as a single URL segment.
///
/// GitLab accepts the URL-encoded full project path in place of a numeric
/// project id, and branch names may themselves contain `/`.
fn encode_path(path: &str) -> String {
    path.replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_nested_paths() {
        assert_eq!(encode_path("group/subgroup/app"), "group%2Fsubgroup%2Fapp");
        assert_eq!(encode_path("release/1.3"), "release%2F1.3");
        assert_eq!(encode_path("master"), "master");
    }

    #[test]
    fn api_base_is_normalized() {
        let config = Config::default();
        let gateway =
            GitLabGateway::new("https://gitlab.example.com/", "token", "group/app", &config)
                .unwrap();
        assert_eq!(gateway.api_base(), "https://gitlab.example.com/api/v4");
        assert_eq!(gateway.project(), "group/app");
    }

    #[test]
    fn project_urls_embed_encoded_path() {
        let config = Config::default();
        let gateway =
            GitLabGateway::new("https://gitlab.com", "token", "group/app", &config).unwrap();
        assert_eq!(
            gateway.project_url("repository/tags"),
            "https://gitlab.com/api/v4/projects/group%2Fapp/repository/tags"
        );
    }

    #[test]
    fn debug_does_not_leak_token() {
        let config = Config::default();
        let gateway =
            GitLabGateway::new("https://gitlab.com", "glpat-secret", "group/app", &config).unwrap();
        let rendered = format!("{:?}", gateway);
        assert!(!rendered.contains("glpat-secret"));
        assert!(rendered.contains("has_token: true"));
    }
}

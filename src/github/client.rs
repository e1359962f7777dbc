//! GitHub REST client
//!
//! A thin wrapper around a pre-configured `reqwest::Client`. Credentials
//! come from `GH_TOKEN` (optional; unauthenticated calls work but are
//! rate-limited) and the endpoint from `GITHUB_API_URL`, which the
//! Actions runner sets and which also points GHES installs and test
//! servers at the right place.
//!
//! Response handling is uniform across both endpoints: 404 and 410 map to
//! their own error variants, any other non-2xx surfaces as a generic
//! "status not OK", and transport failures pass through untouched.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::{debug, info, warn};

use super::runs::{HistoryQuery, ListRunsResponse, RepoRef, WorkflowRun};
use super::{ApiError, RunHistoryFetcher, RunStatusFetcher};

/// Public API endpoint, used when `GITHUB_API_URL` is unset.
const DEFAULT_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("actions-gate/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GithubClient {
    base_url: String,
    http: Client,
}

impl GithubClient {
    /// Build a client from the environment: `GH_TOKEN` for auth and
    /// `GITHUB_API_URL` for the endpoint.
    pub fn from_env() -> Result<Self, ApiError> {
        let token = env::var("GH_TOKEN").ok().filter(|t| !t.is_empty());
        let base_url =
            env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(base_url, token)
    }

    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static(API_VERSION),
        );
        if let Some(token) = token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidConfig(format!("invalid GH_TOKEN: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn runs_url(&self, repo: &RepoRef, workflow_file: &str) -> String {
        format!(
            "{}/repos/{}/{}/actions/workflows/{}/runs",
            self.base_url, repo.owner, repo.repo, workflow_file
        )
    }

    fn run_url(&self, repo: &RepoRef, run_id: i64) -> String {
        format!(
            "{}/repos/{}/{}/actions/runs/{}",
            self.base_url, repo.owner, repo.repo, run_id
        )
    }
}

/// Map a response status onto the error taxonomy; `None` means success.
fn classify_status(status: StatusCode) -> Option<ApiError> {
    if status == StatusCode::NOT_FOUND {
        Some(ApiError::WorkflowNotFound)
    } else if status == StatusCode::GONE {
        Some(ApiError::MethodGone)
    } else if !status.is_success() {
        Some(ApiError::StatusNotOk {
            status: status.as_u16(),
        })
    } else {
        None
    }
}

#[async_trait]
impl RunHistoryFetcher for GithubClient {
    async fn list_runs(
        &self,
        repo: &RepoRef,
        query: &HistoryQuery,
    ) -> Result<Vec<WorkflowRun>, ApiError> {
        let url = self.runs_url(repo, &query.workflow_file);
        info!(
            owner = %repo.owner,
            repo = %repo.repo,
            workflow_file = %query.workflow_file,
            per_page = query.per_page,
            "fetching recent workflow runs"
        );

        let per_page = query.per_page.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("branch", query.branch.as_str()),
                ("page", "1"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if let Some(err) = classify_status(status) {
            warn!(
                status = status.as_u16(),
                owner = %repo.owner,
                repo = %repo.repo,
                workflow_file = %query.workflow_file,
                "workflow runs request rejected"
            );
            return Err(err);
        }

        let payload: ListRunsResponse = response.json().await?;
        debug!(
            total_count = payload.total_count,
            returned = payload.workflow_runs.len(),
            "workflow runs returned"
        );
        Ok(payload.workflow_runs)
    }
}

#[async_trait]
impl RunStatusFetcher for GithubClient {
    async fn get_run(&self, repo: &RepoRef, run_id: i64) -> Result<WorkflowRun, ApiError> {
        let url = self.run_url(repo, run_id);
        debug!(owner = %repo.owner, repo = %repo.repo, run_id, "fetching workflow run");

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if let Some(err) = classify_status(status) {
            warn!(
                status = status.as_u16(),
                owner = %repo.owner,
                repo = %repo.repo,
                run_id,
                "workflow run request rejected"
            );
            return Err(err);
        }

        let run: WorkflowRun = response.json().await?;
        debug!(run_id, status = %run.status, updated_at = %run.updated_at, "workflow run returned");
        Ok(run)
    }
}

//! HTTP client for the remote analysis server's REST API.

use crate::RemoteError;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const STATUS_PATH: &str = "/api/system/status";
const PROJECT_SEARCH_PATH: &str = "/api/projects/search";

/// Connection settings for the remote analysis server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:9000`.
    pub base_url: String,
    /// Bearer token; `None` sends unauthenticated requests.
    pub token: Option<String>,
    /// Project key used as the project-search query.
    pub project_key: String,
    /// Bound for the liveness probe.
    pub probe_timeout: Duration,
    /// Bound for proxied API calls.
    pub request_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".into(),
            token: None,
            project_key: "sonar-poc".into(),
            probe_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Successful project-search response, passed through as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSearch {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Client for the remote analysis server. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: HttpClient,
    config: RemoteConfig,
}

impl RemoteClient {
    pub fn new(mut config: RemoteConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            http: HttpClient::new(),
            config,
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn get(&self, path: &str, timeout: Duration) -> reqwest::RequestBuilder {
        let request = self
            .http
            .get(format!("{}{path}", self.config.base_url))
            .timeout(timeout);
        match self.config.token.as_deref() {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    /// Query the project-search endpoint for the configured project key.
    pub async fn search_projects(&self) -> Result<ProjectSearch, RemoteError> {
        let response = self
            .get(PROJECT_SEARCH_PATH, self.config.request_timeout)
            .query(&[("q", self.config.project_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "[Remote] project search failed");
                RemoteError::Unavailable(e.without_url().to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "[Remote] project search rejected");
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.without_url().to_string()))?;

        Ok(ProjectSearch {
            status: status.as_u16(),
            body,
        })
    }

    async fn probe_status(&self) -> Result<(), RemoteError> {
        let response = self
            .get(STATUS_PATH, self.config.probe_timeout)
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(e.without_url().to_string()))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteError::Status {
                status: status.as_u16(),
                body: String::new(),
            })
        }
    }
}

/// Single best-effort liveness probe against the remote status endpoint.
///
/// Returns `true` only for a 2xx answer. Network errors, timeouts and other
/// statuses all collapse to `false`; the reason is only logged.
pub async fn check_remote_health(client: &RemoteClient) -> bool {
    match client.probe_status().await {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "[Remote] status probe failed");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

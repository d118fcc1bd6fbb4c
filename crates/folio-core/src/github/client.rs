use base64::Engine as _;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use super::source::{GithubRepo, RepoListing, RepoSource};
use crate::config::GithubConfig;
use crate::error::{FolioError, Result};
use crate::model::{CoreRateLimit, RateLimitInfo};

/// Remaining-request level below which every call logs a warning.
const LOW_QUOTA_WARNING: u64 = 100;

/// GitHub REST v3 client scoped to one user's public repositories.
pub struct GithubClient {
    username: String,
    api_url: String,
    user_agent: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("username", &self.username)
            .field("api_url", &self.api_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl GithubClient {
    pub fn from_config(config: &GithubConfig) -> Self {
        let token = config.resolve_token();
        if token.is_some() {
            tracing::debug!("using authenticated GitHub API requests");
        } else {
            tracing::warn!(
                "no GitHub token configured, using unauthenticated requests (60/hour limit)"
            );
        }

        Self {
            username: config.username.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            token,
            client: reqwest::Client::new(),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let mut req = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", &self.user_agent);

        if let Some(ref token) = self.token {
            req = req.header("Authorization", format!("token {token}"));
        }

        req.send()
            .await
            .map_err(|e| FolioError::Upstream(format!("GitHub request failed: {e}")))
    }

    fn rate_limit_message(&self) -> String {
        if self.token.is_some() {
            "Rate limit exceeded. Authenticated".to_string()
        } else {
            "Rate limit exceeded. Add GITHUB_TOKEN env variable for 5000/hour limit instead of 60/hour"
                .to_string()
        }
    }
}

impl RepoSource for GithubClient {
    /// GET {api}/users/{user}/repos?sort=updated&per_page=100
    async fn list_repos(&self) -> Result<RepoListing> {
        let url = format!(
            "{}/users/{}/repos?sort=updated&per_page=100",
            self.api_url, self.username
        );
        let resp = self.get(&url).await?;
        let rate_limit = parse_rate_limit_headers(resp.headers());
        log_quota(&rate_limit);

        let status = resp.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FolioError::rate_limited(
                self.rate_limit_message(),
                Some(rate_limit),
            ));
        }
        if !status.is_success() {
            return Err(FolioError::Upstream(format!(
                "GitHub API error: {}",
                status.as_u16()
            )));
        }

        let repos: Vec<GithubRepo> = resp
            .json()
            .await
            .map_err(|e| FolioError::Upstream(format!("GitHub repo list parse error: {e}")))?;

        Ok(RepoListing {
            repos,
            rate_limit: Some(rate_limit),
        })
    }

    /// GET {api}/repos/{user}/{repo}/readme; the body carries base64 content.
    async fn fetch_readme(&self, repo: &str) -> Result<Option<String>> {
        let url = format!("{}/repos/{}/{}/readme", self.api_url, self.username, repo);
        let resp = self.get(&url).await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(repo, "no README found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FolioError::Upstream(format!(
                "README fetch for {repo} failed: {}",
                status.as_u16()
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FolioError::Upstream(format!("README parse error for {repo}: {e}")))?;

        let encoded = json["content"].as_str().ok_or_else(|| {
            FolioError::Upstream(format!("README response for {repo} missing content"))
        })?;

        decode_readme(encoded).map(Some)
    }

    /// GET {api}/rate_limit
    async fn rate_limit(&self) -> Result<CoreRateLimit> {
        let url = format!("{}/rate_limit", self.api_url);
        let resp = self.get(&url).await?;

        if !resp.status().is_success() {
            return Err(FolioError::Upstream(format!(
                "GitHub API error: {}",
                resp.status().as_u16()
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FolioError::Upstream(format!("rate limit parse error: {e}")))?;

        let core = &json["resources"]["core"];
        let reset = core["reset"].as_i64().unwrap_or_default();
        let reset_date = chrono::DateTime::from_timestamp(reset, 0)
            .map(|d| d.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
            .unwrap_or_default();

        Ok(CoreRateLimit {
            limit: core["limit"].as_u64().unwrap_or_default(),
            remaining: core["remaining"].as_u64().unwrap_or_default(),
            reset,
            used: core["used"].as_u64().unwrap_or_default(),
            reset_date,
        })
    }

    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Decode the base64 README payload. GitHub wraps it at 60 columns.
fn decode_readme(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| FolioError::Upstream(format!("README base64 decode error: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read the `x-ratelimit-*` headers GitHub attaches to every response.
pub fn parse_rate_limit_headers(headers: &HeaderMap) -> RateLimitInfo {
    let read = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    RateLimitInfo {
        limit: read("x-ratelimit-limit").and_then(|v| v.parse().ok()),
        remaining: read("x-ratelimit-remaining").and_then(|v| v.parse().ok()),
        reset: read("x-ratelimit-reset").and_then(|v| v.parse().ok()),
        used: read("x-ratelimit-used").and_then(|v| v.parse().ok()),
    }
}

fn log_quota(info: &RateLimitInfo) {
    tracing::debug!(
        remaining = ?info.remaining,
        limit = ?info.limit,
        "GitHub API rate limit"
    );
    if let Some(remaining) = info.remaining {
        if remaining < LOW_QUOTA_WARNING {
            tracing::warn!(remaining, "GitHub API rate limit low");
        }
    }
}

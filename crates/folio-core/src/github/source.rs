use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{CoreRateLimit, RateLimitInfo};

/// Repository metadata as returned by `GET /users/{user}/repos`.
/// Only the fields Folio reads are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GithubRepo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
}

/// Repositories in upstream update order plus the quota headers of the call.
#[derive(Debug, Clone, Default)]
pub struct RepoListing {
    pub repos: Vec<GithubRepo>,
    pub rate_limit: Option<RateLimitInfo>,
}

/// Where repository data comes from. `GithubClient` is the real implementation;
/// tests substitute canned or failing sources.
pub trait RepoSource: Send + Sync {
    /// List the owner's repositories, most recently updated first.
    fn list_repos(&self) -> impl std::future::Future<Output = Result<RepoListing>> + Send;

    /// Raw README markdown, or `None` if the repository has no README.
    fn fetch_readme(
        &self,
        repo: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;

    /// Current core quota.
    fn rate_limit(&self) -> impl std::future::Future<Output = Result<CoreRateLimit>> + Send;

    /// Whether requests carry a token (5000/hour instead of 60/hour).
    fn is_authenticated(&self) -> bool;
}


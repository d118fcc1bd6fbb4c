use serde::{Deserialize, Serialize};

/// Priority given to projects without an explicit one. Sorts last.
pub const DEFAULT_PRIORITY: u32 = 999;

/// Description used when neither an override, a README, nor GitHub provides one.
pub const NO_DESCRIPTION: &str = "No description available.";

/// A showcased repository: GitHub metadata merged with static overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub title: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_content: Option<String>,
    #[serde(default)]
    pub readme_preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Repository URL on GitHub.
    pub github: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default = "default_show")]
    pub show: bool,
}

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

fn default_show() -> bool {
    true
}

impl ProjectRecord {
    /// Repository name, taken from the last path segment of the GitHub URL.
    pub fn repo_name(&self) -> &str {
        self.github
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.github)
    }

    pub fn has_live_link(&self) -> bool {
        self.link.as_deref().is_some_and(|l| !l.is_empty())
    }
}

/// Static per-repository fields that win over anything derived from GitHub.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectOverride {
    /// Repository name this override applies to (exact match).
    pub repo: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub show: Option<bool>,
}

impl ProjectOverride {
    pub fn is_hidden(&self) -> bool {
        self.show == Some(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total_projects: usize,
    pub top_technologies: Vec<TechCount>,
    pub has_live_projects: usize,
}

/// Quota state reported by GitHub in `x-ratelimit-*` headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    pub reset: Option<i64>,
    pub used: Option<u64>,
}

/// Body of the project listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectRecord>,
    pub last_updated: String,
    #[serde(default)]
    pub cached: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_age_minutes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_repos: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_repos: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitInfo>,
    #[serde(default)]
    pub authenticated: bool,
}

/// Core quota as returned by `GET /rate_limit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreRateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: i64,
    pub used: u64,
    pub reset_date: String,
}

/// Body of the rate-limit introspection endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLimitResponse {
    pub core: CoreRateLimit,
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

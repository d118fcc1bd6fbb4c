use crate::error::{FolioError, Result};
use crate::model::{ProjectOverride, ProjectRecord};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod defaults;

pub use defaults::{default_fallback_projects, default_project_overrides};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

/// Freshness windows for the two project caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Origin cache in front of the GitHub API (default 30 minutes).
    #[serde(default = "default_origin_ttl_secs")]
    pub origin_ttl_secs: u64,
    /// Catalog cache in front of the project listing (default 10 minutes).
    #[serde(default = "default_catalog_ttl_secs")]
    pub catalog_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            origin_ttl_secs: default_origin_ttl_secs(),
            catalog_ttl_secs: default_catalog_ttl_secs(),
        }
    }
}

/// An extra intent rule supplied through configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRuleConfig {
    pub intent: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// History entries kept per turn; the first entry is always retained.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Phrases that refer to a specific project (e.g. "shop wise").
    #[serde(default = "default_project_keywords")]
    pub project_keywords: Vec<String>,
    /// Listing endpoint the catalog reads from. When unset, the in-process
    /// GitHub origin is used.
    #[serde(default)]
    pub projects_endpoint: Option<String>,
    /// Rules evaluated before the built-in intent table.
    #[serde(default)]
    pub extra_rules: Vec<IntentRuleConfig>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            project_keywords: default_project_keywords(),
            projects_endpoint: None,
            extra_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub env_var: Option<String>,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    /// Hard ceiling for a single completion request.
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_llm_provider(),
            model: default_llm_model(),
            api_key: None,
            base_url: None,
            env_var: None,
            max_tokens: default_llm_max_tokens(),
            temperature: default_llm_temperature(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// Facts about the site owner that the assistant is allowed to state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub name: String,
    pub headline: String,
    pub current_role: String,
    /// Current employer; also used to recognise "current role" topics.
    pub employer: String,
    pub previous_roles: Vec<String>,
    pub education: String,
    /// School name; also used to recognise "education" topics.
    pub school: Option<String>,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
    pub email: String,
    pub linkedin: Option<String>,
    pub youtube: Option<String>,
    pub resume_url: Option<String>,
    pub availability: Option<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        defaults::default_profile()
    }
}

impl ProfileConfig {
    pub fn github_url(&self, username: &str) -> String {
        format!("https://github.com/{username}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_github_username")]
    pub username: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub env_var: Option<String>,
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
    #[serde(default = "default_github_user_agent")]
    pub user_agent: String,
    /// Number of repositories (in update order) whose README is fetched.
    #[serde(default = "default_readme_budget")]
    pub readme_budget: usize,
    #[serde(default = "default_max_projects")]
    pub max_projects: usize,
    #[serde(default = "default_project_overrides")]
    pub overrides: Vec<ProjectOverride>,
    /// Served only when GitHub fails and nothing has been cached yet.
    #[serde(default = "default_fallback_projects")]
    pub fallback: Vec<ProjectRecord>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            username: default_github_username(),
            token: None,
            env_var: None,
            api_url: default_github_api_url(),
            user_agent: default_github_user_agent(),
            readme_budget: default_readme_budget(),
            max_projects: default_max_projects(),
            overrides: default_project_overrides(),
            fallback: default_fallback_projects(),
        }
    }
}

impl GithubConfig {
    /// Token from config, else from `env_var` (default `GITHUB_TOKEN`).
    pub fn resolve_token(&self) -> Option<String> {
        if let Some(ref token) = self.token {
            if !token.is_empty() {
                return Some(token.clone());
            }
        }
        let env_var_name = self.env_var.as_deref().unwrap_or("GITHUB_TOKEN");
        std::env::var(env_var_name).ok().filter(|t| !t.is_empty())
    }
}

fn default_web_host() -> String {
    "127.0.0.1".to_string()
}
fn default_web_port() -> u16 {
    3000
}
fn default_origin_ttl_secs() -> u64 {
    30 * 60
}
fn default_catalog_ttl_secs() -> u64 {
    10 * 60
}
fn default_history_limit() -> usize {
    crate::model::DEFAULT_HISTORY_LIMIT
}
fn default_project_keywords() -> Vec<String> {
    defaults::default_project_keywords()
}
fn default_llm_provider() -> String {
    "ollama".to_string()
}
fn default_llm_model() -> String {
    "llama3.2".to_string()
}
fn default_llm_max_tokens() -> usize {
    1024
}
fn default_llm_temperature() -> f32 {
    0.7
}
fn default_llm_timeout_secs() -> u64 {
    60
}
fn default_github_username() -> String {
    "rishabhxchoudhary".to_string()
}
fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_github_user_agent() -> String {
    concat!("folio/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_readme_budget() -> usize {
    10
}
fn default_max_projects() -> usize {
    20
}

/// Valid LLM provider names.
pub const VALID_LLM_PROVIDERS: &[&str] = &["ollama", "openai", "gemini", "anthropic", "claude"];

impl FolioConfig {
    /// Load configuration with layered merge:
    /// 1. ~/.config/folio/config.toml (global)
    /// 2. folio.toml in the project directory
    /// 3. folio.local.toml in the project directory (gitignored)
    /// 4. `FOLIO__SECTION__KEY` environment variables
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join("folio.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join("folio.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| FolioError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| FolioError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Defaults only (no files, no environment).
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Render the effective configuration as TOML, with secrets masked.
    pub fn to_toml_string(&self) -> Result<String> {
        let mut masked = self.clone();
        if masked.github.token.is_some() {
            masked.github.token = Some("********".to_string());
        }
        if masked.llm.api_key.is_some() {
            masked.llm.api_key = Some("********".to_string());
        }
        toml::to_string_pretty(&masked).map_err(|e| FolioError::Config(e.to_string()))
    }

    /// Validate config values, clamping out-of-range values and logging warnings.
    /// Lenient: it fixes values rather than rejecting the config.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.llm.enabled && !VALID_LLM_PROVIDERS.contains(&self.llm.provider.as_str()) {
            warnings.push(format!(
                "unknown LLM provider '{}', valid: {}",
                self.llm.provider,
                VALID_LLM_PROVIDERS.join(", ")
            ));
        }

        if self.llm.max_tokens == 0 {
            warnings.push("llm.max_tokens = 0, setting to 256".to_string());
            self.llm.max_tokens = 256;
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            warnings.push(format!(
                "llm.temperature = {} out of range, clamping to [0, 2]",
                self.llm.temperature
            ));
            self.llm.temperature = self.llm.temperature.clamp(0.0, 2.0);
        }

        if self.llm.timeout_secs == 0 {
            warnings.push("llm.timeout_secs = 0, setting to 60".to_string());
            self.llm.timeout_secs = 60;
        }

        if self.chat.history_limit < 2 {
            warnings.push(format!(
                "chat.history_limit = {}, setting to 2",
                self.chat.history_limit
            ));
            self.chat.history_limit = 2;
        }

        if self.cache.origin_ttl_secs == 0 {
            warnings.push("cache.origin_ttl_secs = 0, setting to 60".to_string());
            self.cache.origin_ttl_secs = 60;
        }
        if self.cache.catalog_ttl_secs == 0 {
            warnings.push("cache.catalog_ttl_secs = 0, setting to 60".to_string());
            self.cache.catalog_ttl_secs = 60;
        }

        if self.github.max_projects == 0 {
            warnings.push("github.max_projects = 0, setting to 1".to_string());
            self.github.max_projects = 1;
        }

        if self.github.username.trim().is_empty() {
            warnings.push("github.username is empty; project listing will fall back".to_string());
        }

        if self.github.fallback.is_empty() {
            warnings.push(
                "github.fallback is empty; a cold cache with GitHub down will list nothing"
                    .to_string(),
            );
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("folio").join("config.toml"))
}

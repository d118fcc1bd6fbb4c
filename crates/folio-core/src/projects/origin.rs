//! Projects origin: turns the owner's GitHub repositories into showcase
//! records, with a 30-minute cache that is served stale when GitHub fails and
//! a static fallback list when there is nothing cached at all.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use crate::cache::CacheSlot;
use crate::config::GithubConfig;
use crate::error::{FolioError, Result};
use crate::github::{clean_preview, map_technologies, GithubRepo, RepoSource};
use crate::model::{
    CoreRateLimit, ProjectOverride, ProjectRecord, ProjectsResponse, RateLimitInfo,
    DEFAULT_PRIORITY, NO_DESCRIPTION,
};

#[derive(Debug, Clone)]
struct OriginSnapshot {
    projects: Vec<ProjectRecord>,
    last_updated: String,
}

/// Result of one successful upstream pass.
struct Refreshed {
    projects: Vec<ProjectRecord>,
    total_repos: usize,
    filtered_repos: usize,
    rate_limit: Option<RateLimitInfo>,
}

pub struct ProjectsOrigin<R> {
    source: Arc<R>,
    cache: CacheSlot<OriginSnapshot>,
    overrides: Vec<ProjectOverride>,
    fallback: Vec<ProjectRecord>,
    readme_budget: usize,
    max_projects: usize,
}

impl<R: RepoSource + 'static> ProjectsOrigin<R> {
    pub fn new(source: R, config: &GithubConfig, ttl: Duration) -> Self {
        Self {
            source: Arc::new(source),
            cache: CacheSlot::new(ttl),
            overrides: config.overrides.clone(),
            fallback: config.fallback.clone(),
            readme_budget: config.readme_budget,
            max_projects: config.max_projects,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.source.is_authenticated()
    }

    /// Current GitHub core quota.
    pub async fn rate_limit(&self) -> Result<CoreRateLimit> {
        self.source.rate_limit().await
    }

    /// Project listing. Never fails: upstream errors degrade to the cached
    /// snapshot (marked stale) or to the static fallback list.
    pub async fn fetch(&self, force_refresh: bool) -> ProjectsResponse {
        let authenticated = self.is_authenticated();

        if !force_refresh {
            if let Some(cached) = self.cache.get().await.filter(|c| c.fresh) {
                tracing::debug!(
                    age_secs = cached.age.as_secs(),
                    "serving cached GitHub projects"
                );
                return ProjectsResponse {
                    projects: cached.data.projects,
                    last_updated: cached.data.last_updated,
                    cached: true,
                    cache_age_minutes: Some(cached.age.as_secs() / 60),
                    authenticated,
                    ..Default::default()
                };
            }
        }

        match self.refresh().await {
            Ok(refreshed) => {
                let last_updated = now_rfc3339();
                tracing::info!(
                    projects = refreshed.projects.len(),
                    total_repos = refreshed.total_repos,
                    "fetched projects from GitHub"
                );
                self.cache
                    .store(OriginSnapshot {
                        projects: refreshed.projects.clone(),
                        last_updated: last_updated.clone(),
                    })
                    .await;
                ProjectsResponse {
                    projects: refreshed.projects,
                    last_updated,
                    cached: false,
                    total_repos: Some(refreshed.total_repos),
                    filtered_repos: Some(refreshed.filtered_repos),
                    rate_limit: refreshed.rate_limit,
                    authenticated,
                    ..Default::default()
                }
            }
            Err(e) => self.degraded(e, authenticated).await,
        }
    }

    async fn degraded(&self, err: FolioError, authenticated: bool) -> ProjectsResponse {
        let message = upstream_message(&err);

        if let Some(cached) = self.cache.get().await {
            tracing::warn!(error = %err, "GitHub fetch failed, serving stale projects");
            return ProjectsResponse {
                projects: cached.data.projects,
                last_updated: cached.data.last_updated,
                cached: true,
                stale: true,
                error: Some(message),
                cache_age_minutes: Some(cached.age.as_secs() / 60),
                rate_limit: err.rate_limit_info().cloned(),
                authenticated,
                ..Default::default()
            };
        }

        tracing::warn!(error = %err, "GitHub fetch failed with empty cache, serving fallback projects");
        ProjectsResponse {
            projects: self.fallback.clone(),
            last_updated: now_rfc3339(),
            cached: false,
            fallback: true,
            error: Some(message),
            rate_limit: err.rate_limit_info().cloned(),
            authenticated,
            ..Default::default()
        }
    }

    async fn refresh(&self) -> Result<Refreshed> {
        let listing = self.source.list_repos().await?;
        let total_repos = listing.repos.len();

        let candidates: Vec<GithubRepo> = listing
            .repos
            .into_iter()
            .filter(|r| !r.fork && !r.archived)
            .filter(|r| !self.override_for(&r.name).is_some_and(|o| o.is_hidden()))
            .collect();
        let filtered_repos = candidates.len();

        let budget = self.readme_budget.min(candidates.len());
        let mut readmes = self.fetch_readmes(&candidates[..budget]).await;
        readmes.resize(candidates.len(), None);

        let mut projects: Vec<ProjectRecord> = candidates
            .iter()
            .zip(readmes)
            .map(|(repo, readme)| transform_repo(repo, readme, self.override_for(&repo.name)))
            .filter(|p| self.is_showcase(p))
            .collect();

        projects.sort_by_key(|p| p.priority);
        projects.truncate(self.max_projects);

        Ok(Refreshed {
            projects,
            total_repos,
            filtered_repos,
            rate_limit: listing.rate_limit,
        })
    }

    /// README bodies for `repos`, concurrently, in input order. A failed fetch
    /// is logged and treated as "no README".
    async fn fetch_readmes(&self, repos: &[GithubRepo]) -> Vec<Option<String>> {
        let mut set = JoinSet::new();
        for (idx, repo) in repos.iter().enumerate() {
            let source = Arc::clone(&self.source);
            let name = repo.name.clone();
            set.spawn(async move {
                let readme = match source.fetch_readme(&name).await {
                    Ok(readme) => readme,
                    Err(e) => {
                        tracing::debug!(repo = %name, error = %e, "README fetch failed");
                        None
                    }
                };
                (idx, readme)
            });
        }

        let mut out = vec![None; repos.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, readme)) => out[idx] = readme,
                Err(e) => tracing::warn!(error = %e, "README task failed"),
            }
        }
        out
    }

    fn override_for(&self, repo: &str) -> Option<&ProjectOverride> {
        self.overrides.iter().find(|o| o.repo == repo)
    }

    /// Kept if visible and it has something to show: a README, a real
    /// description, or a curated override.
    fn is_showcase(&self, project: &ProjectRecord) -> bool {
        project.show
            && (project.readme_content.is_some()
                || project.description != NO_DESCRIPTION
                || self.override_for(project.repo_name()).is_some())
    }
}

/// Merge one repository with its README and override. Override fields win.
pub(crate) fn transform_repo(
    repo: &GithubRepo,
    readme: Option<String>,
    overrides: Option<&ProjectOverride>,
) -> ProjectRecord {
    let preview = readme.as_deref().map(clean_preview).unwrap_or_default();

    let description = overrides
        .and_then(|o| o.description.clone())
        .or_else(|| Some(preview.clone()).filter(|p| !p.is_empty()))
        .or_else(|| repo.description.clone().filter(|d| !d.trim().is_empty()))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let title = overrides
        .and_then(|o| o.title.clone())
        .unwrap_or_else(|| repo.name.replace(['-', '_'], " "));

    let technologies = overrides
        .and_then(|o| o.technologies.clone())
        .unwrap_or_else(|| map_technologies(repo.language.as_deref(), &repo.topics));

    let link = overrides
        .and_then(|o| o.link.clone())
        .or_else(|| repo.homepage.clone().filter(|h| !h.trim().is_empty()));

    ProjectRecord {
        title,
        technologies,
        description,
        readme_content: readme,
        readme_preview: preview,
        link,
        github: repo.html_url.clone(),
        image: overrides.and_then(|o| o.image.clone()),
        priority: overrides
            .and_then(|o| o.priority)
            .unwrap_or(DEFAULT_PRIORITY),
        show: overrides.and_then(|o| o.show).unwrap_or(true),
    }
}

fn upstream_message(err: &FolioError) -> String {
    match err {
        FolioError::RateLimited { message, .. } | FolioError::Upstream(message) => message.clone(),
        _ => "Failed to fetch from GitHub API".to_string(),
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

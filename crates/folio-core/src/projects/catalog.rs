//! Consumer-side project cache used by the chat engine. Refreshes from a
//! [`ProjectSource`] every 10 minutes by default and never surfaces a load
//! failure to callers of the query methods.

use std::time::Duration;

use crate::cache::{CacheSlot, CacheStatus};
use crate::error::Result;
use crate::model::{ProjectRecord, ProjectStats};

use super::query;
use super::source::ProjectSource;

pub struct ProjectCatalog<S> {
    source: S,
    cache: CacheSlot<Vec<ProjectRecord>>,
}

impl<S: ProjectSource> ProjectCatalog<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            cache: CacheSlot::new(ttl),
        }
    }

    /// Fresh cache, else load; on load failure fall back to stale data. Errors
    /// only when the load fails and nothing was ever cached.
    pub async fn try_projects(&self) -> Result<Vec<ProjectRecord>> {
        if let Some(projects) = self.cache.fresh().await {
            return Ok(projects);
        }

        match self.source.load_projects().await {
            Ok(projects) => {
                tracing::debug!(count = projects.len(), "project catalog refreshed");
                self.cache.store(projects.clone()).await;
                Ok(projects)
            }
            Err(e) => match self.cache.get().await {
                Some(stale) => {
                    tracing::warn!(error = %e, "project load failed, using stale catalog");
                    Ok(stale.data)
                }
                None => Err(e),
            },
        }
    }

    /// Like [`try_projects`](Self::try_projects) but an unavailable source
    /// yields an empty list.
    pub async fn projects(&self) -> Vec<ProjectRecord> {
        self.try_projects().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "project catalog unavailable");
            Vec::new()
        })
    }

    pub async fn find_by_name(&self, name: &str) -> Option<ProjectRecord> {
        let projects = self.projects().await;
        query::find_by_name(&projects, name).cloned()
    }

    pub async fn by_technology(&self, tech: &str) -> Vec<ProjectRecord> {
        query::by_technology(&self.projects().await, tech)
    }

    pub async fn featured(&self) -> Vec<ProjectRecord> {
        query::featured(&self.projects().await)
    }

    pub async fn top(&self, limit: usize) -> Vec<ProjectRecord> {
        query::top(&self.projects().await, limit)
    }

    pub async fn search(&self, text: &str) -> Vec<ProjectRecord> {
        query::search(&self.projects().await, text)
    }

    pub async fn stats(&self) -> ProjectStats {
        query::stats(&self.projects().await)
    }

    /// Titles and repository names of whatever is cached, fresh or not.
    /// Never triggers a load.
    pub async fn cached_names(&self) -> Vec<String> {
        let Some(cached) = self.cache.get().await else {
            return Vec::new();
        };
        let mut names = Vec::new();
        for p in cached.data.iter().filter(|p| p.show) {
            names.push(p.title.clone());
            let repo = p.repo_name();
            if !repo.is_empty() && !repo.eq_ignore_ascii_case(&p.title) {
                names.push(repo.to_string());
            }
        }
        names
    }

    pub async fn clear(&self) {
        self.cache.clear().await;
    }

    pub async fn status(&self) -> CacheStatus {
        self.cache.status().await
    }
}

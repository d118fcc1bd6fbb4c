use std::sync::Arc;
use std::time::Duration;

use crate::config::FolioConfig;
use crate::error::{FolioError, Result};
use crate::github::{GithubClient, RepoSource};
use crate::model::{ProjectRecord, ProjectsResponse};

use super::origin::ProjectsOrigin;

/// Where the catalog loads its project list from.
pub trait ProjectSource: Send + Sync {
    fn load_projects(&self) -> impl std::future::Future<Output = Result<Vec<ProjectRecord>>> + Send;
}

impl<R: RepoSource + 'static> ProjectSource for ProjectsOrigin<R> {
    async fn load_projects(&self) -> Result<Vec<ProjectRecord>> {
        Ok(self.fetch(false).await.projects)
    }
}

impl<T: ProjectSource> ProjectSource for Arc<T> {
    async fn load_projects(&self) -> Result<Vec<ProjectRecord>> {
        self.as_ref().load_projects().await
    }
}

/// Reads the listing endpoint of a running folio-web instance.
#[derive(Debug, Clone)]
pub struct HttpProjectSource {
    url: String,
    client: reqwest::Client,
}

impl HttpProjectSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FolioError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ProjectSource for HttpProjectSource {
    async fn load_projects(&self) -> Result<Vec<ProjectRecord>> {
        let resp = self
            .client
            .get(&self.url)
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| FolioError::Upstream(format!("projects endpoint request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(FolioError::Upstream(format!(
                "projects endpoint returned {}",
                resp.status().as_u16()
            )));
        }

        let body: ProjectsResponse = resp
            .json()
            .await
            .map_err(|e| FolioError::Upstream(format!("projects endpoint parse error: {e}")))?;
        Ok(body.projects)
    }
}

/// The concrete source chosen from configuration.
pub enum FeedSource {
    /// In-process GitHub origin, shared with whoever else holds the `Arc`.
    Origin(Arc<ProjectsOrigin<GithubClient>>),
    /// A remote listing endpoint.
    Http(HttpProjectSource),
}

impl ProjectSource for FeedSource {
    async fn load_projects(&self) -> Result<Vec<ProjectRecord>> {
        match self {
            FeedSource::Origin(origin) => origin.load_projects().await,
            FeedSource::Http(http) => http.load_projects().await,
        }
    }
}

/// `chat.projects_endpoint` set: read it over HTTP. Otherwise use `origin`.
pub fn create_source(
    config: &FolioConfig,
    origin: Arc<ProjectsOrigin<GithubClient>>,
) -> Result<FeedSource> {
    match config.chat.projects_endpoint.as_deref() {
        Some(url) if !url.trim().is_empty() => {
            tracing::debug!(url, "catalog reads projects over HTTP");
            let timeout = Duration::from_secs(config.llm.timeout_secs.max(1));
            Ok(FeedSource::Http(HttpProjectSource::new(url.trim(), timeout)?))
        }
        _ => Ok(FeedSource::Origin(origin)),
    }
}

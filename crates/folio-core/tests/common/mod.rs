#![allow(unused_imports, dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use folio_core::error::{FolioError, Result};
use folio_core::github::{GithubRepo, RepoListing, RepoSource};
use folio_core::model::{CoreRateLimit, ProjectRecord, RateLimitInfo};
use folio_core::projects::ProjectSource;

/// Counters and failure switch shared between a fake and the test body.
#[derive(Debug, Default)]
pub struct FakeState {
    pub fail: AtomicBool,
    pub list_calls: AtomicUsize,
    pub readme_calls: AtomicUsize,
}

impl FakeState {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn failing(&self) -> bool {
        self.fail.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn readme_calls(&self) -> usize {
        self.readme_calls.load(Ordering::SeqCst)
    }
}

/// In-memory GitHub stand-in.
#[derive(Default)]
pub struct FakeRepos {
    pub repos: Vec<GithubRepo>,
    pub readmes: HashMap<String, String>,
    pub authenticated: bool,
    pub state: Arc<FakeState>,
}

impl FakeRepos {
    pub fn new(repos: Vec<GithubRepo>) -> Self {
        Self {
            repos,
            ..Default::default()
        }
    }

    pub fn with_readme(mut self, repo: &str, body: &str) -> Self {
        self.readmes.insert(repo.to_string(), body.to_string());
        self
    }

    pub fn failing() -> Self {
        let fake = Self::default();
        fake.state.set_failing(true);
        fake
    }

    pub fn state(&self) -> Arc<FakeState> {
        Arc::clone(&self.state)
    }
}

/// Headers GitHub sends with a 403 once the hourly quota is spent.
pub fn exhausted_quota() -> RateLimitInfo {
    RateLimitInfo {
        limit: Some(60),
        remaining: Some(0),
        reset: Some(1_700_000_000),
        used: Some(60),
    }
}

impl RepoSource for FakeRepos {
    async fn list_repos(&self) -> Result<RepoListing> {
        self.state.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.failing() {
            return Err(FolioError::rate_limited(
                "Rate limit exceeded. Add GITHUB_TOKEN env variable for 5000/hour limit instead of 60/hour",
                Some(exhausted_quota()),
            ));
        }
        Ok(RepoListing {
            repos: self.repos.clone(),
            rate_limit: Some(RateLimitInfo {
                limit: Some(60),
                remaining: Some(59),
                reset: Some(1_700_000_000),
                used: Some(1),
            }),
        })
    }

    async fn fetch_readme(&self, repo: &str) -> Result<Option<String>> {
        self.state.readme_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.readmes.get(repo).cloned())
    }

    async fn rate_limit(&self) -> Result<CoreRateLimit> {
        if self.state.failing() {
            return Err(FolioError::Upstream("GitHub API error: 503".into()));
        }
        Ok(CoreRateLimit {
            limit: 60,
            remaining: 42,
            reset: 1_700_000_000,
            used: 18,
            reset_date: "2023-11-14T22:13:20.000Z".into(),
        })
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

/// Serves a fixed list; can be switched to failing after the first load.
#[derive(Default)]
pub struct FakeProjects {
    pub projects: Vec<ProjectRecord>,
    pub fail: AtomicBool,
    pub loads: AtomicUsize,
}

impl FakeProjects {
    pub fn new(projects: Vec<ProjectRecord>) -> Self {
        Self {
            projects,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        let fake = Self::default();
        fake.fail.store(true, Ordering::SeqCst);
        fake
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ProjectSource for FakeProjects {
    async fn load_projects(&self) -> Result<Vec<ProjectRecord>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(FolioError::Upstream("projects endpoint returned 502".into()));
        }
        Ok(self.projects.clone())
    }
}

pub fn repo(name: &str) -> GithubRepo {
    GithubRepo {
        name: name.to_string(),
        html_url: format!("https://github.com/owner/{name}"),
        updated_at: Some("2026-01-01T00:00:00Z".into()),
        ..Default::default()
    }
}

pub fn described_repo(name: &str, description: &str, language: &str) -> GithubRepo {
    GithubRepo {
        description: Some(description.to_string()),
        language: Some(language.to_string()),
        ..repo(name)
    }
}

pub fn project(title: &str, repo: &str, techs: &[&str], priority: u32) -> ProjectRecord {
    ProjectRecord {
        title: title.to_string(),
        technologies: techs.iter().map(|t| t.to_string()).collect(),
        description: format!("{title}: a project built for testing."),
        readme_content: None,
        readme_preview: String::new(),
        link: None,
        github: format!("https://github.com/owner/{repo}"),
        image: None,
        priority,
        show: true,
    }
}

/// Showcase list with one React project among several others.
pub fn sample_projects() -> Vec<ProjectRecord> {
    let mut shop = project("ShopWise", "ShopWise", &["TypeScript", "Next.js", "MongoDB"], 2);
    shop.link = Some("https://shopwise.example.com".into());
    vec![
        project(
            "Environment Initiative App",
            "Environment-Initiative-App",
            &["MongoDB", "React.js", "Blockchain"],
            1,
        ),
        shop,
        project(
            "Manga Downloader in Rust",
            "Manga-Downloader-in-Rust",
            &["Rust", "Tokio"],
            3,
        ),
        project("TaskManager", "TaskManager", &["Next.js", "PostgreSQL"], 4),
        project("Go Scraper", "go-scraper", &["Go", "C"], 999),
    ]
}

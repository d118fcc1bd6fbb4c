//! Origin and catalog cache behaviour against in-memory sources.
//!
//! Run: `cargo test -p folio-core --test projects_cache`

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    described_repo, exhausted_quota, project, repo, sample_projects, FakeProjects, FakeRepos,
};
use folio_core::config::GithubConfig;
use folio_core::model::{ProjectOverride, NO_DESCRIPTION};
use folio_core::projects::{ProjectCatalog, ProjectsOrigin};

const MINUTE: Duration = Duration::from_secs(60);

fn github_config(overrides: Vec<ProjectOverride>) -> GithubConfig {
    GithubConfig {
        username: "owner".into(),
        token: None,
        overrides,
        ..Default::default()
    }
}

fn showcase_repos() -> Vec<folio_core::github::GithubRepo> {
    vec![
        described_repo("alpha-tool", "Alpha command line tool", "Rust"),
        described_repo("beta_site", "Beta marketing site", "TypeScript"),
        described_repo("gamma", "Gamma service", "Go"),
    ]
}

#[tokio::test]
async fn test_origin_fetch_then_cached() {
    let fake = FakeRepos::new(showcase_repos());
    let state = fake.state();
    let origin = ProjectsOrigin::new(fake, &github_config(vec![]), MINUTE);

    let first = origin.fetch(false).await;
    assert!(!first.cached);
    assert!(!first.stale);
    assert!(!first.fallback);
    assert_eq!(first.projects.len(), 3);
    assert_eq!(first.total_repos, Some(3));
    assert_eq!(first.filtered_repos, Some(3));
    assert_eq!(first.rate_limit.as_ref().and_then(|r| r.remaining), Some(59));
    assert!(!first.authenticated);

    let second = origin.fetch(false).await;
    assert!(second.cached);
    assert_eq!(second.cache_age_minutes, Some(0));
    assert_eq!(second.projects, first.projects);
    assert_eq!(second.last_updated, first.last_updated);
    assert_eq!(state.list_calls(), 1);
}

#[tokio::test]
async fn test_origin_force_refresh_bypasses_cache() {
    let fake = FakeRepos::new(showcase_repos());
    let state = fake.state();
    let origin = ProjectsOrigin::new(fake, &github_config(vec![]), MINUTE);

    origin.fetch(false).await;
    let refreshed = origin.fetch(true).await;
    assert!(!refreshed.cached);
    assert_eq!(state.list_calls(), 2);
}

#[tokio::test]
async fn test_origin_filters_forks_archived_hidden_and_empty() {
    let mut fork = described_repo("forked", "A fork", "Rust");
    fork.fork = true;
    let mut archived = described_repo("old", "Archived thing", "Rust");
    archived.archived = true;
    let hidden = described_repo("nextjs-portfolio", "My old portfolio", "TypeScript");
    let bare = repo("scratch");
    let curated = repo("curated");

    let overrides = vec![
        ProjectOverride {
            repo: "nextjs-portfolio".into(),
            show: Some(false),
            ..Default::default()
        },
        ProjectOverride {
            repo: "curated".into(),
            title: Some("Curated Project".into()),
            ..Default::default()
        },
    ];

    let mut repos = showcase_repos();
    repos.extend([fork, archived, hidden, bare, curated]);
    let origin = ProjectsOrigin::new(FakeRepos::new(repos), &github_config(overrides), MINUTE);

    let resp = origin.fetch(false).await;
    let titles: Vec<&str> = resp.projects.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(resp.total_repos, Some(8));
    assert_eq!(resp.filtered_repos, Some(5));
    assert_eq!(
        titles,
        vec!["alpha tool", "beta site", "gamma", "Curated Project"]
    );

    let curated = resp.projects.iter().find(|p| p.title == "Curated Project").unwrap();
    assert_eq!(curated.description, NO_DESCRIPTION);
}

#[tokio::test]
async fn test_origin_readme_budget_and_preview() {
    let repos: Vec<_> = (0..5)
        .map(|i| described_repo(&format!("repo-{i}"), &format!("Repo {i}"), "Rust"))
        .collect();
    let fake = FakeRepos::new(repos)
        .with_readme("repo-0", "# Repo 0\n\nA **fast** tool for [things](https://x.dev).")
        .with_readme("repo-4", "# Repo 4\n\nNever fetched.");
    let state = fake.state();
    let config = GithubConfig {
        readme_budget: 2,
        ..github_config(vec![])
    };
    let origin = ProjectsOrigin::new(fake, &config, MINUTE);

    let resp = origin.fetch(false).await;
    assert_eq!(state.readme_calls(), 2);

    let first = &resp.projects[0];
    assert_eq!(first.description, "A fast tool for things.");
    assert_eq!(first.readme_preview, "A fast tool for things.");
    assert!(first.readme_content.as_deref().unwrap().starts_with("# Repo 0"));

    let last = resp.projects.iter().find(|p| p.title == "repo 4").unwrap();
    assert_eq!(last.description, "Repo 4");
    assert!(last.readme_content.is_none());
}

#[tokio::test]
async fn test_origin_priority_sort_is_stable_and_capped() {
    let overrides = vec![
        ProjectOverride {
            repo: "gamma".into(),
            priority: Some(1),
            ..Default::default()
        },
        ProjectOverride {
            repo: "beta_site".into(),
            priority: Some(2),
            ..Default::default()
        },
    ];
    let mut repos = showcase_repos();
    repos.push(described_repo("delta", "Delta", "Python"));
    let config = GithubConfig {
        max_projects: 3,
        ..github_config(overrides)
    };
    let origin = ProjectsOrigin::new(FakeRepos::new(repos), &config, MINUTE);

    let resp = origin.fetch(false).await;
    let titles: Vec<&str> = resp.projects.iter().map(|p| p.title.as_str()).collect();
    // unprioritised repos keep upstream order after the prioritised ones
    assert_eq!(titles, vec!["gamma", "beta site", "alpha tool"]);
}

#[tokio::test]
async fn test_origin_serves_stale_on_failure() {
    let fake = FakeRepos::new(showcase_repos());
    let state = fake.state();
    let origin = ProjectsOrigin::new(fake, &github_config(vec![]), Duration::ZERO);

    let fresh = origin.fetch(false).await;
    state.set_failing(true);

    let stale = origin.fetch(false).await;
    assert!(stale.cached);
    assert!(stale.stale);
    assert!(!stale.fallback);
    assert_eq!(stale.projects, fresh.projects);
    assert!(stale.error.as_deref().unwrap().starts_with("Rate limit exceeded"));
    assert_eq!(stale.rate_limit, Some(exhausted_quota()));
}

#[tokio::test]
async fn test_origin_cold_failure_serves_fallback() {
    let config = github_config(vec![]);
    let origin = ProjectsOrigin::new(FakeRepos::failing(), &config, MINUTE);

    let resp = origin.fetch(false).await;
    assert!(resp.fallback);
    assert!(!resp.cached);
    assert!(!resp.projects.is_empty());
    assert_eq!(resp.projects, config.fallback);
    assert!(resp.error.is_some());
    assert_eq!(resp.rate_limit, Some(exhausted_quota()));
}

#[tokio::test]
async fn test_origin_rate_limit_passthrough() {
    let origin = ProjectsOrigin::new(FakeRepos::new(vec![]), &github_config(vec![]), MINUTE);
    let core = origin.rate_limit().await.unwrap();
    assert_eq!(core.remaining, 42);
    assert!(!origin.is_authenticated());

    let failing = ProjectsOrigin::new(FakeRepos::failing(), &github_config(vec![]), MINUTE);
    assert!(failing.rate_limit().await.is_err());
}

#[tokio::test]
async fn test_catalog_caches_within_window() {
    let source = Arc::new(FakeProjects::new(sample_projects()));
    let catalog = ProjectCatalog::new(Arc::clone(&source), MINUTE);

    assert_eq!(catalog.projects().await.len(), 5);
    assert_eq!(catalog.projects().await.len(), 5);
    assert_eq!(source.loads(), 1);

    let status = catalog.status().await;
    assert!(status.has_data);
    assert!(!status.is_stale);

    catalog.clear().await;
    assert!(!catalog.status().await.has_data);
    catalog.projects().await;
    assert_eq!(source.loads(), 2);
}

#[tokio::test]
async fn test_catalog_serves_stale_when_source_fails() {
    let source = Arc::new(FakeProjects::new(sample_projects()));
    let catalog = ProjectCatalog::new(Arc::clone(&source), Duration::ZERO);

    let first = catalog.projects().await;
    source.set_failing(true);

    let second = catalog.try_projects().await.unwrap();
    assert_eq!(second, first);
    assert_eq!(source.loads(), 2);
}

#[tokio::test]
async fn test_catalog_cold_failure_is_empty() {
    let catalog = ProjectCatalog::new(FakeProjects::failing(), MINUTE);
    assert!(catalog.try_projects().await.is_err());
    assert!(catalog.projects().await.is_empty());
    assert!(catalog.featured().await.is_empty());
    assert_eq!(catalog.stats().await.total_projects, 0);
}

#[tokio::test]
async fn test_catalog_queries() {
    let catalog = ProjectCatalog::new(FakeProjects::new(sample_projects()), MINUTE);

    let shop = catalog.find_by_name("shop wise").await.unwrap();
    assert_eq!(shop.title, "ShopWise");

    let react = catalog.by_technology("react").await;
    assert_eq!(react.len(), 1);
    assert!(react[0].technologies.iter().any(|t| t == "React.js"));

    let featured = catalog.featured().await;
    assert_eq!(featured.len(), 4);
    assert_eq!(featured[0].title, "Environment Initiative App");

    assert_eq!(catalog.top(2).await.len(), 2);
    assert_eq!(catalog.search("tokio").await.len(), 1);

    let stats = catalog.stats().await;
    assert_eq!(stats.total_projects, 5);
    assert_eq!(stats.has_live_projects, 1);
}

#[tokio::test]
async fn test_catalog_cached_names_never_load() {
    let source = Arc::new(FakeProjects::new(vec![project(
        "Environment Initiative App",
        "Environment-Initiative-App",
        &[],
        1,
    )]));
    let catalog = ProjectCatalog::new(Arc::clone(&source), MINUTE);

    assert!(catalog.cached_names().await.is_empty());
    assert_eq!(source.loads(), 0);

    catalog.projects().await;
    assert_eq!(
        catalog.cached_names().await,
        vec!["Environment Initiative App", "Environment-Initiative-App"]
    );
}

#[tokio::test]
async fn test_catalog_over_origin() {
    let origin = Arc::new(ProjectsOrigin::new(
        FakeRepos::new(showcase_repos()),
        &github_config(vec![]),
        MINUTE,
    ));
    let catalog = ProjectCatalog::new(Arc::clone(&origin), MINUTE);

    let found = catalog.find_by_name("alpha-tool").await.unwrap();
    assert_eq!(found.title, "alpha tool");
    assert_eq!(catalog.by_technology("typescript").await.len(), 1);
}

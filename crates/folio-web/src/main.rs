mod error;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use folio_core::chat::ChatService;
use folio_core::config::FolioConfig;
use folio_core::github::GithubClient;
use folio_core::llm::LlmService;
use folio_core::projects::{create_source, FeedSource, ProjectCatalog, ProjectsOrigin};

pub struct AppState {
    pub config: FolioConfig,
    pub origin: Arc<ProjectsOrigin<GithubClient>>,
    pub chat: ChatService<FeedSource>,
}

/// Wire the origin cache, the catalog the chat engine reads from, and the
/// optional LLM into one shared state.
pub fn build_state(config: FolioConfig) -> Result<Arc<AppState>> {
    let origin = Arc::new(ProjectsOrigin::new(
        GithubClient::from_config(&config.github),
        &config.github,
        Duration::from_secs(config.cache.origin_ttl_secs),
    ));

    let source = create_source(&config, Arc::clone(&origin))?;
    let catalog = Arc::new(ProjectCatalog::new(
        source,
        Duration::from_secs(config.cache.catalog_ttl_secs),
    ));

    let llm = if config.llm.enabled {
        match LlmService::from_config(&config.llm) {
            Ok(llm) => {
                tracing::info!(llm = %llm.describe(), "LLM replies enabled");
                Some(llm)
            }
            Err(e) => {
                tracing::warn!(error = %e, "LLM unavailable, using templated replies");
                None
            }
        }
    } else {
        None
    };

    let chat = ChatService::new(&config, catalog, llm);

    Ok(Arc::new(AppState {
        config,
        origin,
        chat,
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_web=info,folio_core=info".parse().unwrap()),
        )
        .init();

    let cwd = std::env::current_dir().ok();
    let config = FolioConfig::load(cwd.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config load failed, using defaults");
        FolioConfig::default_config()
    });

    let addr = format!("{}:{}", config.web.host, config.web.port);
    let state = build_state(config)?;
    let app = routes::app(state);

    tracing::info!("folio-web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub mod chat;
pub mod projects;
pub mod rate_limit;

use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(chat::routes())
        .merge(projects::routes())
        .merge(rate_limit::routes())
        .fallback(not_found)
}

/// Router with state and the HTTP layers applied; what `main` serves.
pub fn app(state: Arc<AppState>) -> Router {
    router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "llm": state.chat.llm().map(|l| l.describe()),
        "githubAuthenticated": state.origin.is_authenticated(),
        "githubUser": state.config.github.username,
    }))
}

async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use folio_core::config::FolioConfig;
    use http_body_util::BodyExt;

    use crate::AppState;

    /// State whose GitHub API URL points at a closed local port, so every
    /// upstream call fails fast and the degraded paths are exercised.
    pub fn offline_state() -> Arc<AppState> {
        let mut config = FolioConfig::default_config();
        config.github.api_url = "http://127.0.0.1:9".to_string();
        config.github.token = None;
        config.github.env_var = Some("FOLIO_WEB_TEST_UNSET_TOKEN".to_string());
        crate::build_state(config).unwrap()
    }

    pub fn offline_app() -> axum::Router {
        super::app(offline_state())
    }

    pub async fn body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::AppState;

/// Sent with healthy listings so a CDN can hold them as long as the origin does.
const LISTING_CACHE_CONTROL: &str = "public, s-maxage=1800, stale-while-revalidate=3600";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/github-projects", get(list_projects))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectsParams {
    #[serde(default)]
    pub refresh: Option<String>,
}

impl ProjectsParams {
    fn force_refresh(&self) -> bool {
        self.refresh.as_deref() == Some("true")
    }
}

/// Always 200: upstream trouble shows up as `stale`/`fallback` in the body.
async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProjectsParams>,
) -> Response {
    let listing = state.origin.fetch(params.force_refresh()).await;

    if listing.stale || listing.fallback {
        return Json(listing).into_response();
    }
    ([(header::CACHE_CONTROL, LISTING_CACHE_CONTROL)], Json(listing)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{body_json, offline_app};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_refresh_flag() {
        let params: ProjectsParams = serde_json::from_str(r#"{"refresh":"true"}"#).unwrap();
        assert!(params.force_refresh());
        let params: ProjectsParams = serde_json::from_str(r#"{"refresh":"1"}"#).unwrap();
        assert!(!params.force_refresh());
        assert!(!ProjectsParams::default().force_refresh());
    }

    #[tokio::test]
    async fn test_cold_failure_serves_fallback_with_200() {
        let req = Request::builder()
            .uri("/api/github-projects?refresh=true")
            .body(Body::empty())
            .unwrap();
        let resp = offline_app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::CACHE_CONTROL).is_none());

        let json = body_json(resp.into_body()).await;
        assert_eq!(json["fallback"], true);
        assert_eq!(json["cached"], false);
        assert!(json["error"].is_string());
        assert!(!json["projects"].as_array().unwrap().is_empty());
        assert!(json["lastUpdated"].is_string());
    }
}

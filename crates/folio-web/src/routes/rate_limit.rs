use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use folio_core::model::RateLimitResponse;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/github-rate-limit", get(rate_limit))
}

async fn rate_limit(State(state): State<Arc<AppState>>) -> (StatusCode, Json<RateLimitResponse>) {
    let authenticated = state.origin.is_authenticated();

    match state.origin.rate_limit().await {
        Ok(core) => (
            StatusCode::OK,
            Json(RateLimitResponse {
                core,
                authenticated,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "rate limit lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RateLimitResponse {
                    authenticated,
                    error: Some(e.to_string()),
                    ..Default::default()
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{body_json, offline_app};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_failure_is_500_with_zeroed_core() {
        let req = Request::builder()
            .uri("/api/github-rate-limit")
            .body(Body::empty())
            .unwrap();
        let resp = offline_app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(resp.into_body()).await;
        assert_eq!(
            json["core"],
            serde_json::json!({
                "limit": 0,
                "remaining": 0,
                "reset": 0,
                "used": 0,
                "resetDate": "",
            })
        );
        assert_eq!(json["authenticated"], false);
        assert!(json["error"].is_string());
    }
}

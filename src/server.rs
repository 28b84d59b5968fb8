//! Axum router and server setup.
//! Used by: main.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::error::Result;
use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/metrics", get(handlers::metrics::metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(state: AppState, addr: &str) -> Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::state::build_state;

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn metrics_json(router: Router) -> Value {
        let response = router.oneshot(get_req("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn metrics_returns_four_keys() {
        let state = build_state("orders-7d9f");
        state.snapshots.write(12.0, 34.0, Utc::now());

        let json = metrics_json(build_router(state)).await;
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert_eq!(obj["cpu_usage_percent"], 12.0);
        assert_eq!(obj["memory_usage_percent"], 34.0);
        assert_eq!(obj["kubernetes_pod_name"], "orders-7d9f");
        assert!(obj["last_updated_utc"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn metrics_before_first_cycle_is_zeroed() {
        let json = metrics_json(build_router(build_state(""))).await;
        assert_eq!(json["cpu_usage_percent"], 0.0);
        assert_eq!(json["memory_usage_percent"], 0.0);
        assert_eq!(json["kubernetes_pod_name"], "");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_see_consistent_snapshots() {
        let state = build_state("pod-a");
        let router = build_router(state.clone());

        let writer = {
            let state = state.clone();
            tokio::task::spawn_blocking(move || {
                for k in 1..=500 {
                    state.snapshots.write(k as f64, k as f64, Utc::now());
                }
            })
        };

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let router = router.clone();
                tokio::spawn(async move {
                    for _ in 0..25 {
                        let json = metrics_json(router.clone()).await;
                        assert_eq!(json.as_object().unwrap().len(), 4);
                        assert_eq!(json["cpu_usage_percent"], json["memory_usage_percent"]);
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for r in readers {
            r.await.unwrap();
        }
    }

    #[tokio::test]
    async fn health_returns_200() {
        let router = build_router(build_state("pod-a"));
        let response = router.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_path_returns_404() {
        let router = build_router(build_state("pod-a"));
        let response = router.oneshot(get_req("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

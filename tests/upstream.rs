//! HTTP source against a local upstream serving fixture payloads.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use healops::config::UpstreamConfig;
use healops::source::http::HttpSource;
use healops::source::{Endpoint, FetchError, IncidentSource};
use healops::view::{RefreshOutcome, Route, ViewController};
use serde_json::json;

async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn upstream_config(base_url: String) -> UpstreamConfig {
    UpstreamConfig {
        base_url,
        ..UpstreamConfig::default()
    }
}

#[tokio::test]
async fn test_controller_over_http() {
    let app = Router::new()
        .route(
            "/api/dashboard",
            get(|| async {
                Json(json!({
                    "summary": {"total_incidents": 1, "open_incidents": 1, "resolved_incidents": 0, "avg_mttr_seconds": null},
                    "latest": {"component": "ECS", "incident_type": "TASK_STOPPED", "failure_time": "2024-01-01T00:00:10Z"}
                }))
            }),
        )
        .route(
            "/api/incidents",
            get(|| async {
                Json(json!({"items": [{"incident_type": "TASK_STOPPED"}, {"title": "x"}]}))
            }),
        );
    let base = spawn_upstream(app).await;

    let source = HttpSource::new(&upstream_config(base)).unwrap();
    let controller = ViewController::new(Arc::new(source), None);

    assert_eq!(
        controller.refresh(Route::Incidents).await.unwrap(),
        RefreshOutcome::Rendered { rows: 2 }
    );
    assert_eq!(
        controller.refresh(Route::Dashboard).await.unwrap(),
        RefreshOutcome::Rendered { rows: 1 }
    );
    let dashboard = controller.render(Route::Dashboard).await;
    assert!(dashboard.contains("TASK_STOPPED"));
    assert!(dashboard.contains("1 / 0"));
}

#[tokio::test]
async fn test_http_errors_are_reported() {
    let app = Router::new()
        .route("/api/dashboard", get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }))
        .route("/api/incidents", get(|| async { "not json" }));
    let base = spawn_upstream(app).await;
    let source = HttpSource::new(&upstream_config(base)).unwrap();

    assert!(matches!(
        source.fetch(Endpoint::Summary).await,
        Err(FetchError::Status { status: 502, .. })
    ));
    assert!(matches!(
        source.fetch(Endpoint::Incidents).await,
        Err(FetchError::Decode { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_upstream() {
    let source = HttpSource::new(&upstream_config("http://127.0.0.1:1".to_string())).unwrap();
    assert!(matches!(
        source.fetch(Endpoint::Incidents).await,
        Err(FetchError::Request { .. })
    ));
}

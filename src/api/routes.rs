//! Route definitions.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::state::AppState;
use crate::render::page::PageTemplate;
use crate::view::Route;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/dashboard", get(dashboard_page))
        .route("/incidents", get(incidents_page))
        .route("/about", get(about_page))
        .route("/fragments/{route}", get(fragment))
        .route("/fragments/{route}/rows/{id}/toggle", post(toggle_row))
        .route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let last_refresh = state
        .controller
        .last_refresh()
        .await
        .map(|at| at.to_rfc3339());
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "last_refresh": last_refresh,
    }))
}

async fn dashboard_page(State(state): State<AppState>) -> Response {
    page(&state, Route::Dashboard).await
}

async fn incidents_page(State(state): State<AppState>) -> Response {
    page(&state, Route::Incidents).await
}

async fn about_page(State(state): State<AppState>) -> Response {
    page(&state, Route::About).await
}

async fn page(state: &AppState, route: Route) -> Response {
    let body = state.controller.render(route).await;
    match PageTemplate::new(route, body, state.refresh_ms).render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(%route, error = %e, "page template failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
        }
    }
}

async fn fragment(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match Route::parse(&name) {
        Some(route) => Html(state.controller.render(route).await).into_response(),
        None => (StatusCode::NOT_FOUND, "unknown view").into_response(),
    }
}

/// Toggle one row's detail panel and return the re-rendered fragment.
async fn toggle_row(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, usize)>,
) -> Response {
    let Some(route) = Route::parse(&name) else {
        return (StatusCode::NOT_FOUND, "unknown view").into_response();
    };
    match state.controller.click(route, id).await {
        Some(detail) => {
            debug!(%route, row = id, ?detail, "row toggled");
            Html(state.controller.render(route).await).into_response()
        }
        None => (StatusCode::NOT_FOUND, "unknown row").into_response(),
    }
}

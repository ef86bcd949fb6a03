//! HealOps -- operations dashboard for ECS incident snapshots.
//!
//! This crate polls a read-only incident API and renders its summary and
//! incident list into HTML tables with expandable evidence panels.

pub mod api;
pub mod config;
pub mod incident;
pub mod render;
pub mod source;
pub mod view;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::DashboardConfig;
use crate::source::http::HttpSource;
use crate::view::ViewController;

/// Start the dashboard: upstream poller and HTTP server.
pub async fn serve(config: DashboardConfig) -> Result<()> {
    // 1. Upstream source
    let source = HttpSource::new(&config.upstream).context("failed to build HTTP client")?;
    tracing::info!(upstream = %config.upstream.base_url, "Using upstream incident API");

    // 2. View controller
    let controller = Arc::new(ViewController::new(Arc::new(source), config.view.max_rows));

    // 3. Poller (background task)
    let poller = controller.clone();
    let interval = config.poll.interval();
    tokio::spawn(async move {
        view::poll::run_poll_loop(poller, interval).await;
    });

    // 4. HTTP server
    let addr: std::net::SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.server.bind))?;
    let app = api::router(api::state::AppState {
        controller,
        refresh_ms: interval.as_millis() as u64,
    });

    tracing::info!(%addr, "HealOps dashboard listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

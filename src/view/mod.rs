//! View controller: fetch a snapshot, normalize, render, swap.
//!
//! Each live view has its own single-flight guard. A refresh that arrives
//! while another refresh of the same view is still waiting on its fetch is
//! dropped, so two datasets are never interleaved in one view. A failed
//! fetch leaves the previously rendered view in place.

pub mod dashboard;
pub mod poll;
pub mod route;
pub mod table;

pub use dashboard::DashboardView;
pub use route::{nav, NavLink, Route};
pub use table::{DetailState, IncidentTable};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::incident::{parse_incident_list, DashboardPayload};
use crate::source::{Endpoint, FetchError, IncidentSource};

/// Result of one refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The view was re-rendered with `rows` incidents.
    Rendered { rows: usize },
    /// Another refresh of this view was in flight; this one was dropped.
    Skipped,
    /// The route has no upstream data.
    Static,
}

const ABOUT_HTML: &str = concat!(
    r#"<div class="card glass"><h3>HealOps</h3>"#,
    "<p>Read-only view of incidents detected on the ECS service: when each failure ",
    "was detected, how it was healed and how long recovery took.</p>",
    r#"<p class="muted">Rows expand on click to show task, autoscaling and store "#,
    "evidence.</p></div>",
);

/// The rendered views, as handed to [`dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Views {
    pub dashboard: DashboardView,
    pub incidents: IncidentTable,
}

impl Default for Views {
    fn default() -> Self {
        Self {
            dashboard: DashboardView::default(),
            incidents: IncidentTable::incidents(),
        }
    }
}

/// Render the body fragment for `route`.
pub fn dispatch(route: Route, views: &Views) -> String {
    match route {
        Route::Dashboard => views.dashboard.to_html(),
        Route::Incidents => views.incidents.to_html("incTable"),
        Route::About => ABOUT_HTML.to_string(),
    }
}

pub struct ViewController {
    source: Arc<dyn IncidentSource>,
    max_rows: Option<usize>,
    views: RwLock<Views>,
    dashboard_flight: Mutex<()>,
    incidents_flight: Mutex<()>,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
}

impl ViewController {
    pub fn new(source: Arc<dyn IncidentSource>, max_rows: Option<usize>) -> Self {
        Self {
            source,
            max_rows,
            views: RwLock::new(Views::default()),
            dashboard_flight: Mutex::new(()),
            incidents_flight: Mutex::new(()),
            last_refresh: RwLock::new(None),
        }
    }

    /// Fetch and re-render the view behind `route`.
    pub async fn refresh(&self, route: Route) -> Result<RefreshOutcome, FetchError> {
        let flight = match route {
            Route::Dashboard => &self.dashboard_flight,
            Route::Incidents => &self.incidents_flight,
            Route::About => return Ok(RefreshOutcome::Static),
        };
        let Ok(_guard) = flight.try_lock() else {
            debug!(%route, "refresh already in flight, dropping request");
            return Ok(RefreshOutcome::Skipped);
        };

        let rows = if route == Route::Dashboard {
            self.refresh_dashboard().await?
        } else {
            self.refresh_incidents().await?
        };

        *self.last_refresh.write().await = Some(Utc::now());
        info!(%route, rows, source = %self.source.describe(), "view refreshed");
        Ok(RefreshOutcome::Rendered { rows })
    }

    async fn refresh_dashboard(&self) -> Result<usize, FetchError> {
        let value = self.source.fetch(Endpoint::Summary).await?;
        let payload = DashboardPayload::from_value(&value);
        let mut views = self.views.write().await;
        views
            .dashboard
            .render_dashboard(payload.summary.as_ref(), payload.latest.as_ref());
        Ok(views.dashboard.latest.len())
    }

    async fn refresh_incidents(&self) -> Result<usize, FetchError> {
        let value = self.source.fetch(Endpoint::Incidents).await?;
        let mut items = parse_incident_list(&value);
        if let Some(max) = self.max_rows {
            items.truncate(max);
        }
        let mut views = self.views.write().await;
        views.incidents.render_incident_list(&items);
        Ok(items.len())
    }

    /// Current body fragment for `route`.
    pub async fn render(&self, route: Route) -> String {
        dispatch(route, &*self.views.read().await)
    }

    /// Toggle a row's detail panel. The state is kept across refreshes for
    /// as long as the incident stays in the view.
    pub async fn click(&self, route: Route, row_id: usize) -> Option<DetailState> {
        let mut views = self.views.write().await;
        match route {
            Route::Dashboard => views.dashboard.latest.click(row_id),
            Route::Incidents => views.incidents.click(row_id),
            Route::About => None,
        }
    }

    /// Copy of the current views.
    pub async fn snapshot(&self) -> Views {
        self.views.read().await.clone()
    }

    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.read().await
    }
}

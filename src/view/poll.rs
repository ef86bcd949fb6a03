use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{RefreshOutcome, Route, ViewController};

/// Periodic refresh loop.
/// Every tick spawns one refresh per live view. A slow fetch is never
/// cancelled; overlapping refreshes are dropped by the controller.
pub async fn run_poll_loop(controller: Arc<ViewController>, interval: Duration) {
    info!(?interval, "Poller started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        for route in Route::ALL.into_iter().filter(|r| r.is_live()) {
            let controller = controller.clone();
            tokio::spawn(async move {
                match controller.refresh(route).await {
                    Ok(RefreshOutcome::Skipped) => {
                        debug!(%route, "previous refresh still running");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(%route, error = %e, "refresh failed, keeping previous view");
                    }
                }
            });
        }
    }
}

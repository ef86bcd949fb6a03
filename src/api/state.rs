use std::sync::Arc;

use crate::view::ViewController;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ViewController>,
    /// In-page fragment refresh period in milliseconds.
    pub refresh_ms: u64,
}

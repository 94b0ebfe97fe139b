//! Shared application state for the dashboard server

use crate::dashboard::{Dashboard, SharedDashboard};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Current dashboard snapshot; swapped wholesale when the data refreshes
    pub dashboard: Arc<SharedDashboard>,
}

impl AppState {
    /// Creates application state serving `dashboard`
    pub fn new(dashboard: Dashboard) -> Self {
        AppState {
            dashboard: Arc::new(SharedDashboard::new(dashboard)),
        }
    }

    /// Creates application state around an existing shared holder, so a
    /// refresh task and the router see the same snapshot
    pub fn with_shared(dashboard: Arc<SharedDashboard>) -> Self {
        AppState { dashboard }
    }
}

// =============================================================================
// Central Application State
// =============================================================================
//
// Shared across request handlers via `Arc<AppState<S>>`. The dashboard and
// its configuration are read-only after startup; the only mutable piece is
// a lock-free request counter reported by the health endpoint.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use crate::dashboard::Dashboard;
use crate::market_data::PriceSource;

pub struct AppState<S> {
    pub dashboard: Dashboard<S>,

    /// Dashboard requests handled since startup.
    requests_served: AtomicU64,

    /// Instant when the server was started. Used for uptime reporting.
    pub start_time: std::time::Instant,
}

impl<S: PriceSource> AppState<S> {
    pub fn new(dashboard: Dashboard<S>) -> Self {
        Self {
            dashboard,
            requests_served: AtomicU64::new(0),
            start_time: std::time::Instant::now(),
        }
    }

    /// Record one served request and return the new total.
    pub fn record_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }
}

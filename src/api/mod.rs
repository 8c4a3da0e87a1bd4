//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use crate::domain::Clock;
use crate::gateway::PaymentGateway;
use crate::store::LibraryStore;

pub use routes::create_router;

/// Capabilities shared by every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LibraryStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LibraryStore>,
        gateway: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            gateway,
            clock,
        }
    }
}

//! Shared application state.
//!
//! A cloneable handle around the metrics registry, threaded through handler
//! construction instead of a global singleton.

use std::sync::Arc;

use crate::obs::ServerMetrics;

#[derive(Clone, Default)]
pub struct AppState {
    metrics: Arc<ServerMetrics>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.metrics
    }
}

//! Axum router wiring.
//!
//! Two reserved paths, everything else falls through to the 404 handler.
//! Paths are case-sensitive and method-agnostic.

use axum::{routing::any, Router};

use crate::{app_state::AppState, fallback, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", any(ops::healthz))
        .route("/metrics", any(ops::metrics))
        .fallback(fallback::not_found)
        .with_state(state)
}

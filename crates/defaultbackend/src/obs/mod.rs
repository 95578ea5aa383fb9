//! Lightweight in-process metrics.
//!
//! Metrics are stored as atomics and rendered in Prometheus text format by
//! the `/metrics` handler. No external metrics crates.

pub mod metrics;

pub use metrics::ServerMetrics;

//! Metrics registry for the default backend.
//!
//! Counter/histogram types keyed by the negotiated HTTP protocol version,
//! backed by `DashMap` and atomics. Histogram buckets are fixed in
//! microseconds internally to avoid floating point math on the hot path;
//! the rendered unit is milliseconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Label name every series carries.
const LABEL: &str = "proto";

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<String, AtomicU64>,
}

impl CounterVec {
    /// Increment the counter for one protocol label by 1.
    pub fn inc(&self, proto: &str) {
        let counter = self
            .map
            .entry(proto.to_string())
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value for one label, 0 if never incremented.
    pub fn get(&self, proto: &str) -> u64 {
        self.map
            .get(proto)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}=\"{}\"}} {}", name, LABEL, r.key(), val);
        }
    }
}

// Bucket upper bounds in microseconds, rendered as milliseconds:
// 0.5ms, 1ms, 2.5ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s
const BUCKETS: [(u64, &str); 11] = [
    (500, "0.5"),
    (1_000, "1"),
    (2_500, "2.5"),
    (5_000, "5"),
    (10_000, "10"),
    (25_000, "25"),
    (50_000, "50"),
    (100_000, "100"),
    (250_000, "250"),
    (500_000, "500"),
    (1_000_000, "1000"),
];

struct AtomicHistogram {
    count: AtomicU64,
    sum_micros: AtomicU64,
    buckets: [AtomicU64; BUCKETS.len()],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<String, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe one duration and increment cumulative buckets.
    pub fn observe(&self, proto: &str, duration: Duration) {
        let hist = self
            .map
            .entry(proto.to_string())
            .or_insert_with(AtomicHistogram::default);
        let micros = duration.as_micros() as u64;

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_micros.fetch_add(micros, Ordering::Relaxed);

        // Cumulative buckets: every bound >= the observation gets +1.
        for (i, (bound, _)) in BUCKETS.iter().enumerate() {
            if micros <= *bound {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Observation count for one label, 0 if never observed.
    pub fn count(&self, proto: &str) -> u64 {
        self.map
            .get(proto)
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format (unit: milliseconds).
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for r in self.map.iter() {
            let proto = r.key();
            let hist = r.value();

            for (i, (_, le)) in BUCKETS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(
                    out,
                    "{}_bucket{{{}=\"{}\",le=\"{}\"}} {}",
                    name, LABEL, proto, le, count
                );
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(
                out,
                "{}_bucket{{{}=\"{}\",le=\"+Inf\"}} {}",
                name, LABEL, proto, count
            );

            let sum_ms = hist.sum_micros.load(Ordering::Relaxed) as f64 / 1_000.0;
            let _ = writeln!(out, "{}_sum{{{}=\"{}\"}} {}", name, LABEL, proto, sum_ms);
            let _ = writeln!(out, "{}_count{{{}=\"{}\"}} {}", name, LABEL, proto, count);
        }
    }
}

/// Process-wide registry. Constructed once at startup and shared through
/// `AppState`; written by the fallback handler, read by `/metrics`.
#[derive(Default)]
pub struct ServerMetrics {
    pub request_count: CounterVec,
    pub request_duration: HistogramVec,
}

impl ServerMetrics {
    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.request_count.render("http_requests_total", &mut out);
        self.request_duration
            .render("http_request_duration_milliseconds", &mut out);
        out
    }
}

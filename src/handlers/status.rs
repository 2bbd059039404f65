//! Health and status endpoints, plus the shared state behind every route.
//!
//! `GET /health` is a bare liveness check. `GET /status` reports what the
//! extraction service has been doing since start-up:
//!
//! ```json
//! {
//!   "name": "recipekit-web",
//!   "version": "0.1.0",
//!   "uptime_secs": 3600,
//!   "extractions": {
//!     "parsed": 120,
//!     "partial": 9,
//!     "failed": 14,
//!     "by_layer": { "heuristic": 12, "json_ld": 101, "microdata": 7 }
//!   },
//!   "latency": { "samples": 134, "p50_ms": 410.0, "p95_ms": 1900.2, "p99_ms": 4200.7, "max_ms": 5120.0 },
//!   "memory": { "rss_bytes": 31457280, "virtual_bytes": 412090368 },
//!   "generated_at": "2026-01-01T00:00:00Z"
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::{debug, instrument};

use crate::extraction::ExtractionLayer;
use crate::service::RecipeService;

/// Slowest parse request the histogram tracks exactly (60 s, in microseconds).
const LATENCY_CEILING_US: u64 = 60_000_000;

/// `GET /health` body
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process answers
    pub status: &'static str,
}

/// `GET /status` body
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Package name
    pub name: &'static str,
    /// Package version
    pub version: &'static str,
    /// Seconds since the state was created
    pub uptime_secs: u64,
    /// Outcome counters
    pub extractions: ExtractionMetrics,
    /// Parse request latency
    pub latency: LatencySummary,
    /// Process memory, when sysinfo can see this process
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<ProcessMemory>,
    /// When this snapshot was taken
    pub generated_at: DateTime<Utc>,
}

/// Extraction outcome counters
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionMetrics {
    /// Recipes returned successfully
    pub parsed: u64,
    /// Of those, how many were partial
    pub partial: u64,
    /// Requests that ended in an error
    pub failed: u64,
    /// Successful extractions keyed by winning layer
    pub by_layer: BTreeMap<&'static str, u64>,
}

/// Percentiles over recorded parse latencies, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    /// Number of recorded requests
    pub samples: u64,
    /// Median
    pub p50_ms: f64,
    /// 95th percentile
    pub p95_ms: f64,
    /// 99th percentile
    pub p99_ms: f64,
    /// Slowest request
    pub max_ms: f64,
}

/// Resident and virtual memory of this process
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProcessMemory {
    /// Resident set size in bytes
    pub rss_bytes: u64,
    /// Virtual memory size in bytes
    pub virtual_bytes: u64,
}

/// Parse-latency recorder
///
/// Durations above one minute are clamped to the ceiling rather than dropped.
#[derive(Debug)]
pub struct LatencyRecorder {
    histogram: Option<Mutex<Histogram<u64>>>,
}

fn micros_to_ms(us: u64) -> f64 {
    us as f64 / 1000.0
}

impl LatencyRecorder {
    /// Recorder covering 1 us to 60 s at three significant figures.
    pub fn new() -> Self {
        let histogram = Histogram::new_with_bounds(1, LATENCY_CEILING_US, 3)
            .map(Mutex::new)
            .ok();
        Self { histogram }
    }

    /// Record one request duration.
    pub fn record(&self, elapsed: Duration) {
        if let Some(histogram) = &self.histogram {
            let us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
            histogram.lock().saturating_record(us.max(1));
        }
    }

    /// Current percentiles.
    pub fn summary(&self) -> LatencySummary {
        let Some(histogram) = &self.histogram else {
            return LatencySummary::default();
        };
        let h = histogram.lock();
        if h.is_empty() {
            return LatencySummary::default();
        }
        LatencySummary {
            samples: h.len(),
            p50_ms: micros_to_ms(h.value_at_quantile(0.50)),
            p95_ms: micros_to_ms(h.value_at_quantile(0.95)),
            p99_ms: micros_to_ms(h.value_at_quantile(0.99)),
            max_ms: micros_to_ms(h.max()),
        }
    }
}

impl Default for LatencyRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared application state: the recipe service plus request counters.
#[derive(Debug)]
pub struct AppState {
    service: RecipeService,
    started: Instant,
    parsed: AtomicU64,
    partial: AtomicU64,
    failed: AtomicU64,
    by_layer: [AtomicU64; 3],
    latency: LatencyRecorder,
}

impl AppState {
    /// Create state around a recipe service.
    pub fn new(service: RecipeService) -> Self {
        Self {
            service,
            started: Instant::now(),
            parsed: AtomicU64::new(0),
            partial: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            by_layer: Default::default(),
            latency: LatencyRecorder::new(),
        }
    }

    /// The recipe service.
    pub fn service(&self) -> &RecipeService {
        &self.service
    }

    /// Whole seconds since start-up.
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    fn layer_counter(&self, layer: ExtractionLayer) -> &AtomicU64 {
        let slot = match layer {
            ExtractionLayer::JsonLd => 0,
            ExtractionLayer::Microdata => 1,
            ExtractionLayer::Heuristic => 2,
        };
        &self.by_layer[slot]
    }

    /// Count a recipe returned by `layer`.
    pub fn record_success(&self, layer: ExtractionLayer, partial: bool) {
        self.parsed.fetch_add(1, Ordering::Relaxed);
        self.layer_counter(layer).fetch_add(1, Ordering::Relaxed);
        if partial {
            self.partial.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Count a failed request; returns the new failure total.
    pub fn record_failure(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record how long a parse request took.
    pub fn record_latency(&self, elapsed: Duration) {
        self.latency.record(elapsed);
    }

    /// Snapshot of the outcome counters.
    pub fn extraction_metrics(&self) -> ExtractionMetrics {
        ExtractionMetrics {
            parsed: self.parsed.load(Ordering::Relaxed),
            partial: self.partial.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            by_layer: ExtractionLayer::ALL
                .iter()
                .map(|layer| (layer.as_str(), self.layer_counter(*layer).load(Ordering::Relaxed)))
                .collect(),
        }
    }

    /// Snapshot of parse latency.
    pub fn latency_summary(&self) -> LatencySummary {
        self.latency.summary()
    }
}

fn process_memory() -> Option<ProcessMemory> {
    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    let memory = system.process(pid).map(|p| ProcessMemory {
        rss_bytes: p.memory(),
        virtual_bytes: p.virtual_memory(),
    });
    if memory.is_none() {
        debug!("sysinfo has no entry for pid {}", pid);
    }
    memory
}

/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /status`
#[instrument(skip_all)]
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime_secs(),
        extractions: state.extraction_metrics(),
        latency: state.latency_summary(),
        memory: process_memory(),
        generated_at: Utc::now(),
    })
}

/// Router with `/health` and `/status`.
pub fn status_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchConfig;

    fn state() -> AppState {
        AppState::new(RecipeService::new(&FetchConfig::default()).unwrap())
    }

    #[test]
    fn test_counters_by_layer() {
        let state = state();
        state.record_success(ExtractionLayer::JsonLd, false);
        state.record_success(ExtractionLayer::Heuristic, true);
        state.record_success(ExtractionLayer::Heuristic, false);
        assert_eq!(state.record_failure(), 1);

        let metrics = state.extraction_metrics();
        assert_eq!(metrics.parsed, 3);
        assert_eq!(metrics.partial, 1);
        assert_eq!(metrics.failed, 1);
        assert_eq!(metrics.by_layer["json_ld"], 1);
        assert_eq!(metrics.by_layer["microdata"], 0);
        assert_eq!(metrics.by_layer["heuristic"], 2);
    }

    #[test]
    fn test_each_layer_has_its_own_counter() {
        let state = state();
        for (n, layer) in ExtractionLayer::ALL.iter().enumerate() {
            for _ in 0..=n {
                state.record_success(*layer, false);
            }
        }

        let metrics = state.extraction_metrics();
        assert_eq!(metrics.by_layer.len(), ExtractionLayer::ALL.len());
        for (n, layer) in ExtractionLayer::ALL.iter().enumerate() {
            assert_eq!(metrics.by_layer[layer.as_str()], n as u64 + 1);
        }
    }

    #[test]
    fn test_empty_latency_summary() {
        assert_eq!(LatencyRecorder::new().summary(), LatencySummary::default());
    }

    #[test]
    fn test_latency_percentiles() {
        let recorder = LatencyRecorder::new();
        for ms in [1, 5, 50] {
            recorder.record(Duration::from_millis(ms));
        }
        let summary = recorder.summary();
        assert_eq!(summary.samples, 3);
        assert!(summary.p50_ms > 0.0);
        assert!(summary.p99_ms >= summary.p50_ms);
        assert!(summary.max_ms >= 49.0);
    }

    #[test]
    fn test_latency_above_ceiling_is_clamped() {
        let recorder = LatencyRecorder::new();
        recorder.record(Duration::from_secs(600));
        assert_eq!(recorder.summary().samples, 1);
    }

    #[tokio::test]
    async fn test_health_body() {
        let Json(body) = health_handler().await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn test_status_snapshot() {
        let state = Arc::new(state());
        state.record_success(ExtractionLayer::Microdata, false);
        state.record_latency(Duration::from_millis(12));

        let Json(body) = status_handler(State(state)).await;
        assert_eq!(body.name, "recipekit-web");
        assert_eq!(body.extractions.by_layer["microdata"], 1);
        assert_eq!(body.latency.samples, 1);
    }
}

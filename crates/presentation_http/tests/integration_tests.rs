//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use application::{
    EmissionConfig, EmissionLoop, EmitterConfig, FanOut,
    ports::{ActiveSpan, RandomSource, TracerPort},
};
use axum::http::header;
use axum_test::TestServer;
use domain::value_objects::{SpanContext, SpanId, TraceId};
use infrastructure::{
    PrometheusMetrics,
    metrics::{CONTENT_TYPE, ENDPOINT_LABEL, REQUESTS_TOTAL, TEMPERATURE_CELSIUS},
};
use presentation_http::{AppState, create_router, spawn_emission_task};
use tokio::sync::watch;

/// Tracer that hands out fresh ids and counts ended spans
#[derive(Default)]
struct CountingTracer {
    next_id: AtomicU64,
    ended: Arc<AtomicU64>,
}

struct CountingSpan {
    context: SpanContext,
    ended: Arc<AtomicU64>,
}

impl ActiveSpan for CountingSpan {
    fn context(&self) -> SpanContext {
        self.context
    }

    fn end(self: Box<Self>) {
        self.ended.fetch_add(1, Ordering::SeqCst);
    }
}

impl TracerPort for CountingTracer {
    fn start_span(&self, _name: &'static str, parent: &SpanContext) -> Box<dyn ActiveSpan> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let trace_id = if parent.is_valid() {
            parent.trace_id()
        } else {
            TraceId::new(u128::from(id))
        };
        Box::new(CountingSpan {
            context: SpanContext::new(trace_id, SpanId::new(id)),
            ended: Arc::clone(&self.ended),
        })
    }
}

/// Always draws the middle of the range and the second endpoint
struct FixedRandom;

impl RandomSource for FixedRandom {
    fn uniform(&self, min: f64, max: f64) -> f64 {
        (min + max) / 2.0
    }

    fn index(&self, len: usize) -> usize {
        1.min(len.saturating_sub(1))
    }
}

fn fast_config() -> EmissionConfig {
    EmissionConfig {
        tick_interval: Duration::from_millis(1),
        emitter: EmitterConfig {
            root_work: Duration::ZERO,
            child_work: Duration::ZERO,
            fan_out: FanOut::Joined,
        },
        ..EmissionConfig::default()
    }
}

fn create_loop(metrics: &Arc<PrometheusMetrics>, tracer: Arc<CountingTracer>) -> EmissionLoop {
    EmissionLoop::new(
        fast_config(),
        Arc::new(FixedRandom),
        Arc::clone(metrics) as Arc<dyn application::ports::MetricsRecorder>,
        tracer,
    )
    .expect("valid emission config")
}

fn create_test_server(metrics: &Arc<PrometheusMetrics>, emission_loop: &EmissionLoop) -> TestServer {
    let state = AppState::new(Arc::clone(metrics), emission_loop.progress());
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

fn new_metrics() -> Arc<PrometheusMetrics> {
    Arc::new(PrometheusMetrics::with_default_buckets().expect("default buckets are valid"))
}

#[tokio::test]
async fn health_check_returns_ok() {
    let metrics = new_metrics();
    let emission_loop = create_loop(&metrics, Arc::default());
    let server = create_test_server(&metrics, &emission_loop);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["ticks"], 0);
}

#[tokio::test]
async fn metrics_uses_text_exposition_content_type() {
    let metrics = new_metrics();
    let emission_loop = create_loop(&metrics, Arc::default());
    let server = create_test_server(&metrics, &emission_loop);

    let response = server.get("/metrics").await;

    response.assert_status_ok();
    let content_type = response.header(header::CONTENT_TYPE);
    assert_eq!(content_type.to_str().expect("ascii header"), CONTENT_TYPE);
}

#[tokio::test]
async fn metrics_reflect_completed_ticks() {
    let metrics = new_metrics();
    let tracer = Arc::new(CountingTracer::default());
    let mut emission_loop = create_loop(&metrics, Arc::clone(&tracer));
    let server = create_test_server(&metrics, &emission_loop);

    let report = emission_loop.run_ticks(3).await;
    assert_eq!(report.ticks, 3);

    let text = server.get("/metrics").await.text();
    let counter = format!("{REQUESTS_TOTAL}{{{ENDPOINT_LABEL}=\"/bar\"}} 3");
    assert!(text.contains(&counter), "missing `{counter}` in:\n{text}");
    let temperature: f64 = text
        .lines()
        .find(|line| line.starts_with(TEMPERATURE_CELSIUS))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
        .expect("temperature gauge exported");
    assert!((temperature - 25.0).abs() < f64::EPSILON);

    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["ticks"], 3);

    // One root and two children per tick
    assert_eq!(tracer.ended.load(Ordering::SeqCst), 9);
}

#[tokio::test]
async fn emission_task_stops_on_shutdown() {
    let metrics = new_metrics();
    let tracer = Arc::new(CountingTracer::default());
    let emission_loop = create_loop(&metrics, Arc::clone(&tracer));
    let progress = emission_loop.progress();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = spawn_emission_task(emission_loop, shutdown_rx);

    while progress.ticks() < 2 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    shutdown_tx.send(true).expect("loop still listening");

    let report = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop stops promptly")
        .expect("task did not panic");

    assert!(report.ticks >= 2);
    assert_eq!(report.ticks, progress.ticks());
    assert_eq!(report.next_iteration, report.ticks);
    assert_eq!(tracer.ended.load(Ordering::SeqCst), report.ticks * 3);
}

#[tokio::test]
async fn emission_task_ends_detached_spans_before_returning() {
    let metrics = new_metrics();
    let tracer = Arc::new(CountingTracer::default());
    let config = EmissionConfig {
        emitter: EmitterConfig {
            child_work: Duration::from_millis(50),
            fan_out: FanOut::Detached,
            ..fast_config().emitter
        },
        ..fast_config()
    };
    let emission_loop = EmissionLoop::new(
        config,
        Arc::new(FixedRandom),
        Arc::clone(&metrics) as Arc<dyn application::ports::MetricsRecorder>,
        Arc::clone(&tracer) as Arc<dyn TracerPort>,
    )
    .expect("valid emission config");
    let progress = emission_loop.progress();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = spawn_emission_task(emission_loop, shutdown_rx);
    while progress.ticks() < 1 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    shutdown_tx.send(true).expect("loop still listening");

    let report = handle.await.expect("task did not panic");

    assert_eq!(tracer.ended.load(Ordering::SeqCst), report.ticks * 3);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let metrics = new_metrics();
    let emission_loop = create_loop(&metrics, Arc::default());
    let server = create_test_server(&metrics, &emission_loop);

    let response = server.get("/nonexistent").await;

    response.assert_status_not_found();
}
